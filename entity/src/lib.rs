pub mod calendar_events;
pub mod client_reviews;
pub mod licensed_states;
pub mod teammate_licensed_states;
pub mod teammate_tags;
pub mod teammates;
