//! Company calendar slice.

pub mod grid;
pub mod model;
pub mod screen;
pub mod store;

pub use grid::{
    CalendarError, DayCell, MonthCursor, MonthGrid, WEEKDAY_LABELS, build_month_grid, events_on,
    is_today,
};
pub use model::{CalendarEvent, EventCategory, EventDraft, NewEvent, UnknownCategory};
pub use screen::{CalendarScreen, EventEditor, ScreenError, ScreenState};
pub use store::{DEFAULT_UPCOMING_LIMIT, EventStore};
