//! Demo roster and calendar used by `hub seed` and the integration tests.

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use entity::{client_reviews, licensed_states, teammate_licensed_states, teammates};
use platform_store::{StoreError, StoreResult};
use products_calendar::{EventCategory, EventStore, NewEvent};
use products_directory::{
    Branch, Department, DirectoryStore, NewTag, NewTeammate, OnboardingStatus, Teammate,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    prelude::DateTimeWithTimeZone,
};
use tracing::info;
use uuid::Uuid;

use crate::{SeaStore, db_error};

#[derive(Clone, Debug, Default)]
pub struct SeedSummary {
    pub teammates: Vec<Teammate>,
    pub events: usize,
    /// The roster already had rows; nothing was written.
    pub skipped: bool,
}

struct SeedMate {
    first: &'static str,
    last: &'static str,
    position: &'static str,
    department: Department,
    branch: Branch,
    status: OnboardingStatus,
    nmls: Option<&'static str>,
    tags: &'static [&'static str],
}

const ROSTER: [SeedMate; 6] = [
    SeedMate {
        first: "Dana",
        last: "Whitfield",
        position: "President",
        department: Department::Leadership,
        branch: Branch::PittsburghHq,
        status: OnboardingStatus::Done,
        nmls: Some("102938"),
        tags: &["Leadership Team"],
    },
    SeedMate {
        first: "John",
        last: "Doe",
        position: "Senior Loan Officer",
        department: Department::Sales,
        branch: Branch::PittsburghHq,
        status: OnboardingStatus::Done,
        nmls: Some("458812"),
        tags: &["Top Producer", "Spanish"],
    },
    SeedMate {
        first: "Jane",
        last: "Smith",
        position: "Loan Processor",
        department: Department::Operations,
        branch: Branch::Savannah,
        status: OnboardingStatus::InProgress,
        nmls: None,
        tags: &[],
    },
    SeedMate {
        first: "Marcus",
        last: "Reyes",
        position: "Loan Officer",
        department: Department::Sales,
        branch: Branch::LhCalifornia,
        status: OnboardingStatus::NotStarted,
        nmls: Some("771204"),
        tags: &["New Hire"],
    },
    SeedMate {
        first: "Priya",
        last: "Nair",
        position: "Underwriter",
        department: Department::Operations,
        branch: Branch::EriePa,
        status: OnboardingStatus::Done,
        nmls: None,
        tags: &[],
    },
    SeedMate {
        first: "Walt",
        last: "Gruber",
        position: "Branch Manager",
        department: Department::Sales,
        branch: Branch::WtxLending,
        status: OnboardingStatus::Offboard,
        nmls: Some("300117"),
        tags: &[],
    },
];

fn email_for(first: &str, last: &str) -> String {
    format!(
        "{}.{}@lendingheights.test",
        first.to_ascii_lowercase(),
        last.to_ascii_lowercase()
    )
}

fn month_day(today: NaiveDate, day: u32) -> NaiveDate {
    today.with_day(day).unwrap_or(today)
}

fn demo_events(today: NaiveDate) -> Vec<NewEvent> {
    let at = |h, m| NaiveTime::from_hms_opt(h, m, 0);
    let event = |title: &str,
                 date: NaiveDate,
                 start: Option<NaiveTime>,
                 end: Option<NaiveTime>,
                 category: EventCategory| NewEvent {
        title: title.to_string(),
        date,
        start_time: start,
        end_time: end,
        all_day: start.is_none(),
        category,
        location: None,
        description: None,
    };
    vec![
        event(
            "Planning Meeting",
            month_day(today, 5),
            at(10, 0),
            at(11, 0),
            EventCategory::Meeting,
        ),
        event("Payroll Processing", month_day(today, 15), None, None, EventCategory::Payroll),
        event("Compliance Training", month_day(today, 18), at(13, 30), at(15, 0), EventCategory::Training),
        event("Team Building Event", month_day(today, 25), at(14, 0), None, EventCategory::Event),
        event("Quarter Close", month_day(today, 28), None, None, EventCategory::Deadline),
    ]
}

/// Insert the demo roster, a few licences and reviews, and one month of
/// events around `today`. Does nothing when teammates already exist.
pub async fn seed_demo(store: &SeaStore, today: NaiveDate) -> StoreResult<SeedSummary> {
    let existing = teammates::Entity::find()
        .count(store.connection())
        .await
        .map_err(db_error)?;
    if existing > 0 {
        info!(existing, "roster already present; seed skipped");
        return Ok(SeedSummary {
            skipped: true,
            ..SeedSummary::default()
        });
    }

    let mut created: Vec<Teammate> = Vec::with_capacity(ROSTER.len());
    for mate in &ROSTER {
        let manager_id = created.first().map(|lead| lead.id);
        let record = DirectoryStore::create(
            store,
            NewTeammate {
                first_name: mate.first.to_string(),
                last_name: mate.last.to_string(),
                email: email_for(mate.first, mate.last),
                phone: None,
                position: mate.position.to_string(),
                department: mate.department,
                branch: mate.branch,
                nmls: mate.nmls.map(str::to_string),
                headshot_url: None,
                start_date: NaiveDate::from_ymd_opt(2023, 3, 1),
                birthday: None,
                onboarding_status: mate.status,
                linkedin: None,
                calendly: None,
                manager_id,
            },
        )
        .await?;
        let record = if mate.tags.is_empty() {
            record
        } else {
            let tags = mate.tags.iter().map(|name| NewTag::named(*name)).collect();
            store.add_tags(record.id, tags).await?
        };
        created.push(record);
    }

    let seeded_at: DateTimeWithTimeZone = Utc::now().into();
    let licensed = created.iter().filter(|mate| mate.nmls.is_some());
    for (mate, code) in licensed.zip(["PA", "PA", "CA", "TX"]) {
        let state = licensed_states::Entity::find()
            .filter(licensed_states::Column::StateCode.eq(code))
            .one(store.connection())
            .await
            .map_err(db_error)?
            .ok_or_else(|| StoreError::integrity(format!("licensed state {code} missing")))?;
        teammate_licensed_states::ActiveModel {
            id: Set(Uuid::new_v4()),
            teammate_id: Set(mate.id),
            licensed_state_id: Set(state.id),
            license_number: Set(mate.nmls.clone()),
            created_at: Set(seeded_at),
        }
        .insert(store.connection())
        .await
        .map_err(db_error)?;
    }

    if let Some(producer) = created.get(1) {
        for (client, text, rating) in [
            ("The Alvarez Family", "Closed on time and explained every step.", 5_i16),
            ("K. Okafor", "Responsive and patient with our questions.", 4_i16),
        ] {
            client_reviews::ActiveModel {
                id: Set(Uuid::new_v4()),
                teammate_id: Set(producer.id),
                client_name: Set(client.to_string()),
                review_text: Set(text.to_string()),
                rating: Set(rating),
                review_date: Set(Some(today)),
                created_at: Set(seeded_at),
            }
            .insert(store.connection())
            .await
            .map_err(db_error)?;
        }
    }

    let events = demo_events(today);
    let event_count = events.len();
    for event in events {
        EventStore::create(store, event).await?;
    }

    info!(teammates = created.len(), events = event_count, "demo data seeded");
    Ok(SeedSummary {
        teammates: created,
        events: event_count,
        skipped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_emails_are_unique() {
        let mut emails: Vec<_> = ROSTER.iter().map(|m| email_for(m.first, m.last)).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), ROSTER.len());
    }

    #[test]
    fn demo_events_stay_inside_the_month() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let events = demo_events(today);
        assert!(events.iter().all(|e| e.date.month() == 2));
        assert!(events.iter().filter(|e| e.all_day).all(|e| e.start_time.is_none()));
    }
}
