use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use entity::calendar_events;
use hub_tests::memory_store;
use platform_store::StoreError;
use products_calendar::{EventCategory, EventStore, NewEvent};
use sea_orm::{ActiveModelTrait, Set, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

fn event(title: &str, date: NaiveDate, start: Option<NaiveTime>) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date,
        start_time: start,
        end_time: None,
        all_day: false,
        category: EventCategory::Meeting,
        location: None,
        description: None,
    }
}

#[tokio::test]
async fn month_listing_is_bounded_and_chronological() -> Result<()> {
    let store = memory_store().await?;
    store.create(event("January wrap", day(2026, 1, 31), at(9, 0))).await?;
    store.create(event("Late standup", day(2026, 2, 10), at(15, 0))).await?;
    store.create(event("Early standup", day(2026, 2, 10), at(8, 30))).await?;
    store.create(event("Kickoff", day(2026, 2, 1), at(11, 0))).await?;
    store.create(event("Month end", day(2026, 2, 28), at(16, 0))).await?;
    store.create(event("March start", day(2026, 3, 1), at(9, 0))).await?;

    let february = store.list_month(1, 2026).await?;
    let titles: Vec<&str> = february.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Kickoff", "Early standup", "Late standup", "Month end"]
    );

    assert_eq!(store.list_all().await?.len(), 6);
    Ok(())
}

#[tokio::test]
async fn month_index_out_of_range_is_invalid_input() -> Result<()> {
    let store = memory_store().await?;
    let err = store.list_month(12, 2026).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn upcoming_starts_today_and_honours_the_limit() -> Result<()> {
    let store = memory_store().await?;
    let today = day(2026, 2, 10);
    store.create(event("Yesterday", day(2026, 2, 9), at(9, 0))).await?;
    store.create(event("Today", today, at(9, 0))).await?;
    store.create(event("Tomorrow", day(2026, 2, 11), at(9, 0))).await?;
    store.create(event("Next week", day(2026, 2, 17), at(9, 0))).await?;

    let upcoming = store.upcoming(today, 2).await?;
    let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Today", "Tomorrow"]);

    assert_eq!(store.upcoming(today, 10).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn update_replaces_fields_and_bumps_updated_at() -> Result<()> {
    let store = memory_store().await?;
    let created = store.create(event("Planning", day(2026, 2, 5), at(10, 0))).await?;

    let mut next = event("Planning (moved)", day(2026, 2, 6), None);
    next.all_day = true;
    next.category = EventCategory::Training;
    next.location = Some("Board room".into());
    let updated = store.update(created.id, next).await?;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Planning (moved)");
    assert_eq!(updated.date, day(2026, 2, 6));
    assert_eq!(updated.start_time, None);
    assert!(updated.all_day);
    assert_eq!(updated.time_label(), "All Day");
    assert_eq!(updated.category, EventCategory::Training);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = store.get(created.id).await?;
    assert_eq!(fetched.location.as_deref(), Some("Board room"));

    let missing = store
        .update(Uuid::new_v4(), event("Ghost", day(2026, 2, 6), None))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
    Ok(())
}

#[tokio::test]
async fn delete_removes_once() -> Result<()> {
    let store = memory_store().await?;
    let created = store.create(event("Payroll", day(2026, 2, 13), None)).await?;

    store.delete(created.id).await?;
    assert!(store.get(created.id).await.unwrap_err().is_not_found());
    assert!(store.delete(created.id).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn unknown_stored_category_is_an_integrity_error() -> Result<()> {
    let store = memory_store().await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    calendar_events::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set("Offsite".into()),
        event_date: Set(day(2026, 2, 20)),
        start_time: Set(None),
        end_time: Set(None),
        all_day: Set(true),
        category: Set("Party".into()),
        location: Set(None),
        description: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(store.connection())
    .await?;

    let err = store.list_month(1, 2026).await.unwrap_err();
    assert!(matches!(err, StoreError::Integrity(_)), "{err:?}");
    Ok(())
}
