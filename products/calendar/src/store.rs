use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use platform_store::StoreResult;
use uuid::Uuid;

use crate::model::{CalendarEvent, NewEvent};

pub const DEFAULT_UPCOMING_LIMIT: u64 = 10;

/// Durable owner of calendar events. Listings are ordered by date, then
/// start time.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_month(&self, month0: u32, year: i32) -> StoreResult<Vec<CalendarEvent>>;

    async fn list_all(&self) -> StoreResult<Vec<CalendarEvent>>;

    /// Events on or after `today`, at most `limit`.
    async fn upcoming(&self, today: NaiveDate, limit: u64) -> StoreResult<Vec<CalendarEvent>>;

    async fn get(&self, id: Uuid) -> StoreResult<CalendarEvent>;

    async fn create(&self, new: NewEvent) -> StoreResult<CalendarEvent>;

    async fn update(&self, id: Uuid, event: NewEvent) -> StoreResult<CalendarEvent>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
impl<T: EventStore + ?Sized> EventStore for Arc<T> {
    async fn list_month(&self, month0: u32, year: i32) -> StoreResult<Vec<CalendarEvent>> {
        (**self).list_month(month0, year).await
    }

    async fn list_all(&self) -> StoreResult<Vec<CalendarEvent>> {
        (**self).list_all().await
    }

    async fn upcoming(&self, today: NaiveDate, limit: u64) -> StoreResult<Vec<CalendarEvent>> {
        (**self).upcoming(today, limit).await
    }

    async fn get(&self, id: Uuid) -> StoreResult<CalendarEvent> {
        (**self).get(id).await
    }

    async fn create(&self, new: NewEvent) -> StoreResult<CalendarEvent> {
        (**self).create(new).await
    }

    async fn update(&self, id: Uuid, event: NewEvent) -> StoreResult<CalendarEvent> {
        (**self).update(id, event).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        (**self).delete(id).await
    }
}
