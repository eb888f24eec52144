use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use entity::calendar_events;
use platform_store::{StoreError, StoreResult};
use products_calendar::{CalendarEvent, EventStore, MonthCursor, NewEvent};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    prelude::DateTimeWithTimeZone,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{SeaStore, db_error};

fn into_event(model: calendar_events::Model) -> StoreResult<CalendarEvent> {
    Ok(CalendarEvent {
        category: model
            .category
            .parse()
            .map_err(|err: products_calendar::UnknownCategory| StoreError::integrity(err.to_string()))?,
        id: model.id,
        title: model.title,
        date: model.event_date,
        start_time: model.start_time,
        end_time: model.end_time,
        all_day: model.all_day,
        location: model.location,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn chronological(query: Select<calendar_events::Entity>) -> Select<calendar_events::Entity> {
    query
        .order_by_asc(calendar_events::Column::EventDate)
        .order_by_asc(calendar_events::Column::StartTime)
        .order_by_asc(calendar_events::Column::Title)
}

fn write_fields(active: &mut calendar_events::ActiveModel, event: NewEvent) {
    active.title = Set(event.title);
    active.event_date = Set(event.date);
    active.start_time = Set(event.start_time);
    active.end_time = Set(event.end_time);
    active.all_day = Set(event.all_day);
    active.category = Set(event.category.as_str().to_string());
    active.location = Set(event.location);
    active.description = Set(event.description);
}

impl SeaStore {
    async fn fetch_events(
        &self,
        query: Select<calendar_events::Entity>,
    ) -> StoreResult<Vec<CalendarEvent>> {
        chronological(query)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(into_event)
            .collect()
    }
}

#[async_trait]
impl EventStore for SeaStore {
    #[instrument(skip(self))]
    async fn list_month(&self, month0: u32, year: i32) -> StoreResult<Vec<CalendarEvent>> {
        let (first, last) = MonthCursor::new(month0, year)
            .and_then(MonthCursor::range)
            .map_err(|err| StoreError::InvalidInput(err.to_string()))?;
        let query = calendar_events::Entity::find()
            .filter(calendar_events::Column::EventDate.gte(first))
            .filter(calendar_events::Column::EventDate.lte(last));
        self.fetch_events(query).await
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> StoreResult<Vec<CalendarEvent>> {
        self.fetch_events(calendar_events::Entity::find()).await
    }

    #[instrument(skip(self))]
    async fn upcoming(&self, today: NaiveDate, limit: u64) -> StoreResult<Vec<CalendarEvent>> {
        let query = calendar_events::Entity::find()
            .filter(calendar_events::Column::EventDate.gte(today))
            .limit(limit);
        self.fetch_events(query).await
    }

    #[instrument(skip(self))]
    async fn get(&self, id: Uuid) -> StoreResult<CalendarEvent> {
        let model = calendar_events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(StoreError::NotFound)?;
        into_event(model)
    }

    #[instrument(skip(self, new), fields(title = %new.title))]
    async fn create(&self, new: NewEvent) -> StoreResult<CalendarEvent> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let mut active = calendar_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        write_fields(&mut active, new);
        let model = active.insert(&self.db).await.map_err(db_error)?;
        info!(id = %model.id, "calendar event created");
        into_event(model)
    }

    #[instrument(skip(self, event))]
    async fn update(&self, id: Uuid, event: NewEvent) -> StoreResult<CalendarEvent> {
        let model = calendar_events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(StoreError::NotFound)?;
        let mut active: calendar_events::ActiveModel = model.into();
        write_fields(&mut active, event);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(db_error)?;
        info!(%id, "calendar event updated");
        into_event(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = calendar_events::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        info!(%id, "calendar event deleted");
        Ok(())
    }
}
