use async_graphql::{Context, Enum, InputObject, Object, SimpleObject};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use platform_api::gql_error;
use platform_store::StoreError;
use products_calendar::{
    CalendarEvent, DEFAULT_UPCOMING_LIMIT, EventCategory, EventDraft, MonthCursor,
    WEEKDAY_LABELS, events_on, is_today,
};
use tracing::instrument;
use uuid::Uuid;

use super::hub_data;

const MAX_UPCOMING: u64 = 100;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_calendar::EventCategory")]
pub enum EventCategoryKind {
    Meeting,
    Payroll,
    Holiday,
    Event,
    Training,
    Deadline,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EventNode {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub category: EventCategoryKind,
    pub location: Option<String>,
    pub description: Option<String>,
    /// "All Day", "10:00 AM" or "10:00 AM - 11:30 AM".
    pub time_label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CalendarEvent> for EventNode {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            id: event.id,
            time_label: event.time_label(),
            title: event.title.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            all_day: event.all_day,
            category: event.category.into(),
            location: event.location.clone(),
            description: event.description.clone(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DayCellNode {
    /// `None` for padding cells.
    pub day: Option<u32>,
    pub is_today: bool,
    pub events: Vec<EventNode>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct MonthNode {
    /// Zero-based month index.
    pub month: u32,
    pub year: i32,
    pub title: String,
    pub weekday_labels: Vec<String>,
    pub cells: Vec<DayCellNode>,
    pub events: Vec<EventNode>,
}

#[derive(InputObject, Clone, Debug)]
pub struct EventInput {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[graphql(default)]
    pub all_day: bool,
    #[graphql(default_with = "EventCategoryKind::Meeting")]
    pub category: EventCategoryKind,
    pub location: Option<String>,
    pub description: Option<String>,
}

fn time_text(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

impl From<EventInput> for EventDraft {
    fn from(input: EventInput) -> Self {
        Self {
            title: input.title,
            date: input.date.format("%Y-%m-%d").to_string(),
            start_time: time_text(input.start_time),
            end_time: time_text(input.end_time),
            all_day: input.all_day,
            category: EventCategory::from(input.category).as_str().to_string(),
            location: input.location.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
        }
    }
}

#[derive(Default)]
pub struct CalendarQuery;

#[Object]
impl CalendarQuery {
    /// The grid for `month` (0-11) of `year`, with each day's events.
    #[instrument(name = "graphql.calendar.month", skip(self, ctx))]
    async fn month(
        &self,
        ctx: &Context<'_>,
        month: u32,
        year: i32,
    ) -> async_graphql::Result<MonthNode> {
        let cursor = MonthCursor::new(month, year)
            .map_err(|err| gql_error(StoreError::InvalidInput(err.to_string())))?;
        let grid = cursor
            .grid()
            .map_err(|err| gql_error(StoreError::InvalidInput(err.to_string())))?;
        let events = hub_data(ctx)?
            .events
            .list_month(month, year)
            .await
            .map_err(gql_error)?;
        let today = Local::now().date_naive();
        let cells = grid
            .cells
            .iter()
            .map(|cell| DayCellNode {
                day: cell.day(),
                is_today: is_today(*cell, month, year, today),
                events: cell
                    .day()
                    .map(|day| {
                        events_on(&events, year, month, day)
                            .into_iter()
                            .map(EventNode::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();
        Ok(MonthNode {
            month,
            year,
            title: grid.title(),
            weekday_labels: WEEKDAY_LABELS.iter().map(|l| l.to_string()).collect(),
            cells,
            events: events.iter().map(EventNode::from).collect(),
        })
    }

    #[instrument(name = "graphql.calendar.upcoming", skip(self, ctx))]
    async fn upcoming(
        &self,
        ctx: &Context<'_>,
        limit: Option<u64>,
    ) -> async_graphql::Result<Vec<EventNode>> {
        let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT).clamp(1, MAX_UPCOMING);
        let events = hub_data(ctx)?
            .events
            .upcoming(Local::now().date_naive(), limit)
            .await
            .map_err(gql_error)?;
        Ok(events.iter().map(EventNode::from).collect())
    }

    #[instrument(name = "graphql.calendar.event", skip(self, ctx))]
    async fn event(&self, ctx: &Context<'_>, id: Uuid) -> async_graphql::Result<Option<EventNode>> {
        match hub_data(ctx)?.events.get(id).await {
            Ok(event) => Ok(Some(EventNode::from(&event))),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(gql_error(err)),
        }
    }
}

#[derive(Default)]
pub struct CalendarMutation;

#[Object]
impl CalendarMutation {
    #[instrument(name = "graphql.calendar.create_event", skip_all)]
    async fn create_event(
        &self,
        ctx: &Context<'_>,
        input: EventInput,
    ) -> async_graphql::Result<EventNode> {
        let new = EventDraft::from(input).validate().map_err(gql_error)?;
        let event = hub_data(ctx)?
            .events
            .create(new)
            .await
            .map_err(gql_error)?;
        Ok(EventNode::from(&event))
    }

    #[instrument(name = "graphql.calendar.update_event", skip(self, ctx, input))]
    async fn update_event(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: EventInput,
    ) -> async_graphql::Result<EventNode> {
        let new = EventDraft::from(input).validate().map_err(gql_error)?;
        let event = hub_data(ctx)?
            .events
            .update(id, new)
            .await
            .map_err(gql_error)?;
        Ok(EventNode::from(&event))
    }

    #[instrument(name = "graphql.calendar.delete_event", skip(self, ctx))]
    async fn delete_event(&self, ctx: &Context<'_>, id: Uuid) -> async_graphql::Result<bool> {
        hub_data(ctx)?
            .events
            .delete(id)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }
}
