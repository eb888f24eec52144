use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use platform_store::ValidationErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const TITLE_MAX: usize = 200;
pub const LOCATION_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 4000;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown event category `{0}`")]
pub struct UnknownCategory(pub String);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    #[default]
    Meeting,
    Payroll,
    Holiday,
    Event,
    Training,
    Deadline,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        Self::Meeting,
        Self::Payroll,
        Self::Holiday,
        Self::Event,
        Self::Training,
        Self::Deadline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Payroll => "payroll",
            Self::Holiday => "holiday",
            Self::Event => "event",
            Self::Training => "training",
            Self::Deadline => "deadline",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A dated company event. `date` is a plain calendar day with no zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub category: EventCategory,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// "All Day", "10:00 AM" or "10:00 AM - 11:30 AM".
    pub fn time_label(&self) -> String {
        if self.all_day {
            return "All Day".to_string();
        }
        let fmt = |t: NaiveTime| t.format("%-I:%M %p").to_string();
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!("{} - {}", fmt(start), fmt(end)),
            (Some(start), None) => fmt(start),
            _ => String::new(),
        }
    }
}

/// Validated event payload for create and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub category: EventCategory,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl NewEvent {
    pub fn into_event(self, id: Uuid, now: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            all_day: self.all_day,
            category: self.category,
            location: self.location,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Event modal buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub all_day: bool,
    pub category: String,
    pub location: String,
    pub description: String,
}

impl EventDraft {
    /// Blank draft pre-filled with the clicked day.
    pub fn for_day(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            category: EventCategory::default().as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn from_event(event: &CalendarEvent) -> Self {
        let time = |t: Option<NaiveTime>| t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default();
        Self {
            title: event.title.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            start_time: time(event.start_time),
            end_time: time(event.end_time),
            all_day: event.all_day,
            category: event.category.as_str().to_string(),
            location: event.location.clone().unwrap_or_default(),
            description: event.description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<NewEvent, ValidationErrors> {
        let mut report = ValidationErrors::default();
        let title = report.required("title", "Title", &self.title, TITLE_MAX);
        let date = if self.date.trim().is_empty() {
            report.push("date", "Date is required");
            None
        } else {
            report.optional_date("date", "Date", &self.date)
        };
        let category = match self.category.trim() {
            "" => Some(EventCategory::default()),
            raw => match raw.parse::<EventCategory>() {
                Ok(category) => Some(category),
                Err(err) => {
                    report.push("category", err.to_string());
                    None
                }
            },
        };
        let location = report.optional("location", "Location", &self.location, LOCATION_MAX);
        let description =
            report.optional("description", "Description", &self.description, DESCRIPTION_MAX);

        let (start_time, end_time) = if self.all_day {
            (None, None)
        } else {
            let start = report.optional_time("start_time", "Start time", &self.start_time);
            let end = report.optional_time("end_time", "End time", &self.end_time);
            if let (Some(start), Some(end)) = (start, end) {
                if end < start {
                    report.push("end_time", "End time must not be before start time");
                }
            }
            if start.is_none() && end.is_some() {
                report.push("start_time", "Start time is required when an end time is set");
            }
            (start, end)
        };

        match (date, category) {
            (Some(date), Some(category)) => report.finish(|| NewEvent {
                title,
                date,
                start_time,
                end_time,
                all_day: self.all_day,
                category,
                location,
                description,
            }),
            _ => Err(report),
        }
    }
}
