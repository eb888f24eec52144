//! Month view controller.
//!
//! ```text
//! Loading -> Viewing -> ModalOpen -> Saving -> (reload) Viewing
//!                           |  ^
//!                           v  | cancel
//!                    ConfirmingDelete -> Deleting -> (reload) Viewing
//! ```

use chrono::NaiveDate;
use platform_store::StoreError;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    grid::{self, CalendarError, DayCell, MonthCursor, MonthGrid},
    model::{CalendarEvent, EventDraft},
    store::EventStore,
};

/// The modal buffer, plus the id when editing an existing event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventEditor {
    pub event_id: Option<Uuid>,
    pub draft: EventDraft,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenState {
    Loading,
    Viewing,
    ModalOpen(EventEditor),
    Saving(EventEditor),
    ConfirmingDelete(EventEditor),
    Deleting(EventEditor),
}

impl ScreenState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Viewing => "viewing",
            Self::ModalOpen(_) => "modal open",
            Self::Saving(_) => "saving",
            Self::ConfirmingDelete(_) => "confirming delete",
            Self::Deleting(_) => "deleting",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("event {0} is not loaded")]
    UnknownEvent(Uuid),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct CalendarScreen<S> {
    store: S,
    cursor: MonthCursor,
    state: ScreenState,
    events: Vec<CalendarEvent>,
    upcoming: Vec<CalendarEvent>,
    error: Option<String>,
}

impl<S: EventStore> CalendarScreen<S> {
    pub fn new(store: S, cursor: MonthCursor) -> Self {
        Self {
            store,
            cursor,
            state: ScreenState::Loading,
            events: Vec::new(),
            upcoming: Vec::new(),
            error: None,
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn upcoming(&self) -> &[CalendarEvent] {
        &self.upcoming
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn grid(&self) -> Result<MonthGrid, CalendarError> {
        self.cursor.grid()
    }

    pub fn events_on(&self, day: u32) -> Vec<&CalendarEvent> {
        grid::events_on(&self.events, self.cursor.year(), self.cursor.month0(), day)
    }

    pub fn is_today(&self, cell: DayCell, today: NaiveDate) -> bool {
        grid::is_today(cell, self.cursor.month0(), self.cursor.year(), today)
    }

    /// Fetch the visible month. Failures leave an inline error and an empty
    /// month; calling again retries.
    pub async fn load(&mut self) {
        self.state = ScreenState::Loading;
        let (month0, year) = (self.cursor.month0(), self.cursor.year());
        match self.store.list_month(month0, year).await {
            Ok(events) => {
                info!(month0, year, count = events.len(), "calendar month loaded");
                self.events = events;
                self.error = None;
            }
            Err(err) => {
                warn!(month0, year, error = %err, "calendar month load failed");
                self.events.clear();
                self.error = Some(format!("Error loading events: {}", err.message()));
            }
        }
        self.state = ScreenState::Viewing;
    }

    pub async fn load_upcoming(&mut self, today: NaiveDate, limit: u64) {
        match self.store.upcoming(today, limit).await {
            Ok(events) => self.upcoming = events,
            Err(err) => {
                warn!(error = %err, "upcoming events load failed");
                self.error = Some(format!("Error loading upcoming events: {}", err.message()));
            }
        }
    }

    pub async fn next_month(&mut self) -> Result<(), ScreenError> {
        self.go_to(self.cursor.next()).await
    }

    pub async fn previous_month(&mut self) -> Result<(), ScreenError> {
        self.go_to(self.cursor.previous()).await
    }

    pub async fn go_to(&mut self, cursor: MonthCursor) -> Result<(), ScreenError> {
        self.expect_viewing("navigate")?;
        self.cursor = cursor;
        self.load().await;
        Ok(())
    }

    pub fn open_create(&mut self, date: NaiveDate) -> Result<(), ScreenError> {
        self.expect_viewing("open the event editor")?;
        self.error = None;
        self.state = ScreenState::ModalOpen(EventEditor {
            event_id: None,
            draft: EventDraft::for_day(date),
        });
        Ok(())
    }

    pub fn open_edit(&mut self, id: Uuid) -> Result<(), ScreenError> {
        self.expect_viewing("open the event editor")?;
        let event = self
            .events
            .iter()
            .find(|event| event.id == id)
            .ok_or(ScreenError::UnknownEvent(id))?;
        self.error = None;
        self.state = ScreenState::ModalOpen(EventEditor {
            event_id: Some(id),
            draft: EventDraft::from_event(event),
        });
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Option<&mut EventDraft> {
        match &mut self.state {
            ScreenState::ModalOpen(editor) => Some(&mut editor.draft),
            _ => None,
        }
    }

    /// Closes the modal, or backs out of a pending delete confirmation.
    pub fn cancel(&mut self) -> Result<(), ScreenError> {
        let next = match std::mem::replace(&mut self.state, ScreenState::Loading) {
            ScreenState::ModalOpen(_) => ScreenState::Viewing,
            ScreenState::ConfirmingDelete(editor) => ScreenState::ModalOpen(editor),
            other => {
                let state = other.name();
                self.state = other;
                return Err(ScreenError::InvalidTransition {
                    action: "cancel",
                    state,
                });
            }
        };
        self.state = next;
        Ok(())
    }

    pub async fn save(&mut self) -> Result<CalendarEvent, ScreenError> {
        let editor = self.take_modal("save")?;
        let (action, outcome) = match editor.draft.validate() {
            Err(report) => ("saving", Err(StoreError::from(report))),
            Ok(new) => {
                self.state = ScreenState::Saving(editor.clone());
                match editor.event_id {
                    Some(id) => ("updating", self.store.update(id, new).await),
                    None => ("creating", self.store.create(new).await),
                }
            }
        };
        match outcome {
            Ok(saved) => {
                info!(id = %saved.id, "calendar event saved");
                self.load().await;
                Ok(saved)
            }
            Err(err) => {
                self.error = Some(format!("Error {action} event: {}", err.message()));
                self.state = ScreenState::ModalOpen(editor);
                Err(err.into())
            }
        }
    }

    pub fn request_delete(&mut self) -> Result<(), ScreenError> {
        match &self.state {
            ScreenState::ModalOpen(editor) if editor.event_id.is_some() => {
                let editor = editor.clone();
                self.state = ScreenState::ConfirmingDelete(editor);
                Ok(())
            }
            other => Err(ScreenError::InvalidTransition {
                action: "delete",
                state: other.name(),
            }),
        }
    }

    pub async fn confirm_delete(&mut self) -> Result<(), ScreenError> {
        let editor = match std::mem::replace(&mut self.state, ScreenState::Loading) {
            ScreenState::ConfirmingDelete(editor) => editor,
            other => {
                let state = other.name();
                self.state = other;
                return Err(ScreenError::InvalidTransition {
                    action: "confirm delete",
                    state,
                });
            }
        };
        let Some(id) = editor.event_id else {
            self.state = ScreenState::ModalOpen(editor);
            return Err(ScreenError::InvalidTransition {
                action: "confirm delete",
                state: "creating",
            });
        };
        self.state = ScreenState::Deleting(editor.clone());
        match self.store.delete(id).await {
            Ok(()) => {
                info!(%id, "calendar event deleted");
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.error = Some(format!("Error deleting event: {}", err.message()));
                self.state = ScreenState::ModalOpen(editor);
                Err(err.into())
            }
        }
    }

    fn expect_viewing(&self, action: &'static str) -> Result<(), ScreenError> {
        if self.state == ScreenState::Viewing {
            Ok(())
        } else {
            Err(ScreenError::InvalidTransition {
                action,
                state: self.state.name(),
            })
        }
    }

    fn take_modal(&mut self, action: &'static str) -> Result<EventEditor, ScreenError> {
        match std::mem::replace(&mut self.state, ScreenState::Loading) {
            ScreenState::ModalOpen(editor) => Ok(editor),
            other => {
                let state = other.name();
                self.state = other;
                Err(ScreenError::InvalidTransition { action, state })
            }
        }
    }
}
