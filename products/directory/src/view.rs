//! Screen-level controllers for the directory and the profile page.
//!
//! Both own a snapshot of store rows and re-fetch after every mutation rather
//! than patching the snapshot in place.

use chrono::NaiveDate;
use platform_store::StoreError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    export::{CsvExport, DEFAULT_EXPORT_SLUG, export_file},
    filter::{self, FilterCriteria, Selector},
    form::{TeammateForm, TeammatePatch},
    group::{DepartmentBucket, group_by_department},
    model::{Branch, Department, OnboardingStatus, Teammate, TeammateProfile},
    sort::{SortColumn, TableSort},
    stats::DirectoryStats,
    store::{DirectoryStore, ListFilters},
};

pub const CREATED_NOTICE: &str = "Teammate created successfully!";
pub const UPDATED_NOTICE: &str = "Teammate updated successfully!";
pub const DELETED_NOTICE: &str = "Teammate deleted.";
pub const PROFILE_NOT_FOUND: &str = "Teammate not found";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Gallery,
    Table,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Creating(TeammateForm),
    Editing { id: Uuid, patch: TeammatePatch },
}

pub struct DirectoryView<S> {
    store: S,
    phase: LoadPhase,
    records: Vec<Teammate>,
    criteria: FilterCriteria,
    mode: ViewMode,
    sort: TableSort,
    modal: Modal,
    notice: Option<String>,
    export_slug: String,
}

impl<S: DirectoryStore> DirectoryView<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            phase: LoadPhase::Loading,
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            mode: ViewMode::default(),
            sort: TableSort::unsorted(),
            modal: Modal::Closed,
            notice: None,
            export_slug: DEFAULT_EXPORT_SLUG.to_string(),
        }
    }

    pub fn with_export_slug(mut self, slug: impl Into<String>) -> Self {
        self.export_slug = slug.into();
        self
    }

    pub async fn load(&mut self) {
        self.phase = LoadPhase::Loading;
        match self.store.list(ListFilters::default()).await {
            Ok(records) => {
                info!(count = records.len(), "directory loaded");
                self.records = records;
                self.phase = LoadPhase::Ready;
            }
            Err(err) => {
                warn!(error = %err, "directory load failed");
                self.records.clear();
                self.phase = LoadPhase::Failed(err.message());
            }
        }
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn records(&self) -> &[Teammate] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.criteria.search = term.into();
    }

    pub fn set_department(&mut self, selector: Selector<Department>) {
        self.criteria.department = selector;
    }

    pub fn set_branch(&mut self, selector: Selector<Branch>) {
        self.criteria.branch = selector;
    }

    pub fn set_onboarding_status(&mut self, selector: Selector<OnboardingStatus>) {
        self.criteria.onboarding_status = selector;
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn toggle_view_mode(&mut self) {
        self.mode = match self.mode {
            ViewMode::Gallery => ViewMode::Table,
            ViewMode::Table => ViewMode::Gallery,
        };
    }

    pub fn sort(&self) -> TableSort {
        self.sort
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
    }

    /// Snapshot rows passing the current criteria.
    pub fn visible(&self) -> Vec<&Teammate> {
        filter::apply(&self.records, &self.criteria)
    }

    pub fn gallery(&self) -> Vec<DepartmentBucket<'_>> {
        group_by_department(self.visible())
    }

    pub fn table(&self) -> Vec<&Teammate> {
        self.sort.apply(self.visible())
    }

    /// Header figures always describe the whole snapshot.
    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats::compute(&self.records)
    }

    pub fn export(&self, today: NaiveDate) -> CsvExport {
        export_file(self.visible(), &self.export_slug, today)
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Creating(TeammateForm::default());
    }

    pub fn open_edit(&mut self, id: Uuid) {
        self.modal = Modal::Editing {
            id,
            patch: TeammatePatch::default(),
        };
    }

    pub fn form_mut(&mut self) -> Option<&mut TeammateForm> {
        match &mut self.modal {
            Modal::Creating(form) => Some(form),
            _ => None,
        }
    }

    pub fn patch_mut(&mut self) -> Option<&mut TeammatePatch> {
        match &mut self.modal {
            Modal::Editing { patch, .. } => Some(patch),
            _ => None,
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Validate, create, reload, close. On failure the modal stays open.
    pub async fn submit_create(&mut self) -> Result<Teammate, StoreError> {
        let Modal::Creating(form) = &self.modal else {
            return Err(StoreError::InvalidInput("no create form is open".into()));
        };
        let outcome = match form.validate() {
            Ok(new) => self.store.create(new).await,
            Err(report) => Err(report.into()),
        };
        match outcome {
            Ok(created) => {
                info!(id = %created.id, "teammate created");
                self.notice = Some(CREATED_NOTICE.to_string());
                self.modal = Modal::Closed;
                self.load().await;
                Ok(created)
            }
            Err(err) => {
                self.notice = Some(format!("Error creating teammate: {}", err.message()));
                Err(err)
            }
        }
    }

    pub async fn submit_edit(&mut self) -> Result<Teammate, StoreError> {
        let Modal::Editing { id, patch } = &self.modal else {
            return Err(StoreError::InvalidInput("no edit form is open".into()));
        };
        let id = *id;
        let outcome = match patch.clone().validate() {
            Ok(patch) => self.store.update(id, patch).await,
            Err(report) => Err(report.into()),
        };
        match outcome {
            Ok(updated) => {
                self.notice = Some(UPDATED_NOTICE.to_string());
                self.modal = Modal::Closed;
                self.load().await;
                Ok(updated)
            }
            Err(err) => {
                self.notice = Some(format!("Error updating teammate: {}", err.message()));
                Err(err)
            }
        }
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        match self.store.delete(id).await {
            Ok(()) => {
                self.notice = Some(DELETED_NOTICE.to_string());
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.notice = Some(format!("Error deleting teammate: {}", err.message()));
                Err(err)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProfilePhase {
    Loading,
    Ready(Box<TeammateProfile>),
    NotFound,
    Failed(String),
}

/// Detail page for one teammate.
pub struct ProfileView<S> {
    store: S,
    id: Uuid,
    phase: ProfilePhase,
}

impl<S: DirectoryStore> ProfileView<S> {
    pub fn new(store: S, id: Uuid) -> Self {
        Self {
            store,
            id,
            phase: ProfilePhase::Loading,
        }
    }

    pub async fn load(&mut self) {
        self.phase = ProfilePhase::Loading;
        self.phase = match self.store.get_profile(self.id).await {
            Ok(profile) => ProfilePhase::Ready(Box::new(profile)),
            Err(StoreError::NotFound) => ProfilePhase::NotFound,
            Err(err) => ProfilePhase::Failed(err.message()),
        };
    }

    pub fn phase(&self) -> &ProfilePhase {
        &self.phase
    }

    pub fn profile(&self) -> Option<&TeammateProfile> {
        match &self.phase {
            ProfilePhase::Ready(profile) => Some(profile.as_ref()),
            _ => None,
        }
    }

    /// Inline text for the non-ready phases.
    pub fn error_text(&self) -> Option<&str> {
        match &self.phase {
            ProfilePhase::NotFound => Some(PROFILE_NOT_FOUND),
            ProfilePhase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
