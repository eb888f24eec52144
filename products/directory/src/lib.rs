//! Team directory slice.
//!
//! Records are loaded once per screen from a [`DirectoryStore`]; everything
//! after that (search, department buckets, column sort, CSV export, stats)
//! runs over the in-memory snapshot.

pub mod export;
pub mod filter;
pub mod form;
pub mod group;
pub mod model;
pub mod sort;
pub mod stats;
pub mod store;
pub mod view;

pub use export::{CSV_HEADERS, CSV_MIME, CsvExport, DEFAULT_EXPORT_SLUG, export_file, to_csv};
pub use filter::{FilterCriteria, Selector, matches};
pub use form::{NewTeammate, TeammateForm, TeammatePatch};
pub use group::{DepartmentBucket, group_by_department};
pub use model::{
    Branch, ClientReview, Department, ManagerSummary, NewTag, OnboardingStatus, StateLicense,
    Teammate, TeammateProfile, TeammateTag, UnknownLabel,
};
pub use sort::{SortColumn, SortDirection, TableSort};
pub use stats::DirectoryStats;
pub use store::{DirectoryStore, ListFilters};
pub use view::{DirectoryView, LoadPhase, Modal, ProfilePhase, ProfileView, ViewMode};
