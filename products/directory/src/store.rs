use std::sync::Arc;

use async_trait::async_trait;
use platform_store::StoreResult;
use uuid::Uuid;

use crate::{
    filter::{FilterCriteria, Selector},
    form::{NewTeammate, TeammatePatch},
    model::{Branch, Department, NewTag, OnboardingStatus, Teammate, TeammateProfile},
};

/// Filters pushed down to the record store; no search text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub department: Selector<Department>,
    pub branch: Selector<Branch>,
    pub onboarding_status: Selector<OnboardingStatus>,
}

impl From<&FilterCriteria> for ListFilters {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            department: criteria.department,
            branch: criteria.branch,
            onboarding_status: criteria.onboarding_status,
        }
    }
}

/// Durable owner of teammate rows and their relations.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// All teammates matching `filters`, ordered by full name.
    async fn list(&self, filters: ListFilters) -> StoreResult<Vec<Teammate>>;

    /// Case-insensitive match on name, email or position.
    async fn search(&self, term: &str) -> StoreResult<Vec<Teammate>>;

    async fn get_profile(&self, id: Uuid) -> StoreResult<TeammateProfile>;

    async fn create(&self, new: NewTeammate) -> StoreResult<Teammate>;

    async fn update(&self, id: Uuid, patch: TeammatePatch) -> StoreResult<Teammate>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn add_tags(&self, id: Uuid, tags: Vec<NewTag>) -> StoreResult<Teammate>;

    async fn remove_tag(&self, id: Uuid, name: &str) -> StoreResult<Teammate>;

    async fn set_headshot(&self, id: Uuid, url: Option<String>) -> StoreResult<Teammate>;
}

#[async_trait]
impl<T: DirectoryStore + ?Sized> DirectoryStore for Arc<T> {
    async fn list(&self, filters: ListFilters) -> StoreResult<Vec<Teammate>> {
        (**self).list(filters).await
    }

    async fn search(&self, term: &str) -> StoreResult<Vec<Teammate>> {
        (**self).search(term).await
    }

    async fn get_profile(&self, id: Uuid) -> StoreResult<TeammateProfile> {
        (**self).get_profile(id).await
    }

    async fn create(&self, new: NewTeammate) -> StoreResult<Teammate> {
        (**self).create(new).await
    }

    async fn update(&self, id: Uuid, patch: TeammatePatch) -> StoreResult<Teammate> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn add_tags(&self, id: Uuid, tags: Vec<NewTag>) -> StoreResult<Teammate> {
        (**self).add_tags(id, tags).await
    }

    async fn remove_tag(&self, id: Uuid, name: &str) -> StoreResult<Teammate> {
        (**self).remove_tag(id, name).await
    }

    async fn set_headshot(&self, id: Uuid, url: Option<String>) -> StoreResult<Teammate> {
        (**self).set_headshot(id, url).await
    }
}
