use async_graphql::{Context, Enum, InputObject, MaybeUndefined, Object, SimpleObject};
use chrono::{NaiveDate, Utc};
use platform_api::gql_error;
use platform_store::StoreError;
use products_directory::{
    Branch, ClientReview, DepartmentBucket, Department, DirectoryStats, FilterCriteria,
    ListFilters, NewTag, OnboardingStatus, Selector, SortColumn, SortDirection, StateLicense,
    TableSort, Teammate, TeammateForm, TeammatePatch, TeammateProfile, export_file,
    filter, group_by_department,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::hub_data;

const DEFAULT_PAGE: usize = 50;
const MAX_PAGE: usize = 500;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_directory::Department")]
pub enum DepartmentKind {
    Leadership,
    Sales,
    Operations,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_directory::Branch")]
pub enum BranchKind {
    PittsburghHq,
    Savannah,
    Philadelphia,
    EriePa,
    Elg,
    ProsperFirm,
    ChampionLendingGroup,
    KeswickMortgageGroup,
    LhCalifornia,
    WtxLending,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_directory::OnboardingStatus")]
pub enum OnboardingStatusKind {
    NotStarted,
    InProgress,
    Done,
    Offboard,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_directory::SortColumn")]
pub enum SortColumnKind {
    FullName,
    Position,
    Department,
    Branch,
    Email,
    Manager,
    OnboardingStatus,
    Nmls,
    StartDate,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_directory::SortDirection")]
pub enum SortDirectionKind {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct TeammateNode {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub department: DepartmentKind,
    pub department_label: String,
    pub branch: BranchKind,
    pub branch_label: String,
    pub nmls: Option<String>,
    pub headshot_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub birthday: Option<NaiveDate>,
    pub onboarding_status: OnboardingStatusKind,
    pub onboarding_status_label: String,
    pub linkedin: Option<String>,
    pub calendly: Option<String>,
    pub manager_id: Option<Uuid>,
    pub tags: Vec<String>,
}

impl From<&Teammate> for TeammateNode {
    fn from(record: &Teammate) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            position: record.position.clone(),
            department: record.department.into(),
            department_label: record.department.as_str().to_string(),
            branch: record.branch.into(),
            branch_label: record.branch.as_str().to_string(),
            nmls: record.nmls.clone(),
            headshot_url: record.headshot_url.clone(),
            start_date: record.start_date,
            birthday: record.birthday,
            onboarding_status: record.onboarding_status.into(),
            onboarding_status_label: record.onboarding_status.as_str().to_string(),
            linkedin: record.linkedin.clone(),
            calendly: record.calendly.clone(),
            manager_id: record.manager_id,
            tags: record.tags.clone(),
        }
    }
}

impl From<Teammate> for TeammateNode {
    fn from(record: Teammate) -> Self {
        Self::from(&record)
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct TeammatePage {
    /// Matching rows before pagination.
    pub total: usize,
    pub nodes: Vec<TeammateNode>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DepartmentBucketNode {
    pub department: DepartmentKind,
    pub label: String,
    pub count: usize,
    pub teammates: Vec<TeammateNode>,
}

impl From<DepartmentBucket<'_>> for DepartmentBucketNode {
    fn from(bucket: DepartmentBucket<'_>) -> Self {
        Self {
            department: bucket.department.into(),
            label: bucket.department.as_str().to_string(),
            count: bucket.len(),
            teammates: bucket.records.into_iter().map(TeammateNode::from).collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct ManagerNode {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct TagNode {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct LicenseNode {
    pub id: Uuid,
    pub state_code: String,
    pub state_name: Option<String>,
    pub license_number: Option<String>,
}

impl From<StateLicense> for LicenseNode {
    fn from(license: StateLicense) -> Self {
        Self {
            id: license.id,
            state_code: license.state_code,
            state_name: license.state_name,
            license_number: license.license_number,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct ReviewNode {
    pub id: Uuid,
    pub client_name: String,
    pub review_text: String,
    pub rating: u8,
    pub review_date: Option<NaiveDate>,
}

impl From<ClientReview> for ReviewNode {
    fn from(review: ClientReview) -> Self {
        Self {
            id: review.id,
            client_name: review.client_name,
            review_text: review.review_text,
            rating: review.rating,
            review_date: review.review_date,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct TeammateProfileNode {
    pub teammate: TeammateNode,
    pub manager: Option<ManagerNode>,
    pub tags: Vec<TagNode>,
    pub licenses: Vec<LicenseNode>,
    pub reviews: Vec<ReviewNode>,
    pub average_rating: Option<f64>,
}

impl From<TeammateProfile> for TeammateProfileNode {
    fn from(profile: TeammateProfile) -> Self {
        let average_rating = profile.average_rating();
        Self {
            teammate: TeammateNode::from(&profile.teammate),
            manager: profile.manager.map(|m| ManagerNode {
                id: m.id,
                full_name: m.full_name,
                email: m.email,
            }),
            tags: profile
                .tags
                .into_iter()
                .map(|tag| TagNode {
                    id: tag.id,
                    name: tag.name,
                    color: tag.color,
                })
                .collect(),
            licenses: profile.licenses.into_iter().map(LicenseNode::from).collect(),
            reviews: profile.reviews.into_iter().map(ReviewNode::from).collect(),
            average_rating,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct CountNode {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StatsNode {
    pub total: usize,
    pub onboarded: usize,
    pub departments: usize,
    pub by_department: Vec<CountNode>,
    pub by_status: Vec<CountNode>,
    pub by_branch: Vec<CountNode>,
}

fn counts<T: Copy>(pairs: Vec<(T, usize)>, label: impl Fn(T) -> &'static str) -> Vec<CountNode> {
    pairs
        .into_iter()
        .map(|(key, count)| CountNode {
            label: label(key).to_string(),
            count,
        })
        .collect()
}

impl From<DirectoryStats> for StatsNode {
    fn from(stats: DirectoryStats) -> Self {
        Self {
            total: stats.total,
            onboarded: stats.onboarded,
            departments: stats.departments,
            by_department: counts(stats.by_department, Department::as_str),
            by_status: counts(stats.by_status, OnboardingStatus::as_str),
            by_branch: counts(stats.by_branch, Branch::as_str),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct CsvExportNode {
    pub filename: String,
    pub mime: String,
    pub body: String,
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct TeammateFilter {
    pub search: Option<String>,
    pub department: Option<DepartmentKind>,
    pub branch: Option<BranchKind>,
    pub status: Option<OnboardingStatusKind>,
}

impl From<TeammateFilter> for FilterCriteria {
    fn from(input: TeammateFilter) -> Self {
        Self {
            search: input.search.map(|s| s.trim().to_string()).unwrap_or_default(),
            department: Selector::from(input.department.map(Department::from)),
            branch: Selector::from(input.branch.map(Branch::from)),
            onboarding_status: Selector::from(input.status.map(OnboardingStatus::from)),
        }
    }
}

#[derive(InputObject, Clone, Copy, Debug)]
pub struct TeammateSort {
    pub column: SortColumnKind,
    #[graphql(default_with = "SortDirectionKind::Ascending")]
    pub direction: SortDirectionKind,
}

impl From<TeammateSort> for TableSort {
    fn from(input: TeammateSort) -> Self {
        TableSort::by(
            SortColumn::from(input.column),
            SortDirection::from(input.direction),
        )
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct TeammateInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub department: DepartmentKind,
    pub branch: BranchKind,
    pub nmls: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub birthday: Option<NaiveDate>,
    pub onboarding_status: Option<OnboardingStatusKind>,
    pub linkedin: Option<String>,
    pub calendly: Option<String>,
    pub manager_id: Option<Uuid>,
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

impl From<TeammateInput> for TeammateForm {
    fn from(input: TeammateInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone.unwrap_or_default(),
            position: input.position,
            department: Department::from(input.department).as_str().to_string(),
            branch: Branch::from(input.branch).as_str().to_string(),
            nmls: input.nmls.unwrap_or_default(),
            start_date: date_text(input.start_date),
            birthday: date_text(input.birthday),
            onboarding_status: input
                .onboarding_status
                .map(|s| OnboardingStatus::from(s).as_str().to_string())
                .unwrap_or_default(),
            linkedin: input.linkedin.unwrap_or_default(),
            calendly: input.calendly.unwrap_or_default(),
            manager_id: input.manager_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

/// Partial update. Omitted fields stay as they are; explicit `null` clears
/// the optional ones.
#[derive(InputObject, Clone, Debug, Default)]
pub struct TeammatePatchInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: MaybeUndefined<String>,
    pub position: Option<String>,
    pub department: Option<DepartmentKind>,
    pub branch: Option<BranchKind>,
    pub nmls: MaybeUndefined<String>,
    pub start_date: MaybeUndefined<NaiveDate>,
    pub birthday: MaybeUndefined<NaiveDate>,
    pub onboarding_status: Option<OnboardingStatusKind>,
    pub linkedin: MaybeUndefined<String>,
    pub calendly: MaybeUndefined<String>,
    pub manager_id: MaybeUndefined<Uuid>,
}

fn tri<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(value) => Some(Some(value)),
    }
}

impl From<TeammatePatchInput> for TeammatePatch {
    fn from(input: TeammatePatchInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: tri(input.phone),
            position: input.position,
            department: input.department.map(Into::into),
            branch: input.branch.map(Into::into),
            nmls: tri(input.nmls),
            headshot_url: None,
            start_date: tri(input.start_date),
            birthday: tri(input.birthday),
            onboarding_status: input.onboarding_status.map(Into::into),
            linkedin: tri(input.linkedin),
            calendly: tri(input.calendly),
            manager_id: tri(input.manager_id),
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct TagInput {
    pub name: String,
    pub color: Option<String>,
}

/// Load the roster the same way the directory screen does: store-side
/// categorical filters, then the in-memory search pass.
async fn filtered(
    ctx: &Context<'_>,
    input: Option<TeammateFilter>,
) -> async_graphql::Result<Vec<Teammate>> {
    let criteria = FilterCriteria::from(input.unwrap_or_default());
    let records = hub_data(ctx)?
        .directory
        .list(ListFilters::from(&criteria))
        .await
        .map_err(gql_error)?;
    Ok(filter::apply(&records, &criteria)
        .into_iter()
        .cloned()
        .collect())
}

#[derive(Default)]
pub struct DirectoryQuery;

#[Object]
impl DirectoryQuery {
    #[instrument(name = "graphql.directory.teammates", skip_all)]
    async fn teammates(
        &self,
        ctx: &Context<'_>,
        filter: Option<TeammateFilter>,
        sort: Option<TeammateSort>,
        first: Option<usize>,
        offset: Option<usize>,
    ) -> async_graphql::Result<TeammatePage> {
        let records = filtered(ctx, filter).await?;
        let order = sort.map(TableSort::from).unwrap_or_default();
        let sorted = order.apply(&records);
        let limit = first.unwrap_or(DEFAULT_PAGE).min(MAX_PAGE);
        Ok(TeammatePage {
            total: sorted.len(),
            nodes: sorted
                .into_iter()
                .skip(offset.unwrap_or(0))
                .take(limit)
                .map(TeammateNode::from)
                .collect(),
        })
    }

    #[instrument(name = "graphql.directory.gallery", skip_all)]
    async fn gallery(
        &self,
        ctx: &Context<'_>,
        filter: Option<TeammateFilter>,
    ) -> async_graphql::Result<Vec<DepartmentBucketNode>> {
        let records = filtered(ctx, filter).await?;
        Ok(group_by_department(&records)
            .into_iter()
            .map(DepartmentBucketNode::from)
            .collect())
    }

    #[instrument(name = "graphql.directory.teammate", skip(self, ctx))]
    async fn teammate(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
    ) -> async_graphql::Result<Option<TeammateProfileNode>> {
        match hub_data(ctx)?.directory.get_profile(id).await {
            Ok(profile) => Ok(Some(profile.into())),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(gql_error(err)),
        }
    }

    #[instrument(name = "graphql.directory.stats", skip_all)]
    async fn stats(&self, ctx: &Context<'_>) -> async_graphql::Result<StatsNode> {
        let records = filtered(ctx, None).await?;
        Ok(DirectoryStats::compute(&records).into())
    }

    #[instrument(name = "graphql.directory.export_csv", skip_all)]
    async fn export_csv(
        &self,
        ctx: &Context<'_>,
        filter: Option<TeammateFilter>,
        sort: Option<TeammateSort>,
    ) -> async_graphql::Result<CsvExportNode> {
        let slug = hub_data(ctx)?.export_slug.clone();
        let records = filtered(ctx, filter).await?;
        let order = sort.map(TableSort::from).unwrap_or_default();
        let export = export_file(order.apply(&records), &slug, Utc::now().date_naive());
        Ok(CsvExportNode {
            filename: export.filename,
            mime: export.mime.to_string(),
            body: export.body,
        })
    }
}

#[derive(Default)]
pub struct DirectoryMutation;

#[Object]
impl DirectoryMutation {
    #[instrument(name = "graphql.directory.create_teammate", skip_all)]
    async fn create_teammate(
        &self,
        ctx: &Context<'_>,
        input: TeammateInput,
    ) -> async_graphql::Result<TeammateNode> {
        let new = TeammateForm::from(input).validate().map_err(gql_error)?;
        let created = hub_data(ctx)?
            .directory
            .create(new)
            .await
            .map_err(gql_error)?;
        Ok(created.into())
    }

    #[instrument(name = "graphql.directory.update_teammate", skip(self, ctx, patch))]
    async fn update_teammate(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        patch: TeammatePatchInput,
    ) -> async_graphql::Result<TeammateNode> {
        let patch = TeammatePatch::from(patch).validate().map_err(gql_error)?;
        let updated = hub_data(ctx)?
            .directory
            .update(id, patch)
            .await
            .map_err(gql_error)?;
        Ok(updated.into())
    }

    /// Removes the teammate and, when present, their stored headshot.
    #[instrument(name = "graphql.directory.delete_teammate", skip(self, ctx))]
    async fn delete_teammate(&self, ctx: &Context<'_>, id: Uuid) -> async_graphql::Result<bool> {
        let data = hub_data(ctx)?;
        let profile = data.directory.get_profile(id).await.map_err(gql_error)?;
        data.directory.delete(id).await.map_err(gql_error)?;
        if let Some(url) = profile.teammate.headshot_url {
            if let Err(err) = data.objects.delete(&url).await {
                warn!(%id, error = %err, "headshot left behind after delete");
            }
        }
        Ok(true)
    }

    #[instrument(name = "graphql.directory.add_tags", skip(self, ctx, tags))]
    async fn add_tags(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        tags: Vec<TagInput>,
    ) -> async_graphql::Result<TeammateNode> {
        let tags = tags
            .into_iter()
            .map(|tag| NewTag {
                name: tag.name,
                color: tag.color,
            })
            .collect();
        let updated = hub_data(ctx)?
            .directory
            .add_tags(id, tags)
            .await
            .map_err(gql_error)?;
        Ok(updated.into())
    }

    #[instrument(name = "graphql.directory.remove_tag", skip(self, ctx))]
    async fn remove_tag(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        name: String,
    ) -> async_graphql::Result<TeammateNode> {
        let updated = hub_data(ctx)?
            .directory
            .remove_tag(id, &name)
            .await
            .map_err(gql_error)?;
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_input_maps_to_selectors() {
        let criteria = FilterCriteria::from(TeammateFilter {
            search: Some("  doe ".into()),
            department: Some(DepartmentKind::Sales),
            branch: None,
            status: Some(OnboardingStatusKind::Done),
        });
        assert_eq!(criteria.search, "doe");
        assert_eq!(criteria.department, Selector::Only(Department::Sales));
        assert_eq!(criteria.branch, Selector::All);
        assert_eq!(criteria.onboarding_status, Selector::Only(OnboardingStatus::Done));
    }

    #[test]
    fn input_round_trips_through_form_validation() {
        let form = TeammateForm::from(TeammateInput {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane@lendingheights.test".into(),
            phone: None,
            position: "Processor".into(),
            department: DepartmentKind::Operations,
            branch: BranchKind::EriePa,
            nmls: None,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 29),
            birthday: None,
            onboarding_status: None,
            linkedin: None,
            calendly: None,
            manager_id: None,
        });
        let new = form.validate().unwrap();
        assert_eq!(new.branch, Branch::EriePa);
        assert_eq!(new.onboarding_status, OnboardingStatus::NotStarted);
        assert_eq!(new.start_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn null_clears_and_absence_keeps() {
        let patch = TeammatePatch::from(TeammatePatchInput {
            phone: MaybeUndefined::Null,
            nmls: MaybeUndefined::Value("12345".into()),
            ..TeammatePatchInput::default()
        });
        assert_eq!(patch.phone, Some(None));
        assert_eq!(patch.nmls, Some(Some("12345".to_string())));
        assert_eq!(patch.linkedin, None);
    }
}
