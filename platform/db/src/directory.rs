use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use entity::{client_reviews, licensed_states, teammate_licensed_states, teammate_tags, teammates};
use platform_store::{StoreError, StoreResult};
use products_directory::{
    ClientReview, DirectoryStore, ListFilters, ManagerSummary, NewTag, NewTeammate, StateLicense,
    Teammate, TeammatePatch, TeammateProfile, TeammateTag, model::full_name,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::{BinOper, Expr, Func, SimpleExpr},
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{SeaStore, db_error};

fn integrity(err: impl std::fmt::Display) -> StoreError {
    StoreError::integrity(err.to_string())
}

fn into_teammate(model: teammates::Model, tags: Vec<String>) -> StoreResult<Teammate> {
    Ok(Teammate {
        department: model.department.parse().map_err(integrity)?,
        branch: model.branch.parse().map_err(integrity)?,
        onboarding_status: model.onboarding_status.parse().map_err(integrity)?,
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        position: model.position,
        nmls: model.nmls,
        headshot_url: model.headshot_url,
        start_date: model.start_date,
        birthday: model.birthday,
        linkedin: model.linkedin,
        calendly: model.calendly,
        manager_id: model.manager_id,
        tags,
    })
}

fn write_fields(active: &mut teammates::ActiveModel, record: &Teammate) {
    active.first_name = Set(record.first_name.clone());
    active.last_name = Set(record.last_name.clone());
    active.email = Set(record.email.clone());
    active.phone = Set(record.phone.clone());
    active.position = Set(record.position.clone());
    active.department = Set(record.department.as_str().to_string());
    active.branch = Set(record.branch.as_str().to_string());
    active.nmls = Set(record.nmls.clone());
    active.headshot_url = Set(record.headshot_url.clone());
    active.start_date = Set(record.start_date);
    active.birthday = Set(record.birthday);
    active.onboarding_status = Set(record.onboarding_status.as_str().to_string());
    active.linkedin = Set(record.linkedin.clone());
    active.calendly = Set(record.calendly.clone());
    active.manager_id = Set(record.manager_id);
}

async fn tag_names<C: ConnectionTrait>(db: &C, ids: Vec<Uuid>) -> StoreResult<HashMap<Uuid, Vec<String>>> {
    let mut by_teammate: HashMap<Uuid, Vec<String>> = HashMap::new();
    if ids.is_empty() {
        return Ok(by_teammate);
    }
    let rows = teammate_tags::Entity::find()
        .filter(teammate_tags::Column::TeammateId.is_in(ids))
        .order_by_asc(teammate_tags::Column::CreatedAt)
        .order_by_asc(teammate_tags::Column::TagName)
        .all(db)
        .await
        .map_err(db_error)?;
    for row in rows {
        by_teammate.entry(row.teammate_id).or_default().push(row.tag_name);
    }
    Ok(by_teammate)
}

fn lower(column: teammates::Column) -> SimpleExpr {
    Func::lower(Expr::col(column)).into()
}

/// `first_name || ' ' || last_name`
fn full_name_expr() -> SimpleExpr {
    let concat = |left: SimpleExpr, right: SimpleExpr| {
        SimpleExpr::Binary(Box::new(left), BinOper::Custom("||"), Box::new(right))
    };
    concat(
        concat(
            Expr::col(teammates::Column::FirstName).into(),
            SimpleExpr::Value(" ".into()),
        ),
        Expr::col(teammates::Column::LastName).into(),
    )
}

/// Case-insensitive first name, then last name; raw values break ties.
fn by_full_name(query: Select<teammates::Entity>) -> Select<teammates::Entity> {
    query
        .order_by_asc(lower(teammates::Column::FirstName))
        .order_by_asc(lower(teammates::Column::LastName))
        .order_by_asc(teammates::Column::FirstName)
        .order_by_asc(teammates::Column::LastName)
}

impl SeaStore {
    async fn find_model(&self, id: Uuid) -> StoreResult<teammates::Model> {
        teammates::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(StoreError::NotFound)
    }

    async fn load_one(&self, id: Uuid) -> StoreResult<Teammate> {
        let model = self.find_model(id).await?;
        let mut tags = tag_names(&self.db, vec![id]).await?;
        into_teammate(model, tags.remove(&id).unwrap_or_default())
    }

    async fn hydrate(&self, models: Vec<teammates::Model>) -> StoreResult<Vec<Teammate>> {
        let ids = models.iter().map(|model| model.id).collect();
        let mut tags = tag_names(&self.db, ids).await?;
        models
            .into_iter()
            .map(|model| {
                let names = tags.remove(&model.id).unwrap_or_default();
                into_teammate(model, names)
            })
            .collect()
    }

    /// A manager must be another existing teammate.
    async fn ensure_manager(&self, manager_id: Uuid, subject: Option<Uuid>) -> StoreResult<()> {
        if Some(manager_id) == subject {
            return Err(StoreError::InvalidInput(
                "A teammate cannot be their own manager".into(),
            ));
        }
        match self.find_model(manager_id).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound) => Err(StoreError::InvalidInput(
                "Manager must reference an existing teammate".into(),
            )),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl DirectoryStore for SeaStore {
    #[instrument(skip(self))]
    async fn list(&self, filters: ListFilters) -> StoreResult<Vec<Teammate>> {
        let mut query = teammates::Entity::find();
        if let Some(department) = filters.department.value() {
            query = query.filter(teammates::Column::Department.eq(department.as_str()));
        }
        if let Some(branch) = filters.branch.value() {
            query = query.filter(teammates::Column::Branch.eq(branch.as_str()));
        }
        if let Some(status) = filters.onboarding_status.value() {
            query = query.filter(teammates::Column::OnboardingStatus.eq(status.as_str()));
        }
        let models = by_full_name(query)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        self.hydrate(models).await
    }

    #[instrument(skip(self))]
    async fn search(&self, term: &str) -> StoreResult<Vec<Teammate>> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.list(ListFilters::default()).await;
        }
        let pattern = format!("%{needle}%");
        let condition = Condition::any()
            .add(Expr::expr(lower(teammates::Column::FirstName)).like(pattern.clone()))
            .add(Expr::expr(lower(teammates::Column::LastName)).like(pattern.clone()))
            .add(Expr::expr(lower(teammates::Column::Email)).like(pattern.clone()))
            .add(Expr::expr(lower(teammates::Column::Position)).like(pattern.clone()))
            .add(Expr::expr(Func::lower(full_name_expr())).like(pattern));
        let models = by_full_name(teammates::Entity::find().filter(condition))
            .all(&self.db)
            .await
            .map_err(db_error)?;
        self.hydrate(models).await
    }

    #[instrument(skip(self))]
    async fn get_profile(&self, id: Uuid) -> StoreResult<TeammateProfile> {
        let model = self.find_model(id).await?;

        let manager = match model.manager_id {
            Some(manager_id) => teammates::Entity::find_by_id(manager_id)
                .one(&self.db)
                .await
                .map_err(db_error)?
                .map(|manager| ManagerSummary {
                    id: manager.id,
                    full_name: full_name(&manager.first_name, &manager.last_name),
                    email: manager.email,
                }),
            None => None,
        };

        let tags: Vec<TeammateTag> = teammate_tags::Entity::find()
            .filter(teammate_tags::Column::TeammateId.eq(id))
            .order_by_asc(teammate_tags::Column::CreatedAt)
            .order_by_asc(teammate_tags::Column::TagName)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|row| TeammateTag {
                id: row.id,
                name: row.tag_name,
                color: row.tag_color,
            })
            .collect();

        let mut licenses = teammate_licensed_states::Entity::find()
            .filter(teammate_licensed_states::Column::TeammateId.eq(id))
            .find_also_related(licensed_states::Entity)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|(license, state)| {
                let state = state.ok_or_else(|| {
                    integrity(format!("license {} references a missing state", license.id))
                })?;
                Ok(StateLicense {
                    id: license.id,
                    state_code: state.state_code,
                    state_name: Some(state.state_name),
                    license_number: license.license_number,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;
        licenses.sort_by(|a, b| a.state_code.cmp(&b.state_code));

        let reviews = client_reviews::Entity::find()
            .filter(client_reviews::Column::TeammateId.eq(id))
            .order_by_desc(client_reviews::Column::ReviewDate)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|review| {
                let rating = u8::try_from(review.rating)
                    .ok()
                    .filter(|rating| (1..=5).contains(rating))
                    .ok_or_else(|| {
                        integrity(format!("review rating {} is outside 1..=5", review.rating))
                    })?;
                Ok(ClientReview {
                    id: review.id,
                    client_name: review.client_name,
                    review_text: review.review_text,
                    rating,
                    review_date: review.review_date,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let tag_names = tags.iter().map(|tag| tag.name.clone()).collect();
        Ok(TeammateProfile {
            teammate: into_teammate(model, tag_names)?,
            manager,
            tags,
            licenses,
            reviews,
        })
    }

    #[instrument(skip(self, new), fields(email = %new.email))]
    async fn create(&self, new: NewTeammate) -> StoreResult<Teammate> {
        if let Some(manager_id) = new.manager_id {
            self.ensure_manager(manager_id, None).await?;
        }
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = teammates::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            phone: Set(new.phone),
            position: Set(new.position),
            department: Set(new.department.as_str().to_string()),
            branch: Set(new.branch.as_str().to_string()),
            nmls: Set(new.nmls),
            headshot_url: Set(new.headshot_url),
            start_date: Set(new.start_date),
            birthday: Set(new.birthday),
            onboarding_status: Set(new.onboarding_status.as_str().to_string()),
            linkedin: Set(new.linkedin),
            calendly: Set(new.calendly),
            manager_id: Set(new.manager_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;
        info!(id = %model.id, "teammate created");
        into_teammate(model, Vec::new())
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: Uuid, patch: TeammatePatch) -> StoreResult<Teammate> {
        let patch = patch.validate()?;
        let model = self.find_model(id).await?;
        if let Some(Some(manager_id)) = patch.manager_id {
            self.ensure_manager(manager_id, Some(id)).await?;
        }

        let tags = tag_names(&self.db, vec![id]).await?.remove(&id).unwrap_or_default();
        let mut record = into_teammate(model.clone(), tags)?;
        patch.apply_to(&mut record);

        let mut active: teammates::ActiveModel = model.into();
        write_fields(&mut active, &record);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(db_error)?;
        info!(%id, "teammate updated");
        into_teammate(updated, record.tags)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(db_error)?;
        teammate_tags::Entity::delete_many()
            .filter(teammate_tags::Column::TeammateId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        teammate_licensed_states::Entity::delete_many()
            .filter(teammate_licensed_states::Column::TeammateId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        client_reviews::Entity::delete_many()
            .filter(client_reviews::Column::TeammateId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        teammates::Entity::update_many()
            .col_expr(teammates::Column::ManagerId, Expr::value(Option::<Uuid>::None))
            .filter(teammates::Column::ManagerId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        let result = teammates::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_error)?;
            return Err(StoreError::NotFound);
        }
        txn.commit().await.map_err(db_error)?;
        info!(%id, "teammate deleted");
        Ok(())
    }

    #[instrument(skip(self, tags))]
    async fn add_tags(&self, id: Uuid, tags: Vec<NewTag>) -> StoreResult<Teammate> {
        self.find_model(id).await?;
        let mut existing: HashSet<String> = tag_names(&self.db, vec![id])
            .await?
            .remove(&id)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let now: DateTimeWithTimeZone = Utc::now().into();
        for tag in tags {
            let name = tag.name.trim();
            if name.is_empty() {
                return Err(StoreError::InvalidInput("Tag name is required".into()));
            }
            if !existing.insert(name.to_string()) {
                continue;
            }
            teammate_tags::ActiveModel {
                id: Set(Uuid::new_v4()),
                teammate_id: Set(id),
                tag_name: Set(name.to_string()),
                tag_color: Set(tag.color.filter(|color| !color.trim().is_empty())),
                created_at: Set(now),
            }
            .insert(&self.db)
            .await
            .map_err(db_error)?;
        }
        self.load_one(id).await
    }

    #[instrument(skip(self))]
    async fn remove_tag(&self, id: Uuid, name: &str) -> StoreResult<Teammate> {
        self.find_model(id).await?;
        teammate_tags::Entity::delete_many()
            .filter(teammate_tags::Column::TeammateId.eq(id))
            .filter(teammate_tags::Column::TagName.eq(name.trim()))
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        self.load_one(id).await
    }

    #[instrument(skip(self))]
    async fn set_headshot(&self, id: Uuid, url: Option<String>) -> StoreResult<Teammate> {
        let model = self.find_model(id).await?;
        let mut active: teammates::ActiveModel = model.into();
        active.headshot_url = Set(url);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(db_error)?;
        self.load_one(id).await
    }
}
