use sea_orm::prelude::{DateTimeWithTimeZone, *};
use uuid::Uuid;

use crate::{client_reviews, teammate_licensed_states, teammate_tags};

/// Enumerated columns (`department`, `branch`, `onboarding_status`) hold their
/// display labels and are parsed when rows leave the store.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teammates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub department: String,
    pub branch: String,
    pub nmls: Option<String>,
    pub headshot_url: Option<String>,
    pub start_date: Option<Date>,
    pub birthday: Option<Date>,
    pub onboarding_status: String,
    pub linkedin: Option<String>,
    pub calendly: Option<String>,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ManagerId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Manager,
    #[sea_orm(has_many = "teammate_tags::Entity")]
    Tags,
    #[sea_orm(has_many = "teammate_licensed_states::Entity")]
    Licenses,
    #[sea_orm(has_many = "client_reviews::Entity")]
    Reviews,
}

impl Related<teammate_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<teammate_licensed_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Licenses.def()
    }
}

impl Related<client_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
