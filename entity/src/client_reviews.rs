use sea_orm::prelude::{DateTimeWithTimeZone, *};
use uuid::Uuid;

use crate::teammates;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "client_reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teammate_id: Uuid,
    pub client_name: String,
    pub review_text: String,
    /// 1..=5
    pub rating: i16,
    pub review_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "teammates::Entity",
        from = "Column::TeammateId",
        to = "teammates::Column::Id",
        on_delete = "Cascade"
    )]
    Teammate,
}

impl Related<teammates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teammate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
