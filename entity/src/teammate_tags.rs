use sea_orm::prelude::{DateTimeWithTimeZone, *};
use uuid::Uuid;

use crate::teammates;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teammate_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teammate_id: Uuid,
    pub tag_name: String,
    pub tag_color: Option<String>,
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
