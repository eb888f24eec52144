use sea_orm::prelude::{DateTimeWithTimeZone, *};
use uuid::Uuid;

use crate::{licensed_states, teammates};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teammate_licensed_states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teammate_id: Uuid,
    pub licensed_state_id: Uuid,
    pub license_number: Option<String>,
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
    #[sea_orm(
        belongs_to = "licensed_states::Entity",
        from = "Column::LicensedStateId",
        to = "licensed_states::Column::Id",
        on_delete = "Cascade"
    )]
    State,
}

impl Related<teammates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teammate.def()
    }
}

impl Related<licensed_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
