use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::lifecycle::PatrolStatus;

/// A tracked patrol session. The route is not stored here; it is the
/// patrol's `patrol_locations` rows in timestamp order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "patrols")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub officer_id: Uuid,
    pub start_time: DateTime,
    pub end_time: Option<DateTime>,
    pub status: PatrolStatus,
    /// Kilometres.
    pub distance: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub area: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::officer::Entity",
        from = "Column::OfficerId",
        to = "super::officer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Officer,
    #[sea_orm(has_many = "super::patrol_location::Entity")]
    PatrolLocation,
}

impl Related<super::officer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Officer.def()
    }
}

impl Related<super::patrol_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PatrolLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
