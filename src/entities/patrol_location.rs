use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "patrol_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patrol_id: Uuid,
    pub officer_id: Uuid,
    /// 1-based submission order within the patrol.
    pub sequence: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// GPS accuracy in metres.
    pub accuracy: Option<f64>,
    /// Km/h.
    pub speed: Option<f64>,
    pub timestamp: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patrol::Entity",
        from = "Column::PatrolId",
        to = "super::patrol::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Patrol,
    #[sea_orm(
        belongs_to = "super::officer::Entity",
        from = "Column::OfficerId",
        to = "super::officer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Officer,
}

impl Related<super::patrol::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patrol.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
