use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum OfficerStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "on-leave")]
    OnLeave,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "officers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    #[sea_orm(unique)]
    pub badge_number: String,
    pub station: String,
    pub status: OfficerStatus,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub current_located_at: Option<DateTime>,
    pub device_token: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incident::Entity")]
    Incident,
    #[sea_orm(has_many = "super::patrol::Entity")]
    Patrol,
    #[sea_orm(has_many = "super::sos::Entity")]
    Sos,
}

impl Related<super::incident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

impl Related<super::patrol::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patrol.def()
    }
}

impl Related<super::sos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
