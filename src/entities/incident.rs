use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::lifecycle::IncidentStatus;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum IncidentType {
    #[sea_orm(string_value = "fire")]
    Fire,
    #[sea_orm(string_value = "poaching")]
    Poaching,
    #[sea_orm(string_value = "illegal-logging")]
    IllegalLogging,
    #[sea_orm(string_value = "wildlife-injury")]
    WildlifeInjury,
    #[sea_orm(string_value = "encroachment")]
    Encroachment,
    #[sea_orm(string_value = "other")]
    Other,
}

impl IncidentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Poaching => "poaching",
            Self::IllegalLogging => "illegal-logging",
            Self::WildlifeInjury => "wildlife-injury",
            Self::Encroachment => "encroachment",
            Self::Other => "other",
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "critical")]
    Critical,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub incident_type: IncidentType,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub reported_by: Uuid,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub images: Json,
    pub timestamp: DateTime,
    pub resolved_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::officer::Entity",
        from = "Column::ReportedBy",
        to = "super::officer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Officer,
}

impl Related<super::officer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Officer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
