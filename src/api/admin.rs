use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    api::views::{IncidentView, OfficerRef, OfficerView, SosView},
    entities::{incident, officer, patrol, prelude::*, sos},
    error::ApiError,
};

const RECENT_ACTIVITY_LIMIT: u64 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_officers: u64,
    pub active_patrols: u64,
    #[serde(rename = "activeSOS")]
    pub active_sos: u64,
    pub total_incidents: u64,
}

pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats, ApiError> {
    Ok(DashboardStats {
        active_officers: Officer::find()
            .filter(officer::Column::Status.eq(OfficerStatus::Active))
            .count(db)
            .await?,
        active_patrols: Patrol::find()
            .filter(patrol::Column::Status.eq(PatrolStatus::Active))
            .count(db)
            .await?,
        active_sos: Sos::find()
            .filter(sos::Column::Status.eq(SosStatus::Active))
            .count(db)
            .await?,
        total_incidents: Incident::find().count(db).await?,
    })
}

// GET /api/admin/stats
pub async fn get_stats(Extension(db): Extension<DatabaseConnection>) -> Result<Response, ApiError> {
    let stats = dashboard_stats(&db).await?;

    let incidents: Vec<IncidentView> = Incident::find()
        .order_by_desc(incident::Column::Timestamp)
        .limit(RECENT_ACTIVITY_LIMIT)
        .find_also_related(Officer)
        .all(&db)
        .await?
        .into_iter()
        .map(|(incident, reporter)| IncidentView::new(incident, reporter.as_ref()))
        .collect();

    let alerts: Vec<SosView> = Sos::find()
        .order_by_desc(sos::Column::Timestamp)
        .limit(RECENT_ACTIVITY_LIMIT)
        .find_also_related(Officer)
        .all(&db)
        .await?
        .into_iter()
        .map(|(alert, officer)| SosView::new(alert, officer.as_ref().map(OfficerRef::brief)))
        .collect();

    Ok(Json(json!({
        "success": true,
        "stats": stats,
        "recentActivity": {
            "incidents": incidents,
            "sos": alerts,
        },
    }))
    .into_response())
}

// GET /api/admin/officers
pub async fn list_officers(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<Response, ApiError> {
    let officers: Vec<OfficerView> = Officer::find()
        .order_by_asc(officer::Column::Name)
        .all(&db)
        .await?
        .into_iter()
        .map(OfficerView::from)
        .collect();

    Ok(Json(json!({ "success": true, "officers": officers })).into_response())
}
