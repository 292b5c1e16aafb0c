use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::{
        extract::{blank_as_none, ApiJson, ApiPath, ApiQuery},
        find_officer,
        views::{IncidentView, Location},
    },
    entities::{incident, prelude::*},
    error::ApiError,
    lifecycle::Lifecycle,
};

#[derive(Debug, Default, Deserialize)]
pub struct IncidentFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<IncidentStatus>,
    #[serde(default, rename = "type", deserialize_with = "blank_as_none")]
    pub incident_type: Option<IncidentType>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    pub location: Location,
    pub reported_by: Uuid,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateIncidentRequest {
    pub status: Option<IncidentStatus>,
    pub notes: Option<String>,
    pub severity: Option<Severity>,
}

// GET /api/incidents?status=&type=&severity=
pub async fn list_incidents(
    Extension(db): Extension<DatabaseConnection>,
    ApiQuery(filter): ApiQuery<IncidentFilter>,
) -> Result<Response, ApiError> {
    let mut query = Incident::find();
    if let Some(status) = filter.status {
        query = query.filter(incident::Column::Status.eq(status));
    }
    if let Some(incident_type) = filter.incident_type {
        query = query.filter(incident::Column::IncidentType.eq(incident_type));
    }
    if let Some(severity) = filter.severity {
        query = query.filter(incident::Column::Severity.eq(severity));
    }

    let incidents: Vec<IncidentView> = query
        .order_by_desc(incident::Column::Timestamp)
        .find_also_related(Officer)
        .all(&db)
        .await?
        .into_iter()
        .map(|(incident, reporter)| IncidentView::new(incident, reporter.as_ref()))
        .collect();

    Ok(Json(json!({ "success": true, "incidents": incidents })).into_response())
}

// POST /api/incidents
pub async fn create_incident(
    Extension(db): Extension<DatabaseConnection>,
    ApiJson(payload): ApiJson<CreateIncidentRequest>,
) -> Result<Response, ApiError> {
    let description = payload.description.trim();
    if description.is_empty() {
        return Err(ApiError::Validation("description must not be empty".into()));
    }
    payload.location.validate()?;

    let reporter = find_officer(&db, payload.reported_by, "reportedBy").await?;

    let new_incident = incident::ActiveModel {
        id: Set(Uuid::new_v4()),
        incident_type: Set(payload.incident_type),
        description: Set(description.to_string()),
        latitude: Set(payload.location.latitude),
        longitude: Set(payload.location.longitude),
        address: Set(payload.location.address),
        reported_by: Set(reporter.id),
        severity: Set(payload.severity.unwrap_or_default()),
        status: Set(IncidentStatus::Reported),
        images: Set(json!(payload.images)),
        timestamp: Set(chrono::Utc::now().naive_utc()),
        resolved_at: Set(None),
        notes: Set(payload.notes),
    };

    let incident = new_incident.insert(&db).await?;

    tracing::Span::current()
        .record("table", "incidents")
        .record("action", "create_incident")
        .record("record_id", tracing::field::display(incident.id))
        .record("business_event", "Incident reported");
    crate::metrics::increment_incidents_reported(incident.incident_type.as_str());

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "incident": IncidentView::new(incident, Some(&reporter)),
        })),
    )
        .into_response())
}

// PATCH /api/incidents/:id
pub async fn update_incident(
    Extension(db): Extension<DatabaseConnection>,
    ApiPath(incident_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateIncidentRequest>,
) -> Result<Response, ApiError> {
    let incident = Incident::find_by_id(incident_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Incident"))?;

    let current = incident.status;
    let mut active_incident: incident::ActiveModel = incident.into();

    if let Some(requested) = payload.status {
        let next = current.transition(requested)?;
        if next != current {
            active_incident.status = Set(next);
            if next == IncidentStatus::Resolved {
                active_incident.resolved_at = Set(Some(chrono::Utc::now().naive_utc()));
            }
        }
    }
    if let Some(notes) = payload.notes {
        active_incident.notes = Set(Some(notes));
    }
    if let Some(severity) = payload.severity {
        active_incident.severity = Set(severity);
    }

    let incident = active_incident.update(&db).await?;
    let reporter = Officer::find_by_id(incident.reported_by).one(&db).await?;

    tracing::Span::current()
        .record("table", "incidents")
        .record("action", "update_incident")
        .record("record_id", tracing::field::display(incident.id))
        .record("business_event", tracing::field::display(incident.status));

    Ok(Json(json!({
        "success": true,
        "incident": IncidentView::new(incident, reporter.as_ref()),
    }))
    .into_response())
}

// DELETE /api/incidents/:id
pub async fn delete_incident(
    Extension(db): Extension<DatabaseConnection>,
    ApiPath(incident_id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    let result = Incident::delete_by_id(incident_id).exec(&db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Incident"));
    }

    tracing::Span::current()
        .record("table", "incidents")
        .record("action", "delete_incident")
        .record("record_id", tracing::field::display(incident_id));

    Ok(Json(json!({ "success": true, "message": "Incident deleted" })).into_response())
}
