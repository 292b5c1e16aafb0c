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
        views::{Location, OfficerRef, SosView},
    },
    auth::Claims,
    entities::{prelude::*, sos},
    error::ApiError,
    lifecycle::Lifecycle,
};

#[derive(Debug, Default, Deserialize)]
pub struct SosFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<SosStatus>,
}

/// Priority is deliberately absent: every new alert is critical.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSosRequest {
    pub officer_id: Uuid,
    pub location: Location,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSosRequest {
    pub status: SosStatus,
    #[serde(default)]
    pub acknowledged_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// GET /api/sos?status=
pub async fn list_alerts(
    Extension(db): Extension<DatabaseConnection>,
    ApiQuery(filter): ApiQuery<SosFilter>,
) -> Result<Response, ApiError> {
    let mut query = Sos::find();
    if let Some(status) = filter.status {
        query = query.filter(sos::Column::Status.eq(status));
    }

    let alerts: Vec<SosView> = query
        .order_by_desc(sos::Column::Timestamp)
        .find_also_related(Officer)
        .all(&db)
        .await?
        .into_iter()
        .map(|(alert, officer)| SosView::new(alert, officer.as_ref().map(OfficerRef::with_phone)))
        .collect();

    Ok(Json(json!({ "success": true, "alerts": alerts })).into_response())
}

// POST /api/sos
pub async fn create_alert(
    Extension(db): Extension<DatabaseConnection>,
    ApiJson(payload): ApiJson<CreateSosRequest>,
) -> Result<Response, ApiError> {
    payload.location.validate()?;
    let officer = find_officer(&db, payload.officer_id, "officerId").await?;

    let alert = sos::ActiveModel {
        id: Set(Uuid::new_v4()),
        officer_id: Set(officer.id),
        latitude: Set(payload.location.latitude),
        longitude: Set(payload.location.longitude),
        timestamp: Set(chrono::Utc::now().naive_utc()),
        status: Set(SosStatus::Active),
        priority: Set(SosPriority::Critical),
        notes: Set(payload.notes),
        acknowledged_by: Set(None),
        acknowledged_at: Set(None),
        resolved_at: Set(None),
    }
    .insert(&db)
    .await?;

    tracing::Span::current()
        .record("table", "sos_alerts")
        .record("action", "create_sos")
        .record("record_id", tracing::field::display(alert.id))
        .record("business_event", "SOS raised");
    tracing::warn!(officer = %officer.badge_number, "SOS raised by {}", officer.name);
    crate::metrics::increment_sos_raised();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "alert": SosView::new(alert, Some(OfficerRef::brief(&officer))),
        })),
    )
        .into_response())
}

// PATCH /api/sos/:id
pub async fn update_alert(
    Extension(db): Extension<DatabaseConnection>,
    Extension(claims): Extension<Claims>,
    ApiPath(alert_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateSosRequest>,
) -> Result<Response, ApiError> {
    let alert = Sos::find_by_id(alert_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("SOS alert"))?;

    let current = alert.status;
    let next = current.transition(payload.status)?;
    let now = chrono::Utc::now().naive_utc();

    let mut active_alert: sos::ActiveModel = alert.into();
    if next != current {
        active_alert.status = Set(next);
        match next {
            SosStatus::Acknowledged => {
                let by = payload
                    .acknowledged_by
                    .filter(|by| !by.trim().is_empty())
                    .unwrap_or_else(|| claims.email.clone());
                active_alert.acknowledged_by = Set(Some(by));
                active_alert.acknowledged_at = Set(Some(now));
            }
            SosStatus::Resolved => {
                active_alert.resolved_at = Set(Some(now));
            }
            SosStatus::Active => {}
        }
    }
    if let Some(notes) = payload.notes {
        active_alert.notes = Set(Some(notes));
    }

    let alert = active_alert.update(&db).await?;
    if current == SosStatus::Active && next != current {
        crate::metrics::decrement_active_sos();
    }
    let officer = Officer::find_by_id(alert.officer_id).one(&db).await?;

    tracing::Span::current()
        .record("table", "sos_alerts")
        .record("action", "update_sos")
        .record("record_id", tracing::field::display(alert.id))
        .record("business_event", tracing::field::display(alert.status));

    Ok(Json(json!({
        "success": true,
        "alert": SosView::new(alert, officer.as_ref().map(OfficerRef::brief)),
    }))
    .into_response())
}
