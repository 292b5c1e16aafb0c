use std::collections::HashMap;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::{
        extract::{blank_as_none, ApiJson, ApiPath, ApiQuery},
        find_officer,
        views::{Location, OfficerRef, PatrolLocationView, PatrolView, Waypoint},
    },
    entities::{patrol, patrol_location, prelude::*},
    error::ApiError,
    lifecycle::Lifecycle,
};

const SEQUENCE_ATTEMPTS: u32 = 3;

#[derive(Debug, Default, Deserialize)]
pub struct PatrolFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<PatrolStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPatrolRequest {
    pub officer_id: Uuid,
    #[serde(default)]
    pub area: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLocationRequest {
    pub location: Location,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct EndPatrolRequest {
    pub distance: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

async fn load_patrol(db: &DatabaseConnection, patrol_id: Uuid) -> Result<patrol::Model, ApiError> {
    Patrol::find_by_id(patrol_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Patrol"))
}

async fn load_route(db: &DatabaseConnection, patrol_id: Uuid) -> Result<Vec<Waypoint>, ApiError> {
    let samples = PatrolLocation::find()
        .filter(patrol_location::Column::PatrolId.eq(patrol_id))
        .order_by_asc(patrol_location::Column::Sequence)
        .all(db)
        .await?;
    Ok(samples.iter().map(Waypoint::from).collect())
}

/// Populates the officer and derives the route for a single patrol.
/// Inserts the next sample of a patrol. Two concurrent appends can pick the
/// same sequence; the unique index rejects one of them and it retries.
async fn append_sample(
    db: &DatabaseConnection,
    patrol: &patrol::Model,
    payload: &AddLocationRequest,
) -> Result<patrol_location::Model, ApiError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let sequence = PatrolLocation::find()
            .filter(patrol_location::Column::PatrolId.eq(patrol.id))
            .order_by_desc(patrol_location::Column::Sequence)
            .one(db)
            .await?
            .map_or(1, |last| last.sequence + 1);

        let sample = patrol_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            patrol_id: Set(patrol.id),
            officer_id: Set(patrol.officer_id),
            sequence: Set(sequence),
            latitude: Set(payload.location.latitude),
            longitude: Set(payload.location.longitude),
            accuracy: Set(payload.accuracy),
            speed: Set(payload.speed),
            timestamp: Set(chrono::Utc::now().naive_utc()),
        };

        match sample.insert(db).await {
            Ok(sample) => return Ok(sample),
            Err(e)
                if attempt < SEQUENCE_ATTEMPTS
                    && matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                tracing::debug!(patrol = %patrol.id, "sequence {} taken, retrying", sequence);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn patrol_view(db: &DatabaseConnection, patrol: patrol::Model) -> Result<PatrolView, ApiError> {
    let officer = Officer::find_by_id(patrol.officer_id).one(db).await?;
    let route = load_route(db, patrol.id).await?;
    Ok(PatrolView::new(
        patrol,
        officer.as_ref().map(OfficerRef::brief),
        route,
    ))
}

async fn set_status(
    db: &DatabaseConnection,
    patrol_id: Uuid,
    requested: PatrolStatus,
    action: &'static str,
) -> Result<Response, ApiError> {
    let patrol = load_patrol(db, patrol_id).await?;
    let current = patrol.status;
    let next = current.transition(requested)?;

    let mut active_patrol: patrol::ActiveModel = patrol.into();
    active_patrol.status = Set(next);
    let patrol = active_patrol.update(db).await?;

    tracing::Span::current()
        .record("table", "patrols")
        .record("action", action)
        .record("record_id", tracing::field::display(patrol.id));
    crate::metrics::track_patrol_status(current, next);

    Ok(Json(json!({ "success": true, "patrol": patrol_view(db, patrol).await? })).into_response())
}

// GET /api/patrols?status=
pub async fn list_patrols(
    Extension(db): Extension<DatabaseConnection>,
    ApiQuery(filter): ApiQuery<PatrolFilter>,
) -> Result<Response, ApiError> {
    let mut query = Patrol::find();
    if let Some(status) = filter.status {
        query = query.filter(patrol::Column::Status.eq(status));
    }

    let patrols = query
        .order_by_desc(patrol::Column::StartTime)
        .find_also_related(Officer)
        .all(&db)
        .await?;

    // One query for every route instead of one per patrol.
    let ids: Vec<Uuid> = patrols.iter().map(|(p, _)| p.id).collect();
    let mut routes: HashMap<Uuid, Vec<Waypoint>> = HashMap::new();
    if !ids.is_empty() {
        let samples = PatrolLocation::find()
            .filter(patrol_location::Column::PatrolId.is_in(ids))
            .order_by_asc(patrol_location::Column::Sequence)
            .all(&db)
            .await?;
        for sample in &samples {
            routes.entry(sample.patrol_id).or_default().push(Waypoint::from(sample));
        }
    }

    let patrols: Vec<PatrolView> = patrols
        .into_iter()
        .map(|(patrol, officer)| {
            let route = routes.remove(&patrol.id).unwrap_or_default();
            PatrolView::new(patrol, officer.as_ref().map(OfficerRef::with_station), route)
        })
        .collect();

    Ok(Json(json!({ "success": true, "patrols": patrols })).into_response())
}

// POST /api/patrols/start
pub async fn start_patrol(
    Extension(db): Extension<DatabaseConnection>,
    ApiJson(payload): ApiJson<StartPatrolRequest>,
) -> Result<Response, ApiError> {
    let officer = find_officer(&db, payload.officer_id, "officerId").await?;

    let new_patrol = patrol::ActiveModel {
        id: Set(Uuid::new_v4()),
        officer_id: Set(officer.id),
        start_time: Set(chrono::Utc::now().naive_utc()),
        end_time: Set(None),
        status: Set(PatrolStatus::Active),
        distance: Set(0.0),
        notes: Set(None),
        area: Set(payload.area),
    };
    let patrol = new_patrol.insert(&db).await?;

    tracing::Span::current()
        .record("table", "patrols")
        .record("action", "start_patrol")
        .record("record_id", tracing::field::display(patrol.id))
        .record("business_event", "Patrol started");
    crate::metrics::increment_patrols_started();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "patrol": PatrolView::new(patrol, Some(OfficerRef::brief(&officer)), Vec::new()),
        })),
    )
        .into_response())
}

// POST /api/patrols/:id/location
pub async fn add_location(
    Extension(db): Extension<DatabaseConnection>,
    ApiPath(patrol_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AddLocationRequest>,
) -> Result<Response, ApiError> {
    payload.location.validate()?;
    for (field, value) in [("accuracy", payload.accuracy), ("speed", payload.speed)] {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(ApiError::Validation(format!("{field} must be a non-negative number")));
            }
        }
    }

    let patrol = load_patrol(&db, patrol_id).await?;
    if patrol.status == PatrolStatus::Completed {
        return Err(ApiError::PatrolClosed(format!(
            "patrol {} is completed and accepts no more locations",
            patrol.id
        )));
    }

    // A single insert: the route is read back from these samples.
    let sample = append_sample(&db, &patrol, &payload).await?;

    tracing::Span::current()
        .record("table", "patrol_locations")
        .record("action", "add_location")
        .record("record_id", tracing::field::display(patrol.id));
    crate::metrics::increment_patrol_samples();

    Ok(Json(json!({
        "success": true,
        "location": PatrolLocationView::from(sample),
    }))
    .into_response())
}

// PATCH /api/patrols/:id/end
pub async fn end_patrol(
    Extension(db): Extension<DatabaseConnection>,
    ApiPath(patrol_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<EndPatrolRequest>,
) -> Result<Response, ApiError> {
    if !payload.distance.is_finite() || payload.distance < 0.0 {
        return Err(ApiError::Validation("distance must be a non-negative number".into()));
    }

    let patrol = load_patrol(&db, patrol_id).await?;
    if patrol.status == PatrolStatus::Completed {
        return Err(ApiError::PatrolClosed(format!(
            "patrol {} is already completed",
            patrol.id
        )));
    }
    let current = patrol.status;
    let next = current.transition(PatrolStatus::Completed)?;

    let mut active_patrol: patrol::ActiveModel = patrol.into();
    active_patrol.status = Set(next);
    active_patrol.end_time = Set(Some(chrono::Utc::now().naive_utc()));
    active_patrol.distance = Set(payload.distance);
    if let Some(notes) = payload.notes {
        active_patrol.notes = Set(Some(notes));
    }
    let patrol = active_patrol.update(&db).await?;

    tracing::Span::current()
        .record("table", "patrols")
        .record("action", "end_patrol")
        .record("record_id", tracing::field::display(patrol.id))
        .record("business_event", "Patrol completed");
    crate::metrics::increment_patrols_completed();
    crate::metrics::track_patrol_status(current, next);

    Ok(Json(json!({ "success": true, "patrol": patrol_view(&db, patrol).await? })).into_response())
}

// PATCH /api/patrols/:id/pause
pub async fn pause_patrol(
    Extension(db): Extension<DatabaseConnection>,
    ApiPath(patrol_id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    set_status(&db, patrol_id, PatrolStatus::Paused, "pause_patrol").await
}

// PATCH /api/patrols/:id/resume
pub async fn resume_patrol(
    Extension(db): Extension<DatabaseConnection>,
    ApiPath(patrol_id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    set_status(&db, patrol_id, PatrolStatus::Active, "resume_patrol").await
}

// GET /api/patrols/:id/locations
pub async fn list_locations(
    Extension(db): Extension<DatabaseConnection>,
    ApiPath(patrol_id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    load_patrol(&db, patrol_id).await?;

    let locations: Vec<PatrolLocationView> = PatrolLocation::find()
        .filter(patrol_location::Column::PatrolId.eq(patrol_id))
        .order_by_asc(patrol_location::Column::Sequence)
        .all(&db)
        .await?
        .into_iter()
        .map(PatrolLocationView::from)
        .collect();

    Ok(Json(json!({ "success": true, "locations": locations })).into_response())
}
