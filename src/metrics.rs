use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{patrol, prelude::*, sos};

/// Seeds the gauges from the database so a restart does not reset them.
pub async fn init_metrics(db: &DatabaseConnection) {
    let active_sos = Sos::find()
        .filter(sos::Column::Status.eq(SosStatus::Active))
        .count(db)
        .await
        .unwrap_or(0);
    metrics::gauge!("vanrakshak_sos_active").set(active_sos as f64);

    let active_patrols = Patrol::find()
        .filter(patrol::Column::Status.eq(PatrolStatus::Active))
        .count(db)
        .await
        .unwrap_or(0);
    metrics::gauge!("vanrakshak_patrols_active").set(active_patrols as f64);

    let incidents = Incident::find().count(db).await.unwrap_or(0);
    metrics::gauge!("vanrakshak_incidents_total").set(incidents as f64);

    tracing::info!(
        "Initialized metrics: ActiveSOS={}, ActivePatrols={}, Incidents={}",
        active_sos,
        active_patrols,
        incidents
    );
}

pub fn increment_incidents_reported(incident_type: &str) {
    metrics::counter!("vanrakshak_incidents_reported_total", "type" => incident_type.to_string())
        .increment(1);
    metrics::gauge!("vanrakshak_incidents_total").increment(1.0);
}

pub fn increment_sos_raised() {
    metrics::counter!("vanrakshak_sos_raised_total").increment(1);
    metrics::gauge!("vanrakshak_sos_active").increment(1.0);
}

pub fn decrement_active_sos() {
    metrics::gauge!("vanrakshak_sos_active").decrement(1.0);
}

pub fn increment_patrols_started() {
    metrics::counter!("vanrakshak_patrols_started_total").increment(1);
    metrics::gauge!("vanrakshak_patrols_active").increment(1.0);
}

pub fn increment_patrols_completed() {
    metrics::counter!("vanrakshak_patrols_completed_total").increment(1);
}

/// Keeps the active-patrol gauge in step with pause, resume and completion.
pub fn track_patrol_status(from: PatrolStatus, to: PatrolStatus) {
    match (from == PatrolStatus::Active, to == PatrolStatus::Active) {
        (true, false) => metrics::gauge!("vanrakshak_patrols_active").decrement(1.0),
        (false, true) => metrics::gauge!("vanrakshak_patrols_active").increment(1.0),
        _ => {}
    }
}

pub fn increment_patrol_samples() {
    metrics::counter!("vanrakshak_patrol_samples_total").increment(1);
}
