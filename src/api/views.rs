//! JSON shapes returned by the API. Officer references are resolved at read
//! time into small projections, never stored as copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{incident, officer, patrol, patrol_location, sos};
use crate::entities::prelude::*;
use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ApiError::Validation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ApiError::Validation(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerRef {
    pub id: Uuid,
    pub name: String,
    pub badge_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl OfficerRef {
    pub fn brief(officer: &officer::Model) -> Self {
        Self {
            id: officer.id,
            name: officer.name.clone(),
            badge_number: officer.badge_number.clone(),
            station: None,
            phone: None,
        }
    }

    pub fn with_station(officer: &officer::Model) -> Self {
        Self {
            station: Some(officer.station.clone()),
            ..Self::brief(officer)
        }
    }

    pub fn with_phone(officer: &officer::Model) -> Self {
        Self {
            phone: Some(officer.phone.clone()),
            ..Self::brief(officer)
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub badge_number: String,
    pub station: String,
    pub status: OfficerStatus,
    pub current_location: Option<CurrentLocation>,
    pub device_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<officer::Model> for OfficerView {
    fn from(model: officer::Model) -> Self {
        let current_location = match (model.current_latitude, model.current_longitude) {
            (Some(latitude), Some(longitude)) => Some(CurrentLocation {
                latitude,
                longitude,
                timestamp: model.current_located_at.map(|at| at.and_utc()),
            }),
            _ => None,
        };

        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            badge_number: model.badge_number,
            station: model.station,
            status: model.status,
            current_location,
            device_token: model.device_token,
            created_at: model.created_at.and_utc(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    pub location: Location,
    pub reported_by: Option<OfficerRef>,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub images: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl IncidentView {
    pub fn new(model: incident::Model, reporter: Option<&officer::Model>) -> Self {
        Self {
            id: model.id,
            incident_type: model.incident_type,
            description: model.description,
            location: Location {
                latitude: model.latitude,
                longitude: model.longitude,
                address: model.address,
            },
            reported_by: reporter.map(OfficerRef::brief),
            severity: model.severity,
            status: model.status,
            images: serde_json::from_value(model.images).unwrap_or_default(),
            timestamp: model.timestamp.and_utc(),
            resolved_at: model.resolved_at.map(|at| at.and_utc()),
            notes: model.notes,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&patrol_location::Model> for Waypoint {
    fn from(sample: &patrol_location::Model) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            timestamp: sample.timestamp.and_utc(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrolView {
    pub id: Uuid,
    pub officer_id: Option<OfficerRef>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: PatrolStatus,
    pub distance: f64,
    pub route: Vec<Waypoint>,
    pub notes: Option<String>,
    pub area: Option<String>,
}

impl PatrolView {
    pub fn new(model: patrol::Model, officer: Option<OfficerRef>, route: Vec<Waypoint>) -> Self {
        Self {
            id: model.id,
            officer_id: officer,
            start_time: model.start_time.and_utc(),
            end_time: model.end_time.map(|at| at.and_utc()),
            status: model.status,
            distance: model.distance,
            route,
            notes: model.notes,
            area: model.area,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrolLocationView {
    pub id: Uuid,
    pub patrol_id: Uuid,
    pub officer_id: Uuid,
    pub sequence: i32,
    pub location: Location,
    pub accuracy: Option<f64>,
    pub speed: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl From<patrol_location::Model> for PatrolLocationView {
    fn from(model: patrol_location::Model) -> Self {
        Self {
            id: model.id,
            patrol_id: model.patrol_id,
            officer_id: model.officer_id,
            sequence: model.sequence,
            location: Location {
                latitude: model.latitude,
                longitude: model.longitude,
                address: None,
            },
            accuracy: model.accuracy,
            speed: model.speed,
            timestamp: model.timestamp.and_utc(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SosView {
    pub id: Uuid,
    pub officer_id: Option<OfficerRef>,
    pub location: Location,
    pub timestamp: DateTime<Utc>,
    pub status: SosStatus,
    pub priority: SosPriority,
    pub notes: Option<String>,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl SosView {
    pub fn new(model: sos::Model, officer: Option<OfficerRef>) -> Self {
        Self {
            id: model.id,
            officer_id: officer,
            location: Location {
                latitude: model.latitude,
                longitude: model.longitude,
                address: None,
            },
            timestamp: model.timestamp.and_utc(),
            status: model.status,
            priority: model.priority,
            notes: model.notes,
            acknowledged_by: model.acknowledged_by,
            acknowledged_at: model.acknowledged_at.map(|at| at.and_utc()),
            resolved_at: model.resolved_at.map(|at| at.and_utc()),
        }
    }
}
