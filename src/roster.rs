//! Officer accounts. There is no HTTP registration flow; officers are loaded
//! from a roster file by the `seed` binary.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{officer, prelude::OfficerStatus};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("officer {0}: {1} must not be empty")]
    MissingField(String, &'static str),

    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOfficer {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub badge_number: String,
    pub station: String,
    #[serde(default)]
    pub status: OfficerStatus,
    #[serde(default)]
    pub device_token: Option<String>,
}

pub async fn register_officer(
    db: &DatabaseConnection,
    new: NewOfficer,
) -> Result<officer::Model, RosterError> {
    for (field, value) in [
        ("name", &new.name),
        ("email", &new.email),
        ("password", &new.password),
        ("phone", &new.phone),
        ("badgeNumber", &new.badge_number),
        ("station", &new.station),
    ] {
        if value.trim().is_empty() {
            return Err(RosterError::MissingField(new.badge_number.clone(), field));
        }
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(new.password.as_bytes(), &salt)
        .map_err(|e| RosterError::Hash(e.to_string()))?
        .to_string();

    let officer = officer::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name.trim().to_string()),
        email: Set(new.email.trim().to_lowercase()),
        password_hash: Set(password_hash),
        phone: Set(new.phone),
        badge_number: Set(new.badge_number.trim().to_string()),
        station: Set(new.station),
        status: Set(new.status),
        current_latitude: Set(None),
        current_longitude: Set(None),
        current_located_at: Set(None),
        device_token: Set(new.device_token),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(db)
    .await?;

    tracing::info!(badge = %officer.badge_number, "registered officer {}", officer.name);
    Ok(officer)
}
