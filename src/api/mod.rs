pub mod admin;
pub mod auth;
pub mod extract;
pub mod incidents;
pub mod middleware;
pub mod patrols;
pub mod sos;
pub mod views;

use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::{
    entities::{officer, Officer},
    error::ApiError,
};

/// Resolves an officer reference from a request body; an unknown id is the
/// caller's mistake, not a missing route resource.
pub(crate) async fn find_officer(
    db: &DatabaseConnection,
    officer_id: Uuid,
    field: &str,
) -> Result<officer::Model, ApiError> {
    Officer::find_by_id(officer_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!("{field} {officer_id} does not reference a known officer"))
        })
}
