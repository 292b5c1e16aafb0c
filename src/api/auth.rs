use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::extract::ApiJson,
    auth::{AuthConfig, ADMIN_ROLE},
    error::ApiError,
};

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

// POST /api/auth/login
pub async fn login(
    Extension(auth): Extension<Arc<AuthConfig>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let span = tracing::Span::current();
    span.record("table", "admin").record("action", "login");

    if !auth.check_credentials(&payload.email, &payload.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth
        .issue_token(&payload.email)
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))?;

    span.record("business_event", "Admin logged in");

    Ok(Json(json!({
        "success": true,
        "access_token": token,
        "user": { "email": payload.email, "role": ADMIN_ROLE },
    }))
    .into_response())
}

// GET /api/auth/verify
pub async fn verify(
    Extension(auth): Extension<Arc<AuthConfig>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Response {
    let valid = bearer
        .map(|TypedHeader(Authorization(bearer))| auth.is_valid(bearer.token()))
        .unwrap_or(false);

    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(json!({ "valid": valid }))).into_response()
}
