use std::sync::Arc;

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{auth::AuthConfig, error::ApiError};

/// Admits requests carrying a valid admin bearer token and exposes the
/// decoded [`crate::auth::Claims`] to handlers.
pub async fn require_admin(
    Extension(auth): Extension<Arc<AuthConfig>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = auth.verify(bearer.token()).map_err(|e| {
        tracing::debug!("rejected bearer token: {}", e);
        ApiError::Unauthorized
    })?;

    tracing::Span::current().record("admin", claims.email.as_str());
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
