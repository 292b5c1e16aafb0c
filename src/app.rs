use std::sync::Arc;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, HeaderValue, Method, Request, Response},
    routing::{get, patch, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, auth::AuthConfig};

async fn health_check() -> &'static str {
    "OK"
}

/// Builds the `/api` router with shared state, request tracing and CORS.
/// Prometheus layers are added by the server binary, since the recorder is
/// process-global.
pub fn router(
    db: DatabaseConnection,
    auth: Arc<AuthConfig>,
    cors_origins: Vec<HeaderValue>,
) -> Router {
    // Field devices have no officer login; they write without a token.
    let field_routes = Router::new()
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/verify", get(api::auth::verify))
        .route("/api/incidents", post(api::incidents::create_incident))
        .route("/api/patrols/start", post(api::patrols::start_patrol))
        .route("/api/patrols/:id/location", post(api::patrols::add_location))
        .route("/api/patrols/:id/end", patch(api::patrols::end_patrol))
        .route("/api/patrols/:id/pause", patch(api::patrols::pause_patrol))
        .route("/api/patrols/:id/resume", patch(api::patrols::resume_patrol))
        .route("/api/sos", post(api::sos::create_alert));

    let admin_routes = Router::new()
        .route("/api/admin/stats", get(api::admin::get_stats))
        .route("/api/admin/officers", get(api::admin::list_officers))
        .route("/api/incidents", get(api::incidents::list_incidents))
        .route(
            "/api/incidents/:id",
            patch(api::incidents::update_incident).delete(api::incidents::delete_incident),
        )
        .route("/api/patrols", get(api::patrols::list_patrols))
        .route("/api/patrols/:id/locations", get(api::patrols::list_locations))
        .route("/api/sos", get(api::sos::list_alerts))
        .route("/api/sos/:id", patch(api::sos::update_alert))
        .route_layer(axum::middleware::from_fn(api::middleware::require_admin));

    Router::new()
        .route("/health", get(health_check))
        .merge(field_routes)
        .merge(admin_routes)
        .layer(Extension(db))
        .layer(Extension(auth))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(|matched| matched.as_str())
                        .unwrap_or_else(|| request.uri().path());
                    let span_name = format!("{} {}", request.method(), path);

                    let client_ip = request
                        .headers()
                        .get("x-forwarded-for")
                        .or_else(|| request.headers().get("x-real-ip"))
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        client_ip = client_ip,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        record_id = tracing::field::Empty,
                        admin = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(|_request: &Request<Body>, _span: &tracing::Span| {})
                .on_response(
                    |response: &Response<Body>, latency: std::time::Duration, span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
}
