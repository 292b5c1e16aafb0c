use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use vanrakshak_server::{app, auth::AuthConfig, config::Config, migrator};

fn metrics_route(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    vanrakshak_server::telemetry::init_telemetry("vanrakshak-server")?;

    let config = Config::from_env().inspect_err(|e| tracing::error!("configuration error: {}", e))?;

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    let db = Database::connect(&config.database_url).await?;
    migrator::Migrator::up(&db, None).await?;

    vanrakshak_server::metrics::init_metrics(&db).await;

    let auth = Arc::new(AuthConfig::from_config(&config));
    let app = app::router(db, auth, config.cors_origins.clone())
        .layer(prometheus_layer)
        .merge(metrics_route(metric_handle))
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
