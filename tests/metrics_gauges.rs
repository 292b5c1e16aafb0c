mod common;

use axum::http::{Method, StatusCode};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::ConnectionTrait;
use serde_json::json;

use common::spawn_app;

fn gauge(handle: &PrometheusHandle, name: &str) -> f64 {
    handle
        .render()
        .lines()
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(' ')?.parse().ok())
        .unwrap_or(0.0)
}

/// Runs `scenario` on a single-threaded runtime with a fresh recorder
/// installed for this thread only.
fn with_recorder<F>(scenario: impl FnOnce() -> F) -> PrometheusHandle
where
    F: std::future::Future<Output = ()>,
{
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    metrics::with_local_recorder(&recorder, || runtime.block_on(scenario()));
    handle
}

#[test]
fn failed_sos_update_leaves_the_active_gauge_alone() {
    let handle = with_recorder(|| async {
        let app = spawn_app().await;
        let officer = app.officer("MG-601").await;

        let mut ids = Vec::new();
        for _ in 0..2 {
            let (status, body) = app
                .field(
                    Method::POST,
                    "/api/sos",
                    Some(json!({
                        "officerId": officer.id,
                        "location": { "latitude": 12.1, "longitude": 76.2 },
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            ids.push(body["alert"]["id"].as_str().unwrap().to_string());
        }

        let (status, _) = app
            .admin(
                Method::PATCH,
                &format!("/api/sos/{}", ids[0]),
                Some(json!({ "status": "acknowledged" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        app.db
            .execute_unprepared(
                "CREATE TRIGGER sos_frozen BEFORE UPDATE ON sos_alerts \
                 BEGIN SELECT RAISE(ABORT, 'sos_alerts is read-only'); END;",
            )
            .await
            .unwrap();

        let (status, body) = app
            .admin(
                Method::PATCH,
                &format!("/api/sos/{}", ids[1]),
                Some(json!({ "status": "acknowledged" })),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");
    });

    assert_eq!(gauge(&handle, "vanrakshak_sos_active"), 1.0);
}

#[test]
fn failed_patrol_end_leaves_the_active_gauge_alone() {
    let handle = with_recorder(|| async {
        let app = spawn_app().await;
        let officer = app.officer("MG-602").await;

        let (_, body) = app
            .field(Method::POST, "/api/patrols/start", Some(json!({ "officerId": officer.id })))
            .await;
        let id = body["patrol"]["id"].as_str().unwrap().to_string();

        app.db
            .execute_unprepared(
                "CREATE TRIGGER patrols_frozen BEFORE UPDATE ON patrols \
                 BEGIN SELECT RAISE(ABORT, 'patrols is read-only'); END;",
            )
            .await
            .unwrap();

        let (status, _) = app
            .field(Method::PATCH, &format!("/api/patrols/{id}/end"), Some(json!({ "distance": 3.0 })))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = app.field(Method::PATCH, &format!("/api/patrols/{id}/pause"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    });

    assert_eq!(gauge(&handle, "vanrakshak_patrols_active"), 1.0);
}
