mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, tick, timestamp, TestApp, ADMIN_EMAIL};

async fn start_patrol(app: &TestApp, badge: &str) -> String {
    let officer = app.officer(badge).await;
    let (status, body) = app
        .field(
            Method::POST,
            "/api/patrols/start",
            Some(json!({ "officerId": officer.id, "area": "Kabini north beat" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["patrol"]["id"].as_str().unwrap().to_string()
}

fn point(latitude: f64, longitude: f64) -> Value {
    json!({ "location": { "latitude": latitude, "longitude": longitude }, "accuracy": 4.5, "speed": 1.2 })
}

#[tokio::test]
async fn started_patrol_is_active_with_an_empty_route() {
    let app = spawn_app().await;
    let officer = app.officer("PT-201").await;

    let (status, body) = app
        .field(Method::POST, "/api/patrols/start", Some(json!({ "officerId": officer.id })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let patrol = &body["patrol"];
    assert_eq!(patrol["status"], "active");
    assert_eq!(patrol["distance"], 0.0);
    assert_eq!(patrol["endTime"], Value::Null);
    assert_eq!(patrol["route"], json!([]));
    assert_eq!(patrol["officerId"]["badgeNumber"], "PT-201");

    let (status, body) = app
        .field(Method::POST, "/api/patrols/start", Some(json!({ "officerId": uuid::Uuid::new_v4() })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_failed");
}

#[tokio::test]
async fn locations_append_to_the_route_in_order() {
    let app = spawn_app().await;
    let id = start_patrol(&app, "PT-202").await;

    let (status, body) = app
        .field(Method::POST, &format!("/api/patrols/{id}/location"), Some(point(11.93, 76.12)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"]["patrolId"], id.as_str());
    assert_eq!(body["location"]["accuracy"], 4.5);

    tick().await;
    let (status, _) = app
        .field(Method::POST, &format!("/api/patrols/{id}/location"), Some(point(11.94, 76.13)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.admin(Method::GET, "/api/patrols", None).await;
    let patrol = &body["patrols"][0];
    assert_eq!(patrol["officerId"]["station"], "Nagarhole");
    let route = patrol["route"].as_array().unwrap();
    assert_eq!(route.len(), 2);
    assert_eq!(route[0]["latitude"], 11.93);
    assert_eq!(route[1]["latitude"], 11.94);
    assert!(timestamp(&route[0]["timestamp"]) <= timestamp(&route[1]["timestamp"]));

    let (status, body) = app
        .admin(Method::GET, &format!("/api/patrols/{id}/locations"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let samples = body["locations"].as_array().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["location"]["longitude"], 76.12);
    assert_eq!(samples[1]["location"]["longitude"], 76.13);
}

#[tokio::test]
async fn bad_location_samples_are_rejected() {
    let app = spawn_app().await;
    let id = start_patrol(&app, "PT-203").await;
    let uri = format!("/api/patrols/{id}/location");

    let mut negative_speed = point(11.9, 76.1);
    negative_speed["speed"] = json!(-3.0);

    for sample in [point(95.0, 76.1), negative_speed, json!({ "accuracy": 2.0 })] {
        let (status, body) = app.field(Method::POST, &uri, Some(sample)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_failed");
    }

    let (status, _) = app
        .field(
            Method::POST,
            &format!("/api/patrols/{}/location", uuid::Uuid::new_v4()),
            Some(point(11.9, 76.1)),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ended_patrols_accept_no_more_locations() {
    let app = spawn_app().await;
    let id = start_patrol(&app, "PT-204").await;
    app.field(Method::POST, &format!("/api/patrols/{id}/location"), Some(point(11.93, 76.12)))
        .await;

    tick().await;
    let (status, body) = app
        .field(
            Method::PATCH,
            &format!("/api/patrols/{id}/end"),
            Some(json!({ "distance": 6.4, "notes": "Quiet beat" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let patrol = &body["patrol"];
    assert_eq!(patrol["status"], "completed");
    assert_eq!(patrol["distance"], 6.4);
    assert_eq!(patrol["notes"], "Quiet beat");
    assert!(timestamp(&patrol["endTime"]) >= timestamp(&patrol["startTime"]));
    assert_eq!(patrol["route"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .field(Method::POST, &format!("/api/patrols/{id}/location"), Some(point(11.95, 76.14)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "patrol_closed");

    let (status, body) = app
        .field(Method::PATCH, &format!("/api/patrols/{id}/end"), Some(json!({ "distance": 7.0 })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "patrol_closed");

    let (_, body) = app
        .admin(Method::GET, &format!("/api/patrols/{id}/locations"), None)
        .await;
    assert_eq!(body["locations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn ending_needs_a_non_negative_distance() {
    let app = spawn_app().await;
    let id = start_patrol(&app, "PT-205").await;

    for body in [json!({}), json!({ "distance": -1.0 })] {
        let (status, _) = app
            .field(Method::PATCH, &format!("/api/patrols/{id}/end"), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn paused_patrols_can_resume_and_still_record() {
    let app = spawn_app().await;
    let id = start_patrol(&app, "PT-206").await;

    let (status, body) = app.field(Method::PATCH, &format!("/api/patrols/{id}/pause"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patrol"]["status"], "paused");

    let (status, _) = app
        .field(Method::POST, &format!("/api/patrols/{id}/location"), Some(point(11.9, 76.1)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.admin(Method::GET, "/api/patrols?status=paused", None).await;
    assert_eq!(body["patrols"].as_array().unwrap().len(), 1);

    let (status, body) = app.field(Method::PATCH, &format!("/api/patrols/{id}/resume"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patrol"]["status"], "active");
    assert_eq!(body["patrol"]["route"].as_array().unwrap().len(), 1);

    app.field(Method::PATCH, &format!("/api/patrols/{id}/end"), Some(json!({ "distance": 2.0 })))
        .await;
    let (status, body) = app.field(Method::PATCH, &format!("/api/patrols/{id}/resume"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalid_transition");
}

async fn raise_sos(app: &TestApp, badge: &str) -> String {
    let officer = app.officer(badge).await;
    let (status, body) = app
        .field(
            Method::POST,
            "/api/sos",
            Some(json!({
                "officerId": officer.id,
                "location": { "latitude": 12.05, "longitude": 76.3 },
                "notes": "Armed group sighted",
                "priority": "medium",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["alert"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn sos_alerts_are_always_critical() {
    let app = spawn_app().await;
    raise_sos(&app, "SO-301").await;

    let (status, body) = app.admin(Method::GET, "/api/sos", None).await;
    assert_eq!(status, StatusCode::OK);
    let alert = &body["alerts"][0];
    assert_eq!(alert["priority"], "critical");
    assert_eq!(alert["status"], "active");
    assert_eq!(alert["notes"], "Armed group sighted");
    assert_eq!(alert["officerId"]["phone"], "+91 90000 SO-301");
    assert_eq!(alert["acknowledgedBy"], Value::Null);

    let (status, body) = app.field(Method::GET, "/api/sos", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn acknowledging_records_who_and_when() {
    let app = spawn_app().await;
    let first = raise_sos(&app, "SO-302").await;
    let second = raise_sos(&app, "SO-303").await;

    let (status, body) = app
        .admin(
            Method::PATCH,
            &format!("/api/sos/{first}"),
            Some(json!({ "status": "acknowledged", "acknowledgedBy": "Control room 2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let alert = &body["alert"];
    assert_eq!(alert["status"], "acknowledged");
    assert_eq!(alert["acknowledgedBy"], "Control room 2");
    assert!(timestamp(&alert["acknowledgedAt"]) >= timestamp(&alert["timestamp"]));

    let (_, body) = app
        .admin(Method::PATCH, &format!("/api/sos/{second}"), Some(json!({ "status": "acknowledged" })))
        .await;
    assert_eq!(body["alert"]["acknowledgedBy"], ADMIN_EMAIL);

    let (_, body) = app.admin(Method::GET, "/api/sos?status=active", None).await;
    assert_eq!(body["alerts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn sos_must_be_acknowledged_before_it_is_resolved() {
    let app = spawn_app().await;
    let id = raise_sos(&app, "SO-304").await;
    let uri = format!("/api/sos/{id}");

    let (status, body) = app.admin(Method::PATCH, &uri, Some(json!({ "status": "resolved" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalid_transition");

    app.admin(Method::PATCH, &uri, Some(json!({ "status": "acknowledged" }))).await;
    tick().await;
    let (status, body) = app
        .admin(Method::PATCH, &uri, Some(json!({ "status": "resolved", "notes": "Team reached" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let alert = &body["alert"];
    assert_eq!(alert["status"], "resolved");
    assert_eq!(alert["notes"], "Team reached");
    assert!(timestamp(&alert["resolvedAt"]) >= timestamp(&alert["acknowledgedAt"]));

    let (status, _) = app.admin(Method::PATCH, &uri, Some(json!({ "status": "active" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .admin(
            Method::PATCH,
            &format!("/api/sos/{}", uuid::Uuid::new_v4()),
            Some(json!({ "status": "acknowledged" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn route_keeps_submission_order_for_rapid_fixes() {
    let app = spawn_app().await;
    let id = start_patrol(&app, "PT-207").await;
    let uri = format!("/api/patrols/{id}/location");

    let latitudes = [11.901, 11.902, 11.903, 11.904, 11.905];
    for latitude in latitudes {
        let (status, _) = app.field(Method::POST, &uri, Some(point(latitude, 76.1))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app.admin(Method::GET, "/api/patrols", None).await;
    let route: Vec<f64> = body["patrols"][0]["route"]
        .as_array()
        .unwrap()
        .iter()
        .map(|waypoint| waypoint["latitude"].as_f64().unwrap())
        .collect();
    assert_eq!(route, latitudes);

    let (_, body) = app
        .admin(Method::GET, &format!("/api/patrols/{id}/locations"), None)
        .await;
    let sequences: Vec<i64> = body["locations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|sample| sample["sequence"].as_i64().unwrap())
        .collect();
    assert_eq!(sequences, [1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn patrols_are_listed_newest_start_first() {
    let app = spawn_app().await;

    let mut started = Vec::new();
    for badge in ["PT-208", "PT-209", "PT-210"] {
        started.push(start_patrol(&app, badge).await);
        tick().await;
    }

    let (status, body) = app.admin(Method::GET, "/api/patrols", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&str> = body["patrols"]
        .as_array()
        .unwrap()
        .iter()
        .map(|patrol| patrol["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, [started[2].as_str(), started[1].as_str(), started[0].as_str()]);
}

#[tokio::test]
async fn sos_alerts_are_listed_newest_first() {
    let app = spawn_app().await;

    let mut raised = Vec::new();
    for badge in ["SO-305", "SO-306", "SO-307"] {
        raised.push(raise_sos(&app, badge).await);
        tick().await;
    }

    let (status, body) = app.admin(Method::GET, "/api/sos", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&str> = body["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|alert| alert["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, [raised[2].as_str(), raised[1].as_str(), raised[0].as_str()]);
}
