#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use vanrakshak_server::{
    app,
    auth::AuthConfig,
    entities::officer,
    migrator::Migrator,
    roster::{register_officer, NewOfficer},
};

pub const ADMIN_EMAIL: &str = "admin@vanrakshak.in";
pub const ADMIN_PASSWORD: &str = "forest-watch";
pub const DASHBOARD_ORIGIN: &str = "http://localhost:3000";
pub const COMMUNITY_ORIGIN: &str = "http://localhost:5173";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub auth: Arc<AuthConfig>,
}

pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let auth = Arc::new(AuthConfig::new(
        ADMIN_EMAIL,
        ADMIN_PASSWORD,
        "integration-secret",
        chrono::Duration::hours(24),
    ));
    let router = app::router(
        db.clone(),
        auth.clone(),
        vec![
            HeaderValue::from_static(DASHBOARD_ORIGIN),
            HeaderValue::from_static(COMMUNITY_ORIGIN),
        ],
    );

    TestApp { router, db, auth }
}

impl TestApp {
    pub fn token(&self) -> String {
        self.auth.issue_token(ADMIN_EMAIL).unwrap()
    }

    pub async fn officer(&self, badge: &str) -> officer::Model {
        register_officer(
            &self.db,
            NewOfficer {
                name: format!("Ranger {badge}"),
                email: format!("{}@forest.gov.in", badge.to_lowercase()),
                password: "patrol-pass".into(),
                phone: format!("+91 90000 {badge}"),
                badge_number: badge.into(),
                station: "Nagarhole".into(),
                status: Default::default(),
                device_token: None,
            },
        )
        .await
        .unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Request as the logged-in admin.
    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.token();
        self.request(method, uri, Some(&token), body).await
    }

    pub async fn field(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(method, uri, None, body).await
    }
}

/// Parses a wire timestamp; they always carry a UTC offset.
pub fn timestamp(value: &Value) -> chrono::DateTime<chrono::Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

/// Keeps consecutive writes from sharing a timestamp.
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
}
