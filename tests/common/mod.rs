#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use stallkeeper_api::{
    auth::AuthService,
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "stall-test-pass";

/// Test harness backed by an in-memory SQLite database with the full
/// router, a seeded account, and a logged-in token.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub token: String,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "k3P9vX2mQ8wL5nR7tY4uB6eH1jF0aZcS".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory DB.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_service = Arc::new(AuthService::new((&cfg).into(), db_arc.clone()));
        auth_service
            .create_user(TEST_USERNAME, TEST_PASSWORD)
            .await
            .expect("failed to create test user");
        let token = auth_service
            .login(TEST_USERNAME, TEST_PASSWORD)
            .await
            .expect("failed to log in test user")
            .access_token;

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));
        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };
        let router = stallkeeper_api::app_router(state.clone(), auth_service);

        Self {
            router,
            state,
            token,
            _event_task: event_task,
        }
    }

    /// Issue a request without credentials.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.send(method, uri, body, None).await
    }

    /// Issue a request carrying an arbitrary bearer token.
    pub async fn request_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: &str,
    ) -> Response {
        self.send(method, uri, body, Some(token.to_string())).await
    }

    /// Issue a request carrying the harness account's bearer token.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        self.send(method, uri, body, Some(self.token.clone())).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<String>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request should not fail at the transport level")
    }
}

/// Parse a money field. Amounts serialize as decimal strings; comparing
/// parsed values keeps assertions independent of the scale the backend
/// happens to preserve.
pub fn money(value: &Value) -> rust_decimal::Decimal {
    value
        .as_str()
        .expect("money fields serialize as strings")
        .parse()
        .expect("money fields parse as decimals")
}

/// Read a response body as JSON.
pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Assert a status and decode the body in one step.
pub async fn json_with_status(response: Response, expected: StatusCode) -> Value {
    assert_eq!(response.status(), expected);
    read_json(response).await
}
