//! Stallkeeper API Library
//!
//! Core functionality for the food-stall back-office service: CRUD over
//! dishes, sales, investors and expenses, plus server-side dashboard
//! aggregation.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

// App state shared by all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Routes guarded by the bearer middleware: the four resources plus the
/// dashboard reports.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/dishes", handlers::dishes::dish_routes())
        .nest("/api/sales", handlers::sales::sale_routes())
        .nest("/api/investors", handlers::investors::investor_routes())
        .nest("/api/expenses", handlers::expenses::expense_routes())
        .nest("/api/dashboard", handlers::dashboard::dashboard_routes())
}

/// Full application router: open status/health/login routes, guarded API
/// routes, and the Swagger UI. Transport layers (tracing, compression,
/// CORS) are stacked on top by the binary.
pub fn app_router(state: AppState, auth_service: Arc<auth::AuthService>) -> Router {
    Router::new()
        .route("/", get(service_status))
        .route("/api/health", get(health_check))
        .merge(api_routes().layer(axum::middleware::from_fn_with_state(
            auth_service.clone(),
            auth::require_auth,
        )))
        .nest(
            "/api/auth",
            auth::auth_routes().with_state(auth_service),
        )
        .merge(openapi::swagger_ui())
        .with_state(state)
}

/// Service status indicator.
pub async fn service_status() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    Json(json!({
        "status": "ok",
        "service": "stallkeeper-api",
        "version": version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Health report backed by a database ping.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<Value>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Ok(Json(json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
