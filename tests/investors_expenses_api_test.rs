mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{json_with_status, money, TestApp};
use rust_decimal_macros::dec;

#[tokio::test]
async fn investor_create_update_delete_cycle() {
    let app = TestApp::new().await;

    let created = json_with_status(
        app.request_authenticated(
            Method::POST,
            "/api/investors",
            Some(json!({"name": "Asha", "amount": "5000.00", "contributed_on": "2026-01-10"})),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["name"], "Asha");
    assert_eq!(money(&created["amount"]), dec!(5000.00));
    assert_eq!(created["contributed_on"], "2026-01-10");
    let id = created["id"].as_str().unwrap().to_string();

    let updated = json_with_status(
        app.request_authenticated(
            Method::PUT,
            &format!("/api/investors/{}", id),
            Some(json!({"amount": "7500.00"})),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["name"], "Asha");
    assert_eq!(money(&updated["amount"]), dec!(7500.00));

    let deleted = json_with_status(
        app.request_authenticated(Method::DELETE, &format!("/api/investors/{}", id), None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(deleted["message"], "Deleted");

    let listed = json_with_status(
        app.request_authenticated(Method::GET, "/api/investors", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn investor_contribution_date_defaults_to_today() {
    let app = TestApp::new().await;

    let created = json_with_status(
        app.request_authenticated(
            Method::POST,
            "/api/investors",
            Some(json!({"name": "Ravi", "amount": "2000.00"})),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let today = chrono::Utc::now().date_naive().to_string();
    assert_eq!(created["contributed_on"], today);
}

#[tokio::test]
async fn investor_update_unknown_id_returns_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/investors/{}", Uuid::new_v4()),
            Some(json!({"amount": "100.00"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expense_category_defaults_to_supplies() {
    let app = TestApp::new().await;

    let created = json_with_status(
        app.request_authenticated(
            Method::POST,
            "/api/expenses",
            Some(json!({"description": "Vegetables", "amount": "120.00", "spent_on": "2026-01-15"})),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(created["category"], "Supplies");
    assert_eq!(created["description"], "Vegetables");
}

#[tokio::test]
async fn expense_list_is_newest_first() {
    let app = TestApp::new().await;

    json_with_status(
        app.request_authenticated(
            Method::POST,
            "/api/expenses",
            Some(json!({"description": "Vegetables", "amount": "120.00", "spent_on": "2026-01-14"})),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    json_with_status(
        app.request_authenticated(
            Method::POST,
            "/api/expenses",
            Some(json!({"description": "Gas refill", "amount": "900.00", "spent_on": "2026-01-15"})),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let listed = json_with_status(
        app.request_authenticated(Method::GET, "/api/expenses", None).await,
        StatusCode::OK,
    )
    .await;

    let expenses = listed.as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["description"], "Gas refill");
    assert_eq!(expenses[1]["description"], "Vegetables");
}

#[tokio::test]
async fn expense_delete_of_unknown_id_still_confirms() {
    let app = TestApp::new().await;

    let deleted = json_with_status(
        app.request_authenticated(
            Method::DELETE,
            &format!("/api/expenses/{}", Uuid::new_v4()),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(deleted["message"], "Deleted");
}

#[tokio::test]
async fn expense_create_requires_description() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/expenses",
            Some(json!({"description": "", "amount": "120.00", "spent_on": "2026-01-15"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
