mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{json_with_status, TestApp};

fn tea_sale(order_no: Option<&str>) -> Value {
    let mut sale = json!({
        "sale_date": "2026-01-15",
        "items": [
            {"dish_id": Uuid::new_v4(), "name": "Tea", "price": "20.00", "quantity": 2}
        ],
        "total_amount": "40.00",
    });
    if let Some(no) = order_no {
        sale["order_no"] = json!(no);
    }
    sale
}

async fn create_sale(app: &TestApp, body: Value) -> Value {
    json_with_status(
        app.request_authenticated(Method::POST, "/api/sales", Some(body)).await,
        StatusCode::CREATED,
    )
    .await
}

#[tokio::test]
async fn order_numbers_increase_from_one() {
    let app = TestApp::new().await;

    for expected in ["1", "2", "3"] {
        let created = create_sale(&app, tea_sale(None)).await;
        assert_eq!(created["order_no"], expected);
    }
}

#[tokio::test]
async fn explicit_order_number_advances_the_sequence() {
    let app = TestApp::new().await;

    for expected in ["1", "2", "3"] {
        let created = create_sale(&app, tea_sale(None)).await;
        assert_eq!(created["order_no"], expected);
    }

    let explicit = create_sale(&app, tea_sale(Some("99"))).await;
    assert_eq!(explicit["order_no"], "99");

    let next = create_sale(&app, tea_sale(None)).await;
    assert_eq!(next["order_no"], "100");
}

#[tokio::test]
async fn non_numeric_order_number_leaves_the_sequence_alone() {
    let app = TestApp::new().await;

    let first = create_sale(&app, tea_sale(None)).await;
    assert_eq!(first["order_no"], "1");

    let labelled = create_sale(&app, tea_sale(Some("counter-special"))).await;
    assert_eq!(labelled["order_no"], "counter-special");

    let next = create_sale(&app, tea_sale(None)).await;
    assert_eq!(next["order_no"], "2");
}

#[tokio::test]
async fn list_is_newest_first_with_items_embedded() {
    let app = TestApp::new().await;

    let dish_id = Uuid::new_v4();
    create_sale(
        &app,
        json!({
            "sale_date": "2026-01-14",
            "items": [
                {"dish_id": dish_id, "name": "Tea", "price": "20.00", "quantity": 1},
                {"dish_id": Uuid::new_v4(), "name": "Samosa", "price": "10.00", "quantity": 3}
            ],
            "total_amount": "50.00",
        }),
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    create_sale(&app, tea_sale(None)).await;

    let listed = json_with_status(
        app.request_authenticated(Method::GET, "/api/sales", None).await,
        StatusCode::OK,
    )
    .await;

    let sales = listed.as_array().expect("list response is an array");
    assert_eq!(sales.len(), 2);
    // Newest first: the second create comes back on top.
    assert_eq!(sales[0]["order_no"], "2");
    assert_eq!(sales[1]["order_no"], "1");

    let items = sales[1]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Tea");
    assert_eq!(items[0]["dish_id"], dish_id.to_string());
    assert_eq!(items[1]["name"], "Samosa");
    assert_eq!(items[1]["quantity"], 3);
}

#[tokio::test]
async fn create_rejects_total_mismatch() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/sales",
            Some(json!({
                "sale_date": "2026-01-15",
                "items": [
                    {"dish_id": Uuid::new_v4(), "name": "Tea", "price": "20.00", "quantity": 2}
                ],
                "total_amount": "45.00",
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The failed create must not consume an order number.
    let created = create_sale(&app, tea_sale(None)).await;
    assert_eq!(created["order_no"], "1");
}

#[tokio::test]
async fn create_rejects_empty_items() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/sales",
            Some(json!({
                "sale_date": "2026-01-15",
                "items": [],
                "total_amount": "0",
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_dish_keeps_historical_sales_intact() {
    let app = TestApp::new().await;

    let dish = json_with_status(
        app.request_authenticated(
            Method::POST,
            "/api/dishes",
            Some(json!({"name": "Tea", "price": "20.00"})),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let dish_id = dish["id"].as_str().unwrap().to_string();

    create_sale(
        &app,
        json!({
            "sale_date": "2026-01-15",
            "items": [
                {"dish_id": dish_id, "name": "Tea", "price": "20.00", "quantity": 2}
            ],
            "total_amount": "40.00",
        }),
    )
    .await;

    json_with_status(
        app.request_authenticated(Method::DELETE, &format!("/api/dishes/{}", dish_id), None)
            .await,
        StatusCode::OK,
    )
    .await;

    let listed = json_with_status(
        app.request_authenticated(Method::GET, "/api/sales", None).await,
        StatusCode::OK,
    )
    .await;
    let sales = listed.as_array().unwrap();
    assert_eq!(sales.len(), 1);
    let items = sales[0]["items"].as_array().unwrap();
    assert_eq!(items[0]["name"], "Tea");
    assert_eq!(items[0]["dish_id"], dish_id);
}
