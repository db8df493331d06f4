use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::{
    errors::ServiceError,
    handlers::common::created_response,
    services::sales::{CreateSaleRequest, SaleResponse},
    AppState,
};

pub fn sale_routes() -> Router<AppState> {
    Router::new().route("/", get(list_sales).post(create_sale))
}

/// List all sales, newest first.
#[utoipa::path(
    get,
    path = "/api/sales",
    responses(
        (status = 200, description = "All sales, newest first", body = Vec<SaleResponse>)
    ),
    tag = "Sales"
)]
pub(crate) async fn list_sales(
    State(state): State<AppState>,
) -> Result<axum::Json<Vec<SaleResponse>>, ServiceError> {
    Ok(axum::Json(state.services.sales.list_sales().await?))
}

/// Record a sale. When `order_no` is absent the next sequence value is
/// assigned atomically with the write.
#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded", body = SaleResponse),
        (status = 400, description = "Invalid fields or total mismatch", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub(crate) async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state.services.sales.create_sale(payload).await?;
    Ok(created_response(sale))
}
