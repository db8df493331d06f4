use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    handlers::common::{created_response, MessageResponse},
    services::investors::{CreateInvestorRequest, InvestorResponse, UpdateInvestorRequest},
    AppState,
};

pub fn investor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_investors).post(create_investor))
        .route("/:id", put(update_investor).delete(delete_investor))
}

/// List all capital contributions.
#[utoipa::path(
    get,
    path = "/api/investors",
    responses(
        (status = 200, description = "All investors", body = Vec<InvestorResponse>)
    ),
    tag = "Investors"
)]
pub(crate) async fn list_investors(
    State(state): State<AppState>,
) -> Result<axum::Json<Vec<InvestorResponse>>, ServiceError> {
    Ok(axum::Json(state.services.investors.list_investors().await?))
}

/// Record a capital contribution.
#[utoipa::path(
    post,
    path = "/api/investors",
    request_body = CreateInvestorRequest,
    responses(
        (status = 201, description = "Investor recorded", body = InvestorResponse),
        (status = 400, description = "Invalid fields", body = crate::errors::ErrorResponse)
    ),
    tag = "Investors"
)]
pub(crate) async fn create_investor(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvestorRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let investor = state.services.investors.create_investor(payload).await?;
    Ok(created_response(investor))
}

/// Merge the provided fields into a contribution record.
#[utoipa::path(
    put,
    path = "/api/investors/{id}",
    params(("id" = Uuid, Path, description = "Investor id")),
    request_body = UpdateInvestorRequest,
    responses(
        (status = 200, description = "Investor updated", body = InvestorResponse),
        (status = 404, description = "Investor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Investors"
)]
pub(crate) async fn update_investor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvestorRequest>,
) -> Result<axum::Json<InvestorResponse>, ServiceError> {
    Ok(axum::Json(
        state.services.investors.update_investor(id, payload).await?,
    ))
}

/// Remove a contribution record; unknown ids still confirm.
#[utoipa::path(
    delete,
    path = "/api/investors/{id}",
    params(("id" = Uuid, Path, description = "Investor id")),
    responses(
        (status = 200, description = "Deletion confirmed", body = MessageResponse)
    ),
    tag = "Investors"
)]
pub(crate) async fn delete_investor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::Json<MessageResponse>, ServiceError> {
    state.services.investors.delete_investor(id).await?;
    Ok(axum::Json(MessageResponse::new("Deleted")))
}
