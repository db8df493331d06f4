use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    handlers::common::{created_response, MessageResponse},
    services::expenses::{CreateExpenseRequest, ExpenseResponse},
    AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", delete(delete_expense))
}

/// List all expenses, newest first.
#[utoipa::path(
    get,
    path = "/api/expenses",
    responses(
        (status = 200, description = "All expenses, newest first", body = Vec<ExpenseResponse>)
    ),
    tag = "Expenses"
)]
pub(crate) async fn list_expenses(
    State(state): State<AppState>,
) -> Result<axum::Json<Vec<ExpenseResponse>>, ServiceError> {
    Ok(axum::Json(state.services.expenses.list_expenses().await?))
}

/// Record an operational cost.
#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = ExpenseResponse),
        (status = 400, description = "Invalid fields", body = crate::errors::ErrorResponse)
    ),
    tag = "Expenses"
)]
pub(crate) async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let expense = state.services.expenses.create_expense(payload).await?;
    Ok(created_response(expense))
}

/// Remove an expense; unknown ids still confirm.
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    params(("id" = Uuid, Path, description = "Expense id")),
    responses(
        (status = 200, description = "Deletion confirmed", body = MessageResponse)
    ),
    tag = "Expenses"
)]
pub(crate) async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::Json<MessageResponse>, ServiceError> {
    state.services.expenses.delete_expense(id).await?;
    Ok(axum::Json(MessageResponse::new("Deleted")))
}
