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
    services::dishes::{CreateDishRequest, DishResponse, UpdateDishRequest},
    AppState,
};

pub fn dish_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_dishes).post(create_dish))
        .route("/:id", put(update_dish).delete(delete_dish))
}

/// List all menu items.
#[utoipa::path(
    get,
    path = "/api/dishes",
    responses(
        (status = 200, description = "All dishes", body = Vec<DishResponse>)
    ),
    tag = "Dishes"
)]
pub(crate) async fn list_dishes(
    State(state): State<AppState>,
) -> Result<axum::Json<Vec<DishResponse>>, ServiceError> {
    Ok(axum::Json(state.services.dishes.list_dishes().await?))
}

/// Add a dish to the menu.
#[utoipa::path(
    post,
    path = "/api/dishes",
    request_body = CreateDishRequest,
    responses(
        (status = 201, description = "Dish created", body = DishResponse),
        (status = 400, description = "Invalid fields", body = crate::errors::ErrorResponse)
    ),
    tag = "Dishes"
)]
pub(crate) async fn create_dish(
    State(state): State<AppState>,
    Json(payload): Json<CreateDishRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let dish = state.services.dishes.create_dish(payload).await?;
    Ok(created_response(dish))
}

/// Merge the provided fields into a dish.
#[utoipa::path(
    put,
    path = "/api/dishes/{id}",
    params(("id" = Uuid, Path, description = "Dish id")),
    request_body = UpdateDishRequest,
    responses(
        (status = 200, description = "Dish updated", body = DishResponse),
        (status = 404, description = "Dish not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Dishes"
)]
pub(crate) async fn update_dish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDishRequest>,
) -> Result<axum::Json<DishResponse>, ServiceError> {
    Ok(axum::Json(
        state.services.dishes.update_dish(id, payload).await?,
    ))
}

/// Remove a dish. Historical sales keep their snapshots; deleting an
/// unknown id still confirms.
#[utoipa::path(
    delete,
    path = "/api/dishes/{id}",
    params(("id" = Uuid, Path, description = "Dish id")),
    responses(
        (status = 200, description = "Deletion confirmed", body = MessageResponse)
    ),
    tag = "Dishes"
)]
pub(crate) async fn delete_dish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::Json<MessageResponse>, ServiceError> {
    state.services.dishes.delete_dish(id).await?;
    Ok(axum::Json(MessageResponse::new("Deleted successfully")))
}
