use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::ServiceError,
    services::dashboard::{DailyBreakdownReport, DishPerformance, TotalsReport},
    AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/totals", get(get_totals))
        .route("/dishes", get(get_dish_performance))
        .route("/daily", get(get_daily_breakdown))
}

/// Query parameters for the daily breakdown
#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyBreakdownQuery {
    /// First day of the range (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive)
    pub end_date: NaiveDate,
}

/// Lifetime totals: revenue, expenses, capital and net profit.
#[utoipa::path(
    get,
    path = "/api/dashboard/totals",
    responses(
        (status = 200, description = "Running totals", body = TotalsReport)
    ),
    tag = "Dashboard"
)]
pub(crate) async fn get_totals(State(state): State<AppState>) -> Result<Json<TotalsReport>, ServiceError> {
    Ok(Json(state.services.dashboard.totals().await?))
}

/// Per-dish sold quantity and revenue, best seller first.
#[utoipa::path(
    get,
    path = "/api/dashboard/dishes",
    responses(
        (status = 200, description = "Dish ranking", body = Vec<DishPerformance>)
    ),
    tag = "Dashboard"
)]
pub(crate) async fn get_dish_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<DishPerformance>>, ServiceError> {
    Ok(Json(state.services.dashboard.dish_performance().await?))
}

/// Per-day sums over an inclusive date range. Days without sales are left
/// out of the day list but still counted in the range totals.
#[utoipa::path(
    get,
    path = "/api/dashboard/daily",
    params(DailyBreakdownQuery),
    responses(
        (status = 200, description = "Daily breakdown", body = DailyBreakdownReport),
        (status = 400, description = "Invalid range", body = crate::errors::ErrorResponse)
    ),
    tag = "Dashboard"
)]
pub(crate) async fn get_daily_breakdown(
    State(state): State<AppState>,
    Query(params): Query<DailyBreakdownQuery>,
) -> Result<Json<DailyBreakdownReport>, ServiceError> {
    Ok(Json(
        state
            .services
            .dashboard
            .daily_breakdown(params.start_date, params.end_date)
            .await?,
    ))
}
