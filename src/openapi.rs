use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stallkeeper API",
        description = "Back-office API for a food stall: menu items, daily sales with \
sequential order numbers, investor capital, expenses, and profit dashboards. \
All routes except `/`, `/api/health` and `/api/auth/login` require a bearer token."
    ),
    paths(
        crate::auth::login,
        crate::handlers::dishes::list_dishes,
        crate::handlers::dishes::create_dish,
        crate::handlers::dishes::update_dish,
        crate::handlers::dishes::delete_dish,
        crate::handlers::sales::list_sales,
        crate::handlers::sales::create_sale,
        crate::handlers::investors::list_investors,
        crate::handlers::investors::create_investor,
        crate::handlers::investors::update_investor,
        crate::handlers::investors::delete_investor,
        crate::handlers::expenses::list_expenses,
        crate::handlers::expenses::create_expense,
        crate::handlers::expenses::delete_expense,
        crate::handlers::dashboard::get_totals,
        crate::handlers::dashboard::get_dish_performance,
        crate::handlers::dashboard::get_daily_breakdown,
    ),
    components(schemas(
        crate::auth::LoginRequest,
        crate::auth::AccessToken,
        crate::errors::ErrorResponse,
        crate::handlers::common::MessageResponse,
        crate::services::dishes::CreateDishRequest,
        crate::services::dishes::UpdateDishRequest,
        crate::services::dishes::DishResponse,
        crate::services::sales::SaleItemInput,
        crate::services::sales::CreateSaleRequest,
        crate::services::sales::SaleItemResponse,
        crate::services::sales::SaleResponse,
        crate::services::investors::CreateInvestorRequest,
        crate::services::investors::UpdateInvestorRequest,
        crate::services::investors::InvestorResponse,
        crate::services::expenses::CreateExpenseRequest,
        crate::services::expenses::ExpenseResponse,
        crate::services::dashboard::TotalsReport,
        crate::services::dashboard::DishPerformance,
        crate::services::dashboard::DailyEntry,
        crate::services::dashboard::RangeTotals,
        crate::services::dashboard::DailyBreakdownReport,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Credential verification and token issuance"),
        (name = "Dishes", description = "Menu item management"),
        (name = "Sales", description = "Append-only sale records"),
        (name = "Investors", description = "Capital contributions"),
        (name = "Expenses", description = "Operational costs"),
        (name = "Dashboard", description = "Server-side aggregation reports"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_contains_all_resource_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/api/auth/login",
            "/api/dishes",
            "/api/dishes/{id}",
            "/api/sales",
            "/api/investors",
            "/api/investors/{id}",
            "/api/expenses",
            "/api/expenses/{id}",
            "/api/dashboard/totals",
            "/api/dashboard/dishes",
            "/api/dashboard/daily",
        ] {
            assert!(paths.contains_key(expected), "missing path {}", expected);
        }
    }
}
