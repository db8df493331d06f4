pub mod common;
pub mod dashboard;
pub mod dishes;
pub mod expenses;
pub mod investors;
pub mod sales;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub dishes: Arc<crate::services::dishes::DishService>,
    pub sales: Arc<crate::services::sales::SaleService>,
    pub investors: Arc<crate::services::investors::InvestorService>,
    pub expenses: Arc<crate::services::expenses::ExpenseService>,
    pub dashboard: Arc<crate::services::dashboard::DashboardService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let dishes = Arc::new(crate::services::dishes::DishService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let sales = Arc::new(crate::services::sales::SaleService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let investors = Arc::new(crate::services::investors::InvestorService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let expenses = Arc::new(crate::services::expenses::ExpenseService::new(
            db_pool.clone(),
            event_sender,
        ));
        let dashboard = Arc::new(crate::services::dashboard::DashboardService::new(db_pool));

        Self {
            dishes,
            sales,
            investors,
            expenses,
            dashboard,
        }
    }
}
