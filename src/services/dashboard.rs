use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        dish::{self, Model as DishModel},
        expense::{self, Model as ExpenseModel},
        investor::{self, Model as InvestorModel},
        sale::{self, Model as SaleModel},
        sale_item::{self, Model as SaleItemModel},
    },
    errors::ServiceError,
};

/// Longest daily-breakdown window the API will fold in one request.
const MAX_RANGE_DAYS: i64 = 366;

/// Lifetime running totals across all records.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TotalsReport {
    pub total_sales: Decimal,
    pub total_expenses: Decimal,
    pub total_invested: Decimal,
    pub net_profit: Decimal,
    pub generated_at: DateTime<Utc>,
}

/// Sold quantity and revenue for one dish across all sales.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DishPerformance {
    pub dish_id: Uuid,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

/// One day inside a date-range breakdown.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub sales: Decimal,
    pub expenses: Decimal,
    pub invested: Decimal,
    pub profit: Decimal,
}

/// Sums over every day in the requested range, including days omitted from
/// the day list for having no sales.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RangeTotals {
    pub sales: Decimal,
    pub expenses: Decimal,
    pub invested: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyBreakdownReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days with at least one sale, newest first
    pub days: Vec<DailyEntry>,
    pub totals: RangeTotals,
}

/// Server-side aggregation over the full record set. Every report is a pure
/// fold over a snapshot read in one round-trip per collection.
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
}

impl DashboardService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lifetime totals: revenue, expenses, capital, net profit.
    #[instrument(skip(self))]
    pub async fn totals(&self) -> Result<TotalsReport, ServiceError> {
        let db = &*self.db_pool;

        let sales = sale::Entity::find().all(db).await?;
        let expenses = expense::Entity::find().all(db).await?;
        let investors = investor::Entity::find().all(db).await?;

        let total_sales: Decimal = sales.iter().map(|s| s.total_amount).sum();
        let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
        let total_invested: Decimal = investors.iter().map(|i| i.amount).sum();

        Ok(TotalsReport {
            total_sales,
            total_expenses,
            total_invested,
            net_profit: total_sales - total_expenses,
            generated_at: Utc::now(),
        })
    }

    /// Per-dish sold quantity and revenue ranking, best seller first.
    #[instrument(skip(self))]
    pub async fn dish_performance(&self) -> Result<Vec<DishPerformance>, ServiceError> {
        let db = &*self.db_pool;

        let dishes = dish::Entity::find().all(db).await?;
        let items = sale_item::Entity::find().all(db).await?;

        Ok(rank_dishes(&dishes, &items))
    }

    /// Per-day sums over an inclusive date range.
    #[instrument(skip(self))]
    pub async fn daily_breakdown(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<DailyBreakdownReport, ServiceError> {
        if start_date > end_date {
            return Err(ServiceError::ValidationError(
                "start_date must not be after end_date".to_string(),
            ));
        }
        let span_days = (end_date - start_date).num_days() + 1;
        if span_days > MAX_RANGE_DAYS {
            return Err(ServiceError::ValidationError(format!(
                "Date range cannot exceed {} days",
                MAX_RANGE_DAYS
            )));
        }

        let db = &*self.db_pool;

        let sales = sale::Entity::find()
            .filter(sale::Column::SaleDate.between(start_date, end_date))
            .all(db)
            .await?;
        let expenses = expense::Entity::find()
            .filter(expense::Column::SpentOn.between(start_date, end_date))
            .all(db)
            .await?;
        let investors = investor::Entity::find()
            .filter(investor::Column::ContributedOn.between(start_date, end_date))
            .all(db)
            .await?;

        let (days, totals) = fold_daily(start_date, end_date, &sales, &expenses, &investors);

        Ok(DailyBreakdownReport {
            start_date,
            end_date,
            days,
            totals,
        })
    }
}

/// Folds sale items into a per-dish ranking: quantity sold descending, then
/// revenue descending, then name ascending so equal sellers order
/// deterministically.
pub(crate) fn rank_dishes(
    dishes: &[DishModel],
    items: &[SaleItemModel],
) -> Vec<DishPerformance> {
    let mut by_dish: HashMap<Uuid, (i64, Decimal)> = HashMap::new();
    for item in items {
        let entry = by_dish.entry(item.dish_id).or_insert((0, Decimal::ZERO));
        entry.0 += i64::from(item.quantity);
        entry.1 += item.price * Decimal::from(item.quantity);
    }

    let mut ranking: Vec<DishPerformance> = dishes
        .iter()
        .map(|dish| {
            let (quantity_sold, revenue) = by_dish
                .get(&dish.id)
                .copied()
                .unwrap_or((0, Decimal::ZERO));
            DishPerformance {
                dish_id: dish.id,
                name: dish.name.clone(),
                quantity_sold,
                revenue,
            }
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.quantity_sold
            .cmp(&a.quantity_sold)
            .then(b.revenue.cmp(&a.revenue))
            .then(a.name.cmp(&b.name))
    });
    ranking
}

/// Walks every day in the inclusive range. Days without sales stay out of
/// the returned list but still contribute to the range totals. The day list
/// comes back newest first.
pub(crate) fn fold_daily(
    start_date: NaiveDate,
    end_date: NaiveDate,
    sales: &[SaleModel],
    expenses: &[ExpenseModel],
    investors: &[InvestorModel],
) -> (Vec<DailyEntry>, RangeTotals) {
    let sales_by_day = sum_by_date(sales.iter().map(|s| (s.sale_date, s.total_amount)));
    let expenses_by_day = sum_by_date(expenses.iter().map(|e| (e.spent_on, e.amount)));
    let invested_by_day = sum_by_date(investors.iter().map(|i| (i.contributed_on, i.amount)));

    let mut days = Vec::new();
    let mut totals = RangeTotals::default();

    let mut day = start_date;
    while day <= end_date {
        let day_sales = sales_by_day.get(&day).copied().unwrap_or(Decimal::ZERO);
        let day_expenses = expenses_by_day.get(&day).copied().unwrap_or(Decimal::ZERO);
        let day_invested = invested_by_day.get(&day).copied().unwrap_or(Decimal::ZERO);
        let day_profit = day_sales - day_expenses;

        totals.sales += day_sales;
        totals.expenses += day_expenses;
        totals.invested += day_invested;
        totals.profit += day_profit;

        if day_sales > Decimal::ZERO {
            days.push(DailyEntry {
                date: day,
                sales: day_sales,
                expenses: day_expenses,
                invested: day_invested,
                profit: day_profit,
            });
        }

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    days.reverse();
    (days, totals)
}

fn sum_by_date<I>(records: I) -> HashMap<NaiveDate, Decimal>
where
    I: Iterator<Item = (NaiveDate, Decimal)>,
{
    let mut by_date: HashMap<NaiveDate, Decimal> = HashMap::new();
    for (date, amount) in records {
        *by_date.entry(date).or_insert(Decimal::ZERO) += amount;
    }
    by_date
}
