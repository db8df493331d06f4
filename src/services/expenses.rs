use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::expense::{self, Entity as ExpenseEntity, Model as ExpenseModel},
    errors::ServiceError,
    events::{Event, EventSender},
};

pub const DEFAULT_EXPENSE_CATEGORY: &str = "Supplies";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, message = "Expense description is required"))]
    pub description: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub spent_on: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub spent_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Service for operational cost records. Expenses can be added and removed
/// but not edited.
#[derive(Clone)]
pub struct ExpenseService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ExpenseService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists all expenses, newest first.
    #[instrument(skip(self))]
    pub async fn list_expenses(&self) -> Result<Vec<ExpenseResponse>, ServiceError> {
        let expenses = ExpenseEntity::find()
            .order_by_desc(expense::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;

        Ok(expenses.into_iter().map(model_to_response).collect())
    }

    #[instrument(skip(self, request), fields(spent_on = %request.spent_on))]
    pub async fn create_expense(
        &self,
        request: CreateExpenseRequest,
    ) -> Result<ExpenseResponse, ServiceError> {
        request.validate()?;
        if request.amount.is_sign_negative() {
            return Err(ServiceError::ValidationError(
                "Expense amount cannot be negative".to_string(),
            ));
        }

        let model = expense::ActiveModel {
            id: Set(Uuid::new_v4()),
            description: Set(request.description),
            amount: Set(request.amount),
            category: Set(request
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EXPENSE_CATEGORY.to_string())),
            spent_on: Set(request.spent_on),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(expense_id = %model.id, "Expense recorded");

        if let Err(e) = self.event_sender.send(Event::ExpenseAdded(model.id)).await {
            tracing::warn!(error = %e, "Failed to send expense added event");
        }

        Ok(model_to_response(model))
    }

    /// Removes an expense; removing a missing id is a no-op.
    #[instrument(skip(self), fields(expense_id = %expense_id))]
    pub async fn delete_expense(&self, expense_id: Uuid) -> Result<(), ServiceError> {
        let result = ExpenseEntity::delete_by_id(expense_id)
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected > 0 {
            info!(expense_id = %expense_id, "Expense removed");
            if let Err(e) = self
                .event_sender
                .send(Event::ExpenseRemoved(expense_id))
                .await
            {
                tracing::warn!(error = %e, "Failed to send expense removed event");
            }
        }

        Ok(())
    }
}

fn model_to_response(model: ExpenseModel) -> ExpenseResponse {
    ExpenseResponse {
        id: model.id,
        description: model.description,
        amount: model.amount,
        category: model.category,
        spent_on: model.spent_on,
        created_at: model.created_at,
    }
}
