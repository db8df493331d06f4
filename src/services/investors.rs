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
    entities::investor::{self, Entity as InvestorEntity, Model as InvestorModel},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInvestorRequest {
    #[validate(length(min = 1, message = "Investor name is required"))]
    pub name: String,
    pub amount: Decimal,
    /// Defaults to today when absent
    pub contributed_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInvestorRequest {
    #[validate(length(min = 1, message = "Investor name cannot be empty"))]
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub contributed_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestorResponse {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub contributed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Service for capital contribution records.
#[derive(Clone)]
pub struct InvestorService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl InvestorService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_investors(&self) -> Result<Vec<InvestorResponse>, ServiceError> {
        let investors = InvestorEntity::find()
            .order_by_asc(investor::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;

        Ok(investors.into_iter().map(model_to_response).collect())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_investor(
        &self,
        request: CreateInvestorRequest,
    ) -> Result<InvestorResponse, ServiceError> {
        request.validate()?;

        let now = Utc::now();
        let model = investor::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            amount: Set(request.amount),
            contributed_on: Set(request.contributed_on.unwrap_or_else(|| now.date_naive())),
            created_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(investor_id = %model.id, "Investor contribution recorded");

        if let Err(e) = self.event_sender.send(Event::InvestorAdded(model.id)).await {
            tracing::warn!(error = %e, "Failed to send investor added event");
        }

        Ok(model_to_response(model))
    }

    #[instrument(skip(self, request), fields(investor_id = %investor_id))]
    pub async fn update_investor(
        &self,
        investor_id: Uuid,
        request: UpdateInvestorRequest,
    ) -> Result<InvestorResponse, ServiceError> {
        request.validate()?;

        let investor = InvestorEntity::find_by_id(investor_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Investor with ID {} not found", investor_id))
            })?;

        let mut active: investor::ActiveModel = investor.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(amount) = request.amount {
            active.amount = Set(amount);
        }
        if let Some(contributed_on) = request.contributed_on {
            active.contributed_on = Set(contributed_on);
        }

        let updated = active.update(&*self.db_pool).await?;

        info!(investor_id = %investor_id, "Investor updated");

        if let Err(e) = self
            .event_sender
            .send(Event::InvestorUpdated(investor_id))
            .await
        {
            tracing::warn!(error = %e, "Failed to send investor updated event");
        }

        Ok(model_to_response(updated))
    }

    /// Removes a contribution record; removing a missing id is a no-op.
    #[instrument(skip(self), fields(investor_id = %investor_id))]
    pub async fn delete_investor(&self, investor_id: Uuid) -> Result<(), ServiceError> {
        let result = InvestorEntity::delete_by_id(investor_id)
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected > 0 {
            info!(investor_id = %investor_id, "Investor removed");
            if let Err(e) = self
                .event_sender
                .send(Event::InvestorRemoved(investor_id))
                .await
            {
                tracing::warn!(error = %e, "Failed to send investor removed event");
            }
        }

        Ok(())
    }
}

fn model_to_response(model: InvestorModel) -> InvestorResponse {
    InvestorResponse {
        id: model.id,
        name: model.name,
        amount: model.amount,
        contributed_on: model.contributed_on,
        created_at: model.created_at,
    }
}
