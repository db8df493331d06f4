use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::sale::{self, Entity as SaleEntity, Model as SaleModel},
    entities::sale_item::{self, Model as SaleItemModel},
    errors::ServiceError,
    events::{Event, EventSender},
    services::sequence,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleItemInput {
    pub dish_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSaleRequest {
    pub sale_date: NaiveDate,
    #[validate(length(min = 1, message = "A sale needs at least one item"))]
    pub items: Vec<SaleItemInput>,
    pub total_amount: Decimal,
    /// Assigned from the order-number sequence when absent
    pub order_no: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleItemResponse {
    pub dish_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleResponse {
    pub id: Uuid,
    pub order_no: String,
    pub sale_date: NaiveDate,
    pub items: Vec<SaleItemResponse>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Service for recording and listing sales. Sales are append-only: there is
/// no update or delete.
#[derive(Clone)]
pub struct SaleService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SaleService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists all sales, newest first, with their line items embedded.
    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<SaleResponse>, ServiceError> {
        let sales_with_items = SaleEntity::find()
            .order_by_desc(sale::Column::CreatedAt)
            .find_with_related(sale_item::Entity)
            .all(&*self.db_pool)
            .await?;

        Ok(sales_with_items
            .into_iter()
            .map(|(sale, mut items)| {
                items.sort_by_key(|item| item.position);
                model_to_response(sale, items)
            })
            .collect())
    }

    /// Records a sale. Order-number assignment, the sale row and its line
    /// items commit or fail as one transaction.
    #[instrument(skip(self, request), fields(sale_date = %request.sale_date))]
    pub async fn create_sale(&self, request: CreateSaleRequest) -> Result<SaleResponse, ServiceError> {
        request.validate()?;
        validate_items(&request.items)?;
        verify_total(&request.items, &request.total_amount)?;

        let txn = self.db_pool.begin().await?;

        let order_no = match request.order_no {
            Some(supplied) => {
                sequence::observe_order_no(&txn, &supplied).await?;
                supplied
            }
            None => sequence::next_order_no(&txn).await?,
        };

        let sale_id = Uuid::new_v4();
        let sale = sale::ActiveModel {
            id: Set(sale_id),
            order_no: Set(order_no.clone()),
            sale_date: Set(request.sale_date),
            total_amount: Set(request.total_amount),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(request.items.len());
        for (position, input) in request.items.into_iter().enumerate() {
            let item = sale_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                dish_id: Set(input.dish_id),
                dish_name: Set(input.name),
                price: Set(input.price),
                quantity: Set(input.quantity),
                position: Set(position as i32),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await?;

        info!(sale_id = %sale_id, order_no = %order_no, "Sale recorded");

        if let Err(e) = self
            .event_sender
            .send(Event::SaleRecorded { sale_id, order_no })
            .await
        {
            warn!(error = %e, "Failed to send sale recorded event");
        }

        Ok(model_to_response(sale, items))
    }
}

fn validate_items(items: &[SaleItemInput]) -> Result<(), ServiceError> {
    for item in items {
        if item.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Sale item name is required".to_string(),
            ));
        }
        if item.quantity <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "Sale item {} must have a positive quantity",
                item.name
            )));
        }
        if item.price.is_sign_negative() {
            return Err(ServiceError::ValidationError(format!(
                "Sale item {} cannot have a negative price",
                item.name
            )));
        }
    }
    Ok(())
}

/// The stated total must reconcile with the line items.
fn verify_total(items: &[SaleItemInput], total_amount: &Decimal) -> Result<(), ServiceError> {
    let computed: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();

    if computed != *total_amount {
        return Err(ServiceError::ValidationError(format!(
            "Total amount {} does not match the sum of items {}",
            total_amount, computed
        )));
    }
    Ok(())
}

fn model_to_response(sale: SaleModel, items: Vec<SaleItemModel>) -> SaleResponse {
    SaleResponse {
        id: sale.id,
        order_no: sale.order_no,
        sale_date: sale.sale_date,
        items: items
            .into_iter()
            .map(|item| SaleItemResponse {
                dish_id: item.dish_id,
                name: item.dish_name,
                price: item.price,
                quantity: item.quantity,
            })
            .collect(),
        total_amount: sale.total_amount,
        created_at: sale.created_at,
    }
}
