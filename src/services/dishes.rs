use chrono::{DateTime, Utc};
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
    entities::dish::{self, Entity as DishEntity, Model as DishModel},
    errors::ServiceError,
    events::{Event, EventSender},
};

pub const DEFAULT_DISH_CATEGORY: &str = "Main Course";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDishRequest {
    #[validate(length(min = 1, message = "Dish name is required"))]
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDishRequest {
    #[validate(length(min = 1, message = "Dish name cannot be empty"))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DishResponse {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Service for managing menu items.
#[derive(Clone)]
pub struct DishService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DishService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists all dishes in insertion order.
    #[instrument(skip(self))]
    pub async fn list_dishes(&self) -> Result<Vec<DishResponse>, ServiceError> {
        let dishes = DishEntity::find()
            .order_by_asc(dish::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;

        Ok(dishes.into_iter().map(model_to_response).collect())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_dish(&self, request: CreateDishRequest) -> Result<DishResponse, ServiceError> {
        request.validate()?;
        ensure_non_negative_price(&request.price)?;

        let model = dish::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            price: Set(request.price),
            category: Set(request
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISH_CATEGORY.to_string())),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(dish_id = %model.id, "Dish created");

        if let Err(e) = self.event_sender.send(Event::DishCreated(model.id)).await {
            tracing::warn!(error = %e, "Failed to send dish created event");
        }

        Ok(model_to_response(model))
    }

    /// Merges the provided fields into an existing dish.
    #[instrument(skip(self, request), fields(dish_id = %dish_id))]
    pub async fn update_dish(
        &self,
        dish_id: Uuid,
        request: UpdateDishRequest,
    ) -> Result<DishResponse, ServiceError> {
        request.validate()?;
        if let Some(price) = &request.price {
            ensure_non_negative_price(price)?;
        }

        let dish = DishEntity::find_by_id(dish_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Dish with ID {} not found", dish_id)))?;

        let mut active: dish::ActiveModel = dish.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }

        let updated = active.update(&*self.db_pool).await?;

        info!(dish_id = %dish_id, "Dish updated");

        if let Err(e) = self.event_sender.send(Event::DishUpdated(dish_id)).await {
            tracing::warn!(error = %e, "Failed to send dish updated event");
        }

        Ok(model_to_response(updated))
    }

    /// Deletes a dish. Removing an id that does not exist is a no-op; sales
    /// that reference the dish keep their snapshots either way.
    #[instrument(skip(self), fields(dish_id = %dish_id))]
    pub async fn delete_dish(&self, dish_id: Uuid) -> Result<(), ServiceError> {
        let result = DishEntity::delete_by_id(dish_id)
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected > 0 {
            info!(dish_id = %dish_id, "Dish deleted");
            if let Err(e) = self.event_sender.send(Event::DishDeleted(dish_id)).await {
                tracing::warn!(error = %e, "Failed to send dish deleted event");
            }
        }

        Ok(())
    }
}

fn ensure_non_negative_price(price: &Decimal) -> Result<(), ServiceError> {
    if price.is_sign_negative() {
        return Err(ServiceError::ValidationError(
            "Price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn model_to_response(model: DishModel) -> DishResponse {
    DishResponse {
        id: model.id,
        name: model.name,
        price: model.price,
        category: model.category,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::DatabaseConnection;
    use tokio::sync::mpsc;

    fn test_service() -> DishService {
        let (tx, _rx) = mpsc::channel(8);
        DishService::new(
            Arc::new(DatabaseConnection::Disconnected),
            Arc::new(EventSender::new(tx)),
        )
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let service = test_service();
        let result = service
            .create_dish(CreateDishRequest {
                name: String::new(),
                price: dec!(20),
                category: None,
            })
            .await;

        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn create_rejects_negative_price() {
        let service = test_service();
        let result = service
            .create_dish(CreateDishRequest {
                name: "Tea".into(),
                price: dec!(-1),
                category: None,
            })
            .await;

        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn model_to_response_conversion() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let response = model_to_response(DishModel {
            id,
            name: "Tea".into(),
            price: dec!(20.00),
            category: "Beverage".into(),
            created_at: now,
        });

        assert_eq!(response.id, id);
        assert_eq!(response.name, "Tea");
        assert_eq!(response.price, dec!(20.00));
        assert_eq!(response.category, "Beverage");
        assert_eq!(response.created_at, now);
    }
}
