//! Order-number sequencing for sales.
//!
//! A named counter row is bumped with an atomic `UPDATE value = value + 1`
//! inside the caller's transaction, so two concurrent sale creations can
//! never be handed the same number. This replaces the
//! read-latest-record-and-increment pattern, which has a check-then-act
//! race window.

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    Set,
};

use crate::{
    entities::order_counter::{self, Entity as CounterEntity},
    errors::ServiceError,
};

/// Counter row backing sale order numbers.
pub const SALE_ORDER_SEQUENCE: &str = "sale_order_no";

/// Allocates the next order number. Must run inside the same transaction
/// that persists the sale, so a failed create never consumes a number
/// observably.
pub async fn next_order_no(txn: &DatabaseTransaction) -> Result<String, ServiceError> {
    // The UPDATE takes the row lock for the remainder of the transaction;
    // concurrent writers queue behind it.
    let updated = CounterEntity::update_many()
        .col_expr(
            order_counter::Column::Value,
            Expr::col(order_counter::Column::Value).add(1),
        )
        .filter(order_counter::Column::Name.eq(SALE_ORDER_SEQUENCE))
        .exec(txn)
        .await?;

    if updated.rows_affected == 0 {
        // The migration seeds this row; recreate it if it was removed.
        order_counter::ActiveModel {
            name: Set(SALE_ORDER_SEQUENCE.to_owned()),
            value: Set(1),
        }
        .insert(txn)
        .await?;
        return Ok("1".to_string());
    }

    let counter = CounterEntity::find_by_id(SALE_ORDER_SEQUENCE.to_owned())
        .one(txn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError("Order counter row vanished mid-transaction".to_string())
        })?;

    Ok(counter.value.to_string())
}

/// Records an explicitly supplied order number so later implicit
/// assignments continue past it: counter = max(counter, supplied).
/// Non-numeric order numbers leave the sequence untouched.
pub async fn observe_order_no(
    txn: &DatabaseTransaction,
    order_no: &str,
) -> Result<(), ServiceError> {
    let Ok(value) = order_no.trim().parse::<i64>() else {
        return Ok(());
    };

    // Conditional write keeps the counter monotonic under concurrency.
    let updated = CounterEntity::update_many()
        .col_expr(order_counter::Column::Value, Expr::value(value))
        .filter(order_counter::Column::Name.eq(SALE_ORDER_SEQUENCE))
        .filter(order_counter::Column::Value.lt(value))
        .exec(txn)
        .await?;

    if updated.rows_affected == 0 {
        // Either the counter is already past this number, or the row is
        // missing and needs reseeding.
        let exists = CounterEntity::find_by_id(SALE_ORDER_SEQUENCE.to_owned())
            .one(txn)
            .await?;
        if exists.is_none() {
            order_counter::ActiveModel {
                name: Set(SALE_ORDER_SEQUENCE.to_owned()),
                value: Set(value),
            }
            .insert(txn)
            .await?;
        }
    }

    Ok(())
}
