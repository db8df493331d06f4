use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named monotonic counter. The `sale_order_no` row backs order-number
/// assignment; reading and bumping it happens inside the sale-create
/// transaction so concurrent writers can never observe the same value.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
