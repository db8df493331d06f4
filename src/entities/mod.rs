pub mod dish;
pub mod expense;
pub mod investor;
pub mod order_counter;
pub mod sale;
pub mod sale_item;
pub mod user;
