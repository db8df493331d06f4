pub mod dashboard;
pub mod dishes;
pub mod expenses;
pub mod investors;
pub mod sales;
pub mod sequence;
