//! Orders

pub mod history;
pub mod models;

pub use history::OrderHistory;
pub use models::{NewOrder, Order, OrderId, OrderLine, OrderStatus};
