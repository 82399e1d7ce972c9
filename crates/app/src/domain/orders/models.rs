//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{carts::models::CartLineItem, menu::MenuItemId},
    ids::{TypedId, UserId},
};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Lifecycle state of an order. Transitions happen on the service side, so
/// statuses this client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Placed, awaiting payment.
    Pending,

    /// Paid, being prepared.
    Paid,

    /// Handed over to the customer.
    Completed,

    /// Called off.
    Cancelled,

    /// Status set by the service that this client has no label for.
    Other(String),
}

impl OrderStatus {
    /// Label shown to customers; unknown statuses are shown as sent.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "處理中",
            Self::Paid => "已付款",
            Self::Completed => "已完成",
            Self::Cancelled => "已取消",
            Self::Other(raw) => raw,
        }
    }

    /// Wire value of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "paid" => Self::Paid,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Line of an order, copied from the cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Catalog item ordered.
    pub menu_item_id: MenuItemId,
    /// Item name at checkout.
    pub name: String,
    /// Unit price at checkout.
    pub price: u64,
    /// Units ordered.
    pub quantity: u32,
}

impl OrderLine {
    /// `price × quantity`
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

impl From<&CartLineItem> for OrderLine {
    fn from(line: &CartLineItem) -> Self {
        Self {
            menu_item_id: line.menu_item_id.clone(),
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// Order payload submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Customer placing the order.
    pub user_id: UserId,
    /// Ordered lines.
    pub items: Vec<OrderLine>,
    /// Sum of the line subtotals.
    pub total_amount: u64,
    /// Initial status.
    pub status: OrderStatus,
    /// Checkout time.
    pub created_at: Timestamp,
}

/// Order Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id assigned by the service.
    pub id: OrderId,
    /// Customer who placed the order.
    pub user_id: UserId,
    /// Ordered lines.
    pub items: Vec<OrderLine>,
    /// Sum of the line subtotals.
    pub total_amount: u64,
    /// Current status.
    pub status: OrderStatus,
    /// Checkout time.
    pub created_at: Timestamp,
}
