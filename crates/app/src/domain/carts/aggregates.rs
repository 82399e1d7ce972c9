//! Cart Aggregates

use crate::domain::carts::models::CartLineItem;

/// Total number of units across `items`.
#[must_use]
pub fn cart_count(items: &[CartLineItem]) -> u64 {
    items.iter().map(|line| u64::from(line.quantity)).sum()
}

/// Sum of `price × quantity` across `items`.
#[must_use]
pub fn total_amount(items: &[CartLineItem]) -> u64 {
    items
        .iter()
        .fold(0_u64, |total, line| total.saturating_add(line.line_total()))
}
