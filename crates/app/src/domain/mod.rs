//! Storefront Domain Concerns

pub mod carts;
pub mod menu;
pub mod orders;
