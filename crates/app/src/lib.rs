//! Breakfast storefront core: menu, optimistic cart and orders over a remote
//! storefront service.

pub mod api;
pub mod context;
pub mod domain;
pub mod identity;
pub mod ids;
pub mod latch;
