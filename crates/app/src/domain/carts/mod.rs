//! Carts

pub mod aggregates;
pub mod controller;
pub mod errors;
pub mod models;
pub mod overlay;
pub mod store;
pub mod sync;

pub use controller::{CartController, CartControllerOptions, Checkout, ClearReport};
pub use errors::CartError;
pub use sync::{follow_identity, spawn_identity_sync};
