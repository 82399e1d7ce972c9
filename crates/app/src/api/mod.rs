//! Storefront service client.
//!
//! [`StorefrontApi`] is the seam between the cart core and the remote
//! cart/order service; [`HttpStorefrontApi`] speaks to it over HTTP.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::{
        carts::models::{CartItem, CartItemId, CartItemUpdate, NewCartItem},
        menu::{MenuItem, MenuItemId},
        orders::models::{NewOrder, Order},
    },
    ids::UserId,
};

mod errors;
pub mod http;

pub use errors::{ApiError, FailureKind};
pub use http::{HttpApiConfig, HttpStorefrontApi};

/// Remote storefront service: catalog, cart rows and orders.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// List the catalog.
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, ApiError>;

    /// Every cart row belonging to `user`.
    async fn fetch_cart(&self, user: &UserId) -> Result<Vec<CartItem>, ApiError>;

    /// The cart row for `menu_item`, if `user` already has one.
    async fn find_cart_item_by_menu_id(
        &self,
        menu_item: &MenuItemId,
        user: &UserId,
    ) -> Result<Option<CartItem>, ApiError>;

    /// Persist a new cart row.
    async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem, ApiError>;

    /// Change the quantity of an existing cart row.
    async fn update_cart_item(
        &self,
        item: &CartItemId,
        update: CartItemUpdate,
    ) -> Result<CartItem, ApiError>;

    /// Delete a cart row.
    async fn remove_cart_item(&self, item: &CartItemId) -> Result<(), ApiError>;

    /// Submit an order.
    async fn create_order(&self, order: NewOrder) -> Result<Order, ApiError>;

    /// Every order placed by `user`.
    async fn fetch_orders(&self, user: &UserId) -> Result<Vec<Order>, ApiError>;
}
