//! HTTP client for a json-server style storefront backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    api::{ApiError, StorefrontApi},
    domain::{
        carts::models::{CartItem, CartItemId, CartItemUpdate, NewCartItem},
        menu::{MenuItem, MenuItemId},
        orders::models::{NewOrder, Order},
    },
    ids::UserId,
};

/// Configuration for connecting to the storefront service.
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    /// Service base address, e.g. `"http://localhost:3000"`.
    pub base_url: String,

    /// Per-request timeout. Requests wait indefinitely when unset.
    pub timeout: Option<Duration>,
}

/// HTTP implementation of [`StorefrontApi`].
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: String,
    http: Client,
}

impl HttpStorefrontApi {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HttpApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(request).await?.json().await?)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.send_json(self.http.get(self.url("menu"))).await
    }

    async fn fetch_cart(&self, user: &UserId) -> Result<Vec<CartItem>, ApiError> {
        self.send_json(
            self.http
                .get(self.url("cartItems"))
                .query(&[("userId", user.as_str())]),
        )
        .await
    }

    async fn find_cart_item_by_menu_id(
        &self,
        menu_item: &MenuItemId,
        user: &UserId,
    ) -> Result<Option<CartItem>, ApiError> {
        let rows: Vec<CartItem> = self
            .send_json(self.http.get(self.url("cartItems")).query(&[
                ("userId", user.as_str()),
                ("menuItemId", menu_item.as_str()),
            ]))
            .await?;

        if rows.len() > 1 {
            debug!(
                menu_item = %menu_item,
                user = %user,
                rows = rows.len(),
                "multiple cart rows for menu item, using the first"
            );
        }

        Ok(rows.into_iter().next())
    }

    async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem, ApiError> {
        self.send_json(self.http.post(self.url("cartItems")).json(&item))
            .await
    }

    async fn update_cart_item(
        &self,
        item: &CartItemId,
        update: CartItemUpdate,
    ) -> Result<CartItem, ApiError> {
        self.send_json(
            self.http
                .patch(self.url(&format!("cartItems/{item}")))
                .json(&update),
        )
        .await
    }

    async fn remove_cart_item(&self, item: &CartItemId) -> Result<(), ApiError> {
        self.send(self.http.delete(self.url(&format!("cartItems/{item}"))))
            .await?;

        Ok(())
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, ApiError> {
        self.send_json(self.http.post(self.url("orders")).json(&order))
            .await
    }

    async fn fetch_orders(&self, user: &UserId) -> Result<Vec<Order>, ApiError> {
        self.send_json(
            self.http
                .get(self.url("orders"))
                .query(&[("userId", user.as_str())]),
        )
        .await
    }
}
