//! App Context

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{
    api::{ApiError, HttpApiConfig, HttpStorefrontApi, StorefrontApi},
    domain::{
        carts::{CartController, CartControllerOptions, spawn_identity_sync},
        orders::OrderHistory,
    },
    identity::IdentityProvider,
    latch::AddingLatch,
};

/// Errors raised while building an [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The HTTP client could not be built.
    #[error("failed to build storefront client")]
    Client(#[source] ApiError),
}

/// Handles shared by every consumer of the storefront.
#[derive(Clone)]
pub struct AppContext {
    /// Storefront service client.
    pub api: Arc<dyn StorefrontApi>,
    /// Source of the signed-in user.
    pub identity: IdentityProvider,
    /// Cart of the signed-in user.
    pub cart: Arc<CartController>,
    /// Order history lookups.
    pub orders: OrderHistory,
    /// Guard against adding the same menu item twice at once.
    pub adding: AddingLatch,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("identity", &self.identity)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire up the storefront against `api`.
    #[must_use]
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        identity: IdentityProvider,
        options: CartControllerOptions,
    ) -> Self {
        let cart = Arc::new(CartController::with_options(api.clone(), &identity, options));

        Self {
            orders: OrderHistory::new(api.clone()),
            api,
            identity,
            cart,
            adding: AddingLatch::new(),
        }
    }

    /// Build application context talking to the HTTP service at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_http_config(
        config: HttpApiConfig,
        identity: IdentityProvider,
        options: CartControllerOptions,
    ) -> Result<Self, AppInitError> {
        let api = HttpStorefrontApi::new(config).map_err(AppInitError::Client)?;

        Ok(Self::new(Arc::new(api), identity, options))
    }

    /// Keep the cart in step with identity changes for as long as the
    /// identity provider lives.
    #[must_use]
    pub fn spawn_identity_sync(&self) -> JoinHandle<()> {
        spawn_identity_sync(self.cart.clone(), self.identity.subscribe())
    }
}
