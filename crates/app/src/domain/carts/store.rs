//! Confirmed cart state.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    api::{ApiError, StorefrontApi},
    domain::carts::models::{CartItem, CartLineItem},
    ids::UserId,
};

/// Cart contents as last confirmed by the storefront service.
#[derive(Debug)]
pub struct CartStore {
    items: watch::Sender<Vec<CartLineItem>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: watch::Sender::new(Vec::new()),
        }
    }

    /// Current confirmed items.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.items.borrow().clone()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Watch the confirmed items.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLineItem>> {
        self.items.subscribe()
    }

    /// Fetch `user`'s cart and replace the stored contents with it.
    ///
    /// `still_active` is asked once the fetch returns; when `user` is no
    /// longer the active user the result is discarded and `None` returned.
    ///
    /// # Errors
    ///
    /// Returns the service error unchanged; the stored contents are left as
    /// they were.
    pub async fn load(
        &self,
        api: &dyn StorefrontApi,
        user: &UserId,
        still_active: impl FnOnce(&UserId) -> bool,
    ) -> Result<Option<Vec<CartLineItem>>, ApiError> {
        let rows = api.fetch_cart(user).await?;

        if !still_active(user) {
            debug!(user = %user, "discarding cart fetched for an inactive user");

            return Ok(None);
        }

        Ok(Some(self.replace(user, rows)))
    }

    /// Replace the stored contents wholesale.
    ///
    /// Rows owned by another user or with a zero quantity are dropped.
    pub fn replace(&self, user: &UserId, rows: Vec<CartItem>) -> Vec<CartLineItem> {
        let items: Vec<CartLineItem> = rows
            .into_iter()
            .filter(|row| {
                if row.user_id != *user {
                    warn!(row = %row.id, owner = %row.user_id, user = %user, "dropping cart row owned by another user");
                    return false;
                }

                if row.quantity == 0 {
                    debug!(row = %row.id, "dropping zero-quantity cart row");
                    return false;
                }

                true
            })
            .map(CartLineItem::from)
            .collect();

        self.items.send_replace(items.clone());

        items
    }

    /// Forget the stored contents without contacting the service.
    pub fn clear(&self) {
        self.items.send_replace(Vec::new());
    }
}
