//! Cart controller.
//!
//! Owns the confirmed [`CartStore`] and the [`OptimisticCart`] overlay and is
//! the only place either of them is mutated. Only [`CartController::add_to_cart`]
//! is optimistic; quantity changes and removals wait for the service before the
//! view changes.

use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{Span, debug, error, info, warn};

use crate::{
    api::{ApiError, StorefrontApi},
    domain::{
        carts::{
            aggregates,
            errors::CartError,
            models::{CartItemId, CartItemUpdate, CartLineItem, NewCartItem},
            overlay::{OptimisticCart, OverlayAction},
            store::CartStore,
        },
        menu::MenuItem,
        orders::models::{NewOrder, Order, OrderLine, OrderStatus},
    },
    identity::{CurrentUser, IdentityProvider},
    ids::UserId,
};

/// Controller behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartControllerOptions {
    /// Run add/update/remove/clear/checkout one at a time instead of letting
    /// concurrent calls interleave.
    pub serialize_mutations: bool,
}

/// Outcome of deleting every row in the cart.
#[derive(Debug, Default)]
pub struct ClearReport {
    /// Rows the service deleted.
    pub removed: Vec<CartItemId>,
    /// Rows the service refused to delete, with the reason.
    pub failed: Vec<(CartItemId, ApiError)>,
}

impl ClearReport {
    /// Whether every row was deleted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a successful checkout.
#[derive(Debug)]
pub struct Checkout {
    /// The order as recorded by the service.
    pub order: Order,

    /// How clearing the ordered cart went; `None` when the cart could not be
    /// read back after ordering.
    pub cleared: Option<ClearReport>,
}

/// Operation surface for the current user's cart.
pub struct CartController {
    api: Arc<dyn StorefrontApi>,
    identity: watch::Receiver<CurrentUser>,
    store: CartStore,
    overlay: OptimisticCart,
    loading: watch::Sender<bool>,
    last_error: watch::Sender<Option<String>>,
    mutations: Option<Mutex<()>>,
}

impl std::fmt::Debug for CartController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartController")
            .field("store", &self.store)
            .field("overlay", &self.overlay)
            .field("serialize_mutations", &self.mutations.is_some())
            .finish_non_exhaustive()
    }
}

impl CartController {
    /// Controller with default options.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, identity: &IdentityProvider) -> Self {
        Self::with_options(api, identity, CartControllerOptions::default())
    }

    /// Controller following `identity`, configured by `options`.
    #[must_use]
    pub fn with_options(
        api: Arc<dyn StorefrontApi>,
        identity: &IdentityProvider,
        options: CartControllerOptions,
    ) -> Self {
        Self {
            api,
            identity: identity.subscribe(),
            store: CartStore::new(),
            overlay: OptimisticCart::new(),
            loading: watch::Sender::new(true),
            last_error: watch::Sender::new(None),
            mutations: options.serialize_mutations.then(|| Mutex::new(())),
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<UserId> {
        self.identity.borrow().user_id().cloned()
    }

    /// Cart lines as consumers should display them, optimistic changes included.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.overlay.items()
    }

    /// Watch the displayed cart lines.
    #[must_use]
    pub fn subscribe_items(&self) -> watch::Receiver<Vec<CartLineItem>> {
        self.overlay.subscribe()
    }

    /// Cart lines as last confirmed by the service.
    #[must_use]
    pub fn confirmed_items(&self) -> Vec<CartLineItem> {
        self.store.items()
    }

    /// Watch the confirmed cart lines.
    #[must_use]
    pub fn subscribe_confirmed(&self) -> watch::Receiver<Vec<CartLineItem>> {
        self.store.subscribe()
    }

    /// Units in the displayed cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        aggregates::cart_count(&self.overlay.items())
    }

    /// Value of the displayed cart.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        aggregates::total_amount(&self.overlay.items())
    }

    /// Whether the initial cart load is still running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Watch the loading flag.
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Message of the most recent surfaced failure.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    /// Watch the most recent failure message.
    #[must_use]
    pub fn subscribe_errors(&self) -> watch::Receiver<Option<String>> {
        self.last_error.subscribe()
    }

    /// Load `user`'s cart, replacing whatever is held.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Fetch`] when the cart cannot be fetched; the held
    /// contents are left untouched.
    #[tracing::instrument(name = "carts.controller.load", skip(self), fields(user = %user), err)]
    pub async fn load(&self, user: &UserId) -> Result<(), CartError> {
        self.loading.send_replace(true);

        let result = self.reload(user).await;

        self.loading.send_replace(false);

        match result {
            Ok(Some(items)) => {
                self.overlay.rebase(&items);

                debug!(lines = items.len(), "cart loaded");

                Ok(())
            }
            Ok(None) => Ok(()),
            Err(source) => {
                let error = CartError::Fetch(source);

                self.record(&error);

                Err(error)
            }
        }
    }

    /// Drop held cart state without contacting the service.
    pub fn clear_local(&self) {
        self.store.clear();
        self.overlay.reset(&[]);
        self.loading.send_replace(false);
    }

    /// React to an identity transition.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Fetch`] when a newly signed-in user's cart cannot
    /// be loaded.
    pub async fn apply_identity(&self, current: &CurrentUser) -> Result<(), CartError> {
        match current {
            CurrentUser::Loading => Ok(()),
            CurrentUser::Unauthenticated => {
                self.clear_local();

                Ok(())
            }
            CurrentUser::Authenticated(user) => {
                self.overlay.retain_user(user);

                self.load(user).await
            }
        }
    }

    /// Reload the confirmed cart, logging rather than returning failures.
    pub async fn refresh_cart(&self) {
        let Some(user) = self.user() else {
            return;
        };

        match self.reload(&user).await {
            Ok(Some(items)) => self.overlay.rebase(&items),
            Ok(None) => {}
            Err(source) => warn!(user = %user, "failed to refresh cart: {source}"),
        }
    }

    /// Add one unit of `menu_item`, showing it immediately and rolling back if
    /// the service does not accept it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AuthRequired`] without a signed-in user, or
    /// [`CartError::Remote`] when any request in the chain fails.
    #[tracing::instrument(
        name = "carts.controller.add_to_cart",
        skip(self, menu_item),
        fields(menu_item = %menu_item.id, user = tracing::field::Empty),
        err
    )]
    pub async fn add_to_cart(&self, menu_item: &MenuItem) -> Result<(), CartError> {
        let Some(user) = self.user() else {
            return Err(CartError::AuthRequired);
        };

        Span::current().record("user", tracing::field::display(&user));

        let _queue = self.queue().await;

        let snapshot = self.store.items();

        let pending = self.overlay.begin(
            &snapshot,
            OverlayAction::AddItem(CartLineItem::provisional(&user, menu_item)),
        );

        match self.persist_add(&user, menu_item).await {
            Ok(confirmed) => {
                pending.settle(&confirmed);

                info!(menu_item = %menu_item.id, "added to cart");

                Ok(())
            }
            Err(source) => {
                pending.rollback(&self.store.items(), snapshot);

                let error = CartError::Remote(source);

                self.record(&error);

                Err(error)
            }
        }
    }

    async fn persist_add(
        &self,
        user: &UserId,
        menu_item: &MenuItem,
    ) -> Result<Vec<CartLineItem>, ApiError> {
        match self
            .api
            .find_cart_item_by_menu_id(&menu_item.id, user)
            .await?
        {
            Some(existing) => {
                let update = CartItemUpdate {
                    quantity: existing.quantity.saturating_add(1),
                };

                self.api.update_cart_item(&existing.id, update).await?;
            }
            None => {
                self.api
                    .add_cart_item(NewCartItem::single(user, menu_item))
                    .await?;
            }
        }

        Ok(self
            .reload(user)
            .await?
            .unwrap_or_else(|| self.store.items()))
    }

    /// Fetch `user`'s cart into the store, unless `user` has stopped being
    /// the active user by the time the service answers.
    async fn reload(&self, user: &UserId) -> Result<Option<Vec<CartLineItem>>, ApiError> {
        self.store
            .load(self.api.as_ref(), user, |fetched| {
                self.identity.borrow().user_id() == Some(fetched)
            })
            .await
    }

    /// Set the quantity of a cart row. Quantities below one remove the row.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AuthRequired`] without a signed-in user, or
    /// [`CartError::Remote`] when the service rejects the change.
    #[tracing::instrument(name = "carts.controller.update_quantity", skip(self), fields(item = %item), err)]
    pub async fn update_quantity(&self, item: &CartItemId, quantity: i64) -> Result<(), CartError> {
        let Some(user) = self.user() else {
            return Err(CartError::AuthRequired);
        };

        let _queue = self.queue().await;

        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        if quantity == 0 {
            return self.remove(&user, item).await;
        }

        if let Err(source) = self
            .api
            .update_cart_item(item, CartItemUpdate { quantity })
            .await
        {
            return Err(self.surface(source));
        }

        self.refresh_cart().await;

        Ok(())
    }

    /// Delete a cart row.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AuthRequired`] without a signed-in user, or
    /// [`CartError::Remote`] when the service rejects the deletion.
    #[tracing::instrument(name = "carts.controller.remove_from_cart", skip(self), fields(item = %item), err)]
    pub async fn remove_from_cart(&self, item: &CartItemId) -> Result<(), CartError> {
        let Some(user) = self.user() else {
            return Err(CartError::AuthRequired);
        };

        let _queue = self.queue().await;

        self.remove(&user, item).await
    }

    async fn remove(&self, user: &UserId, item: &CartItemId) -> Result<(), CartError> {
        if let Err(source) = self.api.remove_cart_item(item).await {
            return Err(self.surface(source));
        }

        debug!(user = %user, item = %item, "removed cart row");

        self.refresh_cart().await;

        Ok(())
    }

    /// Delete every row in the signed-in user's cart.
    ///
    /// Rows are deleted one at a time; a failed deletion is reported and the
    /// remaining rows are still attempted. Without a signed-in user nothing
    /// happens.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Remote`] when the cart cannot be read.
    #[tracing::instrument(name = "carts.controller.clear_cart", skip(self), err)]
    pub async fn clear_cart(&self) -> Result<ClearReport, CartError> {
        let Some(user) = self.user() else {
            return Ok(ClearReport::default());
        };

        let _queue = self.queue().await;

        self.clear(&user).await
    }

    async fn clear(&self, user: &UserId) -> Result<ClearReport, CartError> {
        let rows = match self.api.fetch_cart(user).await {
            Ok(rows) => rows,
            Err(source) => return Err(self.surface(source)),
        };

        let mut report = ClearReport::default();

        for row in rows {
            match self.api.remove_cart_item(&row.id).await {
                Ok(()) => report.removed.push(row.id),
                Err(source) => {
                    warn!(item = %row.id, "failed to remove cart row: {source}");

                    report.failed.push((row.id, source));
                }
            }
        }

        self.refresh_cart().await;

        if !report.is_complete() {
            self.last_error.send_replace(Some(format!(
                "{} of {} cart rows could not be removed",
                report.failed.len(),
                report.failed.len() + report.removed.len()
            )));
        }

        Ok(report)
    }

    /// Place an order for the confirmed cart and then empty it.
    ///
    /// Optimistic lines are never ordered; the order total is computed from
    /// the confirmed lines only.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] without a signed-in user or confirmed
    /// items, or [`CartError::Remote`] when the order is rejected.
    #[tracing::instrument(
        name = "carts.controller.checkout",
        skip(self),
        fields(order = tracing::field::Empty, total_amount = tracing::field::Empty),
        err
    )]
    pub async fn checkout(&self) -> Result<Checkout, CartError> {
        let Some(user) = self.user() else {
            return Err(CartError::EmptyCart);
        };

        let _queue = self.queue().await;

        let confirmed = self.store.items();

        if confirmed.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let total_amount = aggregates::total_amount(&confirmed);

        let order = NewOrder {
            user_id: user.clone(),
            items: confirmed.iter().map(OrderLine::from).collect(),
            total_amount,
            status: OrderStatus::Pending,
            created_at: Timestamp::now(),
        };

        let order = match self.api.create_order(order).await {
            Ok(order) => order,
            Err(source) => {
                error!("checkout failed: {source}");

                return Err(self.surface(source));
            }
        };

        let span = Span::current();

        span.record("order", tracing::field::display(&order.id));
        span.record("total_amount", total_amount);

        info!(order = %order.id, total_amount, "order placed");

        let cleared = match self.clear(&user).await {
            Ok(report) => Some(report),
            Err(clear_error) => {
                warn!(order = %order.id, "order placed but cart was not cleared: {clear_error}");

                None
            }
        };

        Ok(Checkout { order, cleared })
    }

    async fn queue(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.mutations {
            Some(mutations) => Some(mutations.lock().await),
            None => None,
        }
    }

    fn surface(&self, source: ApiError) -> CartError {
        let error = CartError::Remote(source);

        self.record(&error);

        error
    }

    fn record(&self, error: &CartError) {
        self.last_error.send_replace(Some(error.user_message()));
    }
}
