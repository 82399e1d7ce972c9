//! Keeps the cart in step with the signed-in user.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{domain::carts::controller::CartController, identity::CurrentUser};

/// Reset or reload `cart` on every identity transition, starting with the
/// current state, until the identity provider goes away.
pub async fn follow_identity(cart: Arc<CartController>, mut identity: watch::Receiver<CurrentUser>) {
    loop {
        let current = identity.borrow_and_update().clone();

        debug!(?current, "identity changed");

        if let Err(source) = cart.apply_identity(&current).await {
            warn!("failed to sync cart with identity: {source}");
        }

        if identity.changed().await.is_err() {
            break;
        }
    }
}

/// Run [`follow_identity`] on the current runtime.
#[must_use]
pub fn spawn_identity_sync(
    cart: Arc<CartController>,
    identity: watch::Receiver<CurrentUser>,
) -> JoinHandle<()> {
    tokio::spawn(follow_identity(cart, identity))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use crate::{
        api::MockStorefrontApi,
        domain::{
            carts::models::{CartItem, CartItemId},
            menu::MenuItemId,
        },
        identity::IdentityProvider,
        ids::UserId,
    };

    use super::*;

    fn row(user: &str) -> CartItem {
        CartItem {
            id: CartItemId::new(format!("{user}-row")),
            user_id: UserId::new(user),
            menu_item_id: MenuItemId::new("7"),
            name: "Toast".to_string(),
            price: 50,
            quantity: 1,
        }
    }

    async fn wait_for(
        rx: &mut watch::Receiver<Vec<crate::domain::carts::models::CartLineItem>>,
        predicate: impl Fn(&[crate::domain::carts::models::CartLineItem]) -> bool,
    ) -> TestResult {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|items| predicate(items)))
            .await??;

        Ok(())
    }

    #[tokio::test]
    async fn cart_follows_sign_in_switch_and_sign_out() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_fetch_cart()
            .times(2)
            .returning(|user| Ok(vec![row(user.as_str())]));

        let identity = IdentityProvider::new();
        let cart = Arc::new(CartController::new(Arc::new(api), &identity));
        let mut items = cart.subscribe_confirmed();

        let task = spawn_identity_sync(cart.clone(), identity.subscribe());

        assert!(cart.is_loading());

        identity.sign_in(UserId::new("u1"));
        wait_for(&mut items, |items| {
            items.first().is_some_and(|line| line.user_id.as_str() == "u1")
        })
        .await?;

        identity.sign_in(UserId::new("u2"));
        wait_for(&mut items, |items| {
            items.first().is_some_and(|line| line.user_id.as_str() == "u2")
        })
        .await?;

        identity.sign_out();
        wait_for(&mut items, <[_]>::is_empty).await?;

        drop(identity);

        tokio::time::timeout(Duration::from_secs(5), task).await??;

        assert!(!cart.is_loading());

        Ok(())
    }
}
