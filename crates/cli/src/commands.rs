//! Storefront subcommands.

use std::io;

use clap::{Args, Subcommand};
use rusty_money::iso::Currency;
use tracing::info;

use breakfast_app::{context::AppContext, domain::carts::models::CartItemId};

use crate::{errors::CliError, render};

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the breakfast menu.
    Menu,

    /// Inspect or change the signed-in user's cart.
    Cart(CartCommand),

    /// Place an order for everything in the cart.
    Checkout,

    /// List the signed-in user's past orders, newest first.
    Orders,
}

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CartSubcommand {
    /// Show cart lines and totals.
    Show,

    /// Add one unit of a menu item.
    Add {
        /// Menu item id
        menu_item_id: String,
    },

    /// Set the quantity of a cart row; zero or less removes it.
    Update {
        /// Cart row id
        item_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a cart row.
    Remove {
        /// Cart row id
        item_id: String,
    },

    /// Remove every row from the cart.
    Clear,
}

impl Command {
    /// Whether the command works on the signed-in user's cart.
    pub(crate) fn uses_cart(&self) -> bool {
        matches!(self, Self::Cart(_) | Self::Checkout)
    }

    pub(crate) async fn run(
        self,
        app: &AppContext,
        currency: &Currency,
        mut out: impl io::Write,
    ) -> Result<(), CliError> {
        match self {
            Self::Menu => {
                let menu = app.api.fetch_menu().await?;

                render::write_menu(&mut out, &menu, currency)?;
            }
            Self::Cart(command) => command.command.run(app, currency, &mut out).await?,
            Self::Checkout => {
                let checkout = app.cart.checkout().await?;

                render::write_order_placed(&mut out, &checkout.order, currency)?;

                if let Some(report) = checkout.cleared {
                    render::write_clear_report(&mut out, &report)?;
                }
            }
            Self::Orders => {
                let user = app.cart.user().ok_or(CliError::SignedOut)?;
                let orders = app.orders.list(&user).await?;

                render::write_orders(&mut out, &orders, currency)?;
            }
        }

        Ok(())
    }
}

impl CartSubcommand {
    async fn run(
        self,
        app: &AppContext,
        currency: &Currency,
        mut out: impl io::Write,
    ) -> Result<(), CliError> {
        match self {
            Self::Show => {}
            Self::Add { menu_item_id } => {
                let menu = app.api.fetch_menu().await?;

                let item = menu
                    .iter()
                    .find(|item| item.id.as_str() == menu_item_id)
                    .ok_or_else(|| CliError::UnknownMenuItem(menu_item_id.clone()))?;

                let _guard = app
                    .adding
                    .try_claim(&item.id)
                    .ok_or(CliError::AlreadyAdding(menu_item_id))?;

                app.cart.add_to_cart(item).await?;

                info!(menu_item = %item.id, "added to cart");
            }
            Self::Update { item_id, quantity } => {
                app.cart
                    .update_quantity(&CartItemId::new(item_id), quantity)
                    .await?;
            }
            Self::Remove { item_id } => {
                app.cart.remove_from_cart(&CartItemId::new(item_id)).await?;
            }
            Self::Clear => {
                let report = app.cart.clear_cart().await?;

                render::write_clear_report(&mut out, &report)?;
            }
        }

        render::write_cart(
            &mut out,
            &app.cart.items(),
            app.cart.cart_count(),
            app.cart.total_amount(),
            currency,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use testresult::TestResult;

    use breakfast_app::{
        api::MockStorefrontApi,
        domain::{carts::CartControllerOptions, menu::MenuItem},
        identity::IdentityProvider,
        ids::UserId,
    };
    use rusty_money::iso;

    use super::*;

    fn app(api: MockStorefrontApi, user: Option<&str>) -> AppContext {
        AppContext::new(
            Arc::new(api),
            IdentityProvider::resolved(user.map(UserId::new)),
            CartControllerOptions::default(),
        )
    }

    #[tokio::test]
    async fn adding_an_unknown_menu_item_is_rejected() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_fetch_menu()
            .once()
            .returning(|| Ok(vec![MenuItem::new("7", "Toast", 50)]));

        let command = Command::Cart(CartCommand {
            command: CartSubcommand::Add {
                menu_item_id: "99".to_string(),
            },
        });

        let result = command.run(&app(api, Some("u1")), iso::USD, Vec::new()).await;

        assert!(
            matches!(result, Err(CliError::UnknownMenuItem(ref id)) if id == "99"),
            "expected UnknownMenuItem, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn only_cart_commands_load_the_cart() {
        assert!(Command::Checkout.uses_cart());
        assert!(
            Command::Cart(CartCommand {
                command: CartSubcommand::Show
            })
            .uses_cart()
        );
        assert!(!Command::Menu.uses_cart());
        assert!(!Command::Orders.uses_cart());
    }

    #[tokio::test]
    async fn menu_does_not_touch_the_cart() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_fetch_cart().never();
        api.expect_fetch_menu()
            .once()
            .returning(|| Ok(vec![MenuItem::new("7", "Toast", 50)]));

        let mut out = Vec::new();

        Command::Menu
            .run(&app(api, Some("u1")), iso::USD, &mut out)
            .await?;

        assert!(String::from_utf8(out)?.contains("Toast"));

        Ok(())
    }

    #[tokio::test]
    async fn orders_require_a_signed_in_user() {
        let command = Command::Orders;

        let result = command
            .run(&app(MockStorefrontApi::new(), None), iso::USD, Vec::new())
            .await;

        assert!(
            matches!(result, Err(CliError::SignedOut)),
            "expected SignedOut, got {result:?}"
        );
    }

    #[tokio::test]
    async fn orders_are_listed_for_the_current_user() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_fetch_orders()
            .with(eq(UserId::new("u1")))
            .once()
            .returning(|_| Ok(Vec::new()));

        let mut out = Vec::new();

        Command::Orders
            .run(&app(api, Some("u1")), iso::USD, &mut out)
            .await?;

        assert_eq!(String::from_utf8(out)?, "no orders yet\n");

        Ok(())
    }
}
