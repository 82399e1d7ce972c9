//! Cart Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::{
    domain::menu::{MenuItem, MenuItemId},
    ids::{TypedId, UserId},
};

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// Cart row as persisted by the storefront service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Row id assigned by the service.
    pub id: CartItemId,
    /// Owner of the row.
    pub user_id: UserId,
    /// Catalog item the row is for.
    pub menu_item_id: MenuItemId,
    /// Item name captured when added.
    pub name: String,
    /// Unit price captured when added.
    pub price: u64,
    /// Units in the cart.
    pub quantity: u32,
}

/// New Cart Item Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    /// Owner of the row.
    pub user_id: UserId,
    /// Catalog item the row is for.
    pub menu_item_id: MenuItemId,
    /// Item name from the catalog.
    pub name: String,
    /// Unit price from the catalog.
    pub price: u64,
    /// Units to add.
    pub quantity: u32,
}

impl NewCartItem {
    /// A single unit of `menu_item` for `user`.
    #[must_use]
    pub fn single(user: &UserId, menu_item: &MenuItem) -> Self {
        Self {
            user_id: user.clone(),
            menu_item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            price: menu_item.price,
            quantity: 1,
        }
    }
}

/// Cart Item Update Model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartItemUpdate {
    /// New quantity, at least one.
    pub quantity: u32,
}

/// Identity of a line in the cart view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LineItemId {
    /// Row confirmed by the service.
    Confirmed(CartItemId),

    /// Optimistic row awaiting confirmation, keyed by its menu item.
    Provisional(MenuItemId),
}

impl LineItemId {
    /// The service id, if this line has been persisted.
    #[must_use]
    pub fn confirmed(&self) -> Option<&CartItemId> {
        match self {
            Self::Confirmed(id) => Some(id),
            Self::Provisional(_) => None,
        }
    }
}

impl Display for LineItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Confirmed(id) => Display::fmt(id, f),
            Self::Provisional(menu_item) => write!(f, "optimistic-{menu_item}"),
        }
    }
}

/// Line in the cart as shown to consumers.
///
/// `name` and `price` are the catalog values captured when the item was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineItem {
    /// Service id, or a provisional id until confirmed.
    pub id: LineItemId,
    /// Owner of the line.
    pub user_id: UserId,
    /// Catalog item the line is for.
    pub menu_item_id: MenuItemId,
    /// Item name captured when added.
    pub name: String,
    /// Unit price captured when added.
    pub price: u64,
    /// Units in the cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// Optimistic single-unit line for `menu_item`.
    #[must_use]
    pub fn provisional(user: &UserId, menu_item: &MenuItem) -> Self {
        Self {
            id: LineItemId::Provisional(menu_item.id.clone()),
            user_id: user.clone(),
            menu_item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            price: menu_item.price,
            quantity: 1,
        }
    }

    /// Whether the line still awaits confirmation.
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        matches!(self.id, LineItemId::Provisional(_))
    }

    /// `price × quantity`
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

impl From<CartItem> for CartLineItem {
    fn from(item: CartItem) -> Self {
        Self {
            id: LineItemId::Confirmed(item.id),
            user_id: item.user_id,
            menu_item_id: item.menu_item_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn provisional_ids_are_prefixed() {
        let line = CartLineItem::provisional(&UserId::new("u1"), &MenuItem::new("7", "Toast", 50));

        assert!(line.is_provisional());
        assert_eq!(line.id.to_string(), "optimistic-7");
        assert_eq!(line.id.confirmed(), None);
    }

    #[test]
    fn cart_rows_use_camel_case_fields() -> TestResult {
        let item: CartItem = serde_json::from_str(
            r#"{"id": "a1f3", "userId": "u1", "menuItemId": 7, "name": "Toast", "price": 50, "quantity": 2}"#,
        )?;

        let line = CartLineItem::from(item);

        assert_eq!(line.id, LineItemId::Confirmed(CartItemId::new("a1f3")));
        assert_eq!(line.menu_item_id, MenuItemId::new("7"));
        assert_eq!(line.line_total(), 100);

        Ok(())
    }

    #[test]
    fn new_cart_items_serialize_without_an_id() -> TestResult {
        let item = NewCartItem::single(&UserId::new("u1"), &MenuItem::new("7", "Toast", 50));

        let json = serde_json::to_value(&item)?;

        assert_eq!(
            json,
            serde_json::json!({
                "userId": "u1",
                "menuItemId": "7",
                "name": "Toast",
                "price": 50,
                "quantity": 1,
            })
        );

        Ok(())
    }

    #[test]
    fn numeric_catalog_ids_are_written_as_numbers() -> TestResult {
        let menu_item: MenuItem =
            serde_json::from_str(r#"{"id": 7, "name": "Toast", "price": 50}"#)?;

        let item = NewCartItem::single(&UserId::new("u1"), &menu_item);

        assert_eq!(
            serde_json::to_value(&item)?.get("menuItemId"),
            Some(&serde_json::json!(7))
        );

        Ok(())
    }
}
