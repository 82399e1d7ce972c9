//! Menu Models

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Menu Item Id
pub type MenuItemId = TypedId<MenuItem>;

/// Menu Item Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Catalog id.
    pub id: MenuItemId,
    /// Display name.
    pub name: String,
    /// Unit price in whole currency units.
    pub price: u64,
    /// Longer description, empty when absent.
    #[serde(default)]
    pub description: String,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MenuItem {
    /// Build a catalog entry with only the fields the cart snapshots.
    pub fn new(id: impl Into<MenuItemId>, name: impl Into<String>, price: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: String::new(),
            image: None,
        }
    }
}
