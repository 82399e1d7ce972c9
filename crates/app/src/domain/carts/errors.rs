//! Cart controller errors.

use thiserror::Error;

use crate::api::ApiError;

/// Cart operation error variants.
#[derive(Debug, Error)]
pub enum CartError {
    /// The operation needs a signed-in user.
    #[error("sign-in required")]
    AuthRequired,

    /// Checkout was attempted without a user or without confirmed items.
    #[error("cart is empty or no user is signed in")]
    EmptyCart,

    /// The initial cart load failed.
    #[error("failed to load cart")]
    Fetch(#[source] ApiError),

    /// A request to the storefront service failed.
    #[error("storefront request failed")]
    Remote(#[source] ApiError),
}

impl From<ApiError> for CartError {
    fn from(error: ApiError) -> Self {
        Self::Remote(error)
    }
}

impl CartError {
    /// Message suitable for showing to a customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => "請先登入".to_string(),
            Self::EmptyCart => "購物車是空的或使用者未登入".to_string(),
            Self::Fetch(source) | Self::Remote(source) => source.user_message(),
        }
    }
}
