//! CLI errors.

use std::io;

use thiserror::Error;

use breakfast_app::{api::ApiError, context::AppInitError, domain::carts::CartError};

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("menu item {0} does not exist")]
    UnknownMenuItem(String),

    #[error("menu item {0} is already being added")]
    AlreadyAdding(String),

    #[error("sign-in required")]
    SignedOut,

    #[error("failed to write output")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Message shown to the person running the command.
    pub(crate) fn user_message(&self) -> String {
        match self {
            Self::Cart(source) => source.user_message(),
            Self::Api(source) => source.user_message(),
            Self::SignedOut => "請先登入".to_string(),
            Self::Init(_)
            | Self::UnknownMenuItem(_)
            | Self::AlreadyAdding(_)
            | Self::Io(_) => self.to_string(),
        }
    }
}
