//! Identity Config

use clap::Args;

use breakfast_app::{identity::IdentityProvider, ids::UserId};

/// Signed-in user settings.
#[derive(Debug, Args)]
pub(crate) struct IdentityConfig {
    /// Id of the signed-in user; omit to act signed out
    #[arg(long, env = "BREAKFAST_USER_ID")]
    pub user_id: Option<String>,
}

impl IdentityConfig {
    #[must_use]
    pub(crate) fn provider(&self) -> IdentityProvider {
        IdentityProvider::resolved(
            self.user_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(UserId::new),
        )
    }
}
