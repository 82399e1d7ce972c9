//! Current user observable.
//!
//! Authentication itself happens elsewhere; this module only carries its
//! outcome to the cart core.

use std::sync::Arc;

use tokio::sync::watch;

use crate::ids::UserId;

/// Authentication state as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CurrentUser {
    /// The provider has not resolved a session yet.
    #[default]
    Loading,

    /// A user is signed in.
    Authenticated(UserId),

    /// Nobody is signed in.
    Unauthenticated,
}

impl CurrentUser {
    /// The signed-in user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Loading | Self::Unauthenticated => None,
        }
    }

    /// Whether the provider has resolved a session.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

impl From<Option<UserId>> for CurrentUser {
    fn from(user: Option<UserId>) -> Self {
        user.map_or(Self::Unauthenticated, Self::Authenticated)
    }
}

/// Publishes [`CurrentUser`] transitions to subscribers.
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    state: Arc<watch::Sender<CurrentUser>>,
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider {
    /// A provider that is still resolving its session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(CurrentUser::Loading)),
        }
    }

    /// A provider that already knows who is signed in.
    #[must_use]
    pub fn resolved(user: Option<UserId>) -> Self {
        Self {
            state: Arc::new(watch::Sender::new(user.into())),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> CurrentUser {
        self.state.borrow().clone()
    }

    /// Watch for identity transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CurrentUser> {
        self.state.subscribe()
    }

    /// Record `user` as signed in.
    pub fn sign_in(&self, user: UserId) {
        self.set(CurrentUser::Authenticated(user));
    }

    /// Record that nobody is signed in.
    pub fn sign_out(&self) {
        self.set(CurrentUser::Unauthenticated);
    }

    /// Publish `next`, waking subscribers only if it differs from the current state.
    pub fn set(&self, next: CurrentUser) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
