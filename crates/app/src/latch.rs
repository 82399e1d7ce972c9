//! Per-item guard against double submission.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashSet;

use crate::domain::menu::MenuItemId;

/// Tracks which menu items have an add-to-cart in flight.
///
/// The guard is per item: different items can be added concurrently.
#[derive(Debug, Clone, Default)]
pub struct AddingLatch {
    busy: Arc<Mutex<FxHashSet<MenuItemId>>>,
}

impl AddingLatch {
    /// An empty latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `item`, or `None` if an add for it is already running.
    #[must_use]
    pub fn try_claim(&self, item: &MenuItemId) -> Option<AddingGuard> {
        self.lock().insert(item.clone()).then(|| AddingGuard {
            busy: self.busy.clone(),
            item: item.clone(),
        })
    }

    /// Whether an add for `item` is in flight.
    #[must_use]
    pub fn is_adding(&self, item: &MenuItemId) -> bool {
        self.lock().contains(item)
    }

    fn lock(&self) -> MutexGuard<'_, FxHashSet<MenuItemId>> {
        self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the claimed item when dropped.
#[derive(Debug)]
pub struct AddingGuard {
    busy: Arc<Mutex<FxHashSet<MenuItemId>>>,
    item: MenuItemId,
}

impl Drop for AddingGuard {
    fn drop(&mut self) {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.item);
    }
}
