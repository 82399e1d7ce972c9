//! Optimistic Cart Overlay
//!
//! The overlay is the cart as consumers see it: the confirmed items with every
//! in-flight optimistic action replayed on top. Each action leaves the log
//! when its mutation settles, rolls back or is dropped, so with nothing in
//! flight the overlay equals the confirmed state again.

use std::sync::{Mutex, MutexGuard, PoisonError};

use smallvec::SmallVec;
use tokio::sync::watch;

use crate::{domain::carts::models::CartLineItem, ids::UserId};

/// Transition applied to the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    /// Increment the line for the payload's menu item, or append the payload.
    AddItem(CartLineItem),

    /// Replace the overlay with a previously captured snapshot.
    Rollback(Vec<CartLineItem>),
}

/// Apply a single action to `state`.
#[must_use]
pub fn reduce(state: &[CartLineItem], action: &OverlayAction) -> Vec<CartLineItem> {
    match action {
        OverlayAction::AddItem(payload) => {
            if state
                .iter()
                .any(|line| line.menu_item_id == payload.menu_item_id)
            {
                state
                    .iter()
                    .map(|line| {
                        if line.menu_item_id == payload.menu_item_id {
                            CartLineItem {
                                quantity: line.quantity.saturating_add(1),
                                ..line.clone()
                            }
                        } else {
                            line.clone()
                        }
                    })
                    .collect()
            } else {
                let mut next = state.to_vec();

                next.push(CartLineItem {
                    quantity: 1,
                    ..payload.clone()
                });

                next
            }
        }
        OverlayAction::Rollback(snapshot) => snapshot.clone(),
    }
}

#[derive(Debug, Default)]
struct PendingLog {
    next_ticket: u64,
    base: Vec<CartLineItem>,
    actions: SmallVec<[(u64, OverlayAction); 2]>,
}

impl PendingLog {
    fn replay(&self) -> Vec<CartLineItem> {
        self.actions
            .iter()
            .fold(self.base.clone(), |state, (_, action)| reduce(&state, action))
    }

    fn finish(&mut self, ticket: u64) {
        self.actions.retain(|(pending, _)| *pending != ticket);
    }
}

/// Observable optimistic view over the confirmed cart.
#[derive(Debug)]
pub struct OptimisticCart {
    log: Mutex<PendingLog>,
    view: watch::Sender<Vec<CartLineItem>>,
}

impl Default for OptimisticCart {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimisticCart {
    /// An overlay with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: Mutex::new(PendingLog::default()),
            view: watch::Sender::new(Vec::new()),
        }
    }

    /// Current overlay items.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.view.borrow().clone()
    }

    /// Watch the overlay for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLineItem>> {
        self.view.subscribe()
    }

    /// Number of optimistic mutations still awaiting an outcome.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lock().actions.len()
    }

    /// Start an optimistic mutation by applying `action` on top of `base`.
    ///
    /// The returned guard finishes the mutation. Dropping it without calling
    /// [`PendingMutation::settle`] or [`PendingMutation::rollback`] abandons
    /// the action and the overlay falls back to the confirmed items.
    pub fn begin(&self, base: &[CartLineItem], action: OverlayAction) -> PendingMutation<'_> {
        let mut log = self.lock();

        let ticket = log.next_ticket;

        log.next_ticket = log.next_ticket.wrapping_add(1);
        log.base = base.to_vec();
        log.actions.push((ticket, action));

        self.publish(log.replay());

        PendingMutation {
            overlay: self,
            ticket,
            finished: false,
        }
    }

    /// Recompute after the confirmed state changed outside an optimistic mutation.
    pub fn rebase(&self, base: &[CartLineItem]) {
        let mut log = self.lock();

        log.base = base.to_vec();

        self.publish(log.replay());
    }

    /// Drop every pending action and show `base` as is.
    pub fn reset(&self, base: &[CartLineItem]) {
        let mut log = self.lock();

        log.actions.clear();
        log.base = base.to_vec();

        self.publish(log.replay());
    }

    /// Drop pending additions made on behalf of anyone but `user`.
    pub fn retain_user(&self, user: &UserId) {
        let mut log = self.lock();

        log.actions.retain(|(_, action)| match action {
            OverlayAction::AddItem(line) => line.user_id == *user,
            OverlayAction::Rollback(_) => true,
        });

        self.publish(log.replay());
    }

    fn settle(&self, ticket: u64, base: &[CartLineItem]) {
        let mut log = self.lock();

        log.finish(ticket);
        log.base = base.to_vec();

        self.publish(log.replay());
    }

    fn rollback(&self, ticket: u64, base: &[CartLineItem], snapshot: Vec<CartLineItem>) {
        let mut log = self.lock();

        let current = self.items();

        self.publish(reduce(&current, &OverlayAction::Rollback(snapshot)));

        log.finish(ticket);
        log.base = base.to_vec();

        self.publish(log.replay());
    }

    fn abandon(&self, ticket: u64) {
        let mut log = self.lock();

        log.finish(ticket);

        self.publish(log.replay());
    }

    fn publish(&self, items: Vec<CartLineItem>) {
        self.view.send_replace(items);
    }

    fn lock(&self) -> MutexGuard<'_, PendingLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Optimistic mutation awaiting its outcome.
#[derive(Debug)]
#[must_use = "dropping a pending mutation abandons it"]
pub struct PendingMutation<'a> {
    overlay: &'a OptimisticCart,
    ticket: u64,
    finished: bool,
}

impl PendingMutation<'_> {
    /// Finish successfully against the freshly confirmed `base`.
    pub fn settle(mut self, base: &[CartLineItem]) {
        self.finished = true;
        self.overlay.settle(self.ticket, base);
    }

    /// Finish unsuccessfully, restoring `snapshot` before converging on `base`.
    pub fn rollback(mut self, base: &[CartLineItem], snapshot: Vec<CartLineItem>) {
        self.finished = true;
        self.overlay.rollback(self.ticket, base, snapshot);
    }
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.overlay.abandon(self.ticket);
        }
    }
}
