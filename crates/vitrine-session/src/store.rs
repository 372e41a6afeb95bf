//! # Cart Store
//!
//! The single source of truth for one shopper's cart.
//!
//! ## Thread Safety
//! The cart lives behind a `Mutex` because:
//! 1. Several HTTP requests for the same session can arrive at once
//! 2. Commands must apply one at a time, in lock order
//! 3. Subscribers must see events in the order the commands applied
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  dispatch(cmd) ──► lock ──► CartState::apply(cmd) ──► snapshot          │
//! │                               │                          │              │
//! │                               │     broadcast::send ◄────┤ (under lock) │
//! │                               ▼            │             ▼              │
//! │                            unlock          │         returned           │
//! │                                            ▼                            │
//! │                     subscribe() receivers: drawer, badge, SSE stream    │
//! │                                                                         │
//! │  NOTE: A lagging receiver loses old events. Dispatch never waits.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use vitrine_core::{CartCommand, CartSnapshot, CartState};

/// Published after every dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    pub command: CartCommand,
    pub snapshot: CartSnapshot,
}

/// A cart plus its subscribers.
#[derive(Debug)]
pub struct CartStore {
    state: Mutex<CartState>,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    /// An empty, closed cart. `capacity` is the per-subscriber buffer.
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            state: Mutex::new(CartState::new()),
            events,
        }
    }

    /// A poisoned lock still holds a valid cart: neither `apply` nor the
    /// saturating totals in `CartSnapshot::from` can panic.
    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a command and notifies subscribers.
    pub fn dispatch(&self, command: CartCommand) -> CartSnapshot {
        let mut cart = self.lock();
        self.apply_locked(&mut cart, command)
    }

    /// Builds commands from the current cart and applies them under the
    /// same lock, so no other dispatch lands between planning and applying.
    pub fn dispatch_planned(
        &self,
        plan: impl FnOnce(&CartState) -> Vec<CartCommand>,
    ) -> CartSnapshot {
        let mut cart = self.lock();
        let commands = plan(&cart);
        let mut last = None;
        for command in commands {
            last = Some(self.apply_locked(&mut cart, command));
        }
        last.unwrap_or_else(|| CartSnapshot::from(&*cart))
    }

    fn apply_locked(&self, cart: &mut CartState, command: CartCommand) -> CartSnapshot {
        let name = command.name();
        cart.apply(command.clone());
        let snapshot = CartSnapshot::from(&*cart);

        debug!(
            command = name,
            lines = snapshot.items.len(),
            item_count = snapshot.item_count,
            total_cents = snapshot.total.cents(),
            "Cart command applied"
        );

        // Err only means nobody is subscribed right now.
        let _ = self.events.send(CartEvent {
            command,
            snapshot: snapshot.clone(),
        });

        snapshot
    }

    /// Applies several commands in order and returns the last snapshot.
    pub fn dispatch_all(&self, commands: impl IntoIterator<Item = CartCommand>) -> CartSnapshot {
        let mut last = None;
        for command in commands {
            last = Some(self.dispatch(command));
        }
        last.unwrap_or_else(|| self.snapshot())
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(&*self.lock())
    }

    /// Runs a read-only closure against the cart.
    pub fn read<R>(&self, f: impl FnOnce(&CartState) -> R) -> R {
        f(&self.lock())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BROADCAST_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};
    use vitrine_core::{CartItem, Money};

    fn orb() -> CartItem {
        CartItem::plain("9", "Cosmic Galaxy Orb", Money::from_cents(44_999), 1)
    }

    #[test]
    fn test_dispatch_returns_snapshot() {
        let store = CartStore::default();
        let snapshot = store.dispatch(CartCommand::AddItem(orb()));

        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot.total.cents(), 44_999);
        assert_eq!(store.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn test_one_event_per_dispatch() {
        let store = CartStore::default();
        let mut rx = store.subscribe();

        store.dispatch(CartCommand::AddItem(orb()));
        store.dispatch(CartCommand::OpenCart);
        store.dispatch(CartCommand::UpdateQuantity {
            id: "9".to_string(),
            quantity: 0,
            selection: None,
        });

        let first = rx.recv().await.unwrap();
        assert_eq!(first.command.name(), "ADD_ITEM");
        assert_eq!(first.snapshot.item_count, 1);

        let second = rx.recv().await.unwrap();
        assert!(second.snapshot.is_open);

        // No-op commands are still announced.
        let third = rx.recv().await.unwrap();
        assert_eq!(third.command.name(), "UPDATE_QUANTITY");
        assert_eq!(third.snapshot.item_count, 1);

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_every_event() {
        let store = CartStore::default();
        let mut drawer = store.subscribe();
        let mut badge = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        store.dispatch(CartCommand::ToggleCart);

        assert!(drawer.recv().await.unwrap().snapshot.is_open);
        assert!(badge.recv().await.unwrap().snapshot.is_open);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_does_not_block() {
        let store = CartStore::new(2);
        let mut slow = store.subscribe();

        for _ in 0..5 {
            store.dispatch(CartCommand::ToggleCart);
        }

        assert!(matches!(slow.recv().await, Err(RecvError::Lagged(3))));
        // The newest events are still there after the lag report.
        assert!(slow.recv().await.is_ok());
    }

    #[test]
    fn test_dispatch_without_subscribers() {
        let store = CartStore::default();
        store.dispatch(CartCommand::OpenCart);
        assert!(store.read(|cart| cart.is_open()));
    }

    #[test]
    fn test_dispatch_all_applies_in_order() {
        let store = CartStore::default();
        let snapshot = store.dispatch_all([
            CartCommand::AddItem(orb()),
            CartCommand::AddItem(orb()),
            CartCommand::OpenCart,
        ]);
        assert_eq!(snapshot.item_count, 2);
        assert!(snapshot.is_open);
    }

    #[test]
    fn test_dispatch_planned_sees_current_cart() {
        let store = CartStore::default();
        store.dispatch(CartCommand::AddItem(orb()));
        let mut rx = store.subscribe();

        let snapshot = store.dispatch_planned(|cart| {
            cart.items()
                .iter()
                .map(|line| CartCommand::RemoveItem {
                    id: line.id.clone(),
                    selection: Some(line.selection.clone()),
                })
                .collect()
        });

        assert!(snapshot.items.is_empty());
        assert_eq!(rx.try_recv().unwrap().command.name(), "REMOVE_ITEM");

        // An empty plan changes nothing and announces nothing.
        let snapshot = store.dispatch_planned(|_| Vec::new());
        assert!(snapshot.items.is_empty());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_oversized_line_does_not_poison_snapshots() {
        let store = CartStore::default();
        let huge = CartItem::plain("x", "X", Money::from_cents(i64::MAX / 2 + 1), 2);

        let snapshot = store.dispatch(CartCommand::AddItem(huge));
        assert_eq!(snapshot.total.cents(), i64::MAX);
        assert_eq!(store.snapshot().total.cents(), i64::MAX);
    }

    #[test]
    fn test_concurrent_dispatches_all_apply() {
        let store = std::sync::Arc::new(CartStore::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        store.dispatch(CartCommand::AddItem(orb()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.item_count, 80);
    }
}
