//! # Shopper Sessions
//!
//! Everything one browser tab owns: the cart, the support chat, the loyalty
//! ledger, favorites and the signed-in account.
//!
//! ```text
//! SessionRegistry
//!   RwLock<HashMap<Uuid, Arc<ShopperSession>>>
//!        │
//!        ▼
//!   ShopperSession ──► cart: CartStore
//!                  ──► chat: ChatSession
//!                  ──► loyalty: Mutex<LoyaltyAccount>
//!                  ──► favorites: Mutex<BTreeSet<u32>>
//!                  ──► account: Mutex<Option<AuthSession>>
//!                  ──► checkout_in_flight: AtomicBool
//!                  ──► last_seen: Mutex<Instant>
//! ```
//!
//! ## Expiry
//! Every `get` touches `last_seen`. `evict_idle` drops sessions untouched
//! for longer than the idle TTL; the storefront runs it on a timer.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;
use vitrine_core::catalog;
use vitrine_core::loyalty::LoyaltyAccount;
use vitrine_core::{CoreError, CoreResult};

use crate::backend::AuthSession;
use crate::chat::ChatSession;
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::store::CartStore;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Shopper Session
// =============================================================================

#[derive(Debug)]
pub struct ShopperSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub cart: CartStore,
    pub chat: ChatSession,
    loyalty: Mutex<LoyaltyAccount>,
    favorites: Mutex<BTreeSet<u32>>,
    account: Mutex<Option<AuthSession>>,
    checkout_in_flight: AtomicBool,
    last_seen: Mutex<Instant>,
}

/// Held while an order is being submitted. Dropping it, on success, error
/// or cancellation, lets the next checkout start.
#[derive(Debug)]
pub struct CheckoutGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl ShopperSession {
    /// A session with an empty cart, the demo chat and the demo loyalty
    /// member.
    pub fn new(config: &SessionConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            cart: CartStore::new(config.broadcast_capacity),
            chat: ChatSession::sample(config.delays),
            loyalty: Mutex::new(LoyaltyAccount::sample(now)),
            favorites: Mutex::new(BTreeSet::new()),
            account: Mutex::new(None),
            checkout_in_flight: AtomicBool::new(false),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    /// Claims the session's single checkout slot.
    pub fn begin_checkout(&self) -> SessionResult<CheckoutGuard<'_>> {
        self.checkout_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::CheckoutInProgress)?;
        Ok(CheckoutGuard {
            flag: &self.checkout_in_flight,
        })
    }

    fn touch(&self) {
        *lock(&self.last_seen) = Instant::now();
    }

    /// Time since the session was last looked up.
    pub fn idle_for(&self) -> Duration {
        lock(&self.last_seen).elapsed()
    }

    /// Runs `f` against the loyalty ledger.
    pub fn with_loyalty<R>(&self, f: impl FnOnce(&mut LoyaltyAccount) -> R) -> R {
        f(&mut lock(&self.loyalty))
    }

    /// Adds or removes a catalog product from favorites. Returns whether
    /// it is a favorite afterwards.
    pub fn toggle_favorite(&self, product_id: u32) -> CoreResult<bool> {
        if catalog::product(product_id).is_none() {
            return Err(CoreError::ProductNotFound(product_id.to_string()));
        }

        let mut favorites = lock(&self.favorites);
        let now_favorite = if favorites.remove(&product_id) {
            false
        } else {
            favorites.insert(product_id);
            true
        };
        debug!(session = %self.id, product_id, now_favorite, "Favorite toggled");
        Ok(now_favorite)
    }

    pub fn favorites(&self) -> Vec<u32> {
        lock(&self.favorites).iter().copied().collect()
    }

    pub fn sign_in(&self, account: AuthSession) {
        info!(session = %self.id, user_id = %account.user_id, "Session signed in");
        *lock(&self.account) = Some(account);
    }

    pub fn sign_out(&self) -> Option<AuthSession> {
        lock(&self.account).take()
    }

    pub fn account(&self) -> Option<AuthSession> {
        lock(&self.account).clone()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// All live sessions, keyed by id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<ShopperSession>>>,
    config: SessionConfig,
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub async fn create(&self) -> Arc<ShopperSession> {
        let session = Arc::new(ShopperSession::new(&self.config));
        self.sessions.write().await.insert(session.id, session.clone());
        info!(session = %session.id, "Shopper session created");
        session
    }

    /// Looks a session up and marks it as active.
    pub async fn get(&self, id: Uuid) -> SessionResult<Arc<ShopperSession>> {
        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::SessionNotFound(id))?;
        session.touch();
        Ok(session)
    }

    /// Drops every session idle for longer than `ttl`. Returns how many
    /// were dropped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Idle shopper sessions evicted");
        }
        evicted
    }

    pub async fn remove(&self, id: Uuid) -> SessionResult<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!(session = %id, "Shopper session removed");
                Ok(())
            }
            None => Err(SessionError::SessionNotFound(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{CartCommand, CartItem, Money};

    #[tokio::test]
    async fn test_create_and_lookup() {
        let registry = SessionRegistry::default();
        let session = registry.create().await;

        let found = registry.get(session.id).await.unwrap();
        assert!(Arc::ptr_eq(&session, &found));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let registry = SessionRegistry::default();
        let id = Uuid::new_v4();
        assert!(matches!(
            registry.get(id).await,
            Err(SessionError::SessionNotFound(missing)) if missing == id
        ));
        assert!(registry.remove(id).await.is_err());
    }

    #[tokio::test]
    async fn test_sessions_have_separate_carts() {
        let registry = SessionRegistry::default();
        let a = registry.create().await;
        let b = registry.create().await;

        a.cart.dispatch(CartCommand::AddItem(CartItem::plain(
            "1",
            "Crystal Dragon Figurine",
            Money::from_cents(29_999),
            1,
        )));

        assert_eq!(a.cart.snapshot().item_count, 1);
        assert!(b.cart.snapshot().items.is_empty());
    }

    #[tokio::test]
    async fn test_remove_session() {
        let registry = SessionRegistry::default();
        let session = registry.create().await;
        registry.remove(session.id).await.unwrap();
        assert!(registry.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let registry = SessionRegistry::default();
        let ttl = Duration::from_secs(60);
        let idle = registry.create().await;
        let active = registry.create().await;

        tokio::time::advance(Duration::from_secs(45)).await;
        registry.get(active.id).await.unwrap();
        assert_eq!(registry.evict_idle(ttl).await, 0);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(registry.evict_idle(ttl).await, 1);

        assert!(matches!(
            registry.get(idle.id).await,
            Err(SessionError::SessionNotFound(_))
        ));
        assert!(registry.get(active.id).await.is_ok());
    }

    #[test]
    fn test_checkout_slot_is_exclusive() {
        let session = ShopperSession::new(&SessionConfig::default());

        let guard = session.begin_checkout().unwrap();
        assert!(matches!(
            session.begin_checkout(),
            Err(SessionError::CheckoutInProgress)
        ));

        drop(guard);
        assert!(session.begin_checkout().is_ok());
    }

    #[test]
    fn test_toggle_favorite() {
        let session = ShopperSession::new(&SessionConfig::default());
        assert!(session.toggle_favorite(3).unwrap());
        assert!(session.toggle_favorite(1).unwrap());
        assert_eq!(session.favorites(), vec![1, 3]);

        assert!(!session.toggle_favorite(3).unwrap());
        assert_eq!(session.favorites(), vec![1]);

        assert!(matches!(
            session.toggle_favorite(999),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_starts_with_demo_loyalty_member() {
        let session = ShopperSession::new(&SessionConfig::default());
        let points = session.with_loyalty(|account| account.current_points);
        assert_eq!(points, 1750);
        assert!(session.account().is_none());
    }
}
