//! # Application State
//!
//! One `AppState` is shared by every handler. It is cheap to clone: the
//! contents live behind an `Arc`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState (Clone)                                                       │
//! │    └── Arc<Inner>                                                       │
//! │          ├── config     StorefrontConfig (read-only after startup)      │
//! │          ├── sessions   SessionRegistry  (carts, chat, loyalty)         │
//! │          ├── backend    Arc<dyn Backend> (simulated login/orders/AR)    │
//! │          ├── reviews    Mutex<ReviewBoard> (shared by all shoppers)     │
//! │          └── started_at Instant (for the dev metrics route)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `spawn_session_sweeper` runs for the life of the server and drops
//! sessions idle longer than `session_ttl_secs`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use vitrine_core::checkout::CheckoutPolicy;
use vitrine_core::reviews::ReviewBoard;
use vitrine_session::{Backend, SessionRegistry, SimulatedBackend};

use crate::config::StorefrontConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: StorefrontConfig,
    sessions: SessionRegistry,
    backend: Arc<dyn Backend>,
    reviews: Mutex<ReviewBoard>,
    started_at: Instant,
}

impl AppState {
    /// State backed by the simulated backend with the configured delays.
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = Arc::new(SimulatedBackend::new(config.delays.to_delays()));
        Self::with_backend(config, backend)
    }

    pub fn with_backend(config: StorefrontConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: SessionRegistry::new(config.session_config()),
                config,
                backend,
                reviews: Mutex::new(ReviewBoard::new()),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }

    pub fn backend(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        self.inner.sessions.config().checkout
    }

    pub fn reviews(&self) -> MutexGuard<'_, ReviewBoard> {
        self.inner
            .reviews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }

    /// Evicts idle sessions every `session_sweep_secs` until aborted.
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let ttl = state.config().session_ttl();
            let mut ticker = tokio::time::interval(state.config().session_sweep_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = state.sessions().evict_idle(ttl).await;
                debug!(evicted, "Session sweep finished");
            }
        })
    }
}
