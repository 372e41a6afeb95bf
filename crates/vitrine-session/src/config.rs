//! # Session Configuration
//!
//! Timing and capacity knobs for shopper sessions. The storefront app builds
//! this from its own config file; tests use `Default`.

use std::time::Duration;

use vitrine_core::checkout::CheckoutPolicy;

/// Default subscriber buffer per cart.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// How long each simulated backend call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedDelays {
    pub login: Duration,
    pub register: Duration,
    pub checkout: Duration,
    pub ar_init: Duration,
    /// Shopper message `Sending` → `Delivered`.
    pub chat_delivery: Duration,
    /// Agent reply lands uniformly in `[chat_reply_min, chat_reply_max]`.
    pub chat_reply_min: Duration,
    pub chat_reply_max: Duration,
}

impl Default for SimulatedDelays {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(1500),
            register: Duration::from_millis(2000),
            checkout: Duration::from_millis(2000),
            ar_init: Duration::from_millis(2000),
            chat_delivery: Duration::from_millis(1000),
            chat_reply_min: Duration::from_millis(2000),
            chat_reply_max: Duration::from_millis(4000),
        }
    }
}

impl SimulatedDelays {
    /// Every delay zero. Useful for demos and handler tests.
    pub fn instant() -> Self {
        Self {
            login: Duration::ZERO,
            register: Duration::ZERO,
            checkout: Duration::ZERO,
            ar_init: Duration::ZERO,
            chat_delivery: Duration::ZERO,
            chat_reply_min: Duration::ZERO,
            chat_reply_max: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub delays: SimulatedDelays,
    pub broadcast_capacity: usize,
    pub checkout: CheckoutPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delays: SimulatedDelays::default(),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            checkout: CheckoutPolicy::default(),
        }
    }
}
