//! # vitrine-session: Shopper Session State
//!
//! Owns the shared, time-dependent state of the storefront. The rules live
//! in `vitrine-core`; this crate decides when they run and who hears about
//! the result.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        vitrine-session                                  │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                │
//! │  │  session.rs  │──►│   store.rs   │   │  backend.rs  │                │
//! │  │  registry of │   │  CartStore:  │   │  simulated   │                │
//! │  │  shoppers    │   │  dispatch +  │   │  login, AR,  │                │
//! │  └──────┬───────┘   │  broadcast   │   │  orders      │                │
//! │         │           └──────────────┘   └──────▲───────┘                │
//! │         ▼                                     │                        │
//! │  ┌──────────────┐                      ┌──────┴───────┐                │
//! │  │   chat.rs    │                      │ checkout.rs  │                │
//! │  │  reply and   │                      │ place_order  │                │
//! │  │  receipt     │                      └──────────────┘                │
//! │  │  timers      │                                                      │
//! │  └──────────────┘                                                      │
//! │                                                                         │
//! │  config.rs: delays and buffer sizes    error.rs: SessionError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here needs a tokio runtime except `CartStore`, which is
//! synchronous apart from its broadcast channel.

pub mod backend;
pub mod chat;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use backend::{ArSession, AuthSession, Backend, PendingOperation, SimulatedBackend};
pub use chat::ChatSession;
pub use checkout::{place_order, OrderConfirmation};
pub use config::{SessionConfig, SimulatedDelays};
pub use error::{BackendError, SessionError, SessionResult};
pub use session::{CheckoutGuard, SessionRegistry, ShopperSession};
pub use store::{CartEvent, CartStore};
