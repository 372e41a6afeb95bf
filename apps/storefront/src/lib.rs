//! # Vitrine Storefront Server
//!
//! JSON-over-HTTP surface of the storefront. The web frontend renders pages;
//! everything with rules (cart math, configurator pricing, checkout, loyalty,
//! chat, reviews, AR gating) lives behind these routes.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Server                                 │
//! │                                                                         │
//! │  Browser ──► axum Router ──► commands/* ──► vitrine-session ──► core     │
//! │                  │                               │                      │
//! │            TraceLayer, CORS               CartStore (broadcast)         │
//! │                  │                               │                      │
//! │                  ◄──────── SSE cart events ◄─────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Logging
//! Controlled by `RUST_LOG`. Default: `info,vitrine=debug,tower_http=info`.

pub mod commands;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, StorefrontConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::AppState;

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vitrine_session=trace` - Trace the session layer only
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vitrine=debug,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
