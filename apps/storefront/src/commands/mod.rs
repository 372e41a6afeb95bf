//! # HTTP Command Handlers
//!
//! One module per storefront area. Each handler extracts what it needs from
//! the request, calls into `vitrine-core` / `vitrine-session`, and returns
//! JSON or an [`ApiError`](crate::error::ApiError).
//!
//! ```text
//! commands/
//! ├── session.rs   create/drop a shopper session, favorites
//! ├── catalog.rs   home, products, collections, configurator quote, recs
//! ├── cart.rs      snapshot, commands, configured add, SSE events
//! ├── checkout.rs  order quote and submission
//! ├── reviews.rs   list, submit, vote
//! ├── auth.rs      login, register, sign-out, password strength
//! ├── chat.rs      live support chat
//! ├── loyalty.rs   summary, redeem
//! ├── viewer.rs    viewer mode decision, AR start
//! └── dev.rs       health and dev metrics
//! ```

use std::sync::Arc;

use uuid::Uuid;
use vitrine_session::ShopperSession;

use crate::error::ApiResult;
use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod dev;
pub mod loyalty;
pub mod reviews;
pub mod session;
pub mod viewer;

/// Looks up a live shopper session or fails with `NOT_FOUND`.
pub(crate) async fn shopper(state: &AppState, id: Uuid) -> ApiResult<Arc<ShopperSession>> {
    Ok(state.sessions().get(id).await?)
}
