//! # Route Table
//!
//! ```text
//! GET    /health                                         - Health check
//!
//! # Catalog
//! GET    /api/home                                       - Home page sections
//! GET    /api/products?q&category&sort                   - Product listing
//! GET    /api/products/{id}                              - Product detail
//! POST   /api/products/{id}/quote                        - Configurator price
//! GET    /api/collections?category&sort                  - Collection listing
//! GET    /api/recommendations?productId&category&prefs   - Recommendation sections
//!
//! # Reviews
//! GET    /api/products/{id}/reviews                      - Filtered reviews + stats
//! POST   /api/products/{id}/reviews                      - Submit review
//! POST   /api/products/{id}/reviews/{review_id}/vote     - Helpful vote
//!
//! # Auth
//! POST   /api/auth/login                                 - Sign in
//! POST   /api/auth/register                              - Create account
//! POST   /api/auth/password-strength                     - Strength meter
//!
//! # Viewer
//! POST   /api/viewer/mode                                - Which viewer to mount
//! POST   /api/ar/sessions                                - Start AR
//!
//! # Static data
//! GET    /api/loyalty/tiers                              - Tier ladder
//! GET    /api/chat/agents                                - Support roster
//! GET    /api/chat/quick-replies                         - One-tap messages
//!
//! # Shopper session
//! POST   /api/sessions                                   - New session
//! DELETE /api/sessions/{sid}                             - Drop session
//! POST   /api/sessions/{sid}/sign-out                    - Forget account
//! GET    /api/sessions/{sid}/favorites                   - Favorite ids
//! POST   /api/sessions/{sid}/favorites/{product_id}      - Toggle favorite
//! GET    /api/sessions/{sid}/cart                        - Cart snapshot
//! POST   /api/sessions/{sid}/cart/commands               - Dispatch command
//! POST   /api/sessions/{sid}/cart/configured             - Add configured product
//! GET    /api/sessions/{sid}/cart/events                 - SSE cart events
//! GET    /api/sessions/{sid}/checkout?shipping           - Order summary
//! POST   /api/sessions/{sid}/checkout                    - Place order
//! GET    /api/sessions/{sid}/chat                        - Transcript
//! POST   /api/sessions/{sid}/chat/open|close|end         - Widget state
//! POST   /api/sessions/{sid}/chat/messages               - Send message
//! POST   /api/sessions/{sid}/chat/agent                  - Switch agent
//! POST   /api/sessions/{sid}/chat/rating                 - Rate ended chat
//! GET    /api/sessions/{sid}/loyalty                     - Points and tier
//! GET    /api/sessions/{sid}/loyalty/activities          - History
//! GET    /api/sessions/{sid}/loyalty/rewards             - Rewards catalog
//! POST   /api/sessions/{sid}/loyalty/rewards/{id}/redeem - Redeem
//!
//! # Dev mode only
//! GET    /api/dev/metrics                                - Uptime, session count
//! ```

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::commands::{auth, cart, catalog, chat, checkout, dev, loyalty, reviews, session, viewer};
use crate::state::AppState;

/// Builds the full router with middleware applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api = Router::new()
        .merge(catalog_routes())
        .merge(shared_routes())
        .route("/sessions", post(session::create_session))
        .route("/sessions/{sid}", delete(session::end_session))
        .nest("/sessions/{sid}", session_routes());

    if state.config().dev_mode {
        api = api.route("/dev/metrics", get(dev::metrics));
    }

    Router::new()
        .route("/health", get(dev::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(catalog::home))
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
        .route("/products/{id}/quote", post(catalog::quote_product))
        .route(
            "/products/{id}/reviews",
            get(reviews::list_reviews).post(reviews::submit_review),
        )
        .route("/products/{id}/reviews/{review_id}/vote", post(reviews::vote))
        .route("/collections", get(catalog::list_collections))
        .route("/recommendations", get(catalog::recommendations))
}

fn shared_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/password-strength", post(auth::password_strength))
        .route("/viewer/mode", post(viewer::viewer_mode))
        .route("/ar/sessions", post(viewer::start_ar))
        .route("/loyalty/tiers", get(loyalty::tiers))
        .route("/chat/agents", get(chat::agents))
        .route("/chat/quick-replies", get(chat::quick_replies))
}

/// Everything scoped to one shopper session. Mounted under
/// `/api/sessions/{sid}`.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-out", post(auth::sign_out))
        .route("/favorites", get(session::list_favorites))
        .route("/favorites/{product_id}", post(session::toggle_favorite))
        .route("/cart", get(cart::get_cart))
        .route("/cart/commands", post(cart::dispatch))
        .route("/cart/configured", post(cart::add_configured))
        .route("/cart/events", get(cart::cart_events))
        .route("/checkout", get(checkout::quote).post(checkout::submit))
        .route("/chat", get(chat::transcript))
        .route("/chat/open", post(chat::open))
        .route("/chat/close", post(chat::close))
        .route("/chat/end", post(chat::end))
        .route("/chat/messages", post(chat::send))
        .route("/chat/agent", post(chat::select_agent))
        .route("/chat/rating", post(chat::rate))
        .route("/loyalty", get(loyalty::summary))
        .route("/loyalty/activities", get(loyalty::activities))
        .route("/loyalty/rewards", get(loyalty::rewards))
        .route("/loyalty/rewards/{reward_id}/redeem", post(loyalty::redeem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;

    // axum panics on overlapping routes at build time.
    #[test]
    fn test_router_builds() {
        router(AppState::new(StorefrontConfig::default()));
        router(AppState::new(StorefrontConfig {
            dev_mode: true,
            ..StorefrontConfig::default()
        }));
    }
}
