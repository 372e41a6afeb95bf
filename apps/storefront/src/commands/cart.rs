//! # Cart Commands
//!
//! HTTP surface of a session's [`CartStore`](vitrine_session::CartStore).
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │  Quote   │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └────┬─────┘       │
//! │                        │                                  │             │
//! │              POST .../cart/commands               CLEAR_CART            │
//! │              POST .../cart/configured                     │             │
//! │                        │                                  ▼             │
//! │                        ▼                            (back to empty)     │
//! │             GET .../cart/events  ◄── one SSE event per command          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::Deserialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};
use uuid::Uuid;
use vitrine_core::{catalog, CartCommand, CartSnapshot};

use crate::commands::catalog::{configure, SelectionInput};
use crate::commands::shopper;
use crate::error::ApiResult;
use crate::state::AppState;

/// Body of the configurator's "Add to Cart" button.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredAdd {
    pub product_id: String,
    #[serde(default)]
    pub selections: Vec<SelectionInput>,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// `GET /api/sessions/{sid}/cart`
pub async fn get_cart(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<CartSnapshot>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.cart.snapshot()))
}

/// `POST /api/sessions/{sid}/cart/commands`
///
/// Body is a tagged command, e.g.
/// `{"type": "UPDATE_QUANTITY", "payload": {"id": "3", "quantity": 2}}`.
/// An `ADD_ITEM` with a blank id or name, or a price outside
/// `0..=MAX_PRICE_CENTS`, is rejected before it reaches the cart. Anything
/// else applies; an unknown line is simply left alone.
pub async fn dispatch(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(command): Json<CartCommand>,
) -> ApiResult<Json<CartSnapshot>> {
    debug!(session = %sid, command = command.name(), "cart dispatch command");
    let session = shopper(&state, sid).await?;
    command.validate()?;
    Ok(Json(session.cart.dispatch(command)))
}

/// `POST /api/sessions/{sid}/cart/configured`
///
/// Resolves the configurator selection, adds the line at base price and
/// opens the drawer.
pub async fn add_configured(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<ConfiguredAdd>,
) -> ApiResult<Json<CartSnapshot>> {
    debug!(
        session = %sid,
        product_id = %request.product_id,
        quantity = request.quantity,
        "add_configured command"
    );
    let session = shopper(&state, sid).await?;
    let product = catalog::descriptor(&request.product_id)?;
    let configurator = configure(&product, &request.selections)?;

    Ok(Json(
        session
            .cart
            .dispatch_all(configurator.add_to_cart_commands(request.quantity)),
    ))
}

/// `GET /api/sessions/{sid}/cart/events`
///
/// Server-sent events, one `cart` event per dispatched command. A client
/// that falls behind receives a `lagged` event and should refetch the cart.
pub async fn cart_events(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let session = shopper(&state, sid).await?;
    let receiver = session.cart.subscribe();
    debug!(
        session = %sid,
        subscribers = session.cart.subscriber_count(),
        "Cart subscriber attached"
    );

    let stream = BroadcastStream::new(receiver).map(|item| {
        let event = match item {
            Ok(cart_event) => Event::default()
                .event("cart")
                .json_data(&cart_event)
                .unwrap_or_else(|e| Event::default().event("error").data(e.to_string())),
            Err(BroadcastStreamRecvError::Lagged(missed)) => {
                warn!(missed, "Cart subscriber lagged");
                Event::default().event("lagged").data(missed.to_string())
            }
        };
        Ok(event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::create_session;
    use crate::commands::test_support::instant_state;
    use crate::error::ErrorCode;
    use vitrine_core::{CartItem, Money};

    async fn new_session(state: &AppState) -> Uuid {
        let (_, Json(created)) = create_session(State(state.clone())).await;
        created.session_id
    }

    #[tokio::test]
    async fn test_dispatch_and_read_back() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let item = CartItem::plain("9", "Cosmic Galaxy Orb", Money::from_cents(44_999), 1);
        for _ in 0..2 {
            let command = CartCommand::AddItem(item.clone());
            dispatch(State(state.clone()), Path(sid), Json(command))
                .await
                .unwrap();
        }

        let Json(cart) = get_cart(State(state), Path(sid)).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.total.cents(), 89_998);
    }

    #[tokio::test]
    async fn test_dispatch_from_wire_json() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let command: CartCommand = serde_json::from_str(r#"{"type": "TOGGLE_CART"}"#).unwrap();
        let Json(cart) = dispatch(State(state), Path(sid), Json(command)).await.unwrap();
        assert!(cart.is_open);
    }

    #[tokio::test]
    async fn test_configured_add_uses_base_price_and_opens() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let request = ConfiguredAdd {
            product_id: catalog::PREMIUM_DEVICE_ID.to_string(),
            selections: vec![SelectionInput {
                category: "storage".to_string(),
                variant: "256gb".to_string(),
            }],
            quantity: 1,
        };
        let Json(cart) = add_configured(State(state), Path(sid), Json(request)).await.unwrap();

        assert!(cart.is_open);
        let line = &cart.items[0];
        assert_eq!(line.item.base_price, Money::from_major_minor(999, 0));
        assert_eq!(line.unit_price, Money::from_major_minor(1199, 0));
        assert_eq!(line.item.selection.label_for("Storage"), Some("256GB"));
    }

    #[tokio::test]
    async fn test_out_of_range_price_rejected_and_cart_unchanged() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let huge = CartItem::plain("x", "X", Money::from_cents(i64::MAX / 2 + 1), 2);
        let err = dispatch(State(state.clone()), Path(sid), Json(CartCommand::AddItem(huge)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("basePrice"));

        let negative = CartItem::plain("x", "X", Money::from_cents(-100), 1);
        let err = dispatch(State(state.clone()), Path(sid), Json(CartCommand::AddItem(negative)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let Json(cart) = get_cart(State(state), Path(sid)).await.unwrap();
        assert!(cart.items.is_empty());
        assert!(cart.total.is_zero());
    }

    #[tokio::test]
    async fn test_configured_add_with_unknown_selection() {
        let state = instant_state();
        let sid = new_session(&state).await;

        for (category, variant) in [("storage", "2tb"), ("engraving", "gold")] {
            let request = ConfiguredAdd {
                product_id: catalog::PREMIUM_DEVICE_ID.to_string(),
                selections: vec![SelectionInput {
                    category: category.to_string(),
                    variant: variant.to_string(),
                }],
                quantity: 1,
            };
            let err = add_configured(State(state.clone()), Path(sid), Json(request))
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
            assert!(err.message.contains(category));
        }

        let Json(cart) = get_cart(State(state), Path(sid)).await.unwrap();
        assert!(cart.items.is_empty());
        assert!(!cart.is_open);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let state = instant_state();
        let err = get_cart(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_events_endpoint_subscribes() {
        let state = instant_state();
        let sid = new_session(&state).await;
        let session = state.sessions().get(sid).await.unwrap();

        let _sse = cart_events(State(state.clone()), Path(sid)).await.unwrap();
        assert_eq!(session.cart.subscriber_count(), 1);
    }
}
