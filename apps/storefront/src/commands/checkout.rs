//! # Checkout Commands
//!
//! ```text
//! GET  .../checkout?shipping=express   order summary panel (no side effects)
//! POST .../checkout                    validate, submit, remove ordered lines, earn points
//! ```

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;
use vitrine_core::checkout::{CheckoutForm, CheckoutQuote, ShippingMethod};
use vitrine_session::{place_order, OrderConfirmation};

use crate::commands::shopper;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct QuoteParams {
    #[serde(default)]
    pub shipping: ShippingMethod,
}

/// `GET /api/sessions/{sid}/checkout?shipping`
pub async fn quote(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Query(params): Query<QuoteParams>,
) -> ApiResult<Json<CheckoutQuote>> {
    let session = shopper(&state, sid).await?;
    let policy = state.checkout_policy();
    let quote = session.cart.read(|cart| policy.quote(cart, params.shipping))?;
    Ok(Json(quote))
}

/// `POST /api/sessions/{sid}/checkout`
///
/// Completes after the simulated order submission delay.
pub async fn submit(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(form): Json<CheckoutForm>,
) -> ApiResult<Json<OrderConfirmation>> {
    debug!(session = %sid, shipping = ?form.shipping, "submit_order command");
    let session = shopper(&state, sid).await?;
    let policy = state.checkout_policy();
    let confirmation = place_order(&session, state.backend(), &policy, form).await?;
    Ok(Json(confirmation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::create_session;
    use crate::commands::test_support::instant_state;
    use crate::error::ErrorCode;
    use vitrine_core::checkout::CardDetails;
    use vitrine_core::{CartCommand, CartItem, Money};

    fn form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            address: "1 Navy Way".to_string(),
            city: "Arlington".to_string(),
            state: "VA".to_string(),
            zip: "22202".to_string(),
            country: "US".to_string(),
            card: Some(CardDetails {
                card_number: "4000056655665556".to_string(),
                expiry: "01/29".to_string(),
                cvv: "321".to_string(),
                card_name: "Grace Hopper".to_string(),
            }),
            ..Default::default()
        }
    }

    async fn session_with_orb(state: &AppState) -> Uuid {
        let (_, Json(created)) = create_session(State(state.clone())).await;
        let session = state.sessions().get(created.session_id).await.unwrap();
        session.cart.dispatch(CartCommand::AddItem(CartItem::plain(
            "9",
            "Cosmic Galaxy Orb",
            Money::from_cents(44_999),
            1,
        )));
        created.session_id
    }

    #[tokio::test]
    async fn test_quote_standard_and_express() {
        let state = instant_state();
        let sid = session_with_orb(&state).await;

        let Json(standard) = quote(State(state.clone()), Path(sid), Query(QuoteParams::default()))
            .await
            .unwrap();
        assert_eq!(standard.shipping_cost, Money::zero());
        assert_eq!(standard.tax.cents(), 3_600);
        assert_eq!(standard.total.cents(), 48_599);

        let Json(express) = quote(
            State(state),
            Path(sid),
            Query(QuoteParams {
                shipping: ShippingMethod::Express,
            }),
        )
        .await
        .unwrap();
        assert_eq!(express.total.cents(), 48_599 + 2_900);
        assert_eq!(express.delivery_estimate, "1-2 business days");
    }

    #[tokio::test]
    async fn test_submit_clears_cart() {
        let state = instant_state();
        let sid = session_with_orb(&state).await;

        let Json(confirmation) = submit(State(state.clone()), Path(sid), Json(form()))
            .await
            .unwrap();
        assert_eq!(confirmation.card_last_four.as_deref(), Some("5556"));
        assert!(confirmation.points_earned > 0);

        let err = quote(State(state), Path(sid), Query(QuoteParams::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
    }

    #[tokio::test]
    async fn test_missing_card_is_validation_error() {
        let state = instant_state();
        let sid = session_with_orb(&state).await;
        let mut bad = form();
        bad.card = None;

        let err = submit(State(state), Path(sid), Json(bad)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("card"));
    }
}
