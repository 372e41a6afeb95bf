//! # Placing Orders
//!
//! ```text
//! begin_checkout ──► CheckoutForm ──validate──► quote(cart) + copy lines
//!                                                        │
//!                                 Backend::submit_order ◄┘ (await)
//!                                                        │
//! OrderConfirmation ◄── earn points ◄── remove ordered lines ◄┘
//! ```
//!
//! A failure at any step leaves the cart untouched. Lines added while the
//! order is in flight stay in the cart. A second checkout for the same
//! session is refused until the first finishes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use vitrine_core::checkout::{CheckoutForm, CheckoutPolicy, CheckoutQuote};

use crate::backend::{Backend, OrderRequest};
use crate::error::SessionResult;
use crate::session::ShopperSession;

/// The thank-you screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    pub placed_at: DateTime<Utc>,
    pub quote: CheckoutQuote,
    pub email: String,
    pub card_last_four: Option<String>,
    pub points_earned: u32,
}

/// Validates the form, prices the cart, submits the order and, once the
/// backend confirms, removes the ordered lines and credits loyalty points.
pub async fn place_order(
    session: &ShopperSession,
    backend: &dyn Backend,
    policy: &CheckoutPolicy,
    form: CheckoutForm,
) -> SessionResult<OrderConfirmation> {
    let _checkout = session.begin_checkout()?;
    form.validate()?;
    let (quote, ordered) = session.cart.read(|cart| {
        policy
            .quote(cart, form.shipping)
            .map(|quote| (quote, cart.items().to_vec()))
    })?;

    let receipt = backend
        .submit_order(OrderRequest {
            email: form.email.clone(),
            quote: quote.clone(),
        })
        .await?;

    session
        .cart
        .dispatch_planned(|cart| cart.settlement(&ordered));
    let points_earned = session.with_loyalty(|account| {
        account.earn_for_purchase(quote.subtotal, &receipt.order_id, receipt.placed_at)
    });

    info!(
        session = %session.id,
        order_id = %receipt.order_id,
        total_cents = quote.total.cents(),
        points_earned,
        "Order placed"
    );

    Ok(OrderConfirmation {
        order_id: receipt.order_id,
        placed_at: receipt.placed_at,
        email: form.email,
        card_last_four: form.card.as_ref().map(|card| card.last_four()),
        points_earned,
        quote,
    })
}
