//! # Checkout
//!
//! Shipping, tax and order-form rules.
//!
//! ## Pricing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart total ─────────────────────────────┐                              │
//! │                                          ├──► order total               │
//! │  shipping   standard = $0  (5-7 days) ───┤                              │
//! │             express  = $29 (1-2 days)    │                              │
//! │                                          │                              │
//! │  tax        8% × cart total ─────────────┘                              │
//! │             (shipping is not taxed)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartState;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::{validate_digits, validate_email, validate_required, ValidationResult};

// =============================================================================
// Shipping
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    /// Delivery estimate shown next to the option.
    pub fn delivery_estimate(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "5-7 business days",
            ShippingMethod::Express => "1-2 business days",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
}

/// Store-wide pricing knobs. Loaded from configuration by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    pub tax_rate: TaxRate,
    pub express_shipping: Money,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::from_bps(800),
            express_shipping: Money::from_major_minor(29, 0),
        }
    }
}

impl CheckoutPolicy {
    pub fn shipping_cost(&self, method: ShippingMethod) -> Money {
        match method {
            ShippingMethod::Standard => Money::zero(),
            ShippingMethod::Express => self.express_shipping,
        }
    }

    /// Prices the cart for the chosen shipping method.
    ///
    /// Fails with `EmptyCart` when there is nothing to buy.
    pub fn quote(&self, cart: &CartState, shipping: ShippingMethod) -> CoreResult<CheckoutQuote> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let subtotal = cart.total();
        let shipping_cost = self.shipping_cost(shipping);
        let tax = subtotal.calculate_tax(self.tax_rate);

        Ok(CheckoutQuote {
            item_count: cart.item_count(),
            subtotal,
            shipping,
            shipping_cost,
            delivery_estimate: shipping.delivery_estimate().to_string(),
            tax_rate: self.tax_rate,
            tax,
            total: subtotal + shipping_cost + tax,
        })
    }
}

/// The order summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub item_count: u32,
    pub subtotal: Money,
    pub shipping: ShippingMethod,
    pub shipping_cost: Money,
    pub delivery_estimate: String,
    pub tax_rate: TaxRate,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Order Form
// =============================================================================

/// Card fields. Only checked for shape; nothing is charged.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    /// `MM/YY`
    pub expiry: String,
    pub cvv: String,
    pub card_name: String,
}

impl CardDetails {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_digits("cardNumber", &self.card_number, 13, 19)?;
        validate_expiry(&self.expiry)?;
        validate_digits("cvv", &self.cvv, 3, 4)?;
        validate_required("cardName", &self.card_name)
    }

    /// Last four digits, for the confirmation screen.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

fn validate_expiry(expiry: &str) -> ValidationResult<()> {
    let invalid = || crate::error::ValidationError::InvalidFormat {
        field: "expiry".to_string(),
        reason: "expected MM/YY".to_string(),
    };

    let (month, year) = expiry.trim().split_once('/').ok_or_else(invalid)?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) || year.len() != 2 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    Ok(())
}

/// Contact and shipping address plus payment choice.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(default)]
    pub shipping: ShippingMethod,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub card: Option<CardDetails>,
}

impl CheckoutForm {
    /// Checks every required field, stopping at the first problem.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("firstName", &self.first_name)?;
        validate_required("lastName", &self.last_name)?;
        validate_email(&self.email)?;
        validate_required("address", &self.address)?;
        validate_required("city", &self.city)?;
        validate_required("state", &self.state)?;
        validate_required("zip", &self.zip)?;
        validate_required("country", &self.country)?;

        match (self.payment_method, &self.card) {
            (PaymentMethod::Card, Some(card)) => card.validate(),
            (PaymentMethod::Card, None) => Err(crate::error::ValidationError::Required {
                field: "card".to_string(),
            }),
        }
    }
}
