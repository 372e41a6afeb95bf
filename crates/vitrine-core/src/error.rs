//! # Error Types
//!
//! Domain-specific error types for vitrine-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vitrine-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Form / input validation failures               │
//! │                                                                         │
//! │  vitrine-session errors (separate crate)                               │
//! │  └── SessionError     - Unknown session, backend failures              │
//! │                                                                         │
//! │  storefront API errors (in app)                                        │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Applying a cart command never produces any of these errors. Only
//! `CartCommand::validate`, run where commands arrive over HTTP, can reject one.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Storefront domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product (catalog or configurable) has this id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product has no option category with this id.
    #[error("Product {product_id} has no option '{category}'")]
    UnknownOption {
        product_id: String,
        category: String,
    },

    /// The option category has no variant with this id.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/products/premium-device-pro/quote
    ///   { "selections": [{ "category": "storage", "variant": "2tb" }] }
    ///      │
    ///      ▼
    /// UnknownVariant { category: "storage", variant: "2tb" }
    ///      │
    ///      ▼
    /// 400: "Option storage has no variant '2tb'"
    /// ```
    #[error("Option {category} has no variant '{variant}'")]
    UnknownVariant { category: String, variant: String },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Loyalty reward id does not exist.
    #[error("Reward not found: {0}")]
    RewardNotFound(String),

    /// Reward exists but is not currently redeemable.
    #[error("Reward {0} is not available")]
    RewardUnavailable(String),

    /// Not enough loyalty points for the reward.
    #[error("Insufficient points: {required} required, {available} available")]
    InsufficientPoints { required: u32, available: u32 },

    /// Review id does not exist for the product.
    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    /// Chat agent id does not exist.
    #[error("Chat agent not found: {0}")]
    AgentNotFound(String),

    /// The chat was ended and accepts no more messages.
    #[error("Chat has ended")]
    ChatEnded,

    /// Satisfaction can only be rated after the chat ends.
    #[error("Chat must be ended before it can be rated")]
    ChatStillActive,

    /// AR was requested on a device that cannot run it.
    #[error("AR is not supported on this device")]
    ArUnsupported,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The web frontend shows these inline next to the offending field, so each
/// variant names the field it concerns.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must match do not (password confirmation).
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// A checkbox that must be ticked was not (terms of service).
    #[error("{field} must be accepted")]
    NotAccepted { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the field this error concerns.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Mismatch { field, .. }
            | ValidationError::NotAccepted { field }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
