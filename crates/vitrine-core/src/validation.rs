//! # Validation Module
//!
//! Field-level validators shared by the checkout, account and review forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web frontend                                                  │
//! │  ├── Inline hints while typing                                          │
//! │  └── Not trusted                                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: axum extractors                                               │
//! │  └── Shape validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                   │
//! │  └── Required fields, lengths, formats, ranges                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vitrine_core::validation::{validate_email, validate_required};
//!
//! assert!(validate_required("firstName", "Ada").is_ok());
//! assert!(validate_email("ada@example.com").is_ok());
//! assert!(validate_email("not-an-email").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text field accepted anywhere (review content, chat).
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Longest single-line field (names, titles, address lines).
pub const MAX_LINE_LENGTH: usize = 200;

/// Longest catalog search query.
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Largest unit price or option delta a cart line may carry ($1,000,000).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only values and over-long single lines.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    validate_max_length(field, value, MAX_LINE_LENGTH)
}

/// Rejects values longer than `max` characters.
pub fn validate_max_length(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Required
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email)?;
    let email = email.trim();

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("expected name@domain"));
    }

    let dotted = domain
        .find('.')
        .is_some_and(|i| i > 0 && !domain.ends_with('.'));
    if !dotted {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

/// Validates a catalog search query. An empty query is allowed.
pub fn validate_search_query(query: &str) -> ValidationResult<()> {
    validate_max_length("q", query.trim(), MAX_SEARCH_LENGTH)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a 1 to 5 star rating.
pub fn validate_rating(field: &str, rating: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: 5,
        });
    }
    Ok(())
}

/// Validates a price or price delta: `0 <= cents <= MAX_PRICE_CENTS`.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&price.cents()) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates that a string is all ASCII digits with a length in range.
pub fn validate_digits(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "digits only".to_string(),
        });
    }

    if digits.len() < min || digits.len() > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: min as i64,
            max: max as i64,
        });
    }

    Ok(())
}
