//! # vitrine-core: Pure Storefront Logic
//!
//! This crate is the **heart** of the Vitrine storefront. It contains every
//! rule the storefront enforces as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Vitrine Storefront Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │   Catalog ──► Configurator ──► Cart Drawer ──► Checkout        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/storefront (axum)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vitrine-session (tokio)                      │   │
//! │  │        CartStore, ChatSession, SimulatedBackend                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vitrine-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐ │   │
//! │  │   │   money   │  │   cart    │  │configurator│  │ checkout  │ │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘ │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐ │   │
//! │  │   │  catalog  │  │ recommend │  │  reviews   │  │  loyalty  │ │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Shared domain types (products, options, collections)
//! - [`catalog`] - Static sample catalog plus search/filter/sort
//! - [`cart`] - Cart state and its command reducer
//! - [`configurator`] - Variant selection and derived pricing
//! - [`checkout`] - Shipping, tax and order form rules
//! - [`recommend`] - Recommendation sections
//! - [`reviews`] - Review filtering, sorting, stats and submission
//! - [`loyalty`] - Loyalty tiers, rewards and point ledger
//! - [`chat`] - Live chat transcript state machine
//! - [`account`] - Login / registration forms and password strength
//! - [`viewer`] - 3D / AR capability decisions
//! - [`validation`] - Field-level validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrine_core::cart::{CartCommand, CartItem, CartState};
//! use vitrine_core::money::Money;
//!
//! let mut cart = CartState::new();
//! cart.apply(CartCommand::AddItem(CartItem::plain("p1", "Orb", Money::from_cents(4999), 2)));
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().cents(), 9998);
//! ```

pub mod account;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod configurator;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod recommend;
pub mod reviews;
pub mod types;
pub mod validation;
pub mod viewer;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartCommand, CartItem, CartSnapshot, CartState, ChosenOption, OptionSelection};
pub use configurator::Configurator;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity a single cart line can hold.
///
/// Cart commands never fail, so quantities above this are clamped rather
/// than rejected.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Number of products shown in each recommendation section.
pub const RECOMMENDATION_SECTION_SIZE: usize = 4;
