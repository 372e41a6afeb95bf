//! # Domain Types
//!
//! Shared catalog types used across the storefront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │  ProductDescriptor   │        │  CatalogProduct                  │  │
//! │  │  ──────────────────  │        │  ──────────────────────────────  │  │
//! │  │  id, name            │◄───────│  listing row (price, rating,     │  │
//! │  │  base_price          │ descr. │  tags, view/purchase counts)     │  │
//! │  │  options ──┐         │        └──────────────────────────────────┘  │
//! │  └────────────┼─────────┘                                               │
//! │               ▼                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │  OptionCategory      │        │  Collection                      │  │
//! │  │  id, name, kind      │        │  curated group of listings       │  │
//! │  │  variants ──┐        │        └──────────────────────────────────┘  │
//! │  └─────────────┼────────┘                                               │
//! │                ▼                                                        │
//! │  ┌──────────────────────┐   ┌─────────────┐                            │
//! │  │  Variant             │   │  TaxRate    │                            │
//! │  │  id, name, swatch    │   │  bps (u32)  │                            │
//! │  │  price_delta (Money) │   │  800 = 8%   │                            │
//! │  └──────────────────────┘   └─────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Configurable Products
// =============================================================================

/// What a configurator option category controls.
///
/// The frontend picks a widget per kind (swatches for colors, chips for
/// storage tiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Color,
    Storage,
    Material,
    Size,
}

/// One choosable value within an option category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Stable id used in selection requests (`"256gb"`).
    pub id: String,

    /// Display label stored on cart lines (`"256GB"`).
    pub name: String,

    /// CSS colour for swatch rendering, colour options only.
    pub swatch: Option<String>,

    /// Added to the product's base price when selected.
    pub price_delta: Money,
}

impl Variant {
    pub fn new(id: &str, name: &str, delta_dollars: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            swatch: None,
            price_delta: Money::from_major_minor(delta_dollars, 0),
        }
    }

    pub fn with_swatch(mut self, swatch: &str) -> Self {
        self.swatch = Some(swatch.to_string());
        self
    }
}

/// A configurable dimension of a product (Color, Storage, Material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OptionCategory {
    /// Stable id used in selection requests (`"storage"`).
    pub id: String,

    /// Display name, also the key on cart lines (`"Storage"`).
    pub name: String,

    pub kind: OptionKind,

    /// Enumerated variants in display order. Never empty.
    pub variants: Vec<Variant>,

    /// Variant id selected initially; the first variant when absent.
    pub default_variant: Option<String>,
}

impl OptionCategory {
    /// Looks up a variant by id.
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// The variant a fresh configurator starts on.
    pub fn initial_variant(&self) -> Option<&Variant> {
        self.default_variant
            .as_deref()
            .and_then(|id| self.variant(id))
            .or_else(|| self.variants.first())
    }
}

/// Everything the configurator needs to know about a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    pub id: String,
    pub name: String,

    /// Price before any option deltas.
    pub base_price: Money,

    pub description: String,

    /// Marketing bullet points shown on the product page.
    pub features: Vec<String>,

    /// Option categories in display order. Empty for plain products.
    pub options: Vec<OptionCategory>,
}

impl ProductDescriptor {
    /// Looks up an option category by id.
    pub fn option(&self, category_id: &str) -> Option<&OptionCategory> {
        self.options.iter().find(|c| c.id == category_id)
    }

    pub fn is_configurable(&self) -> bool {
        !self.options.is_empty()
    }
}

// =============================================================================
// Catalog Listings
// =============================================================================

/// A product as shown on listing pages and recommendation carousels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: u32,
    pub name: String,
    pub price: Money,

    /// Pre-sale price, shown struck through when `is_sale`.
    pub original_price: Option<Money>,

    pub category: String,

    /// Average star rating, 0.0 - 5.0.
    pub rating: f32,

    pub review_count: u32,
    pub is_new: bool,
    pub is_sale: bool,
    pub description: String,

    /// Free-form tags matched against shopper preferences.
    pub tags: Vec<String>,

    pub view_count: u32,
    pub purchase_count: u32,
}

impl CatalogProduct {
    /// String form of the id, as used by cart lines and product routes.
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// Descriptor for a listing product. Listing products carry no options,
    /// so their configurator is a single fixed price.
    pub fn descriptor(&self) -> ProductDescriptor {
        ProductDescriptor {
            id: self.key(),
            name: self.name.clone(),
            base_price: self.price,
            description: self.description.clone(),
            features: self.tags.clone(),
            options: Vec::new(),
        }
    }

    /// Amount saved against the original price, if on sale.
    pub fn savings(&self) -> Option<Money> {
        self.original_price
            .filter(|original| *original > self.price)
            .map(|original| original - self.price)
    }
}

/// A curated collection on the collections page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub curator: String,
    pub rating: f32,
    pub views: u32,

    #[ts(as = "String")]
    pub created: NaiveDate,

    pub item_count: u32,
    pub featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> OptionCategory {
        OptionCategory {
            id: "storage".to_string(),
            name: "Storage".to_string(),
            kind: OptionKind::Storage,
            variants: vec![Variant::new("128gb", "128GB", 0), Variant::new("256gb", "256GB", 200)],
            default_variant: None,
        }
    }

    #[test]
    fn test_initial_variant_falls_back_to_first() {
        let mut category = storage();
        assert_eq!(category.initial_variant().map(|v| v.id.as_str()), Some("128gb"));

        category.default_variant = Some("256gb".to_string());
        assert_eq!(category.initial_variant().map(|v| v.id.as_str()), Some("256gb"));

        // A stale default does not leave the category unselected.
        category.default_variant = Some("2tb".to_string());
        assert_eq!(category.initial_variant().map(|v| v.id.as_str()), Some("128gb"));
    }

    #[test]
    fn test_savings() {
        let mut product = CatalogProduct {
            id: 1,
            name: "Orb".to_string(),
            price: Money::from_cents(44_999),
            original_price: Some(Money::from_cents(59_999)),
            category: "Space".to_string(),
            rating: 4.8,
            review_count: 167,
            is_new: false,
            is_sale: true,
            description: String::new(),
            tags: vec![],
            view_count: 0,
            purchase_count: 0,
        };
        assert_eq!(product.savings(), Some(Money::from_cents(15_000)));

        product.original_price = None;
        assert_eq!(product.savings(), None);
    }

    #[test]
    fn test_tax_rate() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(rate.bps(), 800);
        assert!((rate.percentage() - 8.0).abs() < f64::EPSILON);
    }
}
