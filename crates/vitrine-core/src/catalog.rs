//! # Catalog
//!
//! Static sample catalog plus the browsing rules of the products and
//! collections pages.
//!
//! ## Data
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRODUCTS (12 listing rows)     COLLECTIONS (6)     CONFIGURABLES (1)  │
//! │  id 1..=12, u32                 id 1..=6            "premium-device-pro"│
//! │  price, rating, tags,           curator, views,     Color × Storage ×   │
//! │  view/purchase counts           created, items      Material            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Browsing Pipeline
//! ```text
//! all products ──► search (name/description, case-insensitive)
//!              ──► category ("All" = no filter)
//!              ──► sort (featured | price-low | price-high | rating | newest)
//! ```
//!
//! Every sort is stable, so ties keep catalog order.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    CatalogProduct, Collection, OptionCategory, OptionKind, ProductDescriptor, Variant,
};

/// Id of the configurable flagship product.
pub const PREMIUM_DEVICE_ID: &str = "premium-device-pro";

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

// =============================================================================
// Static Data
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn listing(
    id: u32,
    name: &str,
    price_cents: i64,
    original_cents: Option<i64>,
    category: &str,
    rating: f32,
    review_count: u32,
    flags: (bool, bool),
    description: &str,
    tags: &[&str],
    counts: (u32, u32),
) -> CatalogProduct {
    let (is_new, is_sale) = flags;
    let (view_count, purchase_count) = counts;
    CatalogProduct {
        id,
        name: name.to_string(),
        price: Money::from_cents(price_cents),
        original_price: original_cents.map(Money::from_cents),
        category: category.to_string(),
        rating,
        review_count,
        is_new,
        is_sale,
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        view_count,
        purchase_count,
    }
}

#[rustfmt::skip]
static PRODUCTS: LazyLock<Vec<CatalogProduct>> = LazyLock::new(|| {
    vec![
        listing(1, "Crystal Dragon Figurine", 29_999, Some(39_999),
            "Figurines", 4.9, 127, (true, true),
            "Handcrafted crystal dragon with LED base illumination",
            &["crystal", "fantasy", "collectible", "LED"], (1250, 89)),
        listing(2, "Vintage Pocket Watch", 129_999, None, "Timepieces", 4.8, 89, (false, false),
            "18k gold plated mechanical pocket watch from 1920s",
            &["vintage", "timepiece", "gold", "mechanical"], (890, 45)),
        listing(3, "Samurai Katana Replica", 89_999, Some(119_999),
            "Weapons", 4.7, 203, (false, true),
            "Museum-quality katana replica with authentic details",
            &["samurai", "replica", "steel", "authentic"], (2100, 156)),
        listing(4, "Rare Gemstone Collection", 249_999, None, "Gemstones", 5.0, 45, (true, false),
            "Curated collection of 12 rare gemstones with certificates",
            &["gemstone", "rare", "certified", "collectible"], (940, 41)),
        listing(5, "Steampunk Mechanical Bird", 59_999, None, "Steampunk", 4.6, 156, (false, false),
            "Intricate clockwork bird with moving wings and gears",
            &["steampunk", "mechanical", "clockwork", "vintage"], (1120, 78)),
        listing(6, "Ancient Egyptian Scarab", 79_999, Some(99_999),
            "Artifacts", 4.8, 78, (false, true),
            "Gold-plated scarab beetle with hieroglyphic engravings",
            &["egyptian", "artifact", "gold", "ancient"], (1010, 52)),
        listing(7, "Holographic Art Cube", 189_999, None, "Tech Art", 4.9, 92, (true, false),
            "3D holographic display cube with rotating art pieces",
            &["holographic", "tech", "art", "3D"], (1560, 67)),
        listing(8, "Medieval Knight Armor", 399_999, None, "Armor", 4.7, 34, (false, false),
            "Full-scale medieval knight armor replica in steel",
            &["medieval", "armor", "steel", "replica"], (640, 19)),
        listing(9, "Cosmic Galaxy Orb", 44_999, Some(59_999), "Space", 4.8, 167, (false, true),
            "Hand-blown glass orb containing miniature galaxy scene",
            &["cosmic", "glass", "space", "handmade"], (1380, 98)),
        listing(10, "Luxury Chess Set", 159_999, None, "Games", 4.9, 112, (true, false),
            "Marble board with 24k gold-plated chess pieces",
            &["chess", "marble", "gold", "luxury"], (1190, 73)),
        listing(11, "Mystical Crystal Ball", 69_999, None, "Mystical", 4.5, 89, (false, false),
            "Pure quartz crystal ball with ornate bronze stand",
            &["crystal", "mystical", "quartz", "bronze"], (780, 34)),
        listing(12, "Vintage Telescope", 229_999, Some(279_999),
            "Instruments", 4.8, 67, (false, true),
            "Antique brass telescope with mahogany tripod stand",
            &["vintage", "brass", "astronomy", "mahogany"], (720, 38)),
    ]
});

#[allow(clippy::too_many_arguments)]
fn collection(
    id: u32,
    name: &str,
    description: &str,
    category: &str,
    curator: &str,
    rating: f32,
    views: u32,
    created: (i32, u32, u32),
    item_count: u32,
    featured: bool,
) -> Collection {
    let (y, m, d) = created;
    Collection {
        id,
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        curator: curator.to_string(),
        rating,
        views,
        created: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        item_count,
        featured,
    }
}

#[rustfmt::skip]
static COLLECTIONS: LazyLock<Vec<Collection>> = LazyLock::new(|| {
    vec![
        collection(1, "Ancient Mysteries",
            "Discover artifacts and relics from lost civilizations, each piece telling a \
             story of humanity's forgotten past.",
            "Historical", "Dr. Sarah Chen", 4.9, 15_420, (2024, 1, 15), 24, true),
        collection(2, "Steampunk Wonders",
            "Mechanical marvels and clockwork creations that blend Victorian elegance with \
             industrial innovation.",
            "Mechanical", "Prof. James Gearwright", 4.8, 12_890, (2024, 2, 3), 18, true),
        collection(3, "Cosmic Treasures",
            "Celestial wonders and space-inspired collectibles that capture the beauty and \
             mystery of the universe.",
            "Space", "Dr. Luna Starfield", 4.9, 18_750, (2024, 1, 28), 31, false),
        collection(4, "Mystical Crystals",
            "Rare gemstones and crystal formations believed to possess unique energies and \
             healing properties.",
            "Gemstones", "Master Crystal Sage", 4.7, 9_340, (2024, 2, 10), 27, true),
        collection(5, "Samurai Legacy",
            "Authentic Japanese weaponry and armor pieces representing the honor and \
             craftsmanship of the samurai era.",
            "Weapons", "Sensei Takeshi", 4.8, 11_200, (2024, 1, 20), 15, false),
        collection(6, "Art Deco Elegance",
            "Sophisticated pieces from the golden age of design, featuring geometric \
             patterns and luxurious materials.",
            "Art", "Isabella Moderne", 4.6, 7_890, (2024, 2, 5), 22, false),
    ]
});

static CONFIGURABLES: LazyLock<Vec<ProductDescriptor>> = LazyLock::new(|| {
    vec![ProductDescriptor {
        id: PREMIUM_DEVICE_ID.to_string(),
        name: "Premium Device Pro".to_string(),
        base_price: Money::from_major_minor(999, 0),
        description: "Experience the future of technology with our flagship device featuring \
                      cutting-edge design and unmatched performance."
            .to_string(),
        features: [
            "Advanced Neural Processing",
            "All-Day Battery Life",
            "Premium Materials",
            "Wireless Charging",
            "Water Resistant",
            "5G Connectivity",
        ]
        .iter()
        .map(|f| f.to_string())
        .collect(),
        options: vec![
            OptionCategory {
                id: "color".to_string(),
                name: "Color".to_string(),
                kind: OptionKind::Color,
                variants: vec![
                    Variant::new("midnight", "Midnight Black", 0).with_swatch("#1a1a1a"),
                    Variant::new("silver", "Silver", 0).with_swatch("#c0c0c0"),
                    Variant::new("gold", "Gold", 0).with_swatch("#ffd700"),
                    Variant::new("purple", "Deep Purple", 0).with_swatch("#8b5cf6"),
                    Variant::new("blue", "Ocean Blue", 0).with_swatch("#3b82f6"),
                ],
                default_variant: Some("midnight".to_string()),
            },
            OptionCategory {
                id: "storage".to_string(),
                name: "Storage".to_string(),
                kind: OptionKind::Storage,
                variants: vec![
                    Variant::new("128gb", "128GB", 0),
                    Variant::new("256gb", "256GB", 200),
                    Variant::new("512gb", "512GB", 400),
                    Variant::new("1tb", "1TB", 800),
                ],
                default_variant: Some("128gb".to_string()),
            },
            OptionCategory {
                id: "material".to_string(),
                name: "Material".to_string(),
                kind: OptionKind::Material,
                variants: vec![
                    Variant::new("aluminum", "Aluminum", 0),
                    Variant::new("titanium", "Titanium", 300),
                    Variant::new("ceramic", "Ceramic", 500),
                ],
                default_variant: Some("aluminum".to_string()),
            },
        ],
    }]
});

// =============================================================================
// Lookups
// =============================================================================

/// All listing products in catalog order.
pub fn products() -> &'static [CatalogProduct] {
    &PRODUCTS
}

pub fn product(id: u32) -> Option<&'static CatalogProduct> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// All collections in catalog order.
pub fn collections() -> &'static [Collection] {
    &COLLECTIONS
}

/// Products with configurable options.
pub fn configurable_products() -> &'static [ProductDescriptor] {
    &CONFIGURABLES
}

/// Resolves any product id (configurable or listing) to a descriptor.
pub fn descriptor(id: &str) -> CoreResult<ProductDescriptor> {
    if let Some(found) = CONFIGURABLES.iter().find(|p| p.id == id) {
        return Ok(found.clone());
    }

    id.parse::<u32>()
        .ok()
        .and_then(product)
        .map(CatalogProduct::descriptor)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
}

/// Product categories for the filter bar, `"All"` first.
pub fn product_categories() -> Vec<&'static str> {
    let mut categories = vec![ALL_CATEGORIES];
    for p in PRODUCTS.iter() {
        if !categories.contains(&p.category.as_str()) {
            categories.push(p.category.as_str());
        }
    }
    categories
}

/// New arrivals shown on the home page.
pub fn new_arrivals() -> Vec<CatalogProduct> {
    PRODUCTS.iter().filter(|p| p.is_new).cloned().collect()
}

pub fn featured_collections() -> Vec<Collection> {
    COLLECTIONS.iter().filter(|c| c.featured).cloned().collect()
}

// =============================================================================
// Product Browsing
// =============================================================================

/// Sort orders on the products page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Catalog order.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
    /// New items first, otherwise catalog order.
    Newest,
}

/// Query parameters of the products page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: ProductSort,
}

fn is_all(category: Option<&str>) -> bool {
    match category.map(str::trim) {
        None | Some("") => true,
        Some(c) => c == ALL_CATEGORIES,
    }
}

/// Applies search, category filter and sort.
pub fn search_products(query: &ProductQuery) -> Vec<CatalogProduct> {
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .unwrap_or_default();
    let category = query.category.as_deref();

    let mut found: Vec<CatalogProduct> = PRODUCTS
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .filter(|p| is_all(category) || Some(p.category.as_str()) == category)
        .cloned()
        .collect();

    match query.sort {
        ProductSort::Featured => {}
        ProductSort::PriceLow => found.sort_by_key(|p| p.price),
        ProductSort::PriceHigh => found.sort_by(|a, b| b.price.cmp(&a.price)),
        ProductSort::Rating => found.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        ProductSort::Newest => found.sort_by_key(|p| !p.is_new),
    }

    found
}

// =============================================================================
// Collection Browsing
// =============================================================================

/// Sort orders on the collections page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionSort {
    /// Featured collections first.
    #[default]
    Featured,
    /// Most recently created first.
    Newest,
    /// Most viewed first.
    Popular,
    Rating,
    /// Largest collections first.
    Items,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: CollectionSort,
}

pub fn search_collections(query: &CollectionQuery) -> Vec<Collection> {
    let category = query.category.as_deref();

    let mut found: Vec<Collection> = COLLECTIONS
        .iter()
        .filter(|c| is_all(category) || Some(c.category.as_str()) == category)
        .cloned()
        .collect();

    let order: fn(&Collection, &Collection) -> Ordering = match query.sort {
        CollectionSort::Featured => |a, b| b.featured.cmp(&a.featured),
        CollectionSort::Newest => |a, b| b.created.cmp(&a.created),
        CollectionSort::Popular => |a, b| b.views.cmp(&a.views),
        CollectionSort::Rating => |a, b| b.rating.total_cmp(&a.rating),
        CollectionSort::Items => |a, b| b.item_count.cmp(&a.item_count),
    };
    found.sort_by(order);

    found
}
