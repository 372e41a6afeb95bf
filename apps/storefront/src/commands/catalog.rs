//! # Catalog Commands
//!
//! Read-only browsing: the home page, product and collection listings, a
//! product's detail, configurator pricing and recommendations.
//!
//! ## Product Ids
//! Listing products have numeric ids (`"3"`); configurable products have
//! slugs (`"premium-device-pro"`). `GET /api/products/{id}` accepts both.

use axum::extract::{Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrine_core::catalog::{self, CollectionQuery, ProductQuery};
use vitrine_core::recommend::{recommend, RecommendationContext, RecommendationSection};
use vitrine_core::validation::validate_search_query;
use vitrine_core::{
    CatalogProduct, Collection, Configurator, Money, OptionSelection, ProductDescriptor,
};

use crate::error::ApiResult;

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub new_arrivals: Vec<CatalogProduct>,
    pub featured_collections: Vec<Collection>,
    pub configurable: Vec<ProductDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub products: Vec<CatalogProduct>,
    pub categories: Vec<&'static str>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionListing {
    pub collections: Vec<Collection>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductDetail {
    Listing(CatalogProduct),
    Configurable(ProductDescriptor),
}

/// One configurator choice: option category id and variant id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInput {
    pub category: String,
    pub variant: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub selections: Vec<SelectionInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredQuote {
    pub product_id: String,
    pub base_price: Money,
    pub price: Money,
    pub selection: OptionSelection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationParams {
    #[serde(default)]
    pub product_id: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    /// Comma-separated preference tags.
    #[serde(default)]
    pub prefs: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/home`
pub async fn home() -> Json<HomePage> {
    Json(HomePage {
        new_arrivals: catalog::new_arrivals(),
        featured_collections: catalog::featured_collections(),
        configurable: catalog::configurable_products().to_vec(),
    })
}

/// `GET /api/products?q&category&sort`
pub async fn list_products(Query(query): Query<ProductQuery>) -> ApiResult<Json<ProductListing>> {
    debug!(q = ?query.q, category = ?query.category, sort = ?query.sort, "list_products command");
    if let Some(q) = query.q.as_deref() {
        validate_search_query(q)?;
    }

    let products = catalog::search_products(&query);
    Ok(Json(ProductListing {
        total: products.len(),
        products,
        categories: catalog::product_categories(),
    }))
}

/// `GET /api/products/{id}`
pub async fn get_product(Path(id): Path<String>) -> ApiResult<Json<ProductDetail>> {
    if let Some(found) = catalog::configurable_products().iter().find(|p| p.id == id) {
        return Ok(Json(ProductDetail::Configurable(found.clone())));
    }

    id.parse::<u32>()
        .ok()
        .and_then(catalog::product)
        .map(|p| Json(ProductDetail::Listing(p.clone())))
        .ok_or_else(|| vitrine_core::CoreError::ProductNotFound(id).into())
}

/// Builds a configurator for `product_id` with `selections` applied.
pub(crate) fn configure<'a>(
    product: &'a ProductDescriptor,
    selections: &[SelectionInput],
) -> ApiResult<Configurator<'a>> {
    let mut configurator = Configurator::new(product);
    configurator.select_all(
        selections
            .iter()
            .map(|s| (s.category.as_str(), s.variant.as_str())),
    )?;
    Ok(configurator)
}

/// `POST /api/products/{id}/quote`
///
/// Prices a configuration without touching any cart. Categories the request
/// leaves out stay on their default variant.
pub async fn quote_product(
    Path(id): Path<String>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<Json<ConfiguredQuote>> {
    let product = catalog::descriptor(&id)?;
    let configurator = configure(&product, &request.selections)?;

    Ok(Json(ConfiguredQuote {
        product_id: product.id.clone(),
        base_price: product.base_price,
        price: configurator.price(),
        selection: configurator.resolve(),
    }))
}

/// `GET /api/collections?category&sort`
pub async fn list_collections(Query(query): Query<CollectionQuery>) -> Json<CollectionListing> {
    let collections = catalog::search_collections(&query);
    Json(CollectionListing {
        total: collections.len(),
        collections,
    })
}

/// `GET /api/recommendations?productId&category&prefs`
pub async fn recommendations(
    Query(params): Query<RecommendationParams>,
) -> Json<Vec<RecommendationSection>> {
    let preferences: Vec<String> = params
        .prefs
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();

    let ctx = RecommendationContext {
        current_product: params.product_id,
        current_category: params.category.as_deref(),
        preferences: &preferences,
    };
    Json(recommend(catalog::products(), &ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use vitrine_core::catalog::ProductSort;

    #[tokio::test]
    async fn test_list_products_filters_and_sorts() {
        let Json(listing) = list_products(Query(ProductQuery {
            q: None,
            category: Some("All".to_string()),
            sort: ProductSort::PriceLow,
        }))
        .await
        .unwrap();

        assert_eq!(listing.total, 12);
        assert_eq!(listing.products[0].name, "Crystal Dragon Figurine");
        assert!(listing.products.windows(2).all(|w| w[0].price <= w[1].price));
        assert_eq!(listing.categories[0], "All");
    }

    #[tokio::test]
    async fn test_overlong_search_rejected() {
        let err = list_products(Query(ProductQuery {
            q: Some("x".repeat(500)),
            ..Default::default()
        }))
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_get_product_by_either_id() {
        let Json(detail) = get_product(Path("1".to_string())).await.unwrap();
        assert!(matches!(detail, ProductDetail::Listing(p) if p.id == 1));

        let Json(detail) = get_product(Path(catalog::PREMIUM_DEVICE_ID.to_string()))
            .await
            .unwrap();
        assert!(matches!(detail, ProductDetail::Configurable(_)));

        let err = get_product(Path("nope".to_string())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_quote_defaults_and_selection() {
        let id = catalog::PREMIUM_DEVICE_ID.to_string();

        let Json(quote) = quote_product(Path(id.clone()), Json(QuoteRequest::default()))
            .await
            .unwrap();
        assert_eq!(quote.price, quote.base_price);

        let Json(quote) = quote_product(
            Path(id.clone()),
            Json(QuoteRequest {
                selections: vec![SelectionInput {
                    category: "storage".to_string(),
                    variant: "512gb".to_string(),
                }],
            }),
        )
        .await
        .unwrap();
        assert_eq!(quote.price, quote.base_price + Money::from_major_minor(400, 0));

        let err = quote_product(
            Path(id),
            Json(QuoteRequest {
                selections: vec![SelectionInput {
                    category: "storage".to_string(),
                    variant: "64tb".to_string(),
                }],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_recommendations_parse_prefs() {
        let Json(sections) = recommendations(Query(RecommendationParams {
            prefs: Some("Crystal, vintage,,".to_string()),
            ..Default::default()
        }))
        .await;

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Trending Now", "Bestsellers", "Recommended for You"]);
    }
}
