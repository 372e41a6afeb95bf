//! # Recommendations
//!
//! Builds the recommendation carousels shown under a product page.
//!
//! ```text
//! ┌───────────────┬───────────────────────────────────┬────────────────────┐
//! │ Section       │ Rule                              │ Shown when         │
//! ├───────────────┼───────────────────────────────────┼────────────────────┤
//! │ Trending      │ top 4 by view count               │ always             │
//! │ Similar       │ same category, not current, ≤ 4   │ product + category │
//! │ Bestsellers   │ top 4 by purchase count           │ always             │
//! │ Personalized  │ any preference tag, by rating, ≤4 │ non-empty result   │
//! └───────────────┴───────────────────────────────────┴────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::CatalogProduct;
use crate::RECOMMENDATION_SECTION_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Trending,
    Similar,
    Bestsellers,
    Personalized,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSection {
    pub title: String,
    pub subtitle: String,
    pub algorithm: Algorithm,
    pub products: Vec<CatalogProduct>,
}

/// Context the sections are computed for.
#[derive(Debug, Clone, Default)]
pub struct RecommendationContext<'a> {
    pub current_product: Option<u32>,
    pub current_category: Option<&'a str>,
    pub preferences: &'a [String],
}

fn top_by<K: Ord>(
    products: &[CatalogProduct],
    key: impl Fn(&CatalogProduct) -> K,
) -> Vec<CatalogProduct> {
    let mut sorted: Vec<CatalogProduct> = products.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(key(p)));
    sorted.truncate(RECOMMENDATION_SECTION_SIZE);
    sorted
}

/// Computes the sections, in display order, over the given products.
pub fn recommend(
    products: &[CatalogProduct],
    ctx: &RecommendationContext<'_>,
) -> Vec<RecommendationSection> {
    let mut sections = Vec::with_capacity(4);

    sections.push(RecommendationSection {
        title: "Trending Now".to_string(),
        subtitle: "Most viewed products this week".to_string(),
        algorithm: Algorithm::Trending,
        products: top_by(products, |p| p.view_count),
    });

    if let (Some(current), Some(category)) = (ctx.current_product, ctx.current_category) {
        let similar: Vec<CatalogProduct> = products
            .iter()
            .filter(|p| p.id != current && p.category == category)
            .take(RECOMMENDATION_SECTION_SIZE)
            .cloned()
            .collect();

        if !similar.is_empty() {
            sections.push(RecommendationSection {
                title: "Similar Items".to_string(),
                subtitle: format!("More {} you might like", category.to_lowercase()),
                algorithm: Algorithm::Similar,
                products: similar,
            });
        }
    }

    sections.push(RecommendationSection {
        title: "Bestsellers".to_string(),
        subtitle: "Customer favorites".to_string(),
        algorithm: Algorithm::Bestsellers,
        products: top_by(products, |p| p.purchase_count),
    });

    if !ctx.preferences.is_empty() {
        let mut personalized: Vec<CatalogProduct> = products
            .iter()
            .filter(|p| p.tags.iter().any(|tag| ctx.preferences.contains(tag)))
            .cloned()
            .collect();
        personalized.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        personalized.truncate(RECOMMENDATION_SECTION_SIZE);

        if !personalized.is_empty() {
            sections.push(RecommendationSection {
                title: "Recommended for You".to_string(),
                subtitle: "Based on your interests".to_string(),
                algorithm: Algorithm::Personalized,
                products: personalized,
            });
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn ids(section: &RecommendationSection) -> Vec<u32> {
        section.products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_default_sections() {
        let sections = recommend(catalog::products(), &RecommendationContext::default());

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].algorithm, Algorithm::Trending);
        assert_eq!(ids(&sections[0]), vec![3, 7, 9, 1]);
        assert_eq!(sections[1].algorithm, Algorithm::Bestsellers);
        assert_eq!(ids(&sections[1]), vec![3, 9, 1, 5]);
    }

    #[test]
    fn test_similar_needs_product_and_category() {
        let only_category = RecommendationContext {
            current_category: Some("Weapons"),
            ..Default::default()
        };
        assert!(recommend(catalog::products(), &only_category)
            .iter()
            .all(|s| s.algorithm != Algorithm::Similar));

        // Katana is the only weapon, so nothing is similar to it.
        let katana = RecommendationContext {
            current_product: Some(3),
            current_category: Some("Weapons"),
            ..Default::default()
        };
        assert!(recommend(catalog::products(), &katana)
            .iter()
            .all(|s| s.algorithm != Algorithm::Similar));

        let scarab_viewer = RecommendationContext {
            current_product: Some(6),
            current_category: Some("Weapons"),
            ..Default::default()
        };
        let sections = recommend(catalog::products(), &scarab_viewer);
        assert_eq!(sections[1].algorithm, Algorithm::Similar);
        assert_eq!(ids(&sections[1]), vec![3]);
        assert_eq!(sections[1].subtitle, "More weapons you might like");
    }

    #[test]
    fn test_personalized_by_rating() {
        let prefs = vec!["crystal".to_string(), "vintage".to_string()];
        let ctx = RecommendationContext {
            preferences: &prefs,
            ..Default::default()
        };
        let sections = recommend(catalog::products(), &ctx);
        let personalized = sections.last().unwrap();

        assert_eq!(personalized.algorithm, Algorithm::Personalized);
        // dragon 4.9, watch 4.8, telescope 4.8, bird 4.6 (ball 4.5 cut)
        assert_eq!(ids(personalized), vec![1, 2, 12, 5]);
    }

    #[test]
    fn test_personalized_hidden_when_nothing_matches() {
        let prefs = vec!["unobtainium".to_string()];
        let ctx = RecommendationContext {
            preferences: &prefs,
            ..Default::default()
        };
        assert_eq!(recommend(catalog::products(), &ctx).len(), 2);
    }
}
