//! # Reviews
//!
//! Product reviews: listing with filter and sort, summary statistics,
//! submission and helpfulness voting.
//!
//! ## Listing Pipeline
//! ```text
//! reviews ──► rating filter (exact star count, optional)
//!         ──► verified-only filter (optional)
//!         ──► sort (newest | oldest | highest | lowest | helpful)
//! ```
//!
//! A product's board is seeded with the sample reviews the first time it is
//! touched. New reviews are prepended.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::validation::{
    validate_max_length, validate_rating, validate_required, ValidationResult, MAX_TEXT_LENGTH,
};

// =============================================================================
// Types
// =============================================================================

/// The configuration the reviewer bought, as display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReviewedVariant {
    pub color: String,
    pub storage: String,
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    /// 1 - 5 stars.
    pub rating: u8,
    pub title: String,
    pub content: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub verified: bool,
    pub helpful: u32,
    pub not_helpful: u32,
    pub variant: Option<ReviewedVariant>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
    /// Most "helpful" votes first.
    Helpful,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    /// Only reviews with exactly this many stars.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub verified_only: bool,
    #[serde(default)]
    pub sort: ReviewSort,
}

/// Summary shown above the review list.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Mean rating rounded to one decimal; 0.0 when there are no reviews.
    pub average_rating: f32,
    pub total_reviews: u32,
    /// Count per star, index 0 = 1 star.
    pub rating_distribution: [u32; 5],
    pub verified_purchases: u32,
}

/// The "write a review" form.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub rating: u8,
    pub title: String,
    pub content: String,
    /// Comma-separated.
    #[serde(default)]
    pub pros: String,
    /// Comma-separated.
    #[serde(default)]
    pub cons: String,
}

impl NewReview {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_rating("rating", self.rating)?;
        validate_required("title", &self.title)?;
        if self.content.trim().is_empty() {
            return Err(crate::error::ValidationError::Required {
                field: "content".to_string(),
            });
        }
        validate_max_length("content", &self.content, MAX_TEXT_LENGTH)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Listing
// =============================================================================

/// Filters and sorts a review list.
pub fn list(reviews: &[Review], query: &ReviewQuery) -> Vec<Review> {
    let mut found: Vec<Review> = reviews
        .iter()
        .filter(|r| query.rating.map_or(true, |stars| r.rating == stars))
        .filter(|r| !query.verified_only || r.verified)
        .cloned()
        .collect();

    match query.sort {
        ReviewSort::Newest => found.sort_by(|a, b| b.date.cmp(&a.date)),
        ReviewSort::Oldest => found.sort_by_key(|r| r.date),
        ReviewSort::Highest => found.sort_by(|a, b| b.rating.cmp(&a.rating)),
        ReviewSort::Lowest => found.sort_by_key(|r| r.rating),
        ReviewSort::Helpful => found.sort_by(|a, b| b.helpful.cmp(&a.helpful)),
    }

    found
}

/// Computes summary statistics from the review list.
pub fn stats(reviews: &[Review]) -> ReviewStats {
    let mut distribution = [0u32; 5];
    let mut sum = 0u32;
    let mut verified = 0u32;

    for review in reviews {
        if let Some(slot) = distribution.get_mut(usize::from(review.rating).wrapping_sub(1)) {
            *slot += 1;
        }
        sum += u32::from(review.rating);
        if review.verified {
            verified += 1;
        }
    }

    let total = reviews.len() as u32;
    let average_rating = if total == 0 {
        0.0
    } else {
        ((sum as f32 / total as f32) * 10.0).round() / 10.0
    };

    ReviewStats {
        average_rating,
        total_reviews: total,
        rating_distribution: distribution,
        verified_purchases: verified,
    }
}

// =============================================================================
// Review Board
// =============================================================================

/// Most reviews kept per product. Past this the oldest are dropped.
pub const MAX_REVIEWS_PER_PRODUCT: usize = 500;

/// All reviews, keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    by_product: HashMap<String, Vec<Review>>,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reviews for a product, seeding the samples on first access.
    pub fn reviews_for(&mut self, product_id: &str) -> &[Review] {
        self.board(product_id)
    }

    fn board(&mut self, product_id: &str) -> &mut Vec<Review> {
        self.by_product
            .entry(product_id.to_string())
            .or_insert_with(sample_reviews)
    }

    /// Validates and prepends a review written by the current shopper.
    ///
    /// Submitted reviews are marked verified and start with zero votes. The
    /// board keeps at most [`MAX_REVIEWS_PER_PRODUCT`] per product.
    pub fn submit(
        &mut self,
        product_id: &str,
        user_id: &str,
        user_name: &str,
        form: NewReview,
        today: NaiveDate,
    ) -> CoreResult<Review> {
        form.validate()?;

        let review = Review {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            rating: form.rating,
            title: form.title.trim().to_string(),
            content: form.content.trim().to_string(),
            date: today,
            verified: true,
            helpful: 0,
            not_helpful: 0,
            variant: None,
            pros: split_list(&form.pros),
            cons: split_list(&form.cons),
        };

        let board = self.board(product_id);
        board.insert(0, review.clone());
        board.truncate(MAX_REVIEWS_PER_PRODUCT);
        Ok(review)
    }

    /// Records a helpful / not helpful vote.
    pub fn vote(
        &mut self,
        product_id: &str,
        review_id: &str,
        helpful: bool,
    ) -> CoreResult<Review> {
        let review = self
            .board(product_id)
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| CoreError::ReviewNotFound(review_id.to_string()))?;

        if helpful {
            review.helpful += 1;
        } else {
            review.not_helpful += 1;
        }
        Ok(review.clone())
    }
}

// =============================================================================
// Sample Data
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn variant(color: &str, storage: &str, material: &str) -> Option<ReviewedVariant> {
    Some(ReviewedVariant {
        color: color.to_string(),
        storage: storage.to_string(),
        material: material.to_string(),
    })
}

fn sample_reviews() -> Vec<Review> {
    vec![
        Review {
            id: "1".to_string(),
            user_id: "user1".to_string(),
            user_name: "Sarah Johnson".to_string(),
            rating: 5,
            title: "Absolutely stunning quality and design!".to_string(),
            content: "I've been using this for 3 months now and I'm blown away by the build \
                      quality. The 3D visualization on the website was spot-on - what you see \
                      is exactly what you get. The materials feel premium and the attention to \
                      detail is incredible."
                .to_string(),
            date: date(2024, 1, 15),
            verified: true,
            helpful: 24,
            not_helpful: 2,
            variant: variant("Midnight Black", "256GB", "Titanium"),
            pros: strings(&["Exceptional build quality", "Beautiful design", "Great performance"]),
            cons: strings(&["Price is on the higher side"]),
        },
        Review {
            id: "2".to_string(),
            user_id: "user2".to_string(),
            user_name: "Michael Chen".to_string(),
            rating: 4,
            title: "Great product, minor issues with delivery".to_string(),
            content: "The product itself is fantastic - exactly as advertised. The 3D preview \
                      feature really helped me make the right choice. Only complaint is that \
                      delivery took longer than expected, but customer service was very \
                      responsive."
                .to_string(),
            date: date(2024, 1, 10),
            verified: true,
            helpful: 18,
            not_helpful: 1,
            variant: variant("Ocean Blue", "512GB", "Aluminum"),
            pros: strings(&["Accurate 3D preview", "Responsive customer service", "High quality"]),
            cons: strings(&["Slow delivery", "Packaging could be better"]),
        },
        Review {
            id: "3".to_string(),
            user_id: "user3".to_string(),
            user_name: "Emma Rodriguez".to_string(),
            rating: 5,
            title: "Worth every penny - premium experience".to_string(),
            content: "This is my second purchase from this store and they never disappoint. \
                      The interactive 3D viewer made it so easy to customize exactly what I \
                      wanted. The final product exceeded my expectations in every way."
                .to_string(),
            date: date(2024, 1, 8),
            verified: true,
            helpful: 31,
            not_helpful: 0,
            variant: variant("Deep Purple", "1TB", "Ceramic"),
            pros: strings(&["Premium materials", "Perfect customization", "Fast shipping"]),
            cons: Vec::new(),
        },
    ]
}
