//! # Review Commands
//!
//! Reviews are shared by every shopper, so the board lives in `AppState`
//! rather than in a session. A product's board is seeded with the sample
//! reviews the first time anyone reads it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use vitrine_core::catalog;
use vitrine_core::reviews::{self, NewReview, Review, ReviewQuery, ReviewStats};

use crate::commands::shopper;
use crate::error::ApiResult;
use crate::state::AppState;

/// Shown for reviews written by a shopper who has not signed in.
pub const ANONYMOUS_REVIEWER: &str = "You";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    /// Stats over every review, not just the filtered page.
    pub stats: ReviewStats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReview {
    /// Attributes the review to the session's signed-in account when set.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub review: NewReview,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteRequest {
    pub helpful: bool,
}

/// `GET /api/products/{id}/reviews?rating&verifiedOnly&sort`
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(query): Query<ReviewQuery>,
) -> ApiResult<Json<ReviewPage>> {
    catalog::descriptor(&product_id)?;

    let mut board = state.reviews();
    let all = board.reviews_for(&product_id);
    Ok(Json(ReviewPage {
        reviews: reviews::list(all, &query),
        stats: reviews::stats(all),
    }))
}

/// `POST /api/products/{id}/reviews`
pub async fn submit_review(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<SubmitReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    catalog::descriptor(&product_id)?;

    let account = match request.session_id {
        Some(sid) => shopper(&state, sid).await?.account(),
        None => None,
    };
    let (user_id, user_name) = match &account {
        Some(account) => (account.user_id.as_str(), account.display_name.as_str()),
        None => ("current-user", ANONYMOUS_REVIEWER),
    };

    let review = state.reviews().submit(
        &product_id,
        user_id,
        user_name,
        request.review,
        Utc::now().date_naive(),
    )?;

    info!(
        product_id = %product_id,
        review_id = %review.id,
        rating = review.rating,
        "Review submitted"
    );
    Ok((StatusCode::CREATED, Json(review)))
}

/// `POST /api/products/{id}/reviews/{review_id}/vote`
pub async fn vote(
    State(state): State<AppState>,
    Path((product_id, review_id)): Path<(String, String)>,
    Json(request): Json<VoteRequest>,
) -> ApiResult<Json<Review>> {
    debug!(
        product_id = %product_id,
        review_id = %review_id,
        helpful = request.helpful,
        "vote command"
    );
    catalog::descriptor(&product_id)?;

    let review = state.reviews().vote(&product_id, &review_id, request.helpful)?;
    Ok(Json(review))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::instant_state;
    use crate::error::ErrorCode;
    use vitrine_core::reviews::ReviewSort;

    fn new_review(rating: u8) -> NewReview {
        NewReview {
            rating,
            title: "Stunning".to_string(),
            content: "Looks even better in person.".to_string(),
            pros: "bright, sturdy, ".to_string(),
            cons: String::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_then_list() {
        let state = instant_state();
        let product = "1".to_string();

        let Json(before) = list_reviews(
            State(state.clone()),
            Path(product.clone()),
            Query(ReviewQuery::default()),
        )
        .await
        .unwrap();

        let (status, Json(review)) = submit_review(
            State(state.clone()),
            Path(product.clone()),
            Json(SubmitReview {
                session_id: None,
                review: new_review(5),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(review.user_name, ANONYMOUS_REVIEWER);
        assert!(review.verified);
        assert_eq!(review.pros, vec!["bright", "sturdy"]);

        let Json(after) = list_reviews(
            State(state),
            Path(product),
            Query(ReviewQuery {
                sort: ReviewSort::Newest,
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(after.stats.total_reviews, before.stats.total_reviews + 1);
        assert_eq!(after.reviews[0].id, review.id);
    }

    #[tokio::test]
    async fn test_invalid_rating_rejected() {
        let state = instant_state();
        let err = submit_review(
            State(state),
            Path("1".to_string()),
            Json(SubmitReview {
                session_id: None,
                review: new_review(0),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_vote_counts() {
        let state = instant_state();
        let Json(page) = list_reviews(
            State(state.clone()),
            Path("2".to_string()),
            Query(ReviewQuery::default()),
        )
        .await
        .unwrap();
        let target = page.reviews[0].clone();

        let Json(voted) = vote(
            State(state.clone()),
            Path(("2".to_string(), target.id.clone())),
            Json(VoteRequest { helpful: true }),
        )
        .await
        .unwrap();
        assert_eq!(voted.helpful, target.helpful + 1);

        let err = vote(
            State(state),
            Path(("2".to_string(), "missing".to_string())),
            Json(VoteRequest { helpful: false }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let state = instant_state();
        let err = list_reviews(
            State(state.clone()),
            Path("9999".to_string()),
            Query(ReviewQuery::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = vote(
            State(state),
            Path(("9999".to_string(), "1".to_string())),
            Json(VoteRequest { helpful: true }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
