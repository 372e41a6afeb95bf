//! # Loyalty Commands
//!
//! The loyalty dashboard: balance and tier progress, activity history, the
//! rewards catalog and redemption.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;
use vitrine_core::loyalty::{LoyaltyActivity, LoyaltyReward, LoyaltySummary, LoyaltyTier, TIERS};

use crate::commands::shopper;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardView {
    #[serde(flatten)]
    pub reward: LoyaltyReward,
    /// Available, unexpired and affordable right now.
    pub can_redeem: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub activity: LoyaltyActivity,
    pub summary: LoyaltySummary,
}

/// `GET /api/sessions/{sid}/loyalty`
pub async fn summary(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<LoyaltySummary>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.with_loyalty(|account| account.summary())))
}

/// `GET /api/sessions/{sid}/loyalty/activities`
///
/// Newest first.
pub async fn activities(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<Vec<LoyaltyActivity>>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.with_loyalty(|account| account.activities.clone())))
}

/// `GET /api/sessions/{sid}/loyalty/rewards`
pub async fn rewards(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<Vec<RewardView>>> {
    let session = shopper(&state, sid).await?;
    let now = Utc::now();

    let views: Vec<RewardView> = session.with_loyalty(|account| {
        account
            .rewards
            .iter()
            .map(|reward| RewardView {
                can_redeem: reward.is_redeemable_at(now)
                    && account.current_points >= reward.points_cost,
                reward: reward.clone(),
            })
            .collect()
    });
    Ok(Json(views))
}

/// `POST /api/sessions/{sid}/loyalty/rewards/{reward_id}/redeem`
pub async fn redeem(
    State(state): State<AppState>,
    Path((sid, reward_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<Redemption>> {
    debug!(session = %sid, reward_id = %reward_id, "redeem command");
    let session = shopper(&state, sid).await?;

    let redemption = session.with_loyalty(|account| {
        account.redeem(&reward_id, Utc::now()).map(|activity| Redemption {
            activity,
            summary: account.summary(),
        })
    })?;

    info!(
        session = %sid,
        reward_id = %reward_id,
        points = redemption.activity.points,
        remaining = redemption.summary.current_points,
        "Reward redeemed"
    );
    Ok(Json(redemption))
}

/// `GET /api/loyalty/tiers`
pub async fn tiers() -> Json<Vec<LoyaltyTier>> {
    Json(TIERS.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::create_session;
    use crate::commands::test_support::instant_state;
    use crate::error::ErrorCode;
    use vitrine_core::loyalty::TierId;

    async fn new_session(state: &AppState) -> Uuid {
        let (_, Json(created)) = create_session(State(state.clone())).await;
        created.session_id
    }

    #[tokio::test]
    async fn test_sample_member_summary() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let Json(summary) = summary(State(state), Path(sid)).await.unwrap();
        assert_eq!(summary.current_points, 1750);
        assert_eq!(summary.tier, TierId::Silver);
        assert_eq!(summary.next_tier, Some(TierId::Gold));
    }

    #[tokio::test]
    async fn test_rewards_flag_affordability() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let Json(views) = rewards(State(state), Path(sid)).await.unwrap();
        let vip = views.iter().find(|v| v.reward.id == "4").unwrap();
        assert!(!vip.can_redeem);
        let shipping = views.iter().find(|v| v.reward.id == "2").unwrap();
        assert!(shipping.can_redeem);
    }

    #[tokio::test]
    async fn test_redeem_deducts_and_records() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let Json(redemption) = redeem(State(state.clone()), Path((sid, "1".to_string())))
            .await
            .unwrap();
        assert_eq!(redemption.activity.points, -500);
        assert_eq!(redemption.summary.current_points, 1250);

        let Json(history) = activities(State(state), Path(sid)).await.unwrap();
        assert_eq!(history[0].id, redemption.activity.id);
    }

    #[tokio::test]
    async fn test_redeem_rejections() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let err = redeem(State(state.clone()), Path((sid, "4".to_string())))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientPoints);

        let err = redeem(State(state.clone()), Path((sid, "99".to_string())))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        // Failed redemptions leave the balance alone.
        let Json(summary) = summary(State(state), Path(sid)).await.unwrap();
        assert_eq!(summary.current_points, 1750);
    }

    #[tokio::test]
    async fn test_tiers_ascend() {
        let Json(tiers) = tiers().await;
        assert_eq!(tiers.len(), 4);
        assert!(tiers.windows(2).all(|w| w[0].min_points < w[1].min_points));
    }
}
