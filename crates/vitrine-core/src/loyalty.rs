//! # Loyalty Program
//!
//! Point tiers, the rewards catalog and a shopper's point ledger.
//!
//! ## Tiers
//! ```text
//! ┌───────────────────┬────────────┬────────────┐
//! │ Tier              │ Min points │ Multiplier │
//! ├───────────────────┼────────────┼────────────┤
//! │ Bronze Explorer   │      0     │    ×1      │
//! │ Silver Collector  │   1000     │    ×1.5    │
//! │ Gold Connoisseur  │   2500     │    ×2      │
//! │ Platinum Elite    │   5000     │    ×3      │
//! └───────────────────┴────────────┴────────────┘
//! ```
//!
//! The tier is always derived from the current point balance. Multipliers
//! are stored in tenths so earning stays in integer math.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Tiers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TierId {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyTier {
    pub id: TierId,
    pub name: &'static str,
    pub min_points: u32,
    /// Points multiplier × 10 (15 = ×1.5).
    pub multiplier_tenths: u32,
    pub benefits: &'static [&'static str],
}

/// Tiers in ascending order.
pub const TIERS: [LoyaltyTier; 4] = [
    LoyaltyTier {
        id: TierId::Bronze,
        name: "Bronze Explorer",
        min_points: 0,
        multiplier_tenths: 10,
        benefits: &["1x points on purchases", "Birthday discount", "Free shipping on orders $100+"],
    },
    LoyaltyTier {
        id: TierId::Silver,
        name: "Silver Collector",
        min_points: 1000,
        multiplier_tenths: 15,
        benefits: &[
            "1.5x points on purchases",
            "Early access to sales",
            "Free shipping on orders $75+",
            "Priority support",
        ],
    },
    LoyaltyTier {
        id: TierId::Gold,
        name: "Gold Connoisseur",
        min_points: 2500,
        multiplier_tenths: 20,
        benefits: &[
            "2x points on purchases",
            "Exclusive products",
            "Free shipping on all orders",
            "Personal shopping assistant",
            "VIP customer service",
        ],
    },
    LoyaltyTier {
        id: TierId::Platinum,
        name: "Platinum Elite",
        min_points: 5000,
        multiplier_tenths: 30,
        benefits: &[
            "3x points on purchases",
            "First access to new collections",
            "Complimentary gift wrapping",
            "Exclusive events invitations",
            "Dedicated account manager",
            "Custom product requests",
        ],
    },
];

/// Highest tier whose minimum the balance reaches.
pub fn tier_for(points: u32) -> &'static LoyaltyTier {
    TIERS
        .iter()
        .rev()
        .find(|tier| points >= tier.min_points)
        .unwrap_or(&TIERS[0])
}

/// The tier after `tier`, if any.
pub fn next_tier(tier: TierId) -> Option<&'static LoyaltyTier> {
    let index = TIERS.iter().position(|t| t.id == tier)?;
    TIERS.get(index + 1)
}

// =============================================================================
// Rewards
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    Discount,
    Freebie,
    Exclusive,
    Experience,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyReward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points_cost: u32,
    pub reward_type: RewardType,
    pub available: bool,
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
    pub category: String,
}

impl LoyaltyReward {
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.available && self.expires_at.map_or(true, |at| at > now)
    }
}

fn reward(
    id: &str,
    name: &str,
    description: &str,
    points_cost: u32,
    reward_type: RewardType,
    category: &str,
) -> LoyaltyReward {
    LoyaltyReward {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        points_cost,
        reward_type,
        available: true,
        expires_at: None,
        category: category.to_string(),
    }
}

/// The rewards catalog. Time-limited rewards expire relative to `now`.
pub fn rewards_catalog(now: DateTime<Utc>) -> Vec<LoyaltyReward> {
    let mut premium = reward(
        "5",
        "25% Off Premium Items",
        "Exclusive discount on premium collection",
        1200,
        RewardType::Discount,
        "Discounts",
    );
    premium.expires_at = Some(now + Duration::days(7));

    vec![
        reward(
            "1",
            "10% Off Next Purchase",
            "Save 10% on your next order",
            500,
            RewardType::Discount,
            "Discounts",
        ),
        reward(
            "2",
            "Free Premium Shipping",
            "Complimentary express shipping on your next order",
            300,
            RewardType::Freebie,
            "Shipping",
        ),
        reward(
            "3",
            "Exclusive Crystal Keychain",
            "Limited edition crystal keychain - members only",
            800,
            RewardType::Exclusive,
            "Merchandise",
        ),
        reward(
            "4",
            "VIP Shopping Experience",
            "Personal shopping session with our expert",
            2000,
            RewardType::Experience,
            "Experiences",
        ),
        premium,
        reward(
            "6",
            "Early Access Pass",
            "24-hour early access to new product launches",
            1500,
            RewardType::Exclusive,
            "Access",
        ),
    ]
}

// =============================================================================
// Account & Ledger
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Earned,
    Redeemed,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyActivity {
    pub id: String,
    pub kind: ActivityKind,
    /// Negative for redemptions.
    pub points: i64,
    pub description: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub order_id: Option<String>,
}

/// One shopper's loyalty state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyAccount {
    pub current_points: u32,
    pub total_earned: u32,
    pub member_since: NaiveDate,
    pub total_spent: Money,
    pub orders_count: u32,
    pub referrals: u32,
    /// Newest first.
    pub activities: Vec<LoyaltyActivity>,
    pub rewards: Vec<LoyaltyReward>,
}

/// Read model for the loyalty dashboard.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySummary {
    pub current_points: u32,
    pub total_earned: u32,
    pub tier: TierId,
    pub tier_name: String,
    pub next_tier: Option<TierId>,
    pub points_to_next_tier: u32,
    pub progress_percent: f32,
    #[ts(as = "String")]
    pub member_since: NaiveDate,
    pub total_spent: Money,
    pub orders_count: u32,
    pub referrals: u32,
}

impl LoyaltyAccount {
    /// A fresh member with no points.
    pub fn new(today: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            current_points: 0,
            total_earned: 0,
            member_since: today,
            total_spent: Money::zero(),
            orders_count: 0,
            referrals: 0,
            activities: Vec::new(),
            rewards: rewards_catalog(now),
        }
    }

    /// The demo member shown to every new shopper session.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let activity =
            |id: &str, kind, points, description: &str, days_ago, order_id: Option<&str>| {
                LoyaltyActivity {
                    id: id.to_string(),
                    kind,
                    points,
                    description: description.to_string(),
                    date: now - Duration::days(days_ago),
                    order_id: order_id.map(str::to_string),
                }
            };

        Self {
            current_points: 1750,
            total_earned: 3200,
            member_since: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap_or_default(),
            total_spent: Money::from_major_minor(4500, 0),
            orders_count: 12,
            referrals: 3,
            activities: vec![
                activity(
                    "1",
                    ActivityKind::Earned,
                    150,
                    "Purchase: Crystal Dragon Figurine",
                    2,
                    Some("ORD-001"),
                ),
                activity("2", ActivityKind::Earned, 50, "Product review bonus", 5, None),
                activity(
                    "3",
                    ActivityKind::Redeemed,
                    -500,
                    "Redeemed: 10% Off Next Purchase",
                    7,
                    None,
                ),
                activity("4", ActivityKind::Earned, 100, "Referral bonus", 10, None),
            ],
            rewards: rewards_catalog(now),
        }
    }

    pub fn tier(&self) -> &'static LoyaltyTier {
        tier_for(self.current_points)
    }

    pub fn next_tier(&self) -> Option<&'static LoyaltyTier> {
        next_tier(self.tier().id)
    }

    /// Zero at the top tier.
    pub fn points_to_next_tier(&self) -> u32 {
        self.next_tier()
            .map_or(0, |next| next.min_points.saturating_sub(self.current_points))
    }

    /// Progress from the current tier's minimum to the next tier's, 0-100.
    pub fn progress_percent(&self) -> f32 {
        let tier = self.tier();
        match self.next_tier() {
            Some(next) => {
                let span = (next.min_points - tier.min_points) as f32;
                let done = (self.current_points - tier.min_points) as f32;
                (done / span * 100.0).clamp(0.0, 100.0)
            }
            None => 100.0,
        }
    }

    pub fn summary(&self) -> LoyaltySummary {
        let tier = self.tier();
        LoyaltySummary {
            current_points: self.current_points,
            total_earned: self.total_earned,
            tier: tier.id,
            tier_name: tier.name.to_string(),
            next_tier: self.next_tier().map(|t| t.id),
            points_to_next_tier: self.points_to_next_tier(),
            progress_percent: self.progress_percent(),
            member_since: self.member_since,
            total_spent: self.total_spent,
            orders_count: self.orders_count,
            referrals: self.referrals,
        }
    }

    /// Spends points on a reward and records the redemption.
    pub fn redeem(&mut self, reward_id: &str, now: DateTime<Utc>) -> CoreResult<LoyaltyActivity> {
        let reward = self
            .rewards
            .iter()
            .find(|r| r.id == reward_id)
            .ok_or_else(|| CoreError::RewardNotFound(reward_id.to_string()))?;

        if !reward.is_redeemable_at(now) {
            return Err(CoreError::RewardUnavailable(reward_id.to_string()));
        }

        if self.current_points < reward.points_cost {
            return Err(CoreError::InsufficientPoints {
                required: reward.points_cost,
                available: self.current_points,
            });
        }

        let activity = LoyaltyActivity {
            id: Uuid::new_v4().to_string(),
            kind: ActivityKind::Redeemed,
            points: -i64::from(reward.points_cost),
            description: format!("Redeemed: {}", reward.name),
            date: now,
            order_id: None,
        };

        self.current_points -= reward.points_cost;
        self.activities.insert(0, activity.clone());
        Ok(activity)
    }

    /// Credits points for a completed order: whole dollars × tier
    /// multiplier, rounded down. Returns the points earned.
    pub fn earn_for_purchase(&mut self, amount: Money, order_id: &str, now: DateTime<Utc>) -> u32 {
        let dollars = u32::try_from(amount.dollars().max(0)).unwrap_or(u32::MAX);
        let points = dollars.saturating_mul(self.tier().multiplier_tenths) / 10;

        self.current_points = self.current_points.saturating_add(points);
        self.total_earned = self.total_earned.saturating_add(points);
        self.total_spent += amount;
        self.orders_count += 1;
        self.activities.insert(
            0,
            LoyaltyActivity {
                id: Uuid::new_v4().to_string(),
                kind: ActivityKind::Earned,
                points: i64::from(points),
                description: format!("Purchase: order {order_id}"),
                date: now,
                order_id: Some(order_id.to_string()),
            },
        );

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_for_points() {
        assert_eq!(tier_for(0).id, TierId::Bronze);
        assert_eq!(tier_for(999).id, TierId::Bronze);
        assert_eq!(tier_for(1000).id, TierId::Silver);
        assert_eq!(tier_for(2500).id, TierId::Gold);
        assert_eq!(tier_for(10_000).id, TierId::Platinum);
        assert!(next_tier(TierId::Platinum).is_none());
    }

    #[test]
    fn test_sample_account_progress() {
        let account = LoyaltyAccount::sample(Utc::now());
        let summary = account.summary();

        assert_eq!(summary.tier, TierId::Silver);
        assert_eq!(summary.next_tier, Some(TierId::Gold));
        assert_eq!(summary.points_to_next_tier, 750);
        assert!((summary.progress_percent - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_top_tier_progress_is_full() {
        let mut account = LoyaltyAccount::sample(Utc::now());
        account.current_points = 7000;
        assert_eq!(account.points_to_next_tier(), 0);
        assert_eq!(account.progress_percent(), 100.0);
    }

    #[test]
    fn test_redeem_deducts_and_records() {
        let now = Utc::now();
        let mut account = LoyaltyAccount::sample(now);

        let activity = account.redeem("3", now).unwrap();
        assert_eq!(account.current_points, 950);
        assert_eq!(activity.points, -800);
        assert_eq!(activity.description, "Redeemed: Exclusive Crystal Keychain");
        assert_eq!(account.activities[0], activity);
        assert_eq!(account.activities.len(), 5);

        // Balance drops below the silver threshold.
        assert_eq!(account.tier().id, TierId::Bronze);
    }

    #[test]
    fn test_redeem_rejections() {
        let now = Utc::now();
        let mut account = LoyaltyAccount::sample(now);

        let err = account.redeem("4", now).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientPoints {
                required: 2000,
                available: 1750
            }
        ));

        assert!(matches!(account.redeem("99", now), Err(CoreError::RewardNotFound(_))));

        let later = now + Duration::days(8);
        assert!(matches!(account.redeem("5", later), Err(CoreError::RewardUnavailable(_))));

        account.rewards[0].available = false;
        assert!(matches!(account.redeem("1", now), Err(CoreError::RewardUnavailable(_))));

        assert_eq!(account.current_points, 1750);
        assert_eq!(account.activities.len(), 4);
    }

    #[test]
    fn test_earn_uses_tier_multiplier() {
        let now = Utc::now();
        let mut account = LoyaltyAccount::sample(now);

        // silver ×1.5 on $1,079.99 → 1079 × 1.5 = 1618.5 → 1618
        let points = account.earn_for_purchase(Money::from_cents(107_999), "ORD-100", now);
        assert_eq!(points, 1618);
        assert_eq!(account.current_points, 1750 + 1618);
        assert_eq!(account.orders_count, 13);
        assert_eq!(account.activities[0].order_id.as_deref(), Some("ORD-100"));
    }
}
