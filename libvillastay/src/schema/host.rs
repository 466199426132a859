//! Host-side records: host profile, payouts, loyalty credits, pricing hints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Host {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema for Host {
    const ENTITY: &'static str = "Host";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Payout {
    pub id: String,
    pub host_id: String,
    #[validate(range(min = 0.0))]
    pub amount_usd: f64,
    pub status: PayoutStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schema for Payout {
    const ENTITY: &'static str = "Payout";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct LoyaltyCredit {
    pub id: String,
    pub user_id: String,
    pub amount_usd: f64,
    pub reason: String,
    #[serde(default)]
    pub redeemed: bool,
    #[serde(default)]
    pub redeemed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoyaltyCredit {
    /// Unredeemed and not past its expiry at `now`
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        !self.redeemed && self.expires_at.map_or(true, |expires| expires > now)
    }
}

impl Schema for LoyaltyCredit {
    const ENTITY: &'static str = "LoyaltyCredit";

    fn extra_checks(&self) -> Result<(), String> {
        if self.redeemed_at.is_some() && !self.redeemed {
            return Err("redeemed_at set on an unredeemed credit".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct PricingRecommendation {
    pub villa_id: String,
    #[validate(range(min = 0.0))]
    pub recommended_price: f64,
    #[validate(range(min = 0.0))]
    pub current_price: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    pub reason: String,
}

impl PricingRecommendation {
    /// Relative change the recommendation suggests, e.g. 0.1 for +10%
    pub fn change_ratio(&self) -> Option<f64> {
        if self.current_price > 0.0 {
            Some((self.recommended_price - self.current_price) / self.current_price)
        } else {
            None
        }
    }
}

impl Schema for PricingRecommendation {
    const ENTITY: &'static str = "PricingRecommendation";
}
