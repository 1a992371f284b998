use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Database row for subscriptions. One logical subscription per user;
/// "canceled" leaves `ends_at` in place so access persists until expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_code: Option<String>,
    pub status: String,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanCode {
    Trial,
    Trial30d,
    PremiumMonthly,
    PremiumYearly,
    Lifetime,
}

impl PlanCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanCode::Trial => "trial",
            PlanCode::Trial30d => "trial_30d",
            PlanCode::PremiumMonthly => "premium_monthly",
            PlanCode::PremiumYearly => "premium_yearly",
            PlanCode::Lifetime => "lifetime",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(PlanCode::Trial),
            "trial_30d" => Some(PlanCode::Trial30d),
            "premium_monthly" => Some(PlanCode::PremiumMonthly),
            "premium_yearly" => Some(PlanCode::PremiumYearly),
            "lifetime" => Some(PlanCode::Lifetime),
            _ => None,
        }
    }
}

impl fmt::Display for PlanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
