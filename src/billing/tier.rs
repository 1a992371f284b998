use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PlanCode, Subscription};

/// Subscription classification derived from plan code + activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Trial,
    Premium,
    Lifetime,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Trial => "trial",
            Tier::Premium => "premium",
            Tier::Lifetime => "lifetime",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entitlement {
    pub tier: Tier,
    pub has_premium: bool,
}

impl Entitlement {
    pub const FREE: Entitlement = Entitlement {
        tier: Tier::Free,
        has_premium: false,
    };
}

/// Resolve a subscription record to a tier and premium flag.
///
/// The single entitlement predicate for the whole service. Every gate,
/// client-facing or server-side, must call this — a second implementation
/// is how the client and server start disagreeing about who is premium.
///
/// A subscription is active iff `status == "active"` and `ends_at` is
/// either absent or in the future. Nothing else influences activity:
/// a canceled subscription with a future `ends_at` is NOT active, and an
/// "active" one past its `ends_at` is expired.
pub fn resolve(sub: Option<&Subscription>, now: DateTime<Utc>) -> Entitlement {
    let Some(sub) = sub else {
        return Entitlement::FREE;
    };

    let is_active = sub.status == "active" && sub.ends_at.map_or(true, |ends| ends > now);
    if !is_active {
        return Entitlement::FREE;
    }

    let tier = match sub.plan_code.as_deref().and_then(PlanCode::from_str) {
        Some(PlanCode::Trial) | Some(PlanCode::Trial30d) => Tier::Trial,
        Some(PlanCode::PremiumMonthly) | Some(PlanCode::PremiumYearly) => Tier::Premium,
        Some(PlanCode::Lifetime) => Tier::Lifetime,
        None => Tier::Free,
    };

    Entitlement {
        tier,
        has_premium: tier != Tier::Free,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn make_sub(plan: Option<&str>, status: &str, ends_at: Option<DateTime<Utc>>) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_code: plan.map(str::to_string),
            status: status.to_string(),
            ends_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_subscription_is_free() {
        let e = resolve(None, Utc::now());
        assert_eq!(e.tier, Tier::Free);
        assert!(!e.has_premium);
    }

    #[test]
    fn test_active_monthly_with_future_expiry() {
        let now = Utc::now();
        let sub = make_sub(Some("premium_monthly"), "active", Some(now + Duration::hours(1)));
        let e = resolve(Some(&sub), now);
        assert_eq!(e.tier, Tier::Premium);
        assert!(e.has_premium);
    }

    #[test]
    fn test_expired_despite_active_status() {
        let now = Utc::now();
        let sub = make_sub(Some("premium_monthly"), "active", Some(now - Duration::hours(1)));
        let e = resolve(Some(&sub), now);
        assert_eq!(e.tier, Tier::Free);
        assert!(!e.has_premium);
    }

    #[test]
    fn test_lifetime_without_expiry() {
        let sub = make_sub(Some("lifetime"), "active", None);
        let e = resolve(Some(&sub), Utc::now());
        assert_eq!(e.tier, Tier::Lifetime);
        assert!(e.has_premium);
    }

    #[test]
    fn test_canceled_overrides_future_expiry() {
        let now = Utc::now();
        let sub = make_sub(Some("trial"), "canceled", Some(now + Duration::days(10)));
        let e = resolve(Some(&sub), now);
        assert_eq!(e.tier, Tier::Free);
        assert!(!e.has_premium);
    }

    #[test]
    fn test_trial_variants_map_to_trial() {
        let now = Utc::now();
        for plan in ["trial", "trial_30d"] {
            let sub = make_sub(Some(plan), "active", Some(now + Duration::days(5)));
            let e = resolve(Some(&sub), now);
            assert_eq!(e.tier, Tier::Trial);
            assert!(e.has_premium);
        }
    }

    #[test]
    fn test_unknown_or_missing_plan_is_free_even_when_active() {
        let now = Utc::now();
        for plan in [None, Some("enterprise")] {
            let sub = make_sub(plan, "active", None);
            let e = resolve(Some(&sub), now);
            assert_eq!(e.tier, Tier::Free);
            assert!(!e.has_premium);
        }
    }

    #[test]
    fn test_expiry_exactly_now_is_expired() {
        let now = Utc::now();
        let sub = make_sub(Some("premium_yearly"), "active", Some(now));
        let e = resolve(Some(&sub), now);
        assert_eq!(e.tier, Tier::Free);
    }
}
