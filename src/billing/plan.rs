use chrono::{DateTime, Days, Months, Utc};

use crate::models::PlanCode;

/// Compute the expiry instant for a plan granted at `start`.
///
/// Trials run exactly 30 days. Paid plans use calendar increments so a
/// renewal lands on the same day-of-month the user signed up on, clamped
/// to the last valid day when the target month is shorter
/// (2025-01-31 + 1 month = 2025-02-28). Lifetime has no expiry.
///
/// `checked_add_*` only returns None at the edge of representable time,
/// which collapses into "no expiry" here.
pub fn expiry_for_plan(plan: PlanCode, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match plan {
        PlanCode::Trial | PlanCode::Trial30d => start.checked_add_days(Days::new(30)),
        PlanCode::PremiumMonthly => start.checked_add_months(Months::new(1)),
        PlanCode::PremiumYearly => start.checked_add_months(Months::new(12)),
        PlanCode::Lifetime => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let end = expiry_for_plan(PlanCode::PremiumMonthly, at(2025, 1, 31)).unwrap();
        assert_eq!(end, at(2025, 2, 28));
    }

    #[test]
    fn test_monthly_keeps_day_of_month() {
        let end = expiry_for_plan(PlanCode::PremiumMonthly, at(2025, 3, 15)).unwrap();
        assert_eq!(end, at(2025, 4, 15));
    }

    #[test]
    fn test_yearly_clamps_leap_day() {
        let end = expiry_for_plan(PlanCode::PremiumYearly, at(2024, 2, 29)).unwrap();
        assert_eq!(end, at(2025, 2, 28));
    }

    #[test]
    fn test_trial_is_exactly_30_days() {
        for plan in [PlanCode::Trial, PlanCode::Trial30d] {
            let end = expiry_for_plan(plan, at(2025, 1, 31)).unwrap();
            assert_eq!(end, at(2025, 3, 2));
        }
    }

    #[test]
    fn test_lifetime_has_no_expiry() {
        assert_eq!(expiry_for_plan(PlanCode::Lifetime, at(2025, 1, 1)), None);
    }
}
