//! Query criteria for expense lookups
//!
//! Every read path filters by a (user, inclusive date range) pair. The
//! criteria value is ephemeral: rebuilt per request, never persisted.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::ids::UserId;

/// Normalized (user, date-range) filter used by all expense queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criteria {
    pub user_id: UserId,
    /// Inclusive lower bound
    pub date_from: NaiveDateTime,
    /// Inclusive upper bound
    pub date_to: NaiveDateTime,
}

impl Criteria {
    /// Build criteria covering one calendar month
    ///
    /// The range runs from the first day at 00:00:00 through the month's
    /// actual last day (28/29/30/31) at 23:59:59.
    ///
    /// # Panics
    ///
    /// The caller must validate ranges first; `month` outside 1–12 is a
    /// precondition violation and panics.
    pub fn month(user_id: UserId, year: i32, month: u32) -> Self {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).expect("month must be in 1..=12");
        let last_day = last_day_of_month(year, month);

        Self {
            user_id,
            date_from: first_day.and_hms_opt(0, 0, 0).expect("valid time"),
            date_to: last_day.and_hms_opt(23, 59, 59).expect("valid time"),
        }
    }

    /// Check whether a dated record owned by `user_id` matches
    pub fn matches(&self, user_id: UserId, date: NaiveDate) -> bool {
        let at_midnight = date.and_hms_opt(0, 0, 0).expect("valid time");
        user_id == self.user_id && at_midnight >= self.date_from && at_midnight <= self.date_to
    }
}

/// Last calendar day of a month (first day of the next month minus one day)
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month.expect("month must be in 1..=12") - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let criteria = Criteria::month(UserId(1), 2025, 4);
        assert_eq!(
            criteria.date_from,
            NaiveDate::from_ymd_opt(2025, 4, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(
            criteria.date_to,
            NaiveDate::from_ymd_opt(2025, 4, 30)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap()
        );
    }

    #[test]
    fn test_last_day_handles_leap_years() {
        assert_eq!(
            Criteria::month(UserId(1), 2024, 2).date_to.date(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            Criteria::month(UserId(1), 2023, 2).date_to.date(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
        assert_eq!(
            Criteria::month(UserId(1), 2025, 12).date_to.date(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_matches_user_and_range() {
        let criteria = Criteria::month(UserId(1), 2025, 1);

        assert!(criteria.matches(UserId(1), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(criteria.matches(UserId(1), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
        assert!(!criteria.matches(UserId(1), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
        assert!(!criteria.matches(UserId(2), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
    }

    #[test]
    #[should_panic(expected = "month must be in 1..=12")]
    fn test_out_of_range_month_is_precondition_violation() {
        Criteria::month(UserId(1), 2025, 13);
    }
}
