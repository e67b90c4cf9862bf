//! Rent cycle arithmetic.
//!
//! Everything here is pure: callers pass `now` in, which keeps the status
//! derivation and the sweep eligibility predicate independently testable.
//! The `rent_status` column on a tenancy is a write-time cache maintained by
//! the payment recorder; readers derive the current position through
//! [`rent_position`] instead of trusting the stored value.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Due day assigned to tenancies created through code redemption.
pub const DEFAULT_RENT_DUE_DAY: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RentStatus {
    Paid,
    Pending,
    Overdue,
}

/// Derived position of a tenancy within its current rent cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentPosition {
    pub status: RentStatus,
    pub due_date: NaiveDate,
    /// Whole days from today to the due date; negative when overdue.
    pub days_until_due: i64,
}

/// Due date for the given month, clamping days 29-31 to the month's last day
/// (due day 31 in February resolves to February 28/29).
pub fn due_date_in_month(year: i32, month: u32, due_day: u8) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, u32::from(due_day))
        .or_else(|| last_day_of_month(year, month))
        .unwrap_or_default()
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = next_month(year, month);
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Compute where a tenancy stands in the current rent cycle.
///
/// A payment dated anywhere inside the current calendar month settles the
/// cycle; the due date then advances to next month's due day. Otherwise the
/// cycle is `Pending` until the due date passes and `Overdue` after.
pub fn rent_position(
    last_payment: Option<NaiveDate>,
    rent_due_day: u8,
    now: DateTime<Utc>,
) -> RentPosition {
    let today = now.date_naive();
    let this_due = due_date_in_month(today.year(), today.month(), rent_due_day);

    if let Some(paid) = last_payment {
        if paid.year() == today.year() && paid.month() == today.month() {
            let (ny, nm) = next_month(today.year(), today.month());
            let next_due = due_date_in_month(ny, nm, rent_due_day);
            return RentPosition {
                status: RentStatus::Paid,
                due_date: next_due,
                days_until_due: (next_due - today).num_days(),
            };
        }
    }

    let status = if today > this_due {
        RentStatus::Overdue
    } else {
        RentStatus::Pending
    };
    RentPosition {
        status,
        due_date: this_due,
        days_until_due: (this_due - today).num_days(),
    }
}

/// Monthly sweep eligibility: unresolved cached status, or no payment
/// recorded inside the current calendar month.
pub fn needs_reminder(
    cached_status: RentStatus,
    last_payment: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> bool {
    if cached_status != RentStatus::Paid {
        return true;
    }
    let today = now.date_naive();
    match last_payment {
        None => true,
        Some(paid) => paid.year() != today.year() || paid.month() != today.month(),
    }
}

/// Cycle key used to deduplicate sweep reminders, e.g. `"2026-08"`.
pub fn cycle_key(now: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", now.year(), now.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 10, 30, 0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn never_paid_is_pending_until_due_day_passes() {
        for due_day in 1..=28u8 {
            for today in 1..=28u32 {
                let pos = rent_position(None, due_day, at(2025, 3, today));
                if today > u32::from(due_day) {
                    assert_eq!(pos.status, RentStatus::Overdue, "day {today} due {due_day}");
                    assert!(pos.days_until_due < 0);
                } else {
                    assert_eq!(pos.status, RentStatus::Pending, "day {today} due {due_day}");
                    assert!(pos.days_until_due >= 0);
                }
            }
        }
    }

    #[test]
    fn due_on_the_due_day_itself_is_still_pending() {
        let pos = rent_position(None, 5, at(2025, 3, 5));
        assert_eq!(pos.status, RentStatus::Pending);
        assert_eq!(pos.days_until_due, 0);
        assert_eq!(pos.due_date, date(2025, 3, 5));
    }

    #[test]
    fn payment_this_month_settles_the_cycle() {
        let pos = rent_position(Some(date(2025, 3, 10)), 5, at(2025, 3, 20));
        assert_eq!(pos.status, RentStatus::Paid);
        assert_eq!(pos.due_date, date(2025, 4, 5));
        assert_eq!(pos.days_until_due, 16);
    }

    #[test]
    fn stale_payment_reopens_the_cycle() {
        let pos = rent_position(Some(date(2025, 2, 10)), 5, at(2025, 3, 8));
        assert_eq!(pos.status, RentStatus::Overdue);
        assert_eq!(pos.due_date, date(2025, 3, 5));
        assert_eq!(pos.days_until_due, -3);
    }

    #[test]
    fn december_payment_rolls_due_date_into_january() {
        let pos = rent_position(Some(date(2025, 12, 3)), 5, at(2025, 12, 10));
        assert_eq!(pos.status, RentStatus::Paid);
        assert_eq!(pos.due_date, date(2026, 1, 5));
    }

    #[test]
    fn due_day_clamps_to_end_of_short_months() {
        assert_eq!(due_date_in_month(2025, 2, 31), date(2025, 2, 28));
        assert_eq!(due_date_in_month(2024, 2, 30), date(2024, 2, 29));
        assert_eq!(due_date_in_month(2025, 4, 31), date(2025, 4, 30));
        assert_eq!(due_date_in_month(2025, 1, 31), date(2025, 1, 31));
    }

    #[test]
    fn clamped_due_day_stays_pending_through_month_end() {
        // Due day 31 in February clamps to the 28th; the 28th itself is the
        // due date, so nothing is overdue within the month.
        let pos = rent_position(None, 31, at(2025, 2, 27));
        assert_eq!(pos.status, RentStatus::Pending);
        let pos = rent_position(None, 31, at(2025, 2, 28));
        assert_eq!(pos.status, RentStatus::Pending);
    }

    #[test]
    fn reminder_needed_unless_paid_within_current_month() {
        let now = at(2025, 3, 4);
        assert!(needs_reminder(RentStatus::Pending, None, now));
        assert!(needs_reminder(RentStatus::Overdue, Some(date(2025, 3, 1)), now));
        assert!(needs_reminder(RentStatus::Paid, None, now));
        assert!(needs_reminder(RentStatus::Paid, Some(date(2025, 2, 5)), now));
        assert!(!needs_reminder(RentStatus::Paid, Some(date(2025, 3, 2)), now));
    }

    #[test]
    fn cycle_key_is_year_month() {
        assert_eq!(cycle_key(at(2025, 3, 4)), "2025-03");
        assert_eq!(cycle_key(at(2026, 12, 31)), "2026-12");
    }
}
