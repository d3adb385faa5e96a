//! Credit-card billing-cycle calendar
//!
//! Pure date arithmetic for statements that close on a fixed day of the
//! month. A closing day past the end of a short month closes on that month's
//! last day instead (day 31 closes on Feb 28/29, Apr 30, ...).

use chrono::{Months, NaiveDate};

use super::period::MonthPeriod;

/// Valid closing days
pub const CLOSING_DAYS: std::ops::RangeInclusive<u8> = 1..=31;

/// Closing date of the statement for `month`, clamped to the month's last day
pub fn closing_date_for_month(month: MonthPeriod, closing_day: u8) -> NaiveDate {
    let day = u32::from(closing_day).clamp(1, month.days());
    NaiveDate::from_ymd_opt(month.year(), month.month(), day).unwrap_or_else(|| month.end_date())
}

/// Billing cycle a purchase on `date` belongs to
///
/// Purchases on or before this month's closing date land on this month's
/// statement; later purchases roll to the next month's.
pub fn billing_cycle_for(date: NaiveDate, closing_day: u8) -> MonthPeriod {
    let month = MonthPeriod::of(date);
    if date <= closing_date_for_month(month, closing_day) {
        month
    } else {
        month.next()
    }
}

/// Statement closing date a purchase on `date` is billed on
pub fn due_date_for(date: NaiveDate, closing_day: u8) -> NaiveDate {
    closing_date_for_month(billing_cycle_for(date, closing_day), closing_day)
}

/// Next statement closing date as seen from `today` (today itself counts)
pub fn next_closing_date(today: NaiveDate, closing_day: u8) -> NaiveDate {
    due_date_for(today, closing_day)
}

/// Shift a date by whole calendar months, keeping the day of month and
/// clamping to the last day when the target month is shorter
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthPeriod {
        MonthPeriod::new(y, m).unwrap()
    }

    #[test]
    fn test_closing_date_existing_day() {
        assert_eq!(closing_date_for_month(month(2024, 1), 15), date(2024, 1, 15));
        assert_eq!(closing_date_for_month(month(2024, 3), 31), date(2024, 3, 31));
    }

    #[test]
    fn test_closing_date_clamps_in_february() {
        for closing_day in 29..=31 {
            assert_eq!(
                closing_date_for_month(month(2024, 2), closing_day),
                date(2024, 2, 29)
            );
            assert_eq!(
                closing_date_for_month(month(2023, 2), closing_day),
                date(2023, 2, 28)
            );
        }
        assert_eq!(closing_date_for_month(month(2100, 2), 30), date(2100, 2, 28));
        assert_eq!(closing_date_for_month(month(2000, 2), 30), date(2000, 2, 29));
    }

    #[test]
    fn test_closing_date_clamps_thirty_day_months() {
        assert_eq!(closing_date_for_month(month(2024, 4), 31), date(2024, 4, 30));
        assert_eq!(closing_date_for_month(month(2024, 11), 31), date(2024, 11, 30));
    }

    #[test]
    fn test_billing_cycle_before_and_after_closing() {
        assert_eq!(billing_cycle_for(date(2024, 1, 10), 15), month(2024, 1));
        assert_eq!(billing_cycle_for(date(2024, 1, 15), 15), month(2024, 1));
        assert_eq!(billing_cycle_for(date(2024, 1, 16), 15), month(2024, 2));
    }

    #[test]
    fn test_billing_cycle_year_rollover() {
        assert_eq!(billing_cycle_for(date(2024, 12, 20), 10), month(2025, 1));
        assert_eq!(due_date_for(date(2024, 12, 20), 10), date(2025, 1, 10));
    }

    #[test]
    fn test_billing_cycle_short_month() {
        // Feb 29 is on the clamped closing date of a day-31 card
        assert_eq!(billing_cycle_for(date(2024, 2, 29), 31), month(2024, 2));
        // Jan 31 rolls from a day-30 card into February, which closes on the 29th
        assert_eq!(due_date_for(date(2024, 1, 31), 30), date(2024, 2, 29));
    }

    #[test]
    fn test_billing_cycle_is_monotonic() {
        for closing_day in CLOSING_DAYS {
            let mut current = date(2023, 11, 1);
            let mut previous = billing_cycle_for(current, closing_day);
            while current < date(2025, 3, 1) {
                current = current.succ_opt().unwrap();
                let cycle = billing_cycle_for(current, closing_day);
                assert!(cycle >= previous, "day {} went backwards", current);
                previous = cycle;
            }
        }
    }

    #[test]
    fn test_next_closing_date() {
        // Leap year clamp
        assert_eq!(next_closing_date(date(2024, 2, 10), 31), date(2024, 2, 29));
        // Closing day itself is still this cycle
        assert_eq!(next_closing_date(date(2024, 3, 15), 15), date(2024, 3, 15));
        // Past closing moves to next month
        assert_eq!(next_closing_date(date(2024, 3, 16), 15), date(2024, 4, 15));
        // Past closing into a short month clamps again
        assert_eq!(next_closing_date(date(2024, 1, 31), 30), date(2024, 2, 29));
        assert_eq!(next_closing_date(date(2024, 12, 31), 5), date(2025, 1, 5));
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(add_months(date(2024, 1, 20), 0), date(2024, 1, 20));
        assert_eq!(add_months(date(2024, 1, 20), 2), date(2024, 3, 20));
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 11, 30), 3), date(2025, 2, 28));
    }
}
