//! Calendar month arithmetic shared by the schedule, the end date and the progress evaluator.

use chrono::{Months, NaiveDate};

/// Advances `date` by `months` calendar months.
///
/// The day of month is kept when the target month has it, otherwise it is clamped to the
/// last day of that month (`2024-01-31` + 1 month = `2024-02-29`). Always advance from the
/// original date: chaining one-month steps would carry a clamped day into later months.
///
/// Saturates at `NaiveDate::MAX` when the result is outside chrono's range.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(ymd(2024, 1, 15), 0, ymd(2024, 1, 15))]
    #[case(ymd(2024, 1, 15), 9, ymd(2024, 10, 15))]
    #[case(ymd(2024, 1, 31), 1, ymd(2024, 2, 29))]
    #[case(ymd(2023, 1, 31), 1, ymd(2023, 2, 28))]
    #[case(ymd(2024, 1, 31), 2, ymd(2024, 3, 31))]
    #[case(ymd(2024, 11, 30), 3, ymd(2025, 2, 28))]
    #[case(ymd(2024, 12, 1), 13, ymd(2026, 1, 1))]
    fn test_add_months(#[case] start: NaiveDate, #[case] months: u32, #[case] expected: NaiveDate) {
        assert_eq!(add_months(start, months), expected);
    }

    #[test]
    fn test_add_months_saturates() {
        assert_eq!(add_months(NaiveDate::MAX, 1), NaiveDate::MAX);
    }
}
