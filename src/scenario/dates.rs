//! Anchor dates of generated documents.

use crate::common::{Error, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Next business day after `date`: the next calendar day, moved past a
/// weekend.
pub fn next_business_day(date: NaiveDate) -> Result<NaiveDate> {
    let mut next = add_days(date, 1)?;
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next = add_days(next, 1)?;
    }
    Ok(next)
}

/// Next Monday after `date`; a Monday advances a full week.
pub fn next_monday(date: NaiveDate) -> Result<NaiveDate> {
    let ahead = 7 - u64::from(date.weekday().num_days_from_monday());
    add_days(date, ahead)
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| Error::DateOutOfRange(date.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_business_day() {
        // 2025-06-02 is a Monday
        assert_eq!(next_business_day(date(2025, 6, 2)).unwrap(), date(2025, 6, 3));
        assert_eq!(next_business_day(date(2025, 6, 6)).unwrap(), date(2025, 6, 9));
        assert_eq!(next_business_day(date(2025, 6, 7)).unwrap(), date(2025, 6, 9));
        assert_eq!(next_business_day(date(2025, 6, 8)).unwrap(), date(2025, 6, 9));
        assert_eq!(next_business_day(date(2025, 12, 31)).unwrap(), date(2026, 1, 1));
    }

    #[test]
    fn test_next_monday() {
        assert_eq!(next_monday(date(2025, 6, 2)).unwrap(), date(2025, 6, 9));
        assert_eq!(next_monday(date(2025, 6, 3)).unwrap(), date(2025, 6, 9));
        assert_eq!(next_monday(date(2025, 6, 8)).unwrap(), date(2025, 6, 9));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(matches!(
            next_business_day(NaiveDate::MAX),
            Err(Error::DateOutOfRange(_))
        ));
    }
}
