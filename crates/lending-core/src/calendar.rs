use chrono::{DateTime, Days, Local, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::error::LendingError;
use crate::types::TermUnit;
use crate::LendingResult;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Advance a date by a whole number of repayment periods.
///
/// Weeks add 7 calendar days each. Months keep the day-of-month and clamp
/// to the last day of shorter months (Jan 31 + 1 month = Feb 28/29) rather
/// than rolling the surplus days into the next month (Mar 3), so a loan
/// due on the 31st stays due at each month end.
pub fn advance_periods(start: NaiveDate, unit: TermUnit, periods: u32) -> LendingResult<NaiveDate> {
    let advanced = match unit {
        TermUnit::Weeks => start.checked_add_days(Days::new(7 * u64::from(periods))),
        TermUnit::Months => start.checked_add_months(Months::new(periods)),
    };
    advanced.ok_or_else(|| {
        LendingError::DateError(format!(
            "advancing {start} by {periods} {unit} is outside the supported calendar range"
        ))
    })
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a due date or reference date, truncating any time-of-day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the calendar day is taken in
/// the timestamp's own offset) and naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]`.
pub fn parse_calendar_day(raw: &str) -> LendingResult<NaiveDate> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(s) {
        return Ok(stamp.date_naive());
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(stamp.date());
        }
    }
    Err(LendingError::DateError(format!(
        "'{s}' is not a date (expected YYYY-MM-DD or an ISO timestamp)"
    )))
}

/// serde `deserialize_with` adapter for [`parse_calendar_day`].
pub fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_day(&raw).map_err(serde::de::Error::custom)
}

/// Optional variant of [`deserialize_day`]; pair with `#[serde(default)]`.
pub fn deserialize_optional_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_calendar_day(&s))
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_advance_weeks() {
        assert_eq!(advance_periods(d(2025, 1, 1), TermUnit::Weeks, 0).unwrap(), d(2025, 1, 1));
        assert_eq!(advance_periods(d(2025, 1, 1), TermUnit::Weeks, 1).unwrap(), d(2025, 1, 8));
        assert_eq!(advance_periods(d(2024, 12, 30), TermUnit::Weeks, 2).unwrap(), d(2025, 1, 13));
    }

    #[test]
    fn test_advance_months_keeps_day() {
        assert_eq!(advance_periods(d(2025, 1, 15), TermUnit::Months, 1).unwrap(), d(2025, 2, 15));
        assert_eq!(advance_periods(d(2025, 11, 15), TermUnit::Months, 3).unwrap(), d(2026, 2, 15));
    }

    #[test]
    fn test_advance_months_clamps_month_end() {
        assert_eq!(advance_periods(d(2025, 1, 31), TermUnit::Months, 1).unwrap(), d(2025, 2, 28));
        assert_eq!(advance_periods(d(2024, 1, 31), TermUnit::Months, 1).unwrap(), d(2024, 2, 29));
        assert_eq!(advance_periods(d(2025, 1, 31), TermUnit::Months, 2).unwrap(), d(2025, 3, 31));
        // no rollover into March
        assert_ne!(advance_periods(d(2025, 1, 31), TermUnit::Months, 1).unwrap(), d(2025, 3, 3));
    }

    #[test]
    fn test_advance_out_of_range() {
        let result = advance_periods(NaiveDate::MAX, TermUnit::Months, 1);
        assert!(matches!(result, Err(LendingError::DateError(_))));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(d(2025, 1, 1), d(2025, 1, 10)), 9);
        assert_eq!(days_between(d(2025, 1, 10), d(2025, 1, 1)), -9);
        assert_eq!(days_between(d(2024, 2, 28), d(2024, 3, 1)), 2);
    }

    #[test]
    fn test_parse_calendar_day_formats() {
        assert_eq!(parse_calendar_day("2025-01-10").unwrap(), d(2025, 1, 10));
        assert_eq!(parse_calendar_day("2025-01-10T23:59:59").unwrap(), d(2025, 1, 10));
        assert_eq!(parse_calendar_day("2025-01-10 08:00:00.250").unwrap(), d(2025, 1, 10));
        assert_eq!(parse_calendar_day("2025-01-10T03:00:00Z").unwrap(), d(2025, 1, 10));
        assert_eq!(
            parse_calendar_day("2025-01-10T22:30:00-03:00").unwrap(),
            d(2025, 1, 10)
        );
    }

    #[test]
    fn test_parse_calendar_day_rejects_garbage() {
        assert!(parse_calendar_day("10/01/2025").is_err());
        assert!(parse_calendar_day("").is_err());
    }
}
