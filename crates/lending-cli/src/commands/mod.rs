pub mod amortization;
pub mod penalty;

use chrono::NaiveDate;
use lending_core::calendar::parse_calendar_day;

/// clap value parser for dates given as `YYYY-MM-DD` or a full timestamp.
pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_day(raw).map_err(|e| e.to_string())
}
