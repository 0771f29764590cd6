use adeo_core::error::CoreError;
use adeo_core::recurrence::rule::parse_weekday_name;
use adeo_core::recurrence::DaySet;
use chrono::{Month, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses `YYYY-MM-DD` or a natural phrase ("tomorrow", "next friday")
/// relative to `today`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    let now = Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN));
    parse_date_string(input, now, Dialect::Uk)
        .map(|dt| dt.date_naive())
        .map_err(|e| CoreError::InvalidDate(format!("Failed to parse date '{}': {}", input, e)))
}

/// Parses an optional date argument, falling back to `today`.
pub fn parse_date_or_today(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    input.map_or(Ok(today), |s| parse_date(s, today))
}

pub fn parse_time(input: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| CoreError::InvalidInput(format!("Invalid time '{}' (expected HH:MM)", input)))
}

/// Parses a comma-separated list of day names ("mon,wed,fri").
pub fn parse_weekdays(input: &str) -> Result<DaySet, CoreError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            parse_weekday_name(part)
                .ok_or_else(|| CoreError::InvalidInput(format!("Unknown day of week '{}'", part)))
        })
        .collect()
}

/// Accepts a month name ("march", "Mar") or number (1-12).
pub fn parse_month(input: &str) -> Result<Month, CoreError> {
    let input = input.trim();
    let month = match input.parse::<u8>() {
        Ok(number) => Month::try_from(number).ok(),
        Err(_) => input.parse::<Month>().ok(),
    };
    month.ok_or_else(|| CoreError::InvalidInput(format!("Unknown month '{}'", input)))
}
