use crate::error::CoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Validate an IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone.trim())
        .map_err(|_| CoreError::InvalidTimezone(format!("Invalid timezone: {}", timezone)))
}

/// Wall-clock time in `tz` at the UTC instant `at`.
///
/// Repeat rules and reminders are stored as local wall-clock values, so this
/// is what "now" means when completing a task.
pub fn local_now(tz: Tz, at: DateTime<Utc>) -> NaiveDateTime {
    at.with_timezone(&tz).naive_local()
}
