use adeo_core::error::CoreError;
use adeo_core::timezone::validate_timezone;

/// Detect system timezone
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

fn common_timezones() -> &'static [&'static str] {
    &[
        "UTC",
        "America/New_York",
        "America/Chicago",
        "America/Denver",
        "America/Los_Angeles",
        "America/Sao_Paulo",
        "Europe/London",
        "Europe/Paris",
        "Europe/Berlin",
        "Europe/Istanbul",
        "Asia/Dubai",
        "Asia/Kolkata",
        "Asia/Shanghai",
        "Asia/Tokyo",
        "Australia/Sydney",
        "Pacific/Auckland",
    ]
}

/// Suggest similar timezones for invalid input
pub fn suggest_timezone(invalid: &str) -> Vec<&'static str> {
    let invalid_lower = invalid.to_lowercase();
    let mut matches: Vec<_> = common_timezones()
        .iter()
        .copied()
        .filter(|tz| {
            let tz_lower = tz.to_lowercase();
            tz_lower.contains(&invalid_lower)
                || invalid_lower.contains(&tz_lower)
                || tz.split('/').any(|part| part.to_lowercase().contains(&invalid_lower))
        })
        .collect();
    matches.truncate(5);
    matches
}

/// Message for a timezone that failed validation, with suggestions when any
/// common zone looks close.
pub fn explain_invalid_timezone(invalid: &str) -> CoreError {
    let suggestions = suggest_timezone(invalid);
    if suggestions.is_empty() {
        CoreError::InvalidTimezone(format!(
            "Unknown timezone '{}'. Use IANA names like 'America/New_York'",
            invalid
        ))
    } else {
        CoreError::InvalidTimezone(format!(
            "Unknown timezone '{}'. Did you mean: {}?",
            invalid,
            suggestions.join(", ")
        ))
    }
}
