use super::rule::{
    weekday_label, DaySet, MonthDay, MonthPattern, Pattern, RepeatRule, RuleParseError,
};

/// Shown for a stored rule whose frequency we do not understand.
pub const FALLBACK_SUMMARY: &str = "Repeats";

impl RepeatRule {
    /// One-line description, e.g. "Every 2 weeks on Monday, Wednesday".
    pub fn summary(&self) -> String {
        let interval = self.interval.max(1);
        match &self.pattern {
            Pattern::Daily => every(interval, "day", "days"),
            Pattern::Weekly { days } => {
                if *days == DaySet::weekdays() {
                    return "Every weekday".to_string();
                }
                let head = every(interval, "week", "weeks");
                if days.is_empty() {
                    return head;
                }
                let labels: Vec<&str> = days.iter().map(weekday_label).collect();
                format!("{head} on {}", labels.join(", "))
            }
            Pattern::Monthly { on } => {
                let head = every(interval, "month", "months");
                with_month_pattern(head, on.as_ref())
            }
            Pattern::Yearly { month, on } => {
                let month = month.map(|m| m.name()).unwrap_or("month");
                with_month_pattern(format!("Every {month}"), on.as_ref())
            }
        }
    }
}

fn every(interval: u32, one: &str, many: &str) -> String {
    if interval == 1 {
        format!("Every {one}")
    } else {
        format!("Every {interval} {many}")
    }
}

fn with_month_pattern(head: String, on: Option<&MonthPattern>) -> String {
    match on {
        Some(MonthPattern::Day(MonthDay::Day(day))) => format!("{head} on day {day}"),
        Some(MonthPattern::Day(MonthDay::Last)) => format!("{head} on the last day"),
        Some(MonthPattern::Ordinal(ordinal, target)) => {
            format!("{head} on {} {}", ordinal.label(), target.label())
        }
        None => head,
    }
}

/// Human-readable text for a stored rule string. `None` means no
/// recurrence; an unrecognized frequency reads as "Repeats".
pub fn summarize(rule: &str) -> Option<String> {
    match rule.parse::<RepeatRule>() {
        Ok(parsed) => Some(parsed.summary()),
        Err(RuleParseError::Empty) => None,
        Err(RuleParseError::UnknownFrequency(_)) => Some(FALLBACK_SUMMARY.to_string()),
    }
}
