use chrono::{Month, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::preset::Preset;
use super::rule::{
    weekday_from_code, DaySet, DayTarget, EndCondition, Frequency, MonthDay, MonthPattern,
    Ordinal, Pattern, RepeatRule, RuleParseError,
};
use super::selection::Selection;

/// Splits a rule string into its `KEY=VALUE` clauses.
///
/// Each clause is split on the first `=`. Clauses with a missing `=`, an
/// empty key or an empty value are dropped. A repeated key keeps its last
/// value.
pub fn split_clauses(rule: &str) -> HashMap<String, String> {
    let mut clauses = HashMap::new();
    for part in rule.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            if !part.trim().is_empty() {
                debug!(clause = part, "skipping clause without '='");
            }
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            debug!(clause = part, "skipping clause with empty key or value");
            continue;
        }
        clauses.insert(key.to_string(), value.to_string());
    }
    clauses
}

impl FromStr for RepeatRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clauses = split_clauses(s);
        if clauses.is_empty() {
            return Err(RuleParseError::Empty);
        }

        let freq = clauses.get("FREQ").map(String::as_str).unwrap_or_default();
        let frequency = match freq {
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            other => return Err(RuleParseError::UnknownFrequency(other.to_string())),
        };

        let pattern = match frequency {
            Frequency::Daily => Pattern::Daily,
            Frequency::Weekly => Pattern::Weekly {
                days: clauses.get("BYDAY").map(|v| parse_day_set(v)).unwrap_or_default(),
            },
            Frequency::Monthly => Pattern::Monthly {
                on: parse_month_pattern(&clauses),
            },
            Frequency::Yearly => Pattern::Yearly {
                month: clauses.get("BYMONTH").and_then(|v| parse_month(v)),
                on: parse_month_pattern(&clauses),
            },
        };

        let interval = clauses
            .get("INTERVAL")
            .map(|v| parse_interval(v))
            .unwrap_or(1);

        Ok(RepeatRule {
            pattern,
            interval,
            end: parse_end(&clauses),
        })
    }
}

impl RepeatRule {
    /// Parses a stored rule string. `None` and `Some("")` both mean "no
    /// recurrence".
    pub fn parse_stored(rule: Option<&str>) -> Option<Result<RepeatRule, RuleParseError>> {
        match rule.map(str::parse::<RepeatRule>) {
            None | Some(Err(RuleParseError::Empty)) => None,
            Some(result) => Some(result),
        }
    }
}

fn parse_day_set(value: &str) -> DaySet {
    value
        .split(',')
        .filter_map(|code| {
            let day = weekday_from_code(code.trim());
            if day.is_none() {
                debug!(code, "ignoring unknown BYDAY code");
            }
            day
        })
        .collect()
}

fn parse_month(value: &str) -> Option<Month> {
    value
        .parse::<u8>()
        .ok()
        .and_then(|n| Month::try_from(n).ok())
}

fn parse_interval(value: &str) -> u32 {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => {
            debug!(value, "falling back to INTERVAL=1");
            1
        }
    }
}

fn parse_month_pattern(clauses: &HashMap<String, String>) -> Option<MonthPattern> {
    if let Some(day) = clauses
        .get("BYMONTHDAY")
        .and_then(|v| v.parse::<i32>().ok())
        .and_then(MonthDay::from_value)
    {
        return Some(MonthPattern::Day(day));
    }

    let byday = clauses.get("BYDAY")?;
    let setpos = clauses.get("BYSETPOS")?;
    let target = DayTarget::from_byday(byday)?;
    let ordinal = setpos
        .parse::<i32>()
        .ok()
        .and_then(Ordinal::from_setpos)
        .unwrap_or_default();
    Some(MonthPattern::Ordinal(ordinal, target))
}

fn parse_end(clauses: &HashMap<String, String>) -> EndCondition {
    if let Some(until) = clauses.get("UNTIL") {
        // Accept a full RFC 5545 timestamp as well; only the date part matters.
        let date_part = until.get(..8).unwrap_or(until.as_str());
        match NaiveDate::parse_from_str(date_part, "%Y%m%d") {
            Ok(date) => return EndCondition::Until(date),
            Err(_) => debug!(%until, "ignoring malformed UNTIL"),
        }
    }
    match clauses.get("COUNT").and_then(|v| v.parse::<u32>().ok()) {
        Some(count) if count >= 1 => EndCondition::Count(count),
        _ => EndCondition::Never,
    }
}

/// Compact label for a rule: one of the presets, or custom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Preset(Preset),
    Custom,
}

impl Classification {
    pub fn name(self) -> &'static str {
        match self {
            Classification::Preset(preset) => preset.name(),
            Classification::Custom => "custom",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl RepeatRule {
    /// Mirrors the preset mapper: every preset-built rule classifies as the
    /// preset it came from.
    pub fn classify(&self) -> Classification {
        if self.end != EndCondition::Never || self.interval != 1 {
            return Classification::Custom;
        }
        let preset = match &self.pattern {
            Pattern::Daily => Preset::Daily,
            Pattern::Weekly { days } if *days == DaySet::weekdays() => Preset::Weekdays,
            Pattern::Weekly { days } if days.len() > 1 => return Classification::Custom,
            Pattern::Weekly { .. } => Preset::Weekly,
            Pattern::Monthly { .. } => Preset::Monthly,
            Pattern::Yearly { .. } => Preset::Yearly,
        };
        Classification::Preset(preset)
    }
}

/// Classifies a stored rule string. `None` means no recurrence; a rule with
/// an unrecognized frequency is custom.
pub fn classify_rule(rule: &str) -> Option<Classification> {
    match rule.parse::<RepeatRule>() {
        Ok(parsed) => Some(parsed.classify()),
        Err(RuleParseError::Empty) => None,
        Err(RuleParseError::UnknownFrequency(_)) => Some(Classification::Custom),
    }
}

/// Rebuilds editor fields from a stored rule string. `None` when there is
/// nothing to edit (empty string or unrecognized frequency).
pub fn parse_rule_to_selection(rule: &str) -> Option<Selection> {
    rule.parse::<RepeatRule>()
        .ok()
        .map(|parsed| Selection::from_rule(&parsed))
}
