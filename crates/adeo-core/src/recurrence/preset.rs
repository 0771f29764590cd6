use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::rule::{DaySet, MonthDay, MonthPattern, Pattern, RepeatRule};
use crate::error::CoreError;

/// The quick-pick shortcuts offered without opening the custom editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Daily,
    Weekdays,
    Weekly,
    Monthly,
    Yearly,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Daily,
        Preset::Weekdays,
        Preset::Weekly,
        Preset::Monthly,
        Preset::Yearly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Daily => "daily",
            Preset::Weekdays => "weekdays",
            Preset::Weekly => "weekly",
            Preset::Monthly => "monthly",
            Preset::Yearly => "yearly",
        }
    }

    /// The rule this preset stands for when anchored on `anchor`.
    pub fn rule(self, anchor: NaiveDate) -> RepeatRule {
        let on_anchor_day = MonthPattern::Day(MonthDay::Day(anchor.day() as u8));
        let pattern = match self {
            Preset::Daily => Pattern::Daily,
            Preset::Weekdays => Pattern::Weekly {
                days: DaySet::weekdays(),
            },
            Preset::Weekly => Pattern::Weekly {
                days: DaySet::single(anchor.weekday()),
            },
            Preset::Monthly => Pattern::Monthly {
                on: Some(on_anchor_day),
            },
            Preset::Yearly => Pattern::Yearly {
                month: Month::try_from(anchor.month() as u8).ok(),
                on: Some(on_anchor_day),
            },
        };
        RepeatRule::new(pattern)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Preset::Daily),
            "weekdays" => Ok(Preset::Weekdays),
            "weekly" => Ok(Preset::Weekly),
            "monthly" => Ok(Preset::Monthly),
            "yearly" => Ok(Preset::Yearly),
            _ => Err(CoreError::UnknownPreset(s.to_string())),
        }
    }
}

/// A preset rule together with the start date it was anchored on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetRule {
    pub rule: RepeatRule,
    pub start: NaiveDate,
}

/// Maps a quick-pick name to its rule. Unknown names (including "custom")
/// produce nothing, which the caller treats as "open the custom editor".
pub fn build_preset_rule(name: &str, anchor: NaiveDate) -> Option<PresetRule> {
    let preset = name.parse::<Preset>().ok()?;
    Some(PresetRule {
        rule: preset.rule(anchor),
        start: anchor,
    })
}

/// The date a new repeat is anchored on: the task's reminder date if it has
/// one, otherwise today.
pub fn repeat_anchor(reminder_date: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    reminder_date.unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn anchor() -> NaiveDate {
        // A Friday.
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[rstest]
    #[case("daily", "FREQ=DAILY")]
    #[case("weekdays", "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR")]
    #[case("weekly", "FREQ=WEEKLY;BYDAY=FR")]
    #[case("monthly", "FREQ=MONTHLY;BYMONTHDAY=15")]
    #[case("yearly", "FREQ=YEARLY;BYMONTH=3;BYMONTHDAY=15")]
    #[case("Monthly", "FREQ=MONTHLY;BYMONTHDAY=15")]
    fn preset_rules(#[case] name: &str, #[case] expected: &str) {
        let preset = build_preset_rule(name, anchor()).unwrap();
        assert_eq!(preset.rule.to_string(), expected);
        assert_eq!(preset.start, anchor());
    }

    #[rstest]
    #[case("custom")]
    #[case("hourly")]
    #[case("")]
    fn unknown_presets_produce_nothing(#[case] name: &str) {
        assert!(build_preset_rule(name, anchor()).is_none());
    }

    #[test]
    fn unknown_preset_error_names_input() {
        let err = "fortnightly".parse::<Preset>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownPreset(ref s) if s == "fortnightly"));
    }

    #[test]
    fn anchor_prefers_reminder_date() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(repeat_anchor(Some(anchor()), today), anchor());
        assert_eq!(repeat_anchor(None, today), today);
    }
}
