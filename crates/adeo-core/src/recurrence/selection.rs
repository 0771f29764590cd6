use chrono::{Month, NaiveDate};
use serde::Serialize;

use super::rule::{
    DaySet, DayTarget, EndCondition, Frequency, MonthDay, MonthPattern, Ordinal, Pattern,
    RepeatRule,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthMode {
    #[default]
    DayOfMonth,
    OrdinalWeekday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndMode {
    #[default]
    Never,
    /// End on a date (`UNTIL`).
    OnDate,
    /// End after N occurrences (`COUNT`).
    After,
}

/// The fields of the custom repeat editor.
///
/// Fields that do not apply to the chosen frequency are carried along
/// untouched, so switching frequency back and forth in the editor keeps
/// what the user already picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub frequency: Frequency,
    pub interval: u32,
    pub weekdays: DaySet,
    pub month_mode: MonthMode,
    pub month_day: MonthDay,
    pub ordinal: Ordinal,
    pub day_target: DayTarget,
    pub month: Month,
    pub end_mode: EndMode,
    pub end_date: Option<NaiveDate>,
    pub end_count: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            interval: 1,
            weekdays: DaySet::empty(),
            month_mode: MonthMode::DayOfMonth,
            month_day: MonthDay::default(),
            ordinal: Ordinal::First,
            day_target: DayTarget::default(),
            month: Month::January,
            end_mode: EndMode::Never,
            end_date: None,
            end_count: 1,
        }
    }
}

impl Selection {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            ..Default::default()
        }
    }

    /// Inverse of the builder: fills every editor field the rule speaks to
    /// and leaves the rest at their defaults.
    pub fn from_rule(rule: &RepeatRule) -> Self {
        let mut selection = Selection::new(rule.frequency());
        selection.interval = rule.interval.max(1);

        match &rule.pattern {
            Pattern::Daily => {}
            Pattern::Weekly { days } => selection.weekdays = *days,
            Pattern::Monthly { on } => selection.apply_month_pattern(on.as_ref()),
            Pattern::Yearly { month, on } => {
                if let Some(month) = month {
                    selection.month = *month;
                }
                selection.apply_month_pattern(on.as_ref());
            }
        }

        match rule.end {
            EndCondition::Never => {}
            EndCondition::Until(date) => {
                selection.end_mode = EndMode::OnDate;
                selection.end_date = Some(date);
            }
            EndCondition::Count(count) => {
                selection.end_mode = EndMode::After;
                selection.end_count = count;
            }
        }

        selection
    }

    fn apply_month_pattern(&mut self, on: Option<&MonthPattern>) {
        match on {
            Some(MonthPattern::Day(day)) => {
                self.month_mode = MonthMode::DayOfMonth;
                self.month_day = *day;
            }
            Some(MonthPattern::Ordinal(ordinal, target)) => {
                self.month_mode = MonthMode::OrdinalWeekday;
                self.ordinal = *ordinal;
                self.day_target = *target;
            }
            None => {}
        }
    }

    /// The month pattern these fields describe, for monthly and yearly rules.
    pub fn month_pattern(&self) -> MonthPattern {
        match self.month_mode {
            MonthMode::DayOfMonth => MonthPattern::Day(self.month_day),
            MonthMode::OrdinalWeekday => MonthPattern::Ordinal(self.ordinal, self.day_target),
        }
    }
}
