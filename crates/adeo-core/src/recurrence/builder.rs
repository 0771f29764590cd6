use chrono::{Datelike, Months, NaiveDate};
use serde::Deserialize;

use super::rule::{DaySet, EndCondition, Frequency, Pattern, RepeatRule};
use super::selection::{EndMode, Selection};

/// Months added to the anchor when an "on date" end has no date yet.
pub const DEFAULT_UNTIL_MONTHS: u32 = 6;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BuilderConfig {
    #[serde(default = "default_until_months")]
    pub until_months: u32,
}

fn default_until_months() -> u32 {
    DEFAULT_UNTIL_MONTHS
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            until_months: DEFAULT_UNTIL_MONTHS,
        }
    }
}

/// Turns editor selections into a [`RepeatRule`].
///
/// Building never fails. Missing or out-of-range inputs fall back to the
/// editor defaults, and calendar legality is not checked (day 31 in a
/// 30-day month is kept verbatim).
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    config: BuilderConfig,
}

impl RuleBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Builds the rule for `selection`, interpreted relative to `anchor`
    /// (the repeat start date).
    pub fn build(&self, selection: &Selection, anchor: NaiveDate) -> RepeatRule {
        let pattern = match selection.frequency {
            Frequency::Daily => Pattern::Daily,
            Frequency::Weekly => {
                let days = if selection.weekdays.is_empty() {
                    DaySet::single(anchor.weekday())
                } else {
                    selection.weekdays
                };
                Pattern::Weekly { days }
            }
            Frequency::Monthly => Pattern::Monthly {
                on: Some(selection.month_pattern()),
            },
            Frequency::Yearly => Pattern::Yearly {
                month: Some(selection.month),
                on: Some(selection.month_pattern()),
            },
        };

        // The yearly editor has no interval control.
        let interval = match selection.frequency {
            Frequency::Yearly => 1,
            _ => selection.interval.max(1),
        };

        RepeatRule::new(pattern)
            .with_interval(interval)
            .with_end(self.end_condition(selection, anchor))
    }

    fn end_condition(&self, selection: &Selection, anchor: NaiveDate) -> EndCondition {
        match selection.end_mode {
            EndMode::Never => EndCondition::Never,
            EndMode::OnDate => {
                let until = selection.end_date.unwrap_or_else(|| self.default_until(anchor));
                EndCondition::Until(until)
            }
            EndMode::After => EndCondition::Count(selection.end_count.max(1)),
        }
    }

    /// The end date pre-filled for an "on date" end: anchor plus the
    /// configured number of months, clamped to the end of shorter months.
    pub fn default_until(&self, anchor: NaiveDate) -> NaiveDate {
        anchor
            .checked_add_months(Months::new(self.config.until_months))
            .unwrap_or(anchor)
    }
}

/// Builds with the default configuration.
pub fn build_rule(selection: &Selection, anchor: NaiveDate) -> RepeatRule {
    RuleBuilder::default().build(selection, anchor)
}
