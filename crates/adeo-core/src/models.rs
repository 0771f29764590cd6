use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::error::CoreError;
use crate::recurrence::{repeat_anchor, OccurrenceCalculator, RepeatRule, RepeatUpdate};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParseTaskPriorityError(String);

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TaskPriority::None),
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(ParseTaskPriorityError(s.to_string())),
        }
    }
}

/// A task as the task API sends it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub list_id: Option<i64>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub reminder_date: Option<NaiveDate>,
    /// Serialized as `HH:MM`.
    #[serde(default, with = "hour_minute")]
    pub reminder_time: Option<NaiveTime>,
    #[serde(default)]
    pub repeat_rule: Option<String>,
    #[serde(default)]
    pub repeat_start: Option<NaiveDate>,
    /// Shared by every instance of one repeating task. Set to the first
    /// instance's id the first time it is completed.
    #[serde(default)]
    pub series_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CompletionResult {
    Single(Task),
    /// `next` is `None` once the rule has no further occurrences.
    Recurring { completed: Task, next: Option<Task> },
}

impl CompletionResult {
    pub fn completed(&self) -> &Task {
        match self {
            CompletionResult::Single(task) => task,
            CompletionResult::Recurring { completed, .. } => completed,
        }
    }

    pub fn next(&self) -> Option<&Task> {
        match self {
            CompletionResult::Single(_) => None,
            CompletionResult::Recurring { next, .. } => next.as_ref(),
        }
    }
}

impl Task {
    pub fn is_repeating(&self) -> bool {
        self.repeat_rule.as_deref().is_some_and(|r| !r.trim().is_empty())
    }

    /// The date a repeat set up on this task is anchored on.
    pub fn repeat_anchor(&self, today: NaiveDate) -> NaiveDate {
        repeat_anchor(self.reminder_date, today)
    }

    /// Stores the outcome of the repeat editor. `None` removes the repeat.
    pub fn apply_repeat(&mut self, update: Option<RepeatUpdate>) {
        match update {
            Some(update) => {
                self.repeat_rule = Some(update.repeat_rule);
                self.repeat_start = Some(update.repeat_start);
            }
            None => {
                self.repeat_rule = None;
                self.repeat_start = None;
            }
        }
    }

    /// When the next occurrence is measured from: the reminder date, else the
    /// repeat start, else today; at the reminder time or midnight.
    pub fn occurrence_base(&self, today: NaiveDate) -> NaiveDateTime {
        self.reminder_date
            .or(self.repeat_start)
            .unwrap_or(today)
            .and_time(self.reminder_time.unwrap_or(NaiveTime::MIN))
    }

    /// Marks the task done.
    ///
    /// A repeating task being completed for the first time also joins (or
    /// starts) its series and produces the next pending instance, numbered
    /// `next_id` and placed at `next_position`.
    ///
    /// # Errors
    /// `CoreError::InvalidRRule` when the stored rule cannot be evaluated.
    pub fn complete(
        mut self,
        now: NaiveDateTime,
        next_id: i64,
        next_position: i64,
    ) -> Result<CompletionResult, CoreError> {
        let rolls_over = !self.done && self.is_repeating() && self.completed_at.is_none();
        self.done = true;
        if !rolls_over {
            return Ok(CompletionResult::Single(self));
        }

        let stored = self.repeat_rule.as_deref().unwrap_or_default();
        let rule: RepeatRule = stored
            .parse()
            .map_err(|e| CoreError::InvalidRRule(format!("'{}': {}", stored, e)))?;

        let series_id = self.series_id.unwrap_or(self.id);
        self.series_id = Some(series_id);
        self.completed_at = Some(now);

        let base = self.occurrence_base(now.date());
        let next_at = OccurrenceCalculator::new(&rule, base)?.next_after(base);
        debug!(task = self.id, series = series_id, next = ?next_at, "completed repeating task");

        let next = next_at.map(|at| Task {
            id: next_id,
            done: false,
            position: next_position,
            reminder_date: Some(at.date()),
            completed_at: None,
            ..self.clone()
        });

        Ok(CompletionResult::Recurring {
            completed: self,
            next,
        })
    }
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_str(&t.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => NaiveTime::parse_from_str(value, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
