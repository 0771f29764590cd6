use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::builder::RuleBuilder;
use super::rule::{DaySet, Frequency, RepeatRule};
use super::selection::Selection;

/// What a committed edit writes back to the task: `repeatRule` and
/// `repeatStart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatUpdate {
    pub repeat_rule: String,
    pub repeat_start: NaiveDate,
}

impl RepeatUpdate {
    pub fn new(rule: &RepeatRule, start: NaiveDate) -> Self {
        Self {
            repeat_rule: rule.to_string(),
            repeat_start: start,
        }
    }
}

/// One open run of the custom repeat editor.
///
/// A session is opened from the task's stored rule, edited through
/// [`EditSession::selection_mut`], and ended by exactly one of
/// [`commit`](EditSession::commit), [`clear`](EditSession::clear) or
/// [`discard`](EditSession::discard), all of which consume it.
#[derive(Debug, Clone)]
pub struct EditSession {
    builder: RuleBuilder,
    anchor: NaiveDate,
    original: Option<RepeatRule>,
    selection: Selection,
}

impl EditSession {
    /// Opens the editor for a stored rule (if any) anchored on `anchor`.
    /// Without a usable stored rule the editor starts weekly on the anchor's
    /// weekday.
    pub fn open(stored: Option<&str>, anchor: NaiveDate) -> Self {
        Self::open_with(RuleBuilder::default(), stored, anchor)
    }

    pub fn open_with(builder: RuleBuilder, stored: Option<&str>, anchor: NaiveDate) -> Self {
        let original = RepeatRule::parse_stored(stored).and_then(Result::ok);
        let selection = match &original {
            Some(rule) => Selection::from_rule(rule),
            None => {
                let mut selection = Selection::new(Frequency::Weekly);
                selection.weekdays = DaySet::single(anchor.weekday());
                selection
            }
        };
        Self {
            builder,
            anchor,
            original,
            selection,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn original(&self) -> Option<&RepeatRule> {
        self.original.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// The rule the current selection would save.
    pub fn current_rule(&self) -> RepeatRule {
        self.builder.build(&self.selection, self.anchor)
    }

    /// Live summary of the current selection.
    pub fn preview(&self) -> String {
        self.current_rule().summary()
    }

    pub fn is_modified(&self) -> bool {
        self.original.as_ref() != Some(&self.current_rule())
    }

    /// Ends the session, returning what to store on the task.
    pub fn commit(self) -> RepeatUpdate {
        RepeatUpdate::new(&self.current_rule(), self.anchor)
    }

    /// Ends the session by removing the task's recurrence.
    pub fn clear(self) -> Option<RepeatUpdate> {
        None
    }

    /// Ends the session without touching the task. Hands back the rule the
    /// session was opened with.
    pub fn discard(self) -> Option<RepeatRule> {
        self.original
    }
}
