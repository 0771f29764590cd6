//! Repeat rules: the typed model, its canonical string form, and everything
//! the repeat editor does with it.
//!
//! A [`RepeatRule`] is only turned into an RFC 5545 string when it is stored
//! (`Display`) and only parsed back when a stored string is read (`FromStr`).
//! Everything in between works on the typed value.

pub mod builder;
pub mod occurrence;
pub mod parser;
pub mod preset;
pub mod rule;
pub mod selection;
pub mod session;
pub mod summary;

pub use builder::{build_rule, BuilderConfig, RuleBuilder, DEFAULT_UNTIL_MONTHS};
pub use occurrence::OccurrenceCalculator;
pub use parser::{classify_rule, parse_rule_to_selection, split_clauses, Classification};
pub use preset::{build_preset_rule, repeat_anchor, Preset, PresetRule};
pub use rule::{
    DaySet, DayTarget, EndCondition, Frequency, MonthDay, MonthPattern, Ordinal, Pattern,
    RepeatRule, RuleParseError,
};
pub use selection::{EndMode, MonthMode, Selection};
pub use session::{EditSession, RepeatUpdate};
pub use summary::{summarize, FALLBACK_SUMMARY};
