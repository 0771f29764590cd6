//! # Adeo Core Library
//!
//! Repeat rules for a to-do app: building RFC 5545 recurrence strings from
//! editor selections, reading them back, describing them in plain English,
//! and rolling a repeating task over to its next occurrence.
//!
//! ## Core Modules
//!
//! - [`recurrence`]: The typed repeat rule, builder, parser, presets,
//!   summaries, edit sessions and occurrence calculation
//! - [`models`]: The task record and completion rollover
//! - [`timezone`]: Timezone validation and local wall-clock time
//! - [`error`]: Error types shared by the core and the CLI
//!
//! ## Example Usage
//!
//! ```rust
//! use adeo_core::recurrence::{build_preset_rule, classify_rule, summarize};
//! use chrono::NaiveDate;
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let preset = build_preset_rule("monthly", anchor).unwrap();
//! let stored = preset.rule.to_string();
//!
//! assert_eq!(stored, "FREQ=MONTHLY;BYMONTHDAY=15");
//! assert_eq!(summarize(&stored).as_deref(), Some("Every month on day 15"));
//! assert_eq!(classify_rule(&stored).unwrap().name(), "monthly");
//! ```

pub mod error;
pub mod models;
pub mod recurrence;
pub mod timezone;
