use adeo_core::error::CoreError;
use adeo_core::recurrence::{BuilderConfig, RuleBuilder, DEFAULT_UNTIL_MONTHS};
use adeo_core::timezone::validate_timezone;
use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;

use crate::timezone::{detect_system_timezone, explain_invalid_timezone};

const CONFIG_FILE: &str = "adeo.toml";
const CONFIG_PATH_VAR: &str = "ADEO_CONFIG";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// IANA timezone that "today" is taken in
    pub timezone: String,
    /// Months between the anchor and a pre-filled end date
    pub until_months: u32,
    /// Occurrences listed by `rule next` when no count is given
    pub preview_count: usize,
    /// strftime format used when printing dates
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: detect_system_timezone(),
            until_months: DEFAULT_UNTIL_MONTHS,
            preview_count: 5,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `adeo.toml` (or the file named by `ADEO_CONFIG`), then
    /// `ADEO_*` environment variables.
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ADEO_").ignore(&["config", "log"]))
    }

    pub fn tz(&self) -> Result<Tz, CoreError> {
        validate_timezone(&self.timezone).map_err(|_| explain_invalid_timezone(&self.timezone))
    }

    pub fn rule_builder(&self) -> RuleBuilder {
        RuleBuilder::new(BuilderConfig {
            until_months: self.until_months,
        })
    }
}
