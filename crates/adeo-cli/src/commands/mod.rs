use adeo_core::timezone::local_now;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::config::Config;

pub mod edit;
pub mod rule;
pub mod task;

/// What every command needs: the loaded config and the local wall-clock
/// time the command runs at.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub now: NaiveDateTime,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        let tz = config.tz()?;
        let now = local_now(tz, Utc::now());
        Ok(Self { config, now })
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn date_format(&self) -> &str {
        &self.config.date_format
    }
}
