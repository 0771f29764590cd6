#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness that runs `adeo` inside a scratch directory with its own
/// config file, so the host's environment never leaks in.
pub struct CliTestHarness {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl CliTestHarness {
    /// Create a harness with a UTC config
    pub fn new() -> Self {
        Self::with_config("timezone = \"UTC\"\n")
    }

    /// Create a harness with the given `adeo.toml` contents
    pub fn with_config(contents: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("adeo.toml");
        std::fs::write(&config_path, contents).expect("Failed to write config");

        Self {
            temp_dir,
            config_path,
        }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("adeo").expect("Failed to find adeo binary");
        cmd.current_dir(self.temp_dir.path())
            .env("ADEO_CONFIG", &self.config_path)
            .env_remove("ADEO_TIMEZONE")
            .env_remove("ADEO_UNTIL_MONTHS")
            .env_remove("ADEO_PREVIEW_COUNT")
            .env_remove("ADEO_LOG");
        cmd
    }

    /// Write a file into the scratch directory and return its path
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Run a command and parse its stdout as JSON
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run_success(args).get_output().stdout.clone();
        serde_json::from_slice(&output).expect("stdout is not JSON")
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// A daily task with a 09:00 reminder on Monday 2024-01-01
    pub fn daily_task_json() -> &'static str {
        r#"{
            "id": 7,
            "text": "Water plants",
            "details": null,
            "done": false,
            "position": 3,
            "listId": 2,
            "priority": "medium",
            "reminderDate": "2024-01-01",
            "reminderTime": "09:00",
            "repeatRule": "FREQ=DAILY",
            "repeatStart": "2024-01-01",
            "seriesId": null
        }"#
    }

    /// A one-off task on Friday 2024-03-15
    pub fn plain_task_json() -> &'static str {
        r#"{
            "id": 1,
            "text": "File taxes",
            "position": 0,
            "reminderDate": "2024-03-15"
        }"#
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }

    /// Predicate to check if output contains the occurrence table headers
    pub fn has_occurrence_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Date")
            .and(predicate::str::contains("Time"))
            .and(predicate::str::contains("When"))
    }
}
