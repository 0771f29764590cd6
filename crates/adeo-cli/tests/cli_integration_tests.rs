/// Black-box tests for the adeo binary: every command path, error handling
/// and output formatting.
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness, TestFixtures};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("repeat rules"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("adeo"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(assertions::has_error());
}

#[test]
fn test_rule_build_weekly() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "rule", "build", "--freq", "weekly", "--on", "wed,mon", "--anchor", "2024-01-01",
        ])
        .stdout(predicate::str::starts_with("FREQ=WEEKLY;BYDAY=MO,WE\n"))
        .stdout(predicate::str::contains("Every week on Monday, Wednesday"));
}

#[test]
fn test_rule_build_json() {
    let harness = CliTestHarness::new();

    let value = harness.run_json(&[
        "rule", "build", "--freq", "daily", "--interval", "3", "--count", "10", "--anchor",
        "2024-01-01", "--json",
    ]);
    assert_eq!(value["repeatRule"], "FREQ=DAILY;INTERVAL=3;COUNT=10");
    assert_eq!(value["repeatStart"], "2024-01-01");
    assert_eq!(value["summary"], "Every 3 days");
    assert_eq!(value["classification"], "custom");
}

#[test]
fn test_rule_build_end_on_uses_configured_months() {
    let harness = CliTestHarness::with_config("timezone = \"UTC\"\nuntil_months = 2\n");

    harness
        .run_success(&[
            "rule", "build", "--freq", "daily", "--end-on", "--anchor", "2024-01-15",
        ])
        .stdout(predicate::str::contains("FREQ=DAILY;UNTIL=20240315"));
}

#[test]
fn test_rule_build_monthly_and_yearly() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "rule", "build", "--freq", "monthly", "--ordinal", "last", "--weekday", "friday",
        ])
        .stdout(predicate::str::contains("FREQ=MONTHLY;BYDAY=FR;BYSETPOS=-1"))
        .stdout(predicate::str::contains("Every month on Last Friday"));

    harness
        .run_success(&[
            "rule", "build", "--freq", "yearly", "--month", "11", "--ordinal", "fourth",
            "--weekday", "thursday", "--interval", "4",
        ])
        .stdout(predicate::str::contains("FREQ=YEARLY;BYMONTH=11;BYDAY=TH;BYSETPOS=4\n"))
        .stdout(predicate::str::contains("Every November on Fourth Thursday"));
}

#[test]
fn test_rule_build_rejects_bad_input() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["rule", "build", "--freq", "monthly", "--day", "42"])
        .stderr(predicate::str::contains("Invalid input"));

    harness
        .run_failure(&["rule", "build", "--freq", "weekly", "--on", "funday"])
        .stderr(predicate::str::contains("funday"));

    harness
        .run_failure(&["rule", "build", "--freq", "hourly"])
        .stderr(assertions::has_error());

    harness
        .run_failure(&[
            "rule", "build", "--freq", "daily", "--until", "2024-01-01", "--count", "3",
        ])
        .stderr(assertions::has_error());
}

#[test]
fn test_rule_preset() {
    let harness = CliTestHarness::new();

    let value = harness.run_json(&["rule", "preset", "monthly", "--anchor", "2024-03-15", "--json"]);
    assert_eq!(value["repeatRule"], "FREQ=MONTHLY;BYMONTHDAY=15");
    assert_eq!(value["repeatStart"], "2024-03-15");
    assert_eq!(value["summary"], "Every month on day 15");
    assert_eq!(value["classification"], "monthly");

    harness
        .run_success(&["rule", "preset", "weekly", "--anchor", "2024-03-15"])
        .stdout(predicate::str::contains("FREQ=WEEKLY;BYDAY=FR"));

    harness
        .run_failure(&["rule", "preset", "fortnightly"])
        .stderr(predicate::str::contains("Unknown preset"));
}

#[test]
fn test_rule_parse() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["rule", "parse", "FREQ=MONTHLY;BYDAY=SA,SU;BYSETPOS=2"])
        .stdout(predicate::str::contains("Second Weekend Day"));

    let value = harness.run_json(&["rule", "parse", "FREQ=WEEKLY;BYDAY=MO,WE;COUNT=4", "--json"]);
    assert_eq!(value["frequency"], "WEEKLY");
    assert_eq!(value["weekdays"], serde_json::json!(["MO", "WE"]));
    assert_eq!(value["end_mode"], "after");
    assert_eq!(value["end_count"], 4);

    harness
        .run_success(&["rule", "parse", ""])
        .stdout(predicate::str::contains("No recurrence"));
}

#[test]
fn test_rule_classify_and_summary() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["rule", "classify", "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR"])
        .stdout(predicate::str::diff("weekdays\n"));
    harness
        .run_success(&["rule", "classify", "FREQ=WEEKLY;BYDAY=MO,WE"])
        .stdout(predicate::str::diff("custom\n"));
    harness
        .run_success(&["rule", "classify", "FREQ=SECONDLY"])
        .stdout(predicate::str::diff("custom\n"));
    harness
        .run_success(&["rule", "classify", ""])
        .stdout(predicate::str::diff("none\n"));

    harness
        .run_success(&["rule", "summary", "FREQ=YEARLY;BYMONTH=3;BYMONTHDAY=5"])
        .stdout(predicate::str::diff("Every March on day 5\n"));
    harness
        .run_success(&["rule", "summary", "FREQ=SECONDLY"])
        .stdout(predicate::str::diff("Repeats\n"));
}

#[test]
fn test_rule_next() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "rule", "next", "FREQ=WEEKLY;BYDAY=MO,WE", "--start", "2099-01-05", "--at", "08:30",
            "--count", "3",
        ])
        .stdout(assertions::has_occurrence_table_headers())
        .stdout(predicate::str::contains("2099-01-05"))
        .stdout(predicate::str::contains("2099-01-07"))
        .stdout(predicate::str::contains("2099-01-12"))
        .stdout(predicate::str::contains("2099-01-14").not())
        .stdout(predicate::str::contains("08:30"));

    harness
        .run_success(&["rule", "next", "FREQ=DAILY;COUNT=1", "--start", "2020-01-01"])
        .stdout(predicate::str::contains("No upcoming occurrences"));

    harness
        .run_failure(&["rule", "next", "FREQ=HOURLY"])
        .stderr(predicate::str::contains("Not a usable repeat rule"));
}

#[test]
fn test_task_complete_rolls_over() {
    let harness = CliTestHarness::new();
    let task = harness.write_file("task.json", TestFixtures::daily_task_json());

    let value = harness.run_json(&[
        "task", "complete", task.to_str().unwrap(), "--next-id", "8", "--next-position", "10",
    ]);
    assert_eq!(value["kind"], "recurring");
    assert_eq!(value["completed"]["done"], true);
    assert_eq!(value["completed"]["seriesId"], 7);
    assert!(value["completed"]["completedAt"].is_string());

    let next = &value["next"];
    assert_eq!(next["id"], 8);
    assert_eq!(next["position"], 10);
    assert_eq!(next["done"], false);
    assert_eq!(next["reminderDate"], "2024-01-02");
    assert_eq!(next["reminderTime"], "09:00");
    assert_eq!(next["seriesId"], 7);
    assert_eq!(next["repeatRule"], "FREQ=DAILY");
    assert_eq!(next["priority"], "medium");
}

#[test]
fn test_task_complete_from_stdin_and_table() {
    let harness = CliTestHarness::new();

    harness
        .command()
        .args(["task", "complete", "-", "--table"])
        .write_stdin(TestFixtures::daily_task_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("Water plants"))
        .stdout(predicate::str::contains("2024-01-02 09:00"));
}

#[test]
fn test_task_complete_plain_and_errors() {
    let harness = CliTestHarness::new();
    let plain = harness.write_file("plain.json", TestFixtures::plain_task_json());

    let value = harness.run_json(&["task", "complete", plain.to_str().unwrap()]);
    assert_eq!(value["kind"], "single");
    assert_eq!(value["done"], true);

    let broken = harness.write_file("broken.json", "{ not json");
    harness
        .run_failure(&["task", "complete", broken.to_str().unwrap()])
        .stderr(predicate::str::contains("Malformed task JSON"));

    harness
        .run_failure(&["task", "complete", "missing.json"])
        .stderr(assertions::has_error());
}

#[test]
fn test_task_complete_at_max_id() {
    let harness = CliTestHarness::new();
    let json = TestFixtures::daily_task_json()
        .replace("\"id\": 7", &format!("\"id\": {}", i64::MAX));
    let task = harness.write_file("max.json", &json);
    let path = task.to_str().unwrap();

    harness
        .run_failure(&["task", "complete", path])
        .stderr(predicate::str::contains("Invalid input"))
        .stderr(predicate::str::contains("--next-id"));

    let value = harness.run_json(&["task", "complete", path, "--next-id", "1"]);
    assert_eq!(value["next"]["id"], 1);
}

#[test]
fn test_task_repeat() {
    let harness = CliTestHarness::new();
    let plain = harness.write_file("plain.json", TestFixtures::plain_task_json());
    let path = plain.to_str().unwrap();

    let value = harness.run_json(&["task", "repeat", path, "--preset", "yearly"]);
    assert_eq!(value["repeatRule"], "FREQ=YEARLY;BYMONTH=3;BYMONTHDAY=15");
    assert_eq!(value["repeatStart"], "2024-03-15");

    let value = harness.run_json(&["task", "repeat", path, "--rule", "FREQ=DAILY;INTERVAL=2"]);
    assert_eq!(value["repeatRule"], "FREQ=DAILY;INTERVAL=2");

    let repeating = harness.write_file("daily.json", TestFixtures::daily_task_json());
    let value = harness.run_json(&["task", "repeat", repeating.to_str().unwrap(), "--clear"]);
    assert!(value["repeatRule"].is_null());
    assert!(value["repeatStart"].is_null());

    harness
        .run_failure(&["task", "repeat", path])
        .stderr(predicate::str::contains("--preset"));
}

#[test]
fn test_invalid_timezone_config() {
    let harness = CliTestHarness::with_config("timezone = \"Mars/Olympus\"\n");

    harness
        .run_failure(&["rule", "summary", "FREQ=DAILY"])
        .stderr(predicate::str::contains("Unknown timezone"));
}
