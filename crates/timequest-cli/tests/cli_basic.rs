//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own throwaway HOME.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_timequest"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("TIMEQUEST_ENV")
        .env_remove("OPENAI_API_KEY")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_lesson_list() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["lesson", "list"]);
    assert!(out.contains("mastering-time-blocking"));
    assert!(out.contains("defeating-distractions"));
}

#[test]
fn test_new_session_has_no_coins() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["coins", "show"]);
    assert_eq!(out.trim(), "0 coins");
}

#[test]
fn test_weekly_overflowing_drop_is_an_error() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["weekly", "drop", "math-1", "d0-t6"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("Not enough time"));

    let out = run_ok(&home, &["weekly", "drop", "math-1", "d0-t4"]);
    assert!(out.contains("placed math-1"));
}

#[test]
fn test_config_defaults_and_set() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["config", "get", "rewards.weekly_schedule"]);
    assert_eq!(out.trim(), "35");

    run_ok(&home, &["config", "set", "rewards.weekly_schedule", "40"]);
    let out = run_ok(&home, &["config", "get", "rewards.weekly_schedule"]);
    assert_eq!(out.trim(), "40");

    let (_, stderr, code) = run_cli(&home, &["config", "get", "rewards.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_priority_flow_pays_once() {
    let home = TempDir::new().unwrap();
    let answers = [
        ("task-1", "do"),
        ("task-2", "schedule"),
        ("task-3", "delegate"),
        ("task-4", "delete"),
        ("task-5", "do"),
        ("task-6", "schedule"),
        ("task-7", "delegate"),
        ("task-8", "delete"),
    ];
    for (task, quadrant) in answers {
        run_ok(&home, &["priority", "move", task, quadrant]);
    }
    let out = run_ok(&home, &["priority", "check"]);
    assert!(out.contains("You earned +30 Coins!"));

    let out = run_ok(&home, &["coins", "show"]);
    assert_eq!(out.trim(), "30 coins");

    let (_, stderr, code) = run_cli(&home, &["priority", "check"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already checked"));
}

#[test]
fn test_session_reset_clears_coins() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["blocking", "add", "Draw a comic"]);
    let out = run_ok(&home, &["coins", "show"]);
    assert_eq!(out.trim(), "5 coins");

    run_ok(&home, &["session", "reset"]);
    let out = run_ok(&home, &["coins", "show"]);
    assert_eq!(out.trim(), "0 coins");
}

#[test]
fn test_calendar_add_and_list() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["calendar", "add", "2030-05-01", "4:00 PM", "Piano"]);
    run_ok(&home, &["calendar", "add", "2030-05-01", "9:00 AM", "Swim", "--category", "fun"]);
    let out = run_ok(&home, &["calendar", "list", "--date", "2030-05-01"]);
    let swim = out.find("Swim").unwrap();
    let piano = out.find("Piano").unwrap();
    assert!(swim < piano, "events should be sorted by time:\n{out}");
}

#[test]
fn test_pricing_lists_both_plans() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["pricing"]);
    assert!(out.contains("$12.50"));
    assert!(out.contains("$17.50"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["completions", "bash"]);
    assert!(out.contains("timequest"));
}

#[test]
fn test_study_plan_reports_form_problems_without_a_key() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["study", "plan", "--topics", "math"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Please select the date of your test."));
    assert!(stderr.contains("Please list the topics you need to study."));
    assert!(!stderr.contains("missing API key"));
}
