use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Deterministic fast simulation: inbound-only crossings at 200 Hz.
const FAST_SIM: &str = r#"
[detector]
rate_hz = 200
out_ratio = 0.0

[weight]
min_kg = 50.0
max_kg = 100.0
"#;

fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("cfg.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn help_prints_usage() {
    Command::cargo_bin("tally_cli")
        .unwrap()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Usage:"));
}

#[rstest]
#[case(false, "self-check: OK")]
#[case(true, "\"status\":\"ok\"")]
fn self_check_reports_ok(#[case] json: bool, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST_SIM);

    let mut cmd = Command::cargo_bin("tally_cli").unwrap();
    cmd.arg("--config").arg(&cfg);
    if json {
        cmd.arg("--json");
    }
    cmd.arg("self-check");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(needle));
}

#[test]
fn run_prints_a_summary() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST_SIM);

    Command::cargo_bin("tally_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["run", "--crossings", "9", "--partial-every", "3", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session finalized."))
        // Inbound-only: cumulative captures at 3, 6, and 9.
        .stdout(predicate::str::contains("total count:    18"));
}

#[test]
fn seeded_runs_are_reproducible() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST_SIM);

    let run = || {
        Command::cargo_bin("tally_cli")
            .unwrap()
            .arg("--config")
            .arg(&cfg)
            .arg("--json")
            .args([
                "run",
                "--crossings",
                "9",
                "--partial-every",
                "3",
                "--seed",
                "7",
                "--lot",
                "L-1",
            ])
            .output()
            .unwrap()
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    let stdout = String::from_utf8(first.stdout.clone()).unwrap();
    assert!(stdout.contains("\"total_count\":18"), "stdout: {stdout}");
    assert!(stdout.contains("\"lot\":\"L-1\""), "stdout: {stdout}");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn history_rows_are_appended() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST_SIM);
    let history = dir.path().join("history.csv");

    let run = || {
        Command::cargo_bin("tally_cli")
            .unwrap()
            .arg("--config")
            .arg(&cfg)
            .args(["run", "--crossings", "6", "--partial-every", "3", "--seed", "3"])
            .arg("--lot")
            .arg("L-7")
            .arg("--history")
            .arg(&history)
            .assert()
            .success();
    };

    run();
    let text = fs::read_to_string(&history).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2, "header plus one row: {text}");
    assert!(lines[0].starts_with("finished_at_ms,"));
    assert!(lines[1].contains(",L-7,2,9,"), "row: {}", lines[1]);

    run();
    let text = fs::read_to_string(&history).unwrap();
    assert_eq!(text.lines().count(), 3, "second run appends one row");
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[detector]\nrate_hz = 0\n");

    Command::cargo_bin("tally_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("rate_hz"));
}

#[test]
fn finalize_without_crossings_fails_with_stable_code() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST_SIM);

    Command::cargo_bin("tally_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["run", "--crossings", "0"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("has not started"));
}
