//! Integration tests for the `regexplain` binary.

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn regexplain(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("regexplain").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_explain_json_to_stdout() {
    let dir = TempDir::new().unwrap();
    let output = regexplain(&dir)
        .args(["explain", "cat", "--sample", "the cat sat", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pattern"], "cat");
    assert_eq!(json["preview"]["matches"][0]["text"], "cat");
    assert_eq!(json["intent"]["label"], "general");
}

#[test]
fn test_explain_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let sample_path = dir.path().join("sample.txt");
    fs::write(&sample_path, "id 123-456-7890\n").unwrap();
    let output_path = dir.path().join("report.json");

    regexplain(&dir)
        .args(["explain", "\\d{3}-\\d{3}-\\d{4}", "-f", "g", "--sample-file"])
        .arg(&sample_path)
        .args(["--format", "json", "--no-estimate", "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let json: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(json["flags"], "g");
    assert_eq!(json["preview"]["matches"][0]["span"][0], 3);
    assert!(json["estimate"].is_null());
    assert_eq!(json["features"]["fp_fn_estimation"], false);
}

#[test]
fn test_invalid_pattern_exits_with_status_two() {
    let dir = TempDir::new().unwrap();
    let output = regexplain(&dir).args(["explain", "([a-z]"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid regular expression"));
    assert!(stderr.contains("Unterminated group"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unsupported_flag_exits_with_status_two() {
    let dir = TempDir::new().unwrap();
    let output = regexplain(&dir)
        .args(["explain", "a", "-f", "d"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid flags supplied to RegExp constructor 'd'"));
}

#[test]
fn test_terminal_output_lists_warnings() {
    let dir = TempDir::new().unwrap();
    let output = regexplain(&dir)
        .args(["explain", "(a+)+$", "--plain", "--no-estimate"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NESTED_QUANTIFIERS"));
    assert!(stdout.contains("[HIGH]"));
}

#[test]
fn test_init_creates_config_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    regexplain(&dir).arg("init").assert().success();
    assert!(dir.path().join(".regexplain.toml").exists());

    regexplain(&dir).arg("init").assert().failure();
    regexplain(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn test_discovered_config_disables_risks() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".regexplain.toml"),
        "[features]\nrisk_detection = false\n",
    )
    .unwrap();

    let output = regexplain(&dir)
        .args(["explain", "(a+)+$", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
}
