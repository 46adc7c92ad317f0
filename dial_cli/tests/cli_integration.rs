use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn bin() -> Command {
    Command::cargo_bin("dial_cli").expect("binary builds")
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("dial.toml");
    fs::write(&path, body).expect("write temp config");
    path
}

#[test]
fn help_lists_the_three_commands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("random"))
        .stdout(predicate::str::contains("calendar"))
        .stdout(predicate::str::contains("self-check"));
}

#[test]
fn random_mode_requires_credentials() {
    bin()
        .arg("random")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--api-key"));
}

#[test]
fn calendar_mode_requires_the_location_secret() {
    bin()
        .arg("calendar")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--location-secret"));
}

#[test]
fn self_check_passes_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .current_dir(dir.path())
        .args(["--config", "missing.toml", "self-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("self-check ok"));
}

#[test]
fn self_check_rejects_an_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(&dir, "[connection]\ninitial_attempts = 0\n");
    bin()
        .args(["--config", cfg.to_str().unwrap(), "self-check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("initial_attempts"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(&dir, "[control\ngranularity=");
    bin()
        .args(["--config", cfg.to_str().unwrap(), "self-check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn json_mode_emits_structured_errors() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(&dir, "[connection]\ninitial_attempts = 0\n");
    let out = bin()
        .args(["--config", cfg.to_str().unwrap(), "--json", "self-check"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&out.get_output().stderr).to_string();
    let v: serde_json::Value = serde_json::from_str(stderr.trim()).expect("stderr is JSON");
    assert!(v.get("error").is_some());
    assert!(v.get("help").is_some());
}

#[test]
fn random_mode_without_an_address_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .current_dir(dir.path())
        .args([
            "--config",
            "missing.toml",
            "random",
            "--api-key",
            "k",
            "--api-key-id",
            "id",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("address"));
}
