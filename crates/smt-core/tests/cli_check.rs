//! CLI tests for check, version, and output-format handling.

use assert_cmd::Command;
use predicates::prelude::*;

fn smt() -> Command {
    let mut cmd = Command::cargo_bin("smt-triage").expect("binary built");
    cmd.env_remove("SMT_TRIAGE_CONFIG");
    cmd.env_remove("SMT_LOG");
    cmd
}

#[test]
fn check_reports_builtin_defaults() {
    smt()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"builtin_default\""))
        .stdout(predicate::str::contains("known-codes"))
        .stdout(predicate::str::contains("Rejected by electrical test"));
}

#[test]
fn check_human_format_is_one_line() {
    smt()
        .args(["check", "--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration ok"))
        .stdout(predicate::str::contains("6 failure codes"));
}

#[test]
fn check_respects_env_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("smt.json");
    std::fs::write(
        &config_path,
        r#"{"policy":{"failure_predicate":"non-zero"}}"#,
    )
    .unwrap();

    smt()
        .arg("check")
        .env("SMT_TRIAGE_CONFIG", &config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"environment\""))
        .stdout(predicate::str::contains("non-zero"));
}

#[test]
fn check_rejects_invalid_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("smt.json");
    std::fs::write(&config_path, r#"{"codes":{}}"#).unwrap();

    smt()
        .args(["check", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Invalid Failure-Code Table"));
}

#[test]
fn version_subcommand_prints_version() {
    smt()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("smt-triage"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_subcommands() {
    smt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn json_format_accepted() {
    smt()
        .args(["check", "--format", "json"])
        .assert()
        .success();
}

#[test]
fn short_format_flag_accepted() {
    smt().args(["check", "-f", "summary"]).assert().success();
}

#[test]
fn invalid_format_rejected() {
    smt()
        .args(["check", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
