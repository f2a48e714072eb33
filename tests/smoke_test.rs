//! Smoke tests for the Mindmap CLI.
//!
//! These tests verify basic CLI functionality:
//! - `mm --version` outputs version info
//! - `mm --help` lists the commands
//! - `mm` (no args) fails with usage

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the mm binary.
fn mm() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mm"))
}

#[test]
fn test_version_flag() {
    mm().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mm"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    mm().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_shows_usage() {
    mm().assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_render_help() {
    mm().args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ticks"))
        .stdout(predicate::str::contains("--drag"))
        .stdout(predicate::str::contains("--scale"));
}
