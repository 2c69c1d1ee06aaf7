//! Argument parsing and help output of the binary.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn gridbanner_keys() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gridbanner-keys"));
    cmd.env("NO_COLOR", "1")
        .env_remove("GRIDBANNER_API_KEY")
        .env_remove("GRIDBANNER_SERVER")
        .env_remove("GRIDBANNER_GROUP")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_flags() {
    gridbanner_keys()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("--key"))
        .stdout(predicate::str::contains("--group"))
        .stdout(predicate::str::contains("--users"))
        .stdout(predicate::str::contains("--install"))
        .stdout(predicate::str::contains("--uninstall"));
}

#[test]
fn test_help_hides_home_overrides() {
    gridbanner_keys()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--root-home").not())
        .stdout(predicate::str::contains("--home-root").not());
}

#[test]
fn test_version_flag_shows_version() {
    gridbanner_keys()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_key_is_usage_error() {
    gridbanner_keys()
        .args(["--group", "Developers"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--key"));
}

#[test]
fn test_install_conflicts_with_uninstall() {
    gridbanner_keys()
        .args(["--key", "k", "--install", "--uninstall"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    gridbanner_keys()
        .args(["--key", "k", "--frobnicate"])
        .assert()
        .code(2);
}
