//! End-to-end CLI behavior that needs no network access.

use assert_cmd::Command;
use predicates::prelude::*;

fn archiver() -> Command {
    Command::cargo_bin("rbx-archiver").expect("binary should build")
}

#[test]
fn test_help_lists_scraper_options() {
    archiver()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--asset"))
        .stdout(predicate::str::contains("--hash"))
        .stdout(predicate::str::contains("--workers"))
        .stdout(predicate::str::contains("--compression"));
}

#[test]
fn test_version_flag_prints_version() {
    archiver()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_target_prints_guidance_and_exits_cleanly() {
    archiver()
        .assert()
        .success()
        .stdout(predicate::str::contains("No scrape target given"));
}

#[test]
fn test_invalid_worker_count_rejected() {
    archiver()
        .args(["--asset", "1818", "--workers", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_unknown_flag_rejected() {
    archiver()
        .arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
