//! CLI surface tests
//!
//! The environment selector contract matters most: a missing or unknown
//! value must abort with a descriptive message before any build work.

use assert_cmd::Command;
use predicates::prelude::*;

fn tspack() -> Command {
    Command::cargo_bin("tspack").unwrap()
}

#[test]
fn test_build_without_env_is_fatal() {
    tspack()
        .arg("build")
        .current_dir(tempfile::tempdir().unwrap().path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required --env"));
}

#[test]
fn test_build_with_unknown_env_is_fatal() {
    tspack()
        .args(["build", "--env", "staging"])
        .current_dir(tempfile::tempdir().unwrap().path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "unrecognized environment 'staging'",
        ));
}

#[test]
fn test_build_env_is_checked_before_config() {
    // No tspack.toml in the cwd, yet the error is about --env, proving the
    // selector is validated before any build work starts
    tspack()
        .args(["build", "--env", "nope"])
        .current_dir(tempfile::tempdir().unwrap().path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized environment"))
        .stderr(predicate::str::contains("tspack.toml").not());
}

#[test]
fn test_demo_prints_invoice_and_zoo() {
    tspack()
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice for order #"))
        .stdout(predicate::str::contains("2 x Logo Tee @ 15.00 USD = 30.00 USD"))
        .stdout(predicate::str::contains("total: 1028.00 USD"))
        .stdout(predicate::str::contains("snake slithers by"));
}

#[test]
fn test_demo_crash_flag_raises_at_the_end() {
    tspack()
        .args(["demo", "--crash"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invoice for order #"))
        .stderr(predicate::str::contains("deliberate demo error"));
}
