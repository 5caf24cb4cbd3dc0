use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("flock")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("feed"))
        .stdout(predicate::str::contains("follow"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_feed_help_shows_following_flag() {
    cargo_bin_cmd!("flock")
        .args(["feed", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--following"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_signup_requires_name() {
    cargo_bin_cmd!("flock")
        .args(["signup", "--email", "ada@example.com", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("flock")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
