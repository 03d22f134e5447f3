use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_displays_usage() {
    Command::cargo_bin("eztemplate")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_root_argument_fails() {
    Command::cargo_bin("eztemplate")
        .expect("binary exists")
        .assert()
        .failure();
}
