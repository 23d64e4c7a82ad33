//! Running the curlconv binary
mod common;

use common::curlconv;
use predicates::prelude::*;
use serde_json::Value;

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_converts_arguments_to_json() {
    let output = curlconv()
        .args(["-X", "POST", "-d", "a=1", "example.com/api"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["url"], "http://example.com/api");
    assert_eq!(json["method"], "post");
    assert_eq!(json["data"]["a"], "1");
}

#[test]
fn test_language_flag() {
    curlconv()
        .args(["-l", "json", "example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"raw_url\": \"http://example.com\""));
}

#[test]
fn test_unknown_language_fails() {
    curlconv()
        .args(["--language", "cobol", "example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown language"));
}

#[test]
fn test_missing_url_fails() {
    curlconv()
        .args(["-X", "POST"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: no URL specified!"));
}

#[test]
fn test_command_from_stdin() {
    let output = curlconv()
        .arg("--stdin")
        .write_stdin("curl -H 'Accept: text/plain' example.com\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["headers"]["Accept"], "text/plain");
}

#[test]
fn test_lone_dash_reads_command_from_stdin() {
    curlconv()
        .arg("-")
        .write_stdin("curl -X DELETE example.com/1")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"method\": \"delete\""));
}

#[test]
fn test_stdin_with_arguments_fails() {
    curlconv()
        .args(["--stdin", "example.com"])
        .write_stdin("curl example.com")
        .assert()
        .code(2);
}

#[test]
fn test_verbose_prints_warnings() {
    curlconv()
        .args(["--verbose", "a.example", "b.example"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:"));
}

#[test]
fn test_quiet_by_default() {
    curlconv()
        .args(["a.example", "b.example"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_strict_rejects_unknown_options() {
    curlconv()
        .args(["--strict", "--not-a-curl-option", "example.com"])
        .assert()
        .code(2);
}

#[test]
fn test_data_from_piped_stdin() {
    let output = curlconv()
        .args(["-d", "@-", "example.com"])
        .write_stdin("x=1")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["data"]["x"], "1");
}

#[test]
fn test_stdin_command_has_no_stdin_data() {
    curlconv()
        .args(["--verbose", "--stdin"])
        .write_stdin("curl -d @- example.com")
        .assert()
        .success()
        .stderr(predicate::str::contains("read the file \"-\""));
}
