//! Common test utilities for curlconv integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use curlconv::resources::StaticResources;
use curlconv::{parse, Diagnostics, ParseOptions, Request};

/// Parse shell text with no stdin and an empty environment
pub fn parse_command(command: &str) -> (Vec<Request>, Diagnostics) {
    parse(command, &ParseOptions::default()).expect("command should parse")
}

/// The single request a command describes
pub fn request(command: &str) -> Request {
    let (mut requests, _) = parse_command(command);
    assert_eq!(requests.len(), 1, "expected one request for {:?}", command);
    requests.remove(0)
}

/// Parse with a fixed environment
pub fn parse_with(command: &str, resources: &StaticResources) -> (Vec<Request>, Diagnostics) {
    let options = ParseOptions {
        resources,
        ..Default::default()
    };
    parse(command, &options).expect("command should parse")
}

/// The curlconv binary with logging turned off and no user config
pub fn curlconv() -> Command {
    let mut cmd = Command::cargo_bin("curlconv").expect("binary should be built");
    cmd.env_remove("CURLCONV_LOG");
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("curlconv-test-no-config"));
    cmd
}
