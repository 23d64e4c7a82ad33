//! Request fields built from whole command lines
mod common;

use common::{parse_command, request};
use curlconv::emit::{convert, Language};
use curlconv::request::{DataDisposition, ProxyType};
use curlconv::resources::{NoResources, StaticResources};
use curlconv::Word;

#[test]
fn test_data_urlencode() {
    let r = request("curl --data-urlencode 'q=a b' example.com");
    assert_eq!(r.data.map(|d| d.to_string()).as_deref(), Some("q=a+b"));
    assert_eq!(r.data_disposition, DataDisposition::Body);
}

#[test]
fn test_stdin_file_redirect() {
    let r = request("curl -d @- example.com < body.txt");
    assert_eq!(r.stdin_file, Some(Word::from("body.txt")));
    assert_eq!(r.data_reads_file.as_deref(), Some("body.txt"));
}

#[test]
fn test_url_query_is_merged() {
    let r = request("curl --url-query 'q=a b' 'example.com/?x=1'");
    assert_eq!(r.urls[0].url.to_string(), "http://example.com/?x=1&q=a+b");
}

#[test]
fn test_proto_default() {
    let r = request("curl --proto-default https example.com");
    assert_eq!(r.urls[0].url.to_string(), "https://example.com");
}

#[test]
fn test_unsupported_scheme_warns() {
    let (_, diagnostics) = parse_command("curl ftp://example.com/file");
    assert!(diagnostics.has("bad-scheme"));
}

#[test]
fn test_cert_with_password() {
    let r = request("curl --cert client.pem:hunter2 https://example.com");
    assert_eq!(
        r.tls.cert,
        Some((Word::from("client.pem"), Some(Word::from("hunter2"))))
    );
}

#[test]
fn test_socks_proxy() {
    let r = request("curl --socks5-hostname localhost:9050 example.com");
    assert_eq!(r.proxy.proxy_type, Some(ProxyType::Socks5Hostname));
}

#[test]
fn test_cookie_file_is_not_a_header() {
    let r = request("curl -b jar.txt example.com");
    assert_eq!(r.cookie_files, vec![Word::from("jar.txt")]);
    assert!(!r.headers.has("cookie"));
}

#[test]
fn test_next_starts_a_new_request() {
    let (requests, _) = parse_command("curl a.example --next -d x b.example");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].urls[0].method.to_string(), "POST");
}

#[test]
fn test_form_and_json_output() {
    let (code, _) = convert(
        "curl -F name=bob -F 'photo=@me.png;type=image/png' example.com",
        Language::Json,
        false,
        &NoResources,
    )
    .unwrap();
    let json: serde_json::Value = serde_json::from_str(&code).unwrap();
    assert_eq!(json["method"], "post");
    assert_eq!(json["files"]["photo"], "me.png");
    assert_eq!(json["data"]["name"], "bob");
}

#[test]
fn test_stdin_from_provider_json() {
    let resources = StaticResources::with_stdin("{\"id\": 7}");
    let (code, _) = convert(
        "curl --json @- example.com",
        Language::Json,
        false,
        &resources,
    )
    .unwrap();
    let json: serde_json::Value = serde_json::from_str(&code).unwrap();
    assert_eq!(json["data"]["id"], 7);
    assert_eq!(json["headers"]["Content-Type"], "application/json");
}
