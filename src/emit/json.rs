//! JSON description of the first request

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value};

use super::Emitter;
use crate::curl::form::FormContent;
use crate::curl::opts::COMMON_SUPPORTED_ARGS;
use crate::diagnostics::Diagnostics;
use crate::errors::Result;
use crate::query::{parse_query_string, QueryValue};
use crate::request::{get_first, Request, Support};
use crate::word::Word;

const EXTRA_ARGS: &[&str] = &[
    "insecure",
    "form",
    "form-string",
    "location",
    "max-time",
    "connect-timeout",
    "anyauth",
    "digest",
    "aws-sigv4",
    "negotiate",
    "delegation",
    "ntlm",
    "ntlm-wb",
];

static SUPPORTED_ARGS: Lazy<Vec<&'static str>> =
    Lazy::new(|| COMMON_SUPPORTED_ARGS.iter().chain(EXTRA_ARGS).copied().collect());

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:Infinity|\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?))")
        .expect("Invalid number regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supported_args(&self) -> &[&'static str] {
        &SUPPORTED_ARGS
    }

    fn emit(&self, requests: &[Request], diagnostics: &mut Diagnostics) -> Result<String> {
        let request = get_first(requests, diagnostics, Support::default())?;
        let value = to_json(request);

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut serializer)?;
        let mut out = String::from_utf8_lossy(&buf).into_owned();
        out.push('\n');
        Ok(out)
    }
}

fn string(word: &Word) -> Value {
    Value::String(word.to_string())
}

/// The number at the start of `s`, or null
fn leading_number(s: &str) -> Value {
    let Some(caps) = LEADING_NUMBER.captures(s) else {
        return Value::Null;
    };
    let Ok(n) = caps[1].parse::<f64>() else {
        return Value::Null;
    };
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

fn query_value(value: &QueryValue) -> Value {
    match value {
        QueryValue::Single(v) => string(v),
        QueryValue::Multiple(values) => Value::Array(values.iter().map(string).collect()),
    }
}

/// `data` as a JSON document, form fields, or a single key
fn data_value(request: &Request, data: &Word) -> Value {
    if request.headers.get_content_type().as_deref() == Some("application/json") {
        if let Ok(json) = serde_json::from_str::<Value>(&data.to_string()) {
            return json;
        }
    }

    let query = parse_query_string(Some(data));
    let mut fields = Map::new();
    match (query.list, query.dict) {
        (_, Some(dict)) => {
            for (key, value) in &dict {
                fields.insert(key.to_string(), query_value(value));
            }
        }
        (Some(list), None) if !list.is_empty() => {
            // repeated keys keep their last value
            for (key, value) in &list {
                fields.insert(key.to_string(), string(value));
            }
        }
        _ => {
            fields.insert(data.to_string(), Value::String(String::new()));
        }
    }
    Value::Object(fields)
}

fn to_json(request: &Request) -> Value {
    let url = &request.urls[0];
    let mut out = Map::new();

    let shown = if url.query_dict.is_some() {
        &url.url_without_query_list
    } else {
        &url.url
    };
    let shown = shown.to_string();
    out.insert(
        "url".into(),
        Value::String(shown.strip_suffix('/').unwrap_or(&shown).to_string()),
    );
    out.insert("raw_url".into(), string(&url.url));
    out.insert("method".into(), string(&url.method.to_lowercase()));

    if let Some(cookies) = &request.cookies {
        let cookies: Map<String, Value> =
            cookies.iter().map(|(name, value)| (name.to_string(), string(value))).collect();
        out.insert("cookies".into(), Value::Object(cookies));
    }

    let headers: Map<String, Value> = request
        .headers
        .iter()
        .filter_map(|h| h.value.as_ref().map(|v| (h.name.to_string(), string(v))))
        .collect();
    out.insert("headers".into(), Value::Object(headers));

    if let Some(dict) = &url.query_dict {
        let queries: Map<String, Value> =
            dict.iter().map(|(key, value)| (key.to_string(), query_value(value))).collect();
        out.insert("queries".into(), Value::Object(queries));
    }

    if let Some(data) = &request.data {
        out.insert("data".into(), data_value(request, data));
    } else if let Some(parts) = &request.multipart_uploads {
        let mut files = Map::new();
        let mut fields = Map::new();
        for part in parts {
            match &part.content {
                FormContent::File { content_file } => {
                    files.insert(part.name.to_string(), string(content_file));
                }
                FormContent::Text { content } => {
                    fields.insert(part.name.to_string(), string(content));
                }
            }
        }
        if !files.is_empty() {
            out.insert("files".into(), Value::Object(files));
        }
        if !fields.is_empty() {
            out.insert("data".into(), Value::Object(fields));
        }
    }

    if request.tls.insecure {
        // the key says whether certificates are verified
        out.insert("insecure".into(), Value::Bool(false));
    }

    if let Some((user, password)) = &url.auth {
        let mut auth = Map::new();
        auth.insert("user".into(), string(user));
        auth.insert("password".into(), string(password));
        out.insert("auth".into(), Value::Object(auth));
        out.insert("auth_type".into(), Value::String(request.auth_type.as_str().to_string()));
    }
    if let Some(aws_sigv4) = &request.aws_sigv4 {
        out.insert("aws_sigv4".into(), string(aws_sigv4));
    }
    if let Some(delegation) = &request.delegation {
        out.insert("delegation".into(), string(delegation));
    }
    if let Some(follow) = request.redirects.follow {
        out.insert("follow_redirects".into(), Value::Bool(follow));
    }
    if let Some(timeout) = &request.timeouts.timeout {
        out.insert("timeout".into(), leading_number(&timeout.to_string()));
    }
    if let Some(timeout) = &request.timeouts.connect_timeout {
        out.insert("connect_timeout".into(), leading_number(&timeout.to_string()));
    }

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, ParseOptions};
    use serde_json::json;

    fn convert(command: &str) -> (Value, Diagnostics) {
        let options = ParseOptions {
            supported_args: Some(JsonEmitter.supported_args()),
            ..Default::default()
        };
        let (requests, mut diagnostics) = parse(command, &options).unwrap();
        let out = JsonEmitter.emit(&requests, &mut diagnostics).unwrap();
        assert!(out.ends_with("}\n"));
        (serde_json::from_str(&out).unwrap(), diagnostics)
    }

    #[test]
    fn test_simple_get() {
        let (json, _) = convert("curl https://example.com/");
        assert_eq!(
            json,
            json!({
                "url": "https://example.com",
                "raw_url": "https://example.com/",
                "method": "get",
                "headers": {}
            })
        );
    }

    #[test]
    fn test_form_data() {
        let (json, _) = convert("curl -d 'a=1&b=2&b=3' example.com/api?x=y");
        assert_eq!(json["url"], "http://example.com/api");
        assert_eq!(json["method"], "post");
        assert_eq!(json["queries"], json!({"x": "y"}));
        assert_eq!(json["data"], json!({"a": "1", "b": ["2", "3"]}));
        assert_eq!(json["headers"]["Content-Type"], "application/x-www-form-urlencoded");
    }

    #[test]
    fn test_opaque_data() {
        let (json, _) = convert("curl -d 'just text' example.com");
        assert_eq!(json["data"], json!({"just text": ""}));
    }

    #[test]
    fn test_json_body() {
        let (json, _) = convert(r#"curl --json '{"a": [1, 2]}' example.com"#);
        assert_eq!(json["data"], json!({"a": [1, 2]}));
    }

    #[test]
    fn test_multipart() {
        let (json, _) = convert("curl -F name=bob -F photo=@me.png example.com");
        assert_eq!(json["files"], json!({"photo": "me.png"}));
        assert_eq!(json["data"], json!({"name": "bob"}));
    }

    #[test]
    fn test_auth_and_options() {
        let (json, _) = convert("curl -k -L -m 30 --connect-timeout 2.5 -u user:pass --digest example.com");
        assert_eq!(json["insecure"], false);
        assert_eq!(json["follow_redirects"], true);
        assert_eq!(json["timeout"], 30);
        assert_eq!(json["connect_timeout"], 2.5);
        assert_eq!(json["auth"], json!({"user": "user", "password": "pass"}));
        assert_eq!(json["auth_type"], "digest");
    }

    #[test]
    fn test_unset_headers_are_dropped() {
        let (json, _) = convert("curl -H 'Accept:' -H 'X-A: 1' example.com");
        assert_eq!(json["headers"], json!({"X-A": "1"}));
    }

    #[test]
    fn test_cookies() {
        let (json, _) = convert("curl -b 'a=1; b=2' example.com");
        assert_eq!(json["cookies"], json!({"a": "1", "b": "2"}));
        assert_eq!(json["headers"]["Cookie"], "a=1; b=2");
    }

    #[test]
    fn test_multiple_urls_warns() {
        let (_, diagnostics) = convert("curl a.example b.example");
        assert!(diagnostics.has("multiple-urls"));
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("10"), json!(10));
        assert_eq!(leading_number(" 1.5s"), json!(1.5));
        assert_eq!(leading_number("abc"), Value::Null);
    }
}
