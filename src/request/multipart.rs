//! Recovering form parts from a raw `multipart/form-data` body

use mime::Mime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::curl::form::FormParam;
use crate::word::Word;

static PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#";\s*([^;=]+)=(?:("[^"]*")|([^()<>@,;:\\"/\[\]?.=]*))"#)
        .expect("Invalid header parameter regex")
});

/// `boundary=` of a `multipart/form-data` Content-Type
pub fn parse_boundary(content_type: &str) -> Option<String> {
    let mime: Mime = content_type.parse().ok()?;
    if mime.type_() != mime::MULTIPART || mime.subtype() != mime::FORM_DATA {
        return None;
    }
    mime.get_param(mime::BOUNDARY)
        .map(|b| b.as_str().trim_matches('"').to_string())
}

/// Split `form-data; name="a"; filename="b"` into the type and its parameters
fn parse_disposition(value: &str) -> Option<(String, Vec<(String, String)>)> {
    let Some(semi) = value.find(';') else {
        return Some((value.to_string(), Vec::new()));
    };
    let (kind, rest) = value.split_at(semi);
    let mut params = Vec::new();
    for caps in PARAM.captures_iter(rest) {
        let name = caps[1].to_string();
        let value = match (caps.get(3), caps.get(2)) {
            (Some(bare), _) if !bare.as_str().is_empty() => bare.as_str().to_string(),
            (_, Some(quoted)) => quoted.as_str().trim_matches('"').to_string(),
            _ => String::new(),
        };
        params.push((name, value));
    }
    if params.is_empty() && !rest.trim().is_empty() {
        return None;
    }
    Some((kind.to_string(), params))
}

/// Parse a body built with `--data` and a hand-written multipart
/// Content-Type back into form parts.
///
/// Returns `None` if the body isn't well formed. The flag is false when
/// some part had content disposition parameters that were dropped.
pub fn parse_raw_form(data: &str, boundary: &str) -> Option<(Vec<FormParam>, bool)> {
    let end_boundary = format!("\r\n--{}--\r\n", boundary);
    let data = data.strip_suffix(&end_boundary)?;

    let boundary = format!("--{}\r\n", boundary);
    if !data.is_empty() && !data.starts_with(&boundary) {
        return None;
    }
    let data = data.get(boundary.len()..).unwrap_or_default();

    let mut form = Vec::new();
    let mut roundtrips = true;
    for part in data.split(&format!("\r\n{}", boundary)) {
        let lines: Vec<&str> = part.split("\r\n").collect();
        if lines.len() < 2 {
            return None;
        }

        let mut name: Option<String> = None;
        let mut filename: Option<String> = None;
        let mut content_type: Option<Word> = None;
        let mut headers = Vec::new();
        let mut seen_disposition = false;

        let blank = lines.iter().position(|line| line.is_empty())?;
        for line in &lines[..blank] {
            let (header, value) = line.split_once(": ")?;
            if header.eq_ignore_ascii_case("content-disposition") {
                if seen_disposition {
                    return None;
                }
                seen_disposition = true;
                let (kind, params) = parse_disposition(value)?;
                if kind != "form-data" {
                    return None;
                }
                for (param, value) in params {
                    match param.as_str() {
                        "name" => name = Some(value),
                        "filename" => filename = Some(value),
                        _ => roundtrips = false,
                    }
                }
            } else if header.eq_ignore_ascii_case("content-type") {
                content_type = Some(Word::from(value));
            } else {
                headers.push(Word::from(*line));
            }
        }
        if !seen_disposition {
            return None;
        }
        let name = name.filter(|n| !n.is_empty())?;
        let content = lines[blank + 1..].join("\r\n");

        let mut param = FormParam::text(Word::from(name), Word::from(content));
        param.filename = filename.map(Word::from);
        param.content_type = content_type;
        param.headers.extend(headers);
        form.push(param);
    }
    Some((form, roundtrips))
}
