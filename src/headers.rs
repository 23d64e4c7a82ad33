//! Request headers
//!
//! Headers keep their order and at most one entry per case-insensitive name,
//! except for repeats that can't be merged. A `None` value means the header
//! must not be sent at all (`-H 'Accept:'`).

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::diagnostics::Diagnostics;
use crate::word::{self, Word};

/// Headers whose values are comma separated lists
const COMMA_SEPARATED: &[&str] = &[
    "a-im",
    "accept",
    "accept-charset",
    "accept-encoding",
    "accept-language",
    "access-control-request-headers",
    "cache-control",
    "connection",
    "content-encoding",
    "expect",
    "forwarded",
    "if-match",
    "if-none-match",
    "range",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "via",
    "warning",
];

const SEMICOLON_SEPARATED: &[&str] = &["content-type", "cookie", "prefer"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: Word,
    /// `None` unsets the header
    pub value: Option<Word>,
}

impl Header {
    pub fn new(name: impl Into<Word>, value: Option<Word>) -> Self {
        Header {
            name: name.into(),
            value,
        }
    }

    fn key(&self) -> String {
        self.name.to_lowercase().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<Header>,
    /// Every user supplied header name was lowercase
    pub lowercase: bool,
}

impl Headers {
    /// Build from raw `-H` arguments. `arg_name` is only used in messages.
    pub fn parse(args: &[Word], arg_name: &str, diagnostics: &mut Diagnostics) -> Self {
        let mut headers = Vec::new();
        for arg in args {
            if arg.starts_with("@") {
                diagnostics.push(
                    "header-file",
                    format!("passing a file for {} is not supported: {:?}", arg_name, arg.to_string()),
                );
                continue;
            }

            if let Some((name, value)) = arg.split_once(":") {
                // `-H 'Name:'` unsets the header. Trailing spaces also count
                // as empty except for `-H 'Host: '`
                let significant = if name.eq_str("Host") { value.clone() } else { value.trim() };
                let value = significant.to_bool().then(|| value.remove_first_char(' '));
                headers.push(Header { name, value });
            } else if let Some((name, _)) = arg.split_once(";") {
                headers.push(Header {
                    name,
                    value: Some(Word::new()),
                });
            } else {
                diagnostics.push(
                    "invalid-header",
                    format!("ignoring {} argument with no ':' in it: {:?}", arg_name, arg.to_string()),
                );
            }
        }
        Self::from_entries(headers, diagnostics)
    }

    /// Merge repeated names. Applying this to already merged headers is a no-op.
    pub fn from_entries(headers: Vec<Header>, diagnostics: &mut Diagnostics) -> Self {
        let lowercase = !headers.is_empty() && headers.iter().all(|h| h.name == h.name.to_lowercase());

        let mut groups: IndexMap<String, Vec<Header>> = IndexMap::new();
        for header in headers {
            groups.entry(header.key()).or_default().push(header);
        }

        let mut merged = Vec::new();
        for (key, mut repeats) in groups {
            if repeats.len() == 1 {
                merged.append(&mut repeats);
                continue;
            }

            if repeats.iter().all(|h| h.value.is_none()) {
                let names: HashSet<String> = repeats.iter().map(|h| h.name.to_string()).collect();
                let last = repeats.pop();
                if let Some(last) = last {
                    if names.len() > 1 {
                        diagnostics.push(
                            "repeated-header",
                            format!("\"{}\" header unset {} times", last.name, repeats.len() + 1),
                        );
                    }
                    merged.push(last);
                }
                continue;
            }

            let mut present: Vec<Header> = repeats.into_iter().filter(|h| h.value.is_some()).collect();
            if present.len() == 1 {
                merged.append(&mut present);
                continue;
            }

            let last_name = present.last().map(|h| h.name.to_string()).unwrap_or_default();
            let separator = if COMMA_SEPARATED.contains(&key.as_str()) {
                Some(", ")
            } else if SEMICOLON_SEPARATED.contains(&key.as_str()) {
                Some("; ")
            } else {
                None
            };

            match separator {
                Some(sep) => {
                    let values: Vec<Word> = present.iter().filter_map(|h| h.value.clone()).collect();
                    diagnostics.push(
                        "repeated-header",
                        format!(
                            "merged {} \"{}\" headers together with \"{}\"",
                            present.len(),
                            last_name,
                            sep.trim()
                        ),
                    );
                    merged.push(Header {
                        name: present[0].name.clone(),
                        value: Some(word::join(&values, sep)),
                    });
                }
                None => {
                    diagnostics.push(
                        "repeated-header",
                        format!(
                            "found {} \"{}\" headers, only the last one will be sent",
                            present.len(),
                            last_name
                        ),
                    );
                    merged.append(&mut present);
                }
            }
        }

        Headers {
            headers: merged,
            lowercase,
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.headers.iter()
    }

    /// Value of the first header with this name.
    ///
    /// `Some(None)` means the header is explicitly unset.
    pub fn get(&self, name: &str) -> Option<Option<&Word>> {
        let lookup = name.to_lowercase();
        self.headers
            .iter()
            .find(|h| h.key() == lookup)
            .map(|h| h.value.as_ref())
    }

    /// The value of a header that is present and not unset
    pub fn get_value(&self, name: &str) -> Option<&Word> {
        self.get(name).flatten()
    }

    /// The MIME type of Content-Type, without parameters
    pub fn get_content_type(&self) -> Option<String> {
        let value = self.get_value("content-type")?;
        value
            .split(";", None)
            .first()
            .map(|t| t.trim().to_string())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn cased(&self, name: &str) -> Word {
        if self.lowercase {
            Word::from(name.to_lowercase())
        } else {
            Word::from(name)
        }
    }

    /// Append unless a header with this name exists. Returns true if added.
    pub fn set_if_missing(&mut self, name: &str, value: impl Into<Word>) -> bool {
        if self.has(name) {
            return false;
        }
        let name = self.cased(name);
        self.headers.push(Header {
            name,
            value: Some(value.into()),
        });
        true
    }

    /// Insert at the front unless a header with this name exists
    pub fn prepend_if_missing(&mut self, name: &str, value: impl Into<Word>) -> bool {
        if self.has(name) {
            return false;
        }
        let name = self.cased(name);
        self.headers.insert(
            0,
            Header {
                name,
                value: Some(value.into()),
            },
        );
        true
    }

    /// Overwrite in place, or append
    pub fn set(&mut self, name: &str, value: impl Into<Word>) {
        let lookup = name.to_lowercase();
        let value = Some(value.into());
        if let Some(existing) = self.headers.iter_mut().find(|h| h.key() == lookup) {
            existing.value = value;
            return;
        }
        let name = self.cased(name);
        self.headers.push(Header { name, value });
    }

    pub fn delete(&mut self, name: &str) {
        let lookup = name.to_lowercase();
        self.headers.retain(|h| h.key() != lookup);
    }

    /// Drop every unset header
    pub fn clear_nulls(&mut self) {
        self.headers.retain(|h| h.value.is_some());
    }

    pub fn count(&self, name: &str) -> usize {
        let lookup = name.to_lowercase();
        self.headers.iter().filter(|h| h.key() == lookup).count()
    }

    /// True if at least one header will actually be sent
    pub fn to_bool(&self) -> bool {
        self.headers.iter().any(|h| h.value.is_some())
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> (Headers, Diagnostics) {
        let mut d = Diagnostics::new();
        let words: Vec<Word> = args.iter().map(|a| Word::from(*a)).collect();
        (Headers::parse(&words, "--header/-H", &mut d), d)
    }

    fn value(h: &Headers, name: &str) -> Option<Option<String>> {
        h.get(name).map(|v| v.map(|w| w.to_string()))
    }

    #[test]
    fn test_basic_headers() {
        let (h, d) = parse(&["Accept: text/html", "X-Custom:value"]);
        assert_eq!(h.len(), 2);
        assert_eq!(value(&h, "accept"), Some(Some("text/html".into())));
        assert_eq!(value(&h, "x-custom"), Some(Some("value".into())));
        assert!(d.is_empty());
        assert!(!h.lowercase);
    }

    #[test]
    fn test_empty_value_unsets() {
        let (h, _) = parse(&["Host:"]);
        assert_eq!(value(&h, "Host"), Some(None));
        assert!(!h.to_bool());

        let (h, _) = parse(&["Accept:   "]);
        assert_eq!(value(&h, "Accept"), Some(None));
    }

    #[test]
    fn test_host_with_space_is_kept() {
        let (h, _) = parse(&["Host: "]);
        assert_eq!(value(&h, "Host"), Some(Some("".into())));
        assert!(h.to_bool());
    }

    #[test]
    fn test_semicolon_sends_empty_header() {
        let (h, _) = parse(&["X-Empty;"]);
        assert_eq!(value(&h, "X-Empty"), Some(Some("".into())));
    }

    #[test]
    fn test_invalid_and_file_headers_are_skipped() {
        let (h, d) = parse(&["nonsense", "@headers.txt"]);
        assert!(h.is_empty());
        assert!(d.has("invalid-header"));
        assert!(d.has("header-file"));
    }

    #[test]
    fn test_lowercase_flag() {
        let (mut h, _) = parse(&["accept: */*", "x-a: 1"]);
        assert!(h.lowercase);
        h.set_if_missing("Content-Type", "application/json");
        assert_eq!(h.iter().last().unwrap().name.to_string(), "content-type");
    }

    #[test]
    fn test_merge_comma_separated() {
        let (h, d) = parse(&["Accept: text/html", "accept: application/json"]);
        assert_eq!(h.len(), 1);
        assert_eq!(value(&h, "Accept"), Some(Some("text/html, application/json".into())));
        assert_eq!(h.iter().next().unwrap().name.to_string(), "Accept");
        assert!(d.has("repeated-header"));
    }

    #[test]
    fn test_merge_semicolon_separated() {
        let (h, _) = parse(&["Cookie: a=1", "Cookie: b=2"]);
        assert_eq!(value(&h, "cookie"), Some(Some("a=1; b=2".into())));
    }

    #[test]
    fn test_unmergeable_repeats_are_kept() {
        let (h, d) = parse(&["X-A: 1", "X-A: 2"]);
        assert_eq!(h.len(), 2);
        assert_eq!(h.count("x-a"), 2);
        assert!(d.iter().any(|x| x.message.contains("only the last one")));
    }

    #[test]
    fn test_nulls_dropped_when_value_present() {
        let (h, d) = parse(&["X-A:", "X-A: 1"]);
        assert_eq!(h.len(), 1);
        assert_eq!(value(&h, "x-a"), Some(Some("1".into())));
        assert!(d.is_empty());
    }

    #[test]
    fn test_all_null_keeps_last() {
        let (h, d) = parse(&["accept:", "Accept:"]);
        assert_eq!(h.len(), 1);
        assert_eq!(h.iter().next().unwrap().name.to_string(), "Accept");
        assert!(d.has("repeated-header"));

        let (_, d) = parse(&["Accept:", "Accept:"]);
        assert!(d.is_empty());
    }

    #[test]
    fn test_remerge_is_idempotent() {
        let (h, _) = parse(&["Accept: a", "Accept: b", "X-A: 1", "X-A: 2", "Host:", "Cookie: c=1"]);
        let mut d = Diagnostics::new();
        let again = Headers::from_entries(h.iter().cloned().collect(), &mut d);
        assert_eq!(again, h);
    }

    #[test]
    fn test_set_if_missing_and_prepend() {
        let (mut h, _) = parse(&["Accept: */*"]);
        assert!(!h.set_if_missing("accept", "text/plain"));
        assert!(h.prepend_if_missing("User-Agent", "curl/8"));
        assert_eq!(h.iter().next().unwrap().name.to_string(), "User-Agent");
        assert_eq!(value(&h, "accept"), Some(Some("*/*".into())));
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let (mut h, _) = parse(&["A: 1", "B: 2"]);
        h.set("a", "3");
        assert_eq!(h.iter().next().unwrap().value.as_ref().unwrap().to_string(), "3");
        h.set("C", "4");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_delete_and_clear_nulls() {
        let (mut h, _) = parse(&["A: 1", "B:", "C:"]);
        h.clear_nulls();
        assert_eq!(h.len(), 1);
        h.delete("a");
        assert!(h.is_empty());
    }

    #[test]
    fn test_content_type_without_parameters() {
        let (h, _) = parse(&["Content-Type: application/json; charset=utf-8"]);
        assert_eq!(h.get_content_type().as_deref(), Some("application/json"));
        let (h, _) = parse(&["Content-Type:"]);
        assert_eq!(h.get_content_type(), None);
    }
}
