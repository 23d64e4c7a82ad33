//! Cookie header parsing
//!
//! Cookies are `(name, value)` pairs of [`Word`]s so that variables inside a
//! `Cookie:` header survive parsing.

use std::collections::HashSet;

use crate::word::Word;

pub type Cookie = (Word, Word);
pub type Cookies = Vec<Cookie>;

/// Parse `a=1; b=2` exactly as a browser would have written it.
///
/// Returns `None` if any part has no `=` or a name is repeated, in which case
/// the header has to be sent as an opaque string.
pub fn parse_cookies_strict(cookie_string: &Word) -> Option<Cookies> {
    let mut cookies = Vec::new();
    for part in cookie_string.split(";", None) {
        let part = part.remove_first_char(' ');
        let (name, value) = part.split_once("=")?;
        cookies.push((name, value));
    }
    unique_names(cookies)
}

/// Lenient parsing: whitespace is trimmed, empty parts skipped and a part
/// without `=` is a cookie with an empty value
pub fn parse_cookies(cookie_string: &Word) -> Option<Cookies> {
    let mut cookies = Vec::new();
    for part in cookie_string.split(";", None) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let cookie = match part.split_once("=") {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (part, Word::new()),
        };
        cookies.push(cookie);
    }
    unique_names(cookies)
}

fn unique_names(cookies: Cookies) -> Option<Cookies> {
    let names: HashSet<&Word> = cookies.iter().map(|(name, _)| name).collect();
    (names.len() == cookies.len()).then_some(cookies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cookies: &Cookies) -> Vec<(String, String)> {
        cookies.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_strict_parse() {
        let cookies = parse_cookies_strict(&Word::from("a=1; b=2")).unwrap();
        assert_eq!(strings(&cookies), vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
    }

    #[test]
    fn test_strict_rejects_duplicates() {
        assert!(parse_cookies_strict(&Word::from("a=1; a=2")).is_none());
    }

    #[test]
    fn test_strict_rejects_missing_equals() {
        assert!(parse_cookies_strict(&Word::from("a=1; flag")).is_none());
    }

    #[test]
    fn test_strict_only_strips_one_space() {
        let cookies = parse_cookies_strict(&Word::from("a=1;  b=2")).unwrap();
        assert_eq!(cookies[1].0.to_string(), " b");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let cookies = parse_cookies_strict(&Word::from("token=abc==")).unwrap();
        assert_eq!(cookies[0].1.to_string(), "abc==");
    }

    #[test]
    fn test_lenient_parse() {
        let cookies = parse_cookies(&Word::from(" a = 1 ;; flag ")).unwrap();
        assert_eq!(strings(&cookies), vec![("a".into(), "1".into()), ("flag".into(), "".into())]);
    }
}
