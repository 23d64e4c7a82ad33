//! Query string codec
//!
//! A query string is only modeled as key/value pairs when decoding and
//! re-encoding it gives back the exact same text. Otherwise generated code
//! would send a subtly different request, so the query must be passed
//! through as an opaque string.

use indexmap::IndexMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::word::{self, Token, Word};

/// RFC 3986 unreserved characters pass through, everything else is encoded
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Decoded `(key, value)` pairs in source order
pub type QueryList = Vec<(Word, Word)>;

/// Pairs grouped by key, in order of first appearance
pub type QueryDict = Vec<(Word, QueryValue)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(Word),
    Multiple(Vec<Word>),
}

/// The list and dict views of a query string.
///
/// `dict` is only present when `list` is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub list: Option<QueryList>,
    pub dict: Option<QueryDict>,
}

impl Query {
    fn opaque() -> Self {
        Query::default()
    }
}

fn encode_str(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

/// Percent-encode the literal parts of a word, byte by byte over UTF-8
pub fn percent_encode(s: &Word) -> Word {
    map_literals(s, encode_str)
}

/// Like [`percent_encode`] but spaces become `+`
pub fn percent_encode_plus(s: &Word) -> Word {
    map_literals(s, |t| encode_str(t).replace("%20", "+"))
}

/// `decodeURIComponent` over the literal parts.
///
/// Returns `None` if a decoded sequence is not valid UTF-8.
pub fn percent_decode(s: &Word) -> Option<Word> {
    let mut tokens = Vec::with_capacity(s.tokens().len());
    for token in s.tokens() {
        match token {
            Token::Literal(t) => {
                let decoded = percent_decode_str(t).decode_utf8().ok()?;
                tokens.push(Token::Literal(decoded.into_owned()));
            }
            other => tokens.push(other.clone()),
        }
    }
    Some(Word::from_tokens(tokens))
}

fn map_literals<F: Fn(&str) -> String>(s: &Word, f: F) -> Word {
    Word::from_tokens(s.tokens().iter().map(|t| match t {
        Token::Literal(text) => Token::Literal(f(text)),
        other => other.clone(),
    }))
}

/// Only `%20` written as `+` is accepted as equivalent encoding
fn round_trips(decoded: &Word, original: &Word) -> bool {
    let encoded = percent_encode(decoded);
    encoded == *original || encoded.replace("%20", "+") == *original
}

/// Parse `a=1&b=2` into its list and dict views.
///
/// `None` and `Some("")` (a URL ending in `?`) both give an opaque query.
pub fn parse_query_string(s: Option<&Word>) -> Query {
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return Query::opaque();
    };

    let mut list: QueryList = Vec::new();
    for param in s.split("&", None) {
        // most libraries can't tell `a=&b=` from `a&b`
        let Some((key, value)) = param.split_once("=") else {
            return Query::opaque();
        };
        let (Some(decoded_key), Some(decoded_value)) = (
            percent_decode(&key.replace("+", " ")),
            percent_decode(&value.replace("+", " ")),
        ) else {
            return Query::opaque();
        };
        if !round_trips(&decoded_key, &key) || !round_trips(&decoded_value, &value) {
            return Query::opaque();
        }
        list.push((decoded_key, decoded_value));
    }

    let mut groups: IndexMap<String, (Word, Vec<Word>)> = IndexMap::new();
    let mut prev_key: Option<String> = None;
    for (key, value) in &list {
        let key_str = key.to_string();
        if prev_key.as_deref() == Some(key_str.as_str()) {
            if let Some((_, values)) = groups.get_mut(&key_str) {
                values.push(value.clone());
            }
        } else if !groups.contains_key(&key_str) {
            groups.insert(key_str.clone(), (key.clone(), vec![value.clone()]));
        } else {
            // a key repeated with another key in between can't be a dict
            return Query {
                list: Some(list),
                dict: None,
            };
        }
        prev_key = Some(key_str);
    }

    let dict = groups
        .into_values()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                QueryValue::Single(values.remove(0))
            } else {
                QueryValue::Multiple(values)
            };
            (key, value)
        })
        .collect();

    Query {
        list: Some(list),
        dict: Some(dict),
    }
}

/// Serialize a dict back into percent-encoded query text
pub fn encode_dict(dict: &QueryDict) -> Word {
    let mut pairs = Vec::new();
    for (key, value) in dict {
        let values: Vec<&Word> = match value {
            QueryValue::Single(v) => vec![v],
            QueryValue::Multiple(vs) => vs.iter().collect(),
        };
        for v in values {
            pairs.push(percent_encode(key).append("=").concat(&percent_encode(v)));
        }
    }
    word::join(&pairs, "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Query {
        parse_query_string(Some(&Word::from(s)))
    }

    fn list_strings(q: &Query) -> Vec<(String, String)> {
        q.list
            .as_ref()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode(&Word::from("a b/c~")).to_string(), "a%20b%2Fc~");
        assert_eq!(percent_encode(&Word::from("€")).to_string(), "%E2%82%AC");
        assert_eq!(percent_encode_plus(&Word::from("a b")).to_string(), "a+b");
    }

    #[test]
    fn test_simple_query() {
        let q = parse("a=1&b=2");
        assert_eq!(list_strings(&q), vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
        assert_eq!(q.dict.as_ref().map(|d| d.len()), Some(2));
    }

    #[test]
    fn test_encoded_slash_round_trips() {
        let q = parse("a=%2F");
        assert_eq!(list_strings(&q), vec![("a".into(), "/".into())]);
        let dict = q.dict.unwrap();
        assert_eq!(encode_dict(&dict).to_string(), "a=%2F");
    }

    #[test]
    fn test_multibyte_round_trips() {
        let q = parse("a=%E2%82%AC");
        assert_eq!(list_strings(&q), vec![("a".into(), "€".into())]);
        assert_eq!(encode_dict(&q.dict.unwrap()).to_string(), "a=%E2%82%AC");
    }

    #[test]
    fn test_missing_equals_is_opaque() {
        assert_eq!(parse("a&b"), Query::default());
        assert_eq!(parse("a=1&b"), Query::default());
    }

    #[test]
    fn test_empty_and_absent() {
        assert_eq!(parse(""), Query::default());
        assert_eq!(parse_query_string(None), Query::default());
    }

    #[test]
    fn test_plus_and_percent20_are_equivalent() {
        assert_eq!(list_strings(&parse("q=a+b")), vec![("q".into(), "a b".into())]);
        assert_eq!(list_strings(&parse("q=a%20b")), vec![("q".into(), "a b".into())]);
    }

    #[test]
    fn test_non_canonical_encoding_is_opaque() {
        // unreserved characters must not be encoded
        assert_eq!(parse("a=%41"), Query::default());
        // lowercase hex doesn't re-encode identically
        assert_eq!(parse("a=%2f"), Query::default());
        // a literal slash would be encoded
        assert_eq!(parse("a=b/c"), Query::default());
        assert_eq!(parse("a=%ZZ"), Query::default());
        assert_eq!(parse("a=%FF"), Query::default());
    }

    #[test]
    fn test_repeated_keys_grouped() {
        let q = parse("a=1&a=2&b=3");
        let dict = q.dict.unwrap();
        assert_eq!(
            dict[0].1,
            QueryValue::Multiple(vec![Word::from("1"), Word::from("2")])
        );
        assert_eq!(dict[1].1, QueryValue::Single(Word::from("3")));
    }

    #[test]
    fn test_interleaved_keys_have_no_dict() {
        let q = parse("a=1&b=2&a=3");
        assert!(q.dict.is_none());
        assert_eq!(q.list.unwrap().len(), 3);
    }

    #[test]
    fn test_symbolic_tokens_pass_through() {
        let w = Word::from_tokens([
            Token::Literal("a=".into()),
            Token::Variable {
                name: "V".into(),
                text: "$V".into(),
                resolved: None,
            },
        ]);
        let q = parse_query_string(Some(&w));
        let list = q.list.unwrap();
        assert!(!list[0].1.is_string());
    }

    #[test]
    fn test_dict_round_trip_property() {
        for q in ["a=1&b=2", "x=%2F&x=%3F", "k=hello%20world", "e=%E2%82%AC&f=~"] {
            let dict = parse(q).dict.unwrap();
            assert_eq!(encode_dict(&dict).to_string(), q);
        }
    }
}
