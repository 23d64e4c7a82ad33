//! URL decomposition the way curl's URL parser splits things up.
//!
//! Every URL is accepted. Nothing is validated beyond the scheme.

use once_cell::sync::Lazy;
use regex::Regex;

use super::args::OperationConfig;
use crate::diagnostics::Diagnostics;
use crate::word::{self, Token, Word};

/// curl also accepts a digit, `+`, `-` or `.` as the first scheme character
/// and a single slash after the colon
static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z0-9+\-.]*):/+").expect("Invalid scheme regex"));

static GLOB_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([\[\]{}])").expect("Invalid glob escape regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlUrl {
    pub scheme: Word,
    /// `user:password` as written before the `@`
    pub auth: Option<Word>,
    pub user: Option<Word>,
    pub password: Option<Word>,
    pub host: Word,
    /// With its leading `/`, may be empty
    pub path: Word,
    /// With its leading `?`, may be empty
    pub query: Word,
    /// With its leading `#`, may be empty
    pub fragment: Word,
}

impl CurlUrl {
    /// `scheme://host` followed by the given parts
    pub fn join(&self, parts: &[&Word]) -> Word {
        let mut words = vec![self.scheme.append("://").concat(&self.host)];
        words.extend(parts.iter().map(|w| (*w).clone()));
        word::join(&words, "")
    }
}

pub fn parse_url(url: &Word, config: &OperationConfig, diagnostics: &mut Diagnostics) -> CurlUrl {
    let mut url = url.clone();
    if !config.is_true("globoff") {
        url = url.replace_regex(&GLOB_ESCAPE, "$1");
    }

    let scheme_match = match url.tokens().first() {
        Some(Token::Literal(s)) => SCHEME
            .captures(s)
            .map(|caps| (caps[0].chars().count(), caps[1].to_lowercase())),
        _ => None,
    };
    let scheme = match scheme_match {
        Some((matched, scheme)) => {
            url = url.slice(matched..);
            Word::from(scheme)
        }
        // curl would guess from the host name, libraries won't downgrade from https
        None => config
            .word("proto-default")
            .cloned()
            .unwrap_or_else(|| Word::from("http")),
    };
    if !scheme.eq_str("http") && !scheme.eq_str("https") {
        diagnostics.push("bad-scheme", format!("Protocol \"{}\" not supported", scheme));
    }

    let mut host = url.clone();
    let mut path = Word::new();
    let mut query = Word::new();
    let mut fragment = Word::new();
    if let Some(host_end) = url.index_of_first_char("/?#") {
        host = url.slice(..host_end);
        path = url.slice(host_end..);
        let fragment_index = path.index_of("#", 0);
        let query_index = path.index_of("?", 0);
        match (query_index, fragment_index) {
            (Some(q), Some(f)) if q < f => {
                fragment = path.slice(f..);
                query = path.slice(q..f);
                path = path.slice(..q);
            }
            (_, Some(f)) => {
                fragment = path.slice(f..);
                path = path.slice(..f);
            }
            (Some(q), None) => {
                query = path.slice(q..);
                path = path.slice(..q);
            }
            (None, None) => {}
        }
    }

    let mut auth = None;
    let mut user = None;
    let mut password = None;
    if let Some(at) = host.index_of("@", 0) {
        let credentials = host.slice(..at);
        host = host.slice(at + 1..);
        // curl would refuse the URL, the credentials are dropped instead
        if !config.is_true("disallow-username-in-url") {
            match credentials.split_once(":") {
                Some((u, p)) => {
                    user = Some(u);
                    password = Some(p);
                }
                None => {
                    user = Some(credentials.clone());
                    password = Some(Word::new());
                }
            }
            auth = Some(credentials);
        }
    }

    CurlUrl {
        scheme,
        auth,
        user,
        password,
        host,
        path,
        query,
        fragment,
    }
}
