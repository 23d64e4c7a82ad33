//! Token-preserving strings
//!
//! A [`Word`] behaves like an immutable string, except that some of its
//! "characters" are shell variables or command substitutions. Those symbolic
//! tokens count as exactly one character for indexing purposes and are never
//! looked inside by searches, regexes or case conversion.

use regex::{Captures, Regex};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, RangeBounds};

/// One element of a [`Word`]
#[derive(Debug, Clone)]
pub enum Token {
    /// Plain text
    Literal(String),
    /// `$NAME` or `${NAME}`
    Variable {
        name: String,
        text: String,
        resolved: Option<String>,
    },
    /// `$(cmd)` or `` `cmd` ``
    Command { command: String, text: String },
}

impl Token {
    /// The token as it appeared in the shell source
    pub fn text(&self) -> &str {
        match self {
            Token::Literal(s) => s,
            Token::Variable { text, .. } | Token::Command { text, .. } => text,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Literal(_))
    }

    /// Short label used in messages: "variable" or "command"
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Literal(_) => "literal",
            Token::Variable { .. } => "variable",
            Token::Command { .. } => "command",
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Literal(a), Token::Literal(b)) => a == b,
            (Token::Variable { text: a, .. }, Token::Variable { text: b, .. }) => a == b,
            (Token::Command { text: a, .. }, Token::Command { text: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.text().hash(state);
    }
}

/// A single virtual character of a [`Word`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordChar<'a> {
    Char(char),
    Shell(&'a Token),
}

impl WordChar<'_> {
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, WordChar::Char(x) if *x == c)
    }
}

/// Immutable sequence of literal and symbolic tokens.
///
/// Adjacent literals are always merged and an empty word is a single empty
/// literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
    tokens: Vec<Token>,
}

impl Default for Word {
    fn default() -> Self {
        Word::new()
    }
}

impl Word {
    /// The empty word
    pub fn new() -> Self {
        Word {
            tokens: vec![Token::Literal(String::new())],
        }
    }

    /// Build a word, merging adjacent literals and dropping empty ones
    pub fn from_tokens<I: IntoIterator<Item = Token>>(tokens: I) -> Self {
        let mut merged: Vec<Token> = Vec::new();
        for token in tokens {
            match token {
                Token::Literal(s) => {
                    if let Some(Token::Literal(last)) = merged.last_mut() {
                        last.push_str(&s);
                    } else if !s.is_empty() {
                        merged.push(Token::Literal(s));
                    }
                }
                other => merged.push(other),
            }
        }
        if merged.is_empty() {
            merged.push(Token::Literal(String::new()));
        }
        Word { tokens: merged }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Number of virtual characters
    pub fn len(&self) -> usize {
        self.tokens
            .iter()
            .map(|t| match t {
                Token::Literal(s) => s.chars().count(),
                _ => 1,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.tokens.as_slice(), [Token::Literal(s)] if s.is_empty())
    }

    pub fn to_bool(&self) -> bool {
        !self.is_empty()
    }

    /// True if the word contains no variables or command substitutions
    pub fn is_string(&self) -> bool {
        self.tokens.iter().all(Token::is_literal)
    }

    /// The text of a purely literal word
    pub fn as_literal(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [Token::Literal(s)] => Some(s),
            _ => None,
        }
    }

    pub fn first_shell_token(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| !t.is_literal())
    }

    /// Structural equality against a plain string
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_literal() == Some(other)
    }

    pub fn chars<'a>(&'a self) -> impl Iterator<Item = WordChar<'a>> + 'a {
        self.tokens.iter().flat_map(|t| -> Box<dyn Iterator<Item = WordChar<'a>> + 'a> {
            match t {
                Token::Literal(s) => Box::new(s.chars().map(WordChar::Char)),
                other => Box::new(std::iter::once(WordChar::Shell(other))),
            }
        })
    }

    pub fn char_at(&self, index: usize) -> Option<WordChar<'_>> {
        self.chars().nth(index)
    }

    /// Virtual index of the first occurrence of `search` at or after `start`.
    ///
    /// Matches never span a symbolic token.
    pub fn index_of(&self, search: &str, start: usize) -> Option<usize> {
        let mut i = 0;
        for token in &self.tokens {
            match token {
                Token::Literal(s) => {
                    let n = s.chars().count();
                    if i + n > start {
                        let skip = start.saturating_sub(i);
                        let offset = byte_offset(s, skip);
                        if let Some(found) = s[offset..].find(search) {
                            return Some(i + skip + s[offset..offset + found].chars().count());
                        }
                    }
                    i += n;
                }
                _ => i += 1,
            }
        }
        None
    }

    /// Virtual index of the first character that is one of `chars`
    pub fn index_of_first_char(&self, chars: &str) -> Option<usize> {
        self.chars()
            .position(|c| matches!(c, WordChar::Char(x) if chars.contains(x)))
    }

    pub fn contains(&self, search: &str) -> bool {
        self.index_of(search, 0).is_some()
    }

    /// Only the leading literal is considered
    pub fn starts_with(&self, prefix: &str) -> bool {
        matches!(self.tokens.first(), Some(Token::Literal(s)) if s.starts_with(prefix))
    }

    /// Only the trailing literal is considered
    pub fn ends_with(&self, suffix: &str) -> bool {
        matches!(self.tokens.last(), Some(Token::Literal(s)) if s.ends_with(suffix))
    }

    /// Slice by virtual indices. Out of range bounds are clamped.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Word {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return Word::new();
        }

        let mut out = Vec::new();
        let mut i = 0;
        for token in &self.tokens {
            match token {
                Token::Literal(s) => {
                    let n = s.chars().count();
                    if i + n > start && i < end {
                        let from = start.saturating_sub(i);
                        let to = (end - i).min(n);
                        out.push(Token::Literal(s.chars().skip(from).take(to - from).collect()));
                    }
                    i += n;
                }
                other => {
                    if i >= start && i < end {
                        out.push(other.clone());
                    }
                    i += 1;
                }
            }
        }
        Word::from_tokens(out)
    }

    /// Split on a literal separator.
    ///
    /// With `limit`, at most that many parts are returned and the last part
    /// keeps any remaining separators.
    pub fn split(&self, separator: &str, limit: Option<usize>) -> Vec<Word> {
        if separator.is_empty() {
            return vec![self.clone()];
        }
        let chars: Vec<WordChar<'_>> = self.chars().collect();
        let sep: Vec<char> = separator.chars().collect();

        let mut parts = Vec::new();
        let (mut i, mut start) = (0, 0);
        while i < chars.len() {
            if limit.is_some_and(|l| parts.len() + 1 >= l) {
                break;
            }
            let matched = i + sep.len() <= chars.len()
                && sep.iter().enumerate().all(|(j, c)| chars[i + j].is_char(*c));
            if matched {
                parts.push(self.slice(start..i));
                i += sep.len();
                start = i;
            } else {
                i += 1;
            }
        }
        parts.push(self.slice(start..));
        parts
    }

    /// Split at the first occurrence of `separator`
    pub fn split_once(&self, separator: &str) -> Option<(Word, Word)> {
        let idx = self.index_of(separator, 0)?;
        Some((
            self.slice(..idx),
            self.slice(idx + separator.chars().count()..),
        ))
    }

    /// Replace every occurrence of `from` inside literal tokens
    pub fn replace(&self, from: &str, to: &str) -> Word {
        self.map_literals(|s| s.replace(from, to))
    }

    /// Regex replacement applied to each literal token independently
    pub fn replace_regex(&self, re: &Regex, replacement: &str) -> Word {
        self.map_literals(|s| re.replace_all(s, replacement).into_owned())
    }

    pub fn is_match(&self, re: &Regex) -> bool {
        self.literals().any(|s| re.is_match(s))
    }

    /// First regex match found in any literal token
    pub fn captures<'a>(&'a self, re: &Regex) -> Option<Captures<'a>> {
        self.literals().find_map(|s| re.captures(s))
    }

    /// Virtual index of the first regex match
    pub fn search(&self, re: &Regex) -> Option<usize> {
        let mut offset = 0;
        for token in &self.tokens {
            match token {
                Token::Literal(s) => {
                    if let Some(m) = re.find(s) {
                        return Some(offset + s[..m.start()].chars().count());
                    }
                    offset += s.chars().count();
                }
                _ => offset += 1,
            }
        }
        None
    }

    pub fn to_lowercase(&self) -> Word {
        self.map_literals(str::to_lowercase)
    }

    pub fn to_uppercase(&self) -> Word {
        self.map_literals(str::to_uppercase)
    }

    pub fn trim_start(&self) -> Word {
        self.trim_ends(true, false)
    }

    pub fn trim_end(&self) -> Word {
        self.trim_ends(false, true)
    }

    pub fn trim(&self) -> Word {
        self.trim_ends(true, true)
    }

    pub fn append(&self, s: &str) -> Word {
        let mut tokens = self.tokens.clone();
        tokens.push(Token::Literal(s.to_string()));
        Word::from_tokens(tokens)
    }

    pub fn prepend(&self, s: &str) -> Word {
        let mut tokens = vec![Token::Literal(s.to_string())];
        tokens.extend(self.tokens.iter().cloned());
        Word::from_tokens(tokens)
    }

    pub fn concat(&self, other: &Word) -> Word {
        Word::from_tokens(self.tokens.iter().chain(other.tokens.iter()).cloned())
    }

    /// Drop the first character if it is `c`
    pub fn remove_first_char(&self, c: char) -> Word {
        match self.char_at(0) {
            Some(first) if first.is_char(c) => self.slice(1..),
            _ => self.clone(),
        }
    }

    /// Fill in `resolved` on every variable token the lookup knows about
    pub fn resolve_variables<F>(&self, mut lookup: F) -> Word
    where
        F: FnMut(&str) -> Option<String>,
    {
        let tokens = self.tokens.iter().map(|t| match t {
            Token::Variable { name, text, resolved } => Token::Variable {
                name: name.clone(),
                text: text.clone(),
                resolved: resolved.clone().or_else(|| lookup(name)),
            },
            other => other.clone(),
        });
        Word::from_tokens(tokens)
    }

    fn literals(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Literal(s) => Some(s.as_str()),
            _ => None,
        })
    }

    fn map_literals<F: Fn(&str) -> String>(&self, f: F) -> Word {
        Word::from_tokens(self.tokens.iter().map(|t| match t {
            Token::Literal(s) => Token::Literal(f(s)),
            other => other.clone(),
        }))
    }

    fn trim_ends(&self, start: bool, end: bool) -> Word {
        let last = self.tokens.len() - 1;
        Word::from_tokens(self.tokens.iter().enumerate().map(|(i, t)| match t {
            Token::Literal(s) => {
                let mut s = s.as_str();
                if start && i == 0 {
                    s = s.trim_start();
                }
                if end && i == last {
                    s = s.trim_end();
                }
                Token::Literal(s.to_string())
            }
            other => other.clone(),
        }))
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// Join words with a literal separator
pub fn join(words: &[Word], separator: &str) -> Word {
    let mut tokens = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            tokens.push(Token::Literal(separator.to_string()));
        }
        tokens.extend(word.tokens.iter().cloned());
    }
    Word::from_tokens(tokens)
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str(token.text())?;
        }
        Ok(())
    }
}

impl From<&str> for Word {
    fn from(s: &str) -> Self {
        Word::from_tokens([Token::Literal(s.to_string())])
    }
}

impl From<String> for Word {
    fn from(s: String) -> Self {
        Word::from_tokens([Token::Literal(s)])
    }
}

impl From<Token> for Word {
    fn from(t: Token) -> Self {
        Word::from_tokens([t])
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Token {
        Token::Variable {
            name: name.to_string(),
            text: format!("${}", name),
            resolved: None,
        }
    }

    fn lit(s: &str) -> Token {
        Token::Literal(s.to_string())
    }

    #[test]
    fn test_literals_are_merged() {
        let w = Word::from_tokens([lit("ab"), lit(""), lit("cd"), var("X"), lit("e")]);
        assert_eq!(w.tokens().len(), 3);
        assert_eq!(w.tokens()[0], lit("abcd"));
    }

    #[test]
    fn test_empty_word_is_single_literal() {
        let w = Word::from_tokens(Vec::new());
        assert_eq!(w.tokens(), &[lit("")]);
        assert!(w.is_empty());
        assert!(!w.to_bool());
        assert_eq!(Word::from(""), Word::new());
    }

    #[test]
    fn test_symbolic_token_counts_as_one_char() {
        let w = Word::from_tokens([lit("a"), var("HOME"), lit("bc")]);
        assert_eq!(w.len(), 4);
        assert_eq!(w.to_string(), "a$HOMEbc");
        assert!(matches!(w.char_at(1), Some(WordChar::Shell(_))));
        assert_eq!(w.char_at(2), Some(WordChar::Char('b')));
        assert_eq!(w.char_at(4), None);
    }

    #[test]
    fn test_index_of_skips_symbolic_tokens() {
        let w = Word::from_tokens([lit("a=b"), var("X"), lit("c=d")]);
        assert_eq!(w.index_of("=", 0), Some(1));
        assert_eq!(w.index_of("=", 2), Some(5));
        assert_eq!(w.index_of("X", 0), None);
        assert_eq!(w.index_of_first_char(":="), Some(1));
        assert!(w.contains("c="));
    }

    #[test]
    fn test_index_of_multibyte() {
        let w = Word::from("€=1");
        assert_eq!(w.index_of("=", 0), Some(1));
        assert_eq!(w.slice(2..).to_string(), "1");
    }

    #[test]
    fn test_slice_matches_string_slice() {
        let s = "hello world";
        let w = Word::from(s);
        for a in 0..=s.len() {
            for b in a..=s.len() {
                assert_eq!(w.slice(a..b).to_string(), &s[a..b]);
            }
        }
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let w = Word::from("abc");
        assert!(w.slice(5..).is_empty());
        assert!(w.slice(2..1).is_empty());
        assert_eq!(w.slice(1..100).to_string(), "bc");
    }

    #[test]
    fn test_slice_keeps_symbolic_tokens_whole() {
        let w = Word::from_tokens([lit("ab"), var("X"), lit("cd")]);
        assert_eq!(w.slice(1..4).tokens(), &[lit("b"), var("X"), lit("c")]);
        assert_eq!(w.slice(3..).to_string(), "cd");
    }

    #[test]
    fn test_split_across_symbolic_token() {
        let w = Word::from_tokens([lit("a:"), var("X"), lit(":b")]);
        let parts = w.split(":", None);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].to_string(), "a");
        assert_eq!(parts[1].tokens(), &[var("X")]);
        assert_eq!(parts[2].to_string(), "b");
    }

    #[test]
    fn test_split_with_limit() {
        let w = Word::from("a=b=c");
        let parts = w.split("=", Some(2));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].to_string(), "b=c");

        let w = Word::from("a, b, c");
        let parts: Vec<String> = w.split(", ", None).iter().map(|p| p.to_string()).collect();
        assert_eq!(parts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_does_not_match_inside_variable() {
        let w = Word::from_tokens([lit("x"), Token::Command {
            command: "echo a:b".to_string(),
            text: "$(echo a:b)".to_string(),
        }]);
        assert_eq!(w.split(":", None).len(), 1);
    }

    #[test]
    fn test_replace_only_touches_literals() {
        let w = Word::from_tokens([lit("aXa"), var("X"), lit("X")]);
        let r = w.replace("X", "-");
        assert_eq!(r.to_string(), "a-a$X-");
        // receiver unchanged
        assert_eq!(w.to_string(), "aXa$XX");
    }

    #[test]
    fn test_replace_regex() {
        let re = Regex::new(r"\\([\[\]{}])").unwrap();
        let w = Word::from(r"a\[1\]");
        assert_eq!(w.replace_regex(&re, "$1").to_string(), "a[1]");
    }

    #[test]
    fn test_starts_and_ends_with_use_outer_literals() {
        let w = Word::from_tokens([var("X"), lit("@file")]);
        assert!(!w.starts_with("$"));
        assert!(w.ends_with("file"));
        assert!(Word::from("@file").starts_with("@"));
    }

    #[test]
    fn test_trim() {
        let w = Word::from_tokens([lit("  a"), var("X"), lit("b  ")]);
        assert_eq!(w.trim().to_string(), "a$Xb");
        assert_eq!(w.trim_start().to_string(), "a$Xb  ");
        assert_eq!(w.trim_end().to_string(), "  a$Xb");
        assert!(Word::from("   ").trim().is_empty());
    }

    #[test]
    fn test_case_conversion() {
        let w = Word::from_tokens([lit("Content-Type"), var("Foo")]);
        assert_eq!(w.to_lowercase().to_string(), "content-type$Foo");
        assert_eq!(w.to_uppercase().to_string(), "CONTENT-TYPE$Foo");
    }

    #[test]
    fn test_structural_equality() {
        let a = Word::from_tokens([lit("a"), var("X")]);
        let b = Word::from("a$X");
        assert_ne!(a, b);
        assert_eq!(a.to_string(), b.to_string());
        assert!(b.eq_str("a$X"));
        assert!(!a.eq_str("a$X"));
    }

    #[test]
    fn test_remove_first_char() {
        assert_eq!(Word::from(" value").remove_first_char(' ').to_string(), "value");
        assert_eq!(Word::from("value").remove_first_char(' ').to_string(), "value");
        assert!(Word::new().remove_first_char(' ').is_empty());
    }

    #[test]
    fn test_join_and_concat() {
        let words = vec![Word::from("a=1"), Word::from_tokens([var("B")])];
        assert_eq!(join(&words, "; ").to_string(), "a=1; $B");
        let w = Word::from("x").concat(&Word::from("y"));
        assert_eq!(w.tokens(), &[lit("xy")]);
        assert_eq!(Word::from("b").prepend("a").append("c").to_string(), "abc");
    }

    #[test]
    fn test_search_and_captures() {
        let re = Regex::new(r"^([a-z]+):").unwrap();
        let w = Word::from("http://example.com");
        assert_eq!(w.search(&re), Some(0));
        let caps = w.captures(&re).unwrap();
        assert_eq!(&caps[1], "http");
        assert!(w.is_match(&re));
    }

    #[test]
    fn test_resolve_variables() {
        let w = Word::from_tokens([lit("https://"), var("HOST")]);
        let resolved = w.resolve_variables(|name| (name == "HOST").then(|| "example.com".to_string()));
        match &resolved.tokens()[1] {
            Token::Variable { resolved, .. } => assert_eq!(resolved.as_deref(), Some("example.com")),
            other => panic!("unexpected token {:?}", other),
        }
    }
}
