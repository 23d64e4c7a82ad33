//! Turning requests into code
//!
//! Each target language implements [`Emitter`]. Only JSON is built in.

pub mod json;

use crate::diagnostics::Diagnostics;
use crate::errors::{CurlconvError, Result};
use crate::parse::{parse, ParseOptions};
use crate::request::Request;
use crate::resources::ResourceProvider;

pub use json::JsonEmitter;

/// Renders requests as source code in some language
pub trait Emitter {
    fn name(&self) -> &'static str;

    /// Canonical curl option names this emitter can express
    fn supported_args(&self) -> &[&'static str];

    /// Requests are never modified. Anything that can't be expressed is
    /// reported through `diagnostics`.
    fn emit(&self, requests: &[Request], diagnostics: &mut Diagnostics) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Json,
}

pub const LANGUAGES: &[&str] = &["json"];

impl Language {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Language::Json),
            _ => None,
        }
    }

    /// Like [`Language::from_str`], with an error listing what's available
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| {
            CurlconvError::Argument(format!(
                "unknown language {:?}, available: {}",
                s,
                LANGUAGES.join(", ")
            ))
        })
    }

    pub fn emitter(&self) -> &'static dyn Emitter {
        match self {
            Language::Json => &JsonEmitter,
        }
    }
}

/// Parse a shell command and render it in `language`
pub fn convert(
    source: &str,
    language: Language,
    strict: bool,
    resources: &dyn ResourceProvider,
) -> Result<(String, Diagnostics)> {
    let emitter = language.emitter();
    let options = ParseOptions {
        strict,
        supported_args: Some(emitter.supported_args()),
        resources,
    };
    let (requests, mut diagnostics) = parse(source, &options)?;
    let code = emitter.emit(&requests, &mut diagnostics)?;
    Ok((code, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::NoResources;

    #[test]
    fn test_language_lookup() {
        assert_eq!(Language::from_str("JSON"), Some(Language::Json));
        assert!(Language::from_str("cobol").is_none());
        let err = Language::parse("cobol").unwrap_err();
        assert!(err.to_string().contains("available: json"));
    }

    #[test]
    fn test_convert_reports_unsupported_options() {
        let (_, diagnostics) =
            convert("curl --compressed example.com", Language::Json, false, &NoResources).unwrap();
        assert!(diagnostics.has("unsupported-option"));
    }
}
