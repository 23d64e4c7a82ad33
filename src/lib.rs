//! curlconv library interface
//!
//! Turns a curl command line into a language-neutral [`Request`] description
//! that code generators can render.
//!
//! # Module Organization
//!
//! - [`word`] - Strings with unresolved shell parts (Word, Token)
//! - [`shell`] - Shell text to argument vectors
//! - [`curl`] - curl's option table and argument parser
//! - [`query`], [`headers`], [`cookies`] - Request component models
//! - [`request`] - Building requests from parsed options
//! - [`emit`] - Output languages
//! - [`errors`] - Error types (CurlconvError, Result)
//! - [`status`] - Exit status codes (ExitStatus)

pub mod cli;
pub mod config;
pub mod cookies;
pub mod curl;
pub mod diagnostics;
pub mod emit;
pub mod errors;
pub mod headers;
pub mod parse;
pub mod query;
pub mod request;
pub mod resources;
pub mod shell;
pub mod status;
pub mod word;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use errors::{CurlconvError, Result};
pub use parse::{parse, parse_argv, ParseOptions};
pub use request::Request;
pub use word::Word;
