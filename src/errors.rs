//! Error types for curlconv
//!
//! Only fatal problems are errors. Anything that still lets a request be
//! produced is reported as a [`crate::diagnostics::Diagnostic`] instead.

use thiserror::Error;

/// Main error type for curlconv
#[derive(Error, Debug)]
pub enum CurlconvError {
    /// The input cannot be turned into any request
    #[error("{0}")]
    Parse(String),

    #[error("Shell parser error: {message}")]
    Shell { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

impl CurlconvError {
    pub fn parse(message: impl Into<String>) -> Self {
        CurlconvError::Parse(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CurlconvError>;
