//! Shell command parsing
//!
//! - `tokenizer` - tree-sitter-bash walker producing one argument vector per curl call
//! - `escapes` - backslash rules for unquoted, double-quoted and ANSI-C strings
//! - `node` - the node kinds the walker dispatches on

pub mod escapes;
pub mod node;
pub mod tokenizer;

pub use tokenizer::{tokenize, Invocation};
