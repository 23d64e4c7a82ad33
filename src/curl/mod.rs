//! curl's option grammar and the pieces of curl's own behavior the request
//! builder replicates: URL splitting, auth scheme selection and form parts.

pub mod args;
pub mod auth;
pub mod form;
pub mod opts;
pub mod url;

pub use args::{parse_args, ArgOptions, GlobalConfig, OperationConfig};
pub use auth::{pick_auth, AuthMask, AuthType};
