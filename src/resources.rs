//! Injectable access to the outside world
//!
//! The parser never opens files or reads the environment on its own. Anything
//! it needs beyond the command text goes through a [`ResourceProvider`].

use std::collections::HashMap;
use std::io::{self, Read};

use once_cell::unsync::OnceCell;

pub trait ResourceProvider {
    /// Contents of standard input, if the caller has any to offer
    fn read_stdin(&self) -> Option<String>;

    /// Value of an environment variable
    fn read_env(&self, name: &str) -> Option<String>;
}

/// Provides nothing. Used unless the caller opts in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ResourceProvider for NoResources {
    fn read_stdin(&self) -> Option<String> {
        None
    }

    fn read_env(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Fixed stdin and environment, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct StaticResources {
    pub stdin: Option<String>,
    pub env: HashMap<String, String>,
}

impl StaticResources {
    pub fn with_stdin(stdin: impl Into<String>) -> Self {
        StaticResources {
            stdin: Some(stdin.into()),
            env: HashMap::new(),
        }
    }

    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }
}

impl ResourceProvider for StaticResources {
    fn read_stdin(&self) -> Option<String> {
        self.stdin.clone()
    }

    fn read_env(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }
}

/// The real process environment. Stdin is read the first time a command
/// asks for it, and never when it is a terminal.
#[derive(Debug, Default)]
pub struct ProcessEnv {
    stdin: OnceCell<Option<String>>,
}

impl ProcessEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// For when stdin already held the command text
    pub fn without_stdin() -> Self {
        ProcessEnv {
            stdin: OnceCell::with_value(None),
        }
    }
}

impl ResourceProvider for ProcessEnv {
    fn read_stdin(&self) -> Option<String> {
        self.stdin
            .get_or_init(|| {
                if atty::is(atty::Stream::Stdin) {
                    return None;
                }
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf).ok()?;
                Some(buf)
            })
            .clone()
    }

    fn read_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_resources() {
        assert_eq!(NoResources.read_stdin(), None);
        assert_eq!(NoResources.read_env("HOME"), None);
    }

    #[test]
    fn test_static_resources() {
        let r = StaticResources::with_stdin("body").var("TOKEN", "abc");
        assert_eq!(r.read_stdin().as_deref(), Some("body"));
        assert_eq!(r.read_env("TOKEN").as_deref(), Some("abc"));
        assert_eq!(r.read_env("OTHER"), None);
    }

    #[test]
    fn test_process_env_without_stdin() {
        let env = ProcessEnv::without_stdin();
        assert_eq!(env.read_stdin(), None);
        assert_eq!(env.read_env("PATH"), std::env::var("PATH").ok());
    }
}
