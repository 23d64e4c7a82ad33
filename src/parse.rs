//! Entry points: shell text or an argument vector in, requests out

use tracing::debug;

use crate::curl::args::{parse_args, ArgOptions};
use crate::diagnostics::Diagnostics;
use crate::errors::Result;
use crate::request::{build_requests, reads_stdin, Request};
use crate::resources::{NoResources, ResourceProvider};
use crate::shell::tokenize;
use crate::word::Word;

/// Per-call knobs for [`parse`] and [`parse_argv`]
#[derive(Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Unknown curl options are errors instead of diagnostics
    pub strict: bool,
    /// Canonical option names the caller handles. Anything else used on
    /// the command line gets an `unsupported-option` diagnostic.
    pub supported_args: Option<&'a [&'a str]>,
    pub resources: &'a dyn ResourceProvider,
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        ParseOptions {
            strict: false,
            supported_args: None,
            resources: &NoResources,
        }
    }
}

impl std::fmt::Debug for ParseOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("strict", &self.strict)
            .field("supported_args", &self.supported_args)
            .finish_non_exhaustive()
    }
}

/// Parse shell text containing one or more curl commands
pub fn parse(source: &str, options: &ParseOptions<'_>) -> Result<(Vec<Request>, Diagnostics)> {
    let mut diagnostics = Diagnostics::new();
    let mut requests = Vec::new();
    for invocation in tokenize(source, &mut diagnostics)? {
        let built = build(
            &invocation.argv,
            invocation.stdin,
            invocation.stdin_file,
            options,
            &mut diagnostics,
        )?;
        requests.extend(built);
    }
    debug!(requests = requests.len(), diagnostics = diagnostics.len(), "parsed command");
    Ok((requests, diagnostics))
}

/// Parse an already split argument vector. `argv[0]` is the command name.
pub fn parse_argv(argv: &[Word], options: &ParseOptions<'_>) -> Result<(Vec<Request>, Diagnostics)> {
    let mut diagnostics = Diagnostics::new();
    let requests = build(argv, None, None, options, &mut diagnostics)?;
    Ok((requests, diagnostics))
}

fn build(
    argv: &[Word],
    stdin: Option<Word>,
    stdin_file: Option<Word>,
    options: &ParseOptions<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Request>> {
    let resources = options.resources;
    let argv: Vec<Word> = argv
        .iter()
        .map(|arg| arg.resolve_variables(|name| resources.read_env(name)))
        .collect();

    let arg_options = ArgOptions {
        strict: options.strict,
        supported: options.supported_args,
    };
    let global = parse_args(&argv, arg_options, diagnostics)?;

    // stdin from the shell text wins over whatever the caller has
    let stdin = match (stdin, &stdin_file) {
        (None, None) if reads_stdin(&global) => resources.read_stdin().map(Word::from),
        (stdin, _) => stdin,
    };
    build_requests(&global, stdin.as_ref(), stdin_file.as_ref(), diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::StaticResources;
    use crate::word::Token;

    #[test]
    fn test_parse_simple() {
        let (requests, diagnostics) = parse("curl example.com", &ParseOptions::default()).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].urls[0].url.to_string(), "http://example.com");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_stdin_from_resources() {
        let resources = StaticResources::with_stdin("x=1");
        let options = ParseOptions {
            resources: &resources,
            ..Default::default()
        };
        let (requests, _) = parse("curl -d @- example.com", &options).unwrap();
        assert_eq!(requests[0].data, Some(Word::from("x=1")));
    }

    #[test]
    fn test_stdin_not_read_when_unused() {
        let resources = StaticResources::with_stdin("ignored");
        let options = ParseOptions {
            resources: &resources,
            ..Default::default()
        };
        let (requests, _) = parse("curl -d a=1 example.com", &options).unwrap();
        assert!(requests[0].stdin.is_none());
    }

    #[test]
    fn test_env_resolves_variables() {
        let resources = StaticResources::default().var("HOST", "example.com");
        let options = ParseOptions {
            resources: &resources,
            ..Default::default()
        };
        let (requests, _) = parse("curl \"$HOST\"", &options).unwrap();
        match &requests[0].urls[0].original_url.tokens()[0] {
            Token::Variable { resolved, .. } => assert_eq!(resolved.as_deref(), Some("example.com")),
            other => panic!("expected a variable, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_argv() {
        let argv: Vec<Word> = ["curl", "-X", "DELETE", "example.com/1"].iter().map(|s| Word::from(*s)).collect();
        let (requests, _) = parse_argv(&argv, &ParseOptions::default()).unwrap();
        assert_eq!(requests[0].urls[0].method.to_string(), "DELETE");
    }

    #[test]
    fn test_strict_unknown_option() {
        let options = ParseOptions {
            strict: true,
            ..Default::default()
        };
        assert!(parse("curl --not-a-real-option example.com", &options).is_err());
        let (_, diagnostics) = parse("curl --not-a-real-option example.com", &ParseOptions::default()).unwrap();
        assert!(diagnostics.has("unknown-option"));
    }
}
