//! Shell source to curl argument vectors
//!
//! The source is parsed with tree-sitter-bash. Every top level statement that
//! runs curl becomes one [`Invocation`]; each argument node is converted into
//! a [`Word`] by a dispatch over [`NodeKind`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;
use tree_sitter::{Node, Parser, Tree};

use super::escapes::{remove_ansi_c_backslashes, remove_backslashes, remove_double_quote_backslashes};
use super::node::NodeKind;
use crate::diagnostics::Diagnostics;
use crate::errors::{CurlconvError, Result};
use crate::word::{Token, Word};

static IMPROPER_BACKSLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[ \t\r\f\v]+$").expect("Invalid backslash regex"));

/// One curl command found in the shell source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// `curl` followed by its arguments
    pub argv: Vec<Word>,
    /// Text fed to the command through a heredoc or herestring
    pub stdin: Option<Word>,
    /// File fed to the command with `<`
    pub stdin_file: Option<Word>,
}

/// Parse shell source and return every curl invocation in it
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Result<Vec<Invocation>> {
    let tree = parse_tree(source)?;
    let tokenizer = Tokenizer { source };
    tokenizer.invocations(&tree, diagnostics)
}

fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_bash::LANGUAGE.into())
        .map_err(|e| CurlconvError::Shell {
            message: e.to_string(),
        })?;
    parser.parse(source, None).ok_or_else(|| CurlconvError::Shell {
        message: "parsing did not complete".to_string(),
    })
}

struct Tokenizer<'s> {
    source: &'s str,
}

impl<'s> Tokenizer<'s> {
    fn text(&self, node: &Node<'_>) -> &'s str {
        self.source.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    /// The node's source line with carets under the node
    fn underline(&self, node: &Node<'_>) -> String {
        let start = node.start_position();
        let end = node.end_position();
        let line = self.source.split('\n').nth(start.row).unwrap_or("");
        let on_one_line = start.row == end.row;
        let stop = if on_one_line { end.column } else { line.len() };
        format!(
            "{}\n{}{}{}",
            line,
            " ".repeat(start.column),
            "^".repeat(stop.saturating_sub(start.column)),
            if on_one_line { "" } else { "^" }
        )
    }

    fn invocations(&self, tree: &Tree, diagnostics: &mut Diagnostics) -> Result<Vec<Invocation>> {
        let root = tree.root_node();
        self.reject_syntax_errors(&root)?;
        if NodeKind::of(&root) != NodeKind::Program {
            return Err(CurlconvError::parse(format!(
                "expected a \"program\" top-level AST node, got {} instead",
                root.kind()
            )));
        }

        let mut cursor = root.walk();
        let statements: Vec<Node<'_>> = root.named_children(&mut cursor).collect();

        let mut found = Vec::new();
        for (i, statement) in statements.iter().enumerate() {
            let command = match NodeKind::of(statement) {
                NodeKind::Comment | NodeKind::HeredocBody => continue,
                NodeKind::Command => self.invocation(statement, None, diagnostics),
                NodeKind::RedirectedStatement => self.redirected(statement, diagnostics),
                NodeKind::Pipeline => self.pipeline(statement, diagnostics),
                _ => Err(CurlconvError::parse(format!(
                    "expected a \"command\", \"redirected_statement\" or \"pipeline\" AST node, instead got {}\n{}",
                    statement.kind(),
                    self.underline(statement)
                ))),
            };

            match command {
                Ok(invocation) => found.push(invocation),
                // anything after the first curl command that isn't curl is ignored
                Err(CurlconvError::Parse(message)) if !found.is_empty() => {
                    diagnostics.push(
                        "extra-commands",
                        format!(
                            "ignoring command on line {} that is not a curl command: {}",
                            statement.start_position().row + 1,
                            message
                        ),
                    );
                }
                Err(e) => return Err(e),
            }

            if statements[i + 1..].iter().any(|n| NodeKind::of(n) != NodeKind::Comment) {
                self.check_trailing_backslash(statement, diagnostics);
            }
        }

        if found.is_empty() {
            return Err(CurlconvError::parse(
                "expected a \"command\" or \"redirected_statement\" AST node, only found \"comment\" nodes",
            ));
        }
        trace!(count = found.len(), "tokenized curl invocations");
        Ok(found)
    }

    fn reject_syntax_errors(&self, node: &Node<'_>) -> Result<()> {
        if node.is_error() || node.is_missing() {
            return Err(CurlconvError::parse(format!(
                "Bash parsing error on line {}:\n{}",
                node.start_position().row + 1,
                self.underline(node)
            )));
        }
        if node.has_error() {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                self.reject_syntax_errors(&child)?;
            }
        }
        Ok(())
    }

    fn check_trailing_backslash(&self, statement: &Node<'_>, diagnostics: &mut Diagnostics) {
        let row = statement.end_position().row;
        let lines: Vec<&str> = self.source.split('\n').collect();
        let Some(line) = lines.get(row) else {
            return;
        };
        if let Some(m) = IMPROPER_BACKSLASH.find(line) {
            if lines.len() > row + 1 {
                diagnostics.push(
                    "unescaped-newline",
                    format!(
                        "The trailing '\\' on line {} is followed by whitespace, so it won't escape the newline after it:\n{}\n{}{}",
                        row + 1,
                        line,
                        " ".repeat(m.start()),
                        "^".repeat(m.len())
                    ),
                );
            }
        }
    }

    fn redirected(&self, statement: &Node<'_>, diagnostics: &mut Diagnostics) -> Result<Invocation> {
        let mut cursor = statement.walk();
        let children: Vec<Node<'_>> = statement.named_children(&mut cursor).collect();
        let body = statement
            .child_by_field_name("body")
            .or_else(|| children.first().copied())
            .ok_or_else(|| CurlconvError::parse("got empty \"redirected_statement\" AST node"))?;
        let redirects: Vec<Node<'_>> = children.into_iter().filter(|n| n.id() != body.id()).collect();

        let Some(redirect) = redirects.first() else {
            return Err(CurlconvError::parse(
                "got \"redirected_statement\" AST node with only one child - no redirect",
            ));
        };
        if redirects.len() > 1 {
            diagnostics.push(
                "multiple-redirects",
                format!(
                    "found {} redirect nodes. Only the first one will be used:\n{}",
                    redirects.len(),
                    self.underline(&redirects[1])
                ),
            );
        }

        let (stdin, stdin_file) = self.redirect_input(statement, redirect, diagnostics)?;
        let mut invocation = match NodeKind::of(&body) {
            NodeKind::Command => self.invocation(&body, None, diagnostics)?,
            NodeKind::Pipeline => self.pipeline(&body, diagnostics)?,
            _ => {
                return Err(CurlconvError::parse(format!(
                    "got \"redirected_statement\" AST node whose first child is not a \"command\", got {} instead\n{}",
                    body.kind(),
                    self.underline(&body)
                )))
            }
        };
        invocation.stdin = invocation.stdin.or(stdin);
        invocation.stdin_file = invocation.stdin_file.or(stdin_file);
        Ok(invocation)
    }

    fn redirect_input(
        &self,
        statement: &Node<'_>,
        redirect: &Node<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(Option<Word>, Option<Word>)> {
        match NodeKind::of(redirect) {
            NodeKind::FileRedirect => {
                let mut cursor = redirect.walk();
                let operator = redirect
                    .children(&mut cursor)
                    .find(|c| !c.is_named())
                    .map(|c| c.kind())
                    .unwrap_or("");
                let mut cursor = redirect.walk();
                let last_named = redirect.named_children(&mut cursor).last();
                let destination = redirect
                    .child_by_field_name("destination")
                    .or(last_named)
                    .ok_or_else(|| CurlconvError::parse("got file redirect with no file name"))?;
                if operator == "<" {
                    Ok((None, Some(self.to_word(&destination, diagnostics)?)))
                } else {
                    diagnostics.push(
                        "output-redirect",
                        format!("ignoring output redirect\n{}", self.underline(redirect)),
                    );
                    Ok((None, None))
                }
            }
            NodeKind::HeredocRedirect => {
                let mut cursor = redirect.walk();
                let inner: Vec<Node<'_>> = redirect.named_children(&mut cursor).collect();
                let delimiter = inner
                    .iter()
                    .find(|n| NodeKind::of(n) == NodeKind::HeredocStart)
                    .map(|n| self.text(n).trim_matches(|c| c == '\'' || c == '"' || c == '-'))
                    .ok_or_else(|| {
                        CurlconvError::parse("got \"redirected_statement\" AST node with heredoc but no heredoc start")
                    })?;
                // depending on the grammar version the body is inside the
                // redirect or the next statement
                let body = inner
                    .iter()
                    .copied()
                    .find(|n| NodeKind::of(n) == NodeKind::HeredocBody)
                    .or_else(|| {
                        statement
                            .next_named_sibling()
                            .filter(|n| NodeKind::of(n) == NodeKind::HeredocBody)
                    })
                    .ok_or_else(|| CurlconvError::parse("got \"redirected_statement\" AST node with no heredoc body"))?;
                let text = self.text(&body);
                let text = text.strip_suffix(delimiter).unwrap_or(text);
                Ok((Some(Word::from(text)), None))
            }
            NodeKind::HerestringRedirect => {
                let mut cursor = redirect.walk();
                let content = redirect
                    .named_children(&mut cursor)
                    .next()
                    .ok_or_else(|| CurlconvError::parse("got \"redirected_statement\" AST node with empty herestring"))?;
                // bash appends a newline to herestrings
                Ok((Some(self.to_word(&content, diagnostics)?.append("\n")), None))
            }
            _ => Err(CurlconvError::parse(format!(
                "got \"redirected_statement\" AST node whose redirect is not one of \"file_redirect\", \"heredoc_redirect\" or \"herestring_redirect\", got {} instead",
                redirect.kind()
            ))),
        }
    }

    fn pipeline(&self, pipeline: &Node<'_>, diagnostics: &mut Diagnostics) -> Result<Invocation> {
        let mut candidates = Vec::new();
        self.collect_curl_commands(pipeline, &mut candidates);
        let Some(first) = candidates.first() else {
            return Err(CurlconvError::parse(format!(
                "could not find curl command in pipeline\n{}",
                self.underline(pipeline)
            )));
        };
        if candidates.len() > 1 {
            diagnostics.push(
                "multiple-curl-in-pipeline",
                format!(
                    "found {} curl commands in pipeline, only the first one will be used:\n{}",
                    candidates.len(),
                    self.underline(&candidates[1])
                ),
            );
        }
        match NodeKind::of(first) {
            NodeKind::RedirectedStatement => self.redirected(first, diagnostics),
            _ => self.invocation(first, None, diagnostics),
        }
    }

    fn collect_curl_commands<'t>(&self, node: &Node<'t>, out: &mut Vec<Node<'t>>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match NodeKind::of(&child) {
                NodeKind::Command if self.is_curl(&child) => out.push(child),
                NodeKind::RedirectedStatement => {
                    let mut inner = child.walk();
                    let first = child.named_children(&mut inner).next();
                    let body = child.child_by_field_name("body").or(first);
                    match body {
                        Some(b) if NodeKind::of(&b) == NodeKind::Command && self.is_curl(&b) => out.push(child),
                        Some(b) if NodeKind::of(&b) == NodeKind::Pipeline => self.collect_curl_commands(&b, out),
                        _ => {}
                    }
                }
                NodeKind::Pipeline => self.collect_curl_commands(&child, out),
                _ => {}
            }
        }
    }

    fn is_curl(&self, command: &Node<'_>) -> bool {
        command
            .child_by_field_name("name")
            .map(|name| matches!(self.text(&name).trim(), "curl" | "$curl"))
            .unwrap_or(false)
    }

    fn invocation(&self, command: &Node<'_>, mut stdin: Option<Word>, diagnostics: &mut Diagnostics) -> Result<Invocation> {
        let mut cursor = command.walk();
        let mut name = None;
        for child in command.named_children(&mut cursor) {
            match NodeKind::of(&child) {
                NodeKind::VariableAssignment | NodeKind::FileRedirect => {
                    diagnostics.push(
                        "command-preamble",
                        format!("skipping {:?} expression\n{}", child.kind(), self.underline(&child)),
                    );
                }
                NodeKind::CommandName => {
                    name = Some(child);
                    break;
                }
                _ => {
                    return Err(CurlconvError::parse(format!(
                        "expected \"command_name\", \"variable_assignment\" or \"file_redirect\" AST node, found {} instead\n{}",
                        child.kind(),
                        self.underline(&child)
                    )))
                }
            }
        }

        let name = name.ok_or_else(|| {
            CurlconvError::parse(format!(
                "found \"command\" AST node with no \"command_name\" child\n{}",
                self.underline(command)
            ))
        })?;
        let mut name_cursor = name.walk();
        let name_node = name
            .children(&mut name_cursor)
            .next()
            .ok_or_else(|| CurlconvError::parse(format!("found empty \"command_name\" AST node\n{}", self.underline(&name))))?;
        let name_word = self.to_word(&name_node, diagnostics)?;
        self.check_command_name(&name_word)?;

        let mut argv = vec![name_word];
        let mut cursor = command.walk();
        let arguments: Vec<Node<'_>> = command.children_by_field_name("argument", &mut cursor).collect();
        for argument in &arguments {
            argv.push(self.to_word(argument, diagnostics)?);
        }

        // `curl url <<< 'x'` keeps its redirects on the command node
        let mut cursor = command.walk();
        let redirects: Vec<Node<'_>> = command
            .children_by_field_name("redirect", &mut cursor)
            .filter(|r| r.start_byte() >= name.end_byte())
            .collect();
        let mut stdin_file = None;
        if let Some(redirect) = redirects.first() {
            if redirects.len() > 1 {
                diagnostics.push(
                    "multiple-redirects",
                    format!(
                        "found {} redirect nodes. Only the first one will be used:\n{}",
                        redirects.len(),
                        self.underline(&redirects[1])
                    ),
                );
            }
            let (redirect_stdin, redirect_file) = self.redirect_input(command, redirect, diagnostics)?;
            if stdin.is_none() {
                stdin = redirect_stdin;
                stdin_file = redirect_file;
            }
        }

        Ok(Invocation {
            argv,
            stdin,
            stdin_file,
        })
    }

    fn check_command_name(&self, name: &Word) -> Result<()> {
        let rendered = name.to_string();
        if let Some(token) = name.first_shell_token() {
            // usually a `$` prompt copied without a space after it
            if rendered != "$curl" {
                return Err(CurlconvError::parse(format!(
                    "expected command name to be a simple value but found a {}\n{}",
                    token.kind_name(),
                    token.text()
                )));
            }
            return Ok(());
        }
        match rendered.trim() {
            "curl" => Ok(()),
            "" => Err(CurlconvError::parse("found command without a command_name")),
            other => Err(CurlconvError::parse(format!(
                "command should begin with \"curl\" but instead begins with {:?}",
                clip(other)
            ))),
        }
    }

    fn to_word(&self, node: &Node<'_>, diagnostics: &mut Diagnostics) -> Result<Word> {
        Ok(Word::from_tokens(self.to_tokens(node, diagnostics)?))
    }

    fn to_tokens(&self, node: &Node<'_>, diagnostics: &mut Diagnostics) -> Result<Vec<Token>> {
        let text = self.text(node);
        match NodeKind::of(node) {
            NodeKind::Word | NodeKind::Number => Ok(vec![Token::Literal(remove_backslashes(text))]),
            NodeKind::RawString => Ok(vec![Token::Literal(inner(text, 1, 1).to_string())]),
            NodeKind::AnsiCString => Ok(vec![Token::Literal(remove_ansi_c_backslashes(inner(text, 2, 1))?)]),
            NodeKind::String => self.double_quoted(node, diagnostics),
            NodeKind::TranslatedString => {
                let mut cursor = node.walk();
                let string = node
                    .named_children(&mut cursor)
                    .find(|c| NodeKind::of(c) == NodeKind::String);
                match string {
                    Some(s) => self.double_quoted(&s, diagnostics),
                    None => Ok(vec![Token::Literal(remove_double_quote_backslashes(inner(text, 2, 1)))]),
                }
            }
            NodeKind::SimpleExpansion => {
                diagnostics.push(
                    "expansion",
                    format!("found shell environment variable\n{}", self.underline(node)),
                );
                let mut cursor = node.walk();
                let first = node.named_children(&mut cursor).next();
                if let Some(child) = first {
                    if NodeKind::of(&child) == NodeKind::SpecialVariableName {
                        diagnostics.push(
                            "special_variable_name",
                            format!("{} is a special Bash variable\n{}", text, self.underline(&child)),
                        );
                    }
                }
                Ok(vec![Token::Variable {
                    name: inner(text, 1, 0).to_string(),
                    text: text.to_string(),
                    resolved: None,
                }])
            }
            NodeKind::Expansion => {
                diagnostics.push(
                    "expansion",
                    format!("found expansion expression\n{}", self.underline(node)),
                );
                Ok(vec![Token::Variable {
                    name: inner(text, 2, 1).to_string(),
                    text: text.to_string(),
                    resolved: None,
                }])
            }
            NodeKind::CommandSubstitution => {
                diagnostics.push(
                    "expansion",
                    format!("found command substitution expression\n{}", self.underline(node)),
                );
                let command = if text.starts_with("$(") { inner(text, 2, 1) } else { inner(text, 1, 1) };
                Ok(vec![Token::Command {
                    command: command.to_string(),
                    text: text.to_string(),
                }])
            }
            NodeKind::Concatenation => self.concatenation(node, diagnostics),
            _ => Err(CurlconvError::parse(format!(
                "unexpected argument type {:?}. Must be one of \"word\", \"number\", \"string\", \"raw_string\", \"ansi_c_string\", \"translated_string\", \"expansion\", \"simple_expansion\", \"command_substitution\" or \"concatenation\"\n{}",
                node.kind(),
                self.underline(node)
            ))),
        }
    }

    /// Literal runs between expansions get double-quote de-escaping
    fn double_quoted(&self, node: &Node<'_>, diagnostics: &mut Diagnostics) -> Result<Vec<Token>> {
        let base = node.start_byte();
        let text = self.text(node);
        let close = text.len().saturating_sub(1).max(1);
        let mut tokens = Vec::new();
        let mut prev = 1.min(text.len());

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in children.iter().filter(|c| NodeKind::of(c) != NodeKind::StringContent) {
            let start = child.start_byte() - base;
            let gap = text.get(prev..start).unwrap_or("");
            tokens.push(Token::Literal(remove_double_quote_backslashes(gap)));
            tokens.extend(self.to_tokens(child, diagnostics)?);
            prev = child.end_byte() - base;
        }
        let rest = text.get(prev..close).unwrap_or("");
        tokens.push(Token::Literal(remove_double_quote_backslashes(rest)));
        Ok(tokens)
    }

    /// Glue characters between children (such as the brackets in
    /// `item[]=1`) are kept as literal text
    fn concatenation(&self, node: &Node<'_>, diagnostics: &mut Diagnostics) -> Result<Vec<Token>> {
        let base = node.start_byte();
        let text = self.text(node);
        let mut tokens = Vec::new();
        let mut prev = 0;

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        for child in &children {
            let start = child.start_byte() - base;
            tokens.push(Token::Literal(text.get(prev..start).unwrap_or("").to_string()));
            if child.is_named() {
                tokens.extend(self.to_tokens(child, diagnostics)?);
            } else {
                tokens.push(Token::Literal(self.text(child).to_string()));
            }
            prev = child.end_byte() - base;
        }
        tokens.push(Token::Literal(text.get(prev..).unwrap_or("").to_string()));
        Ok(tokens)
    }
}

/// Strip `head` leading and `tail` trailing characters
fn inner(text: &str, head: usize, tail: usize) -> &str {
    let end = text.len().saturating_sub(tail);
    text.get(head.min(end)..end).unwrap_or("")
}

fn clip(s: &str) -> String {
    const MAX: usize = 30;
    if s.chars().count() <= MAX {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(MAX).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(source: &str) -> Vec<String> {
        let mut d = Diagnostics::new();
        let found = tokenize(source, &mut d).unwrap();
        found[0].argv.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(argv("curl example.com"), vec!["curl", "example.com"]);
    }

    #[test]
    fn test_quoting_styles() {
        assert_eq!(
            argv(r#"curl 'a b' "c \"d\"" $'e\tf' g\ h"#),
            vec!["curl", "a b", "c \"d\"", "e\tf", "g h"]
        );
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(argv("curl \\\n  -X POST \\\n  example.com"), vec!["curl", "-X", "POST", "example.com"]);
    }

    #[test]
    fn test_concatenation_keeps_brackets() {
        assert_eq!(argv("curl example.com -d item[]=1"), vec!["curl", "example.com", "-d", "item[]=1"]);
        assert_eq!(argv(r#"curl -H "a"'b'c example.com"#)[2], "abc");
    }

    #[test]
    fn test_variable_becomes_symbolic_token() {
        let mut d = Diagnostics::new();
        let found = tokenize(r#"curl "$URL/path""#, &mut d).unwrap();
        let word = &found[0].argv[1];
        assert!(!word.is_string());
        assert_eq!(word.to_string(), "$URL/path");
        match &word.tokens()[0] {
            Token::Variable { name, .. } => assert_eq!(name, "URL"),
            other => panic!("expected variable, got {:?}", other),
        }
        assert!(d.has("expansion"));
    }

    #[test]
    fn test_braced_expansion_and_command_substitution() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl ${HOST} -H \"X: $(date)\"", &mut d).unwrap();
        assert!(matches!(&found[0].argv[1].tokens()[0], Token::Variable { name, .. } if name == "HOST"));
        let header = &found[0].argv[3];
        assert_eq!(header.to_string(), "X: $(date)");
        assert!(matches!(&header.tokens()[1], Token::Command { command, .. } if command == "date"));
    }

    #[test]
    fn test_not_curl_is_fatal() {
        let mut d = Diagnostics::new();
        let err = tokenize("wget example.com", &mut d).unwrap_err();
        assert!(err.to_string().contains("command should begin with \"curl\""));
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let mut d = Diagnostics::new();
        assert!(tokenize("curl 'example.com", &mut d).is_err());
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(argv("# fetch it\ncurl example.com"), vec!["curl", "example.com"]);
    }

    #[test]
    fn test_preamble_assignment_is_skipped() {
        let mut d = Diagnostics::new();
        let found = tokenize("FOO=bar curl example.com", &mut d).unwrap();
        assert_eq!(found[0].argv.len(), 2);
        assert!(d.has("command-preamble"));
    }

    #[test]
    fn test_stdin_file_redirect() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl -d @- example.com < body.json", &mut d).unwrap();
        assert_eq!(found[0].stdin_file.as_ref().map(|w| w.to_string()).as_deref(), Some("body.json"));
        assert!(found[0].stdin.is_none());
    }

    #[test]
    fn test_herestring() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl -d @- example.com <<< 'hello'", &mut d).unwrap();
        assert_eq!(found[0].stdin.as_ref().map(|w| w.to_string()).as_deref(), Some("hello\n"));
    }

    #[test]
    fn test_herestring_before_arguments() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl <<< 'a=1' -d @- example.com", &mut d).unwrap();
        assert_eq!(found[0].argv.len(), 4);
        assert_eq!(found[0].stdin.as_ref().map(|w| w.to_string()).as_deref(), Some("a=1\n"));
    }

    #[test]
    fn test_only_first_redirect_is_used() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl -d @- example.com <<< 'one' <<< 'two'", &mut d).unwrap();
        assert_eq!(found[0].stdin.as_ref().map(|w| w.to_string()).as_deref(), Some("one\n"));
        assert!(d.has("multiple-redirects"));
    }

    #[test]
    fn test_pipeline_finds_curl() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl example.com | jq .", &mut d).unwrap();
        assert_eq!(found[0].argv[1].to_string(), "example.com");
    }

    #[test]
    fn test_multiple_invocations() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl a.example\ncurl b.example", &mut d).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].argv[1].to_string(), "b.example");
    }

    #[test]
    fn test_trailing_text_after_curl_is_ignored() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl a.example\necho done", &mut d).unwrap();
        assert_eq!(found.len(), 1);
        assert!(d.has("extra-commands"));
    }

    #[test]
    fn test_backslash_followed_by_space() {
        let mut d = Diagnostics::new();
        let found = tokenize("curl a.example \\ \ncurl b.example", &mut d).unwrap();
        assert!(!found.is_empty());
        assert!(d.has("unescaped-newline"));
    }

    #[test]
    fn test_inner() {
        assert_eq!(inner("'abc'", 1, 1), "abc");
        assert_eq!(inner("$'x'", 2, 1), "x");
        assert_eq!(inner("'", 1, 1), "");
    }
}
