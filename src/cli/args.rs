//! CLI argument definitions using clap

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "curlconv", version, about, long_about = None)]
#[command(after_help = "Examples:\n  curlconv -l json -X POST -d a=1 example.com\n  echo 'curl example.com' | curlconv --stdin")]
pub struct Args {
    /// Output language
    #[arg(short = 'l', long = "language", value_name = "LANG")]
    pub language: Option<String>,

    /// Read the curl command from standard input
    #[arg(long = "stdin", action = ArgAction::SetTrue)]
    pub stdin: bool,

    /// Print warnings about things that couldn't be converted exactly
    #[arg(long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Treat unknown curl options as errors
    #[arg(long = "strict", action = ArgAction::SetTrue)]
    pub strict: bool,

    /// Output format for logs on stderr
    #[arg(long = "log-format", value_name = "FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// curl arguments, without the leading `curl`. A lone `-` means --stdin.
    #[arg(value_name = "CURL_ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub curl_args: Vec<String>,
}

impl Args {
    /// `-` on its own asks for the command on stdin
    pub fn reads_command_from_stdin(&self) -> bool {
        self.stdin || (self.curl_args.len() == 1 && self.curl_args[0] == "-")
    }
}

/// Log format for structured output
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curl_args_are_captured() {
        let args = Args::parse_from(["curlconv", "-l", "json", "-X", "POST", "--data", "a=1", "example.com"]);
        assert_eq!(args.language.as_deref(), Some("json"));
        assert_eq!(args.curl_args, vec!["-X", "POST", "--data", "a=1", "example.com"]);
    }

    #[test]
    fn test_lone_dash_means_stdin() {
        let args = Args::parse_from(["curlconv", "-"]);
        assert!(args.reads_command_from_stdin());
        let args = Args::parse_from(["curlconv", "--stdin"]);
        assert!(args.reads_command_from_stdin());
        let args = Args::parse_from(["curlconv", "example.com"]);
        assert!(!args.reads_command_from_stdin());
    }

    #[test]
    fn test_log_format() {
        let args = Args::parse_from(["curlconv", "--log-format", "json", "example.com"]);
        assert_eq!(args.log_format, Some(LogFormat::Json));
    }
}
