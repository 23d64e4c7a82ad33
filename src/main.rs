use std::io::{self, Read};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use curlconv::cli::{Args, LogFormat};
use curlconv::config::Config;
use curlconv::diagnostics::Diagnostics;
use curlconv::emit::{self, Language};
use curlconv::resources::ProcessEnv;
use curlconv::status::ExitStatus;
use curlconv::{parse_argv, CurlconvError, ParseOptions, Result, Word};

const DEFAULT_LANGUAGE: &str = "json";

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env("CURLCONV_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(io::stderr)).init(),
        LogFormat::Text => registry.with(fmt::layer().with_writer(io::stderr)).init(),
    }
}

fn run(args: &Args, config: &Config, diagnostics: &mut Diagnostics) -> Result<String> {
    let name = args
        .language
        .as_deref()
        .or(config.language.as_deref())
        .unwrap_or(DEFAULT_LANGUAGE);
    let language = Language::parse(name)?;
    let strict = args.strict || config.strict;

    if args.reads_command_from_stdin() {
        if args.stdin && !args.curl_args.is_empty() {
            return Err(CurlconvError::Argument(
                "curl arguments can't be combined with --stdin".to_string(),
            ));
        }
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        let (code, found) = emit::convert(&source, language, strict, &ProcessEnv::without_stdin())?;
        diagnostics.extend(found);
        return Ok(code);
    }

    let argv: Vec<Word> = std::iter::once("curl")
        .chain(args.curl_args.iter().map(String::as_str))
        .map(Word::from)
        .collect();
    debug!(?argv, language = name, "converting arguments");

    let env = ProcessEnv::new();
    let emitter = language.emitter();
    let options = ParseOptions {
        strict,
        supported_args: Some(emitter.supported_args()),
        resources: &env,
    };
    let (requests, found) = parse_argv(&argv, &options)?;
    diagnostics.extend(found);
    emitter.emit(&requests, diagnostics)
}

fn main() -> ExitStatus {
    let args = Args::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(args.log_format.unwrap_or(LogFormat::Text));
    if let Some(e) = config_error {
        eprintln!("warning: {}", e);
    }

    let mut diagnostics = Diagnostics::new();
    let result = run(&args, &config, &mut diagnostics);

    if args.verbose || config.verbose {
        for diagnostic in &diagnostics {
            eprintln!("warning: {}", diagnostic.message);
        }
    }

    match result {
        Ok(code) => {
            print!("{}", code);
            ExitStatus::Success
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitStatus::Error
        }
    }
}
