//! curl argument parsing
//!
//! Turns an argument vector into one [`OperationConfig`] per `--next`
//! separated operation. Nothing is read here: `@file` and `-` arguments are
//! recorded as written and resolved by the request builder.

use indexmap::IndexMap;
use tracing::trace;

use super::auth::AuthMask;
use super::opts::{self, LongOption, Lookup, OptionKind};
use crate::diagnostics::Diagnostics;
use crate::errors::{CurlconvError, Result};
use crate::word::{Token, Word, WordChar};

/// How a `--data*`/`--url-query` value is to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `--data`, `--data-ascii`, non-file `--data-binary`/`--data-raw`.
    /// `@file` strips newlines.
    Data,
    /// Taken literally, `@` has no meaning
    Raw,
    /// `--data-binary @file`
    Binary,
    /// `--data-urlencode`
    Urlencode,
    /// `--json`
    Json,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Data => "data",
            DataType::Raw => "raw",
            DataType::Binary => "binary",
            DataType::Urlencode => "urlencode",
            DataType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcDataParam {
    pub kind: DataType,
    pub value: Word,
}

impl SrcDataParam {
    pub fn new(kind: DataType, value: Word) -> Self {
        SrcDataParam { kind, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormType {
    /// `-F`, where `@` and `<` read files
    Form,
    /// `--form-string`
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcFormParam {
    pub value: Word,
    pub kind: FormType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    V1_0,
    V1_1,
    V2,
    V2PriorKnowledge,
    V3,
    V3Only,
}

impl HttpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::V1_0 => "1.0",
            HttpVersion::V1_1 => "1.1",
            HttpVersion::V2 => "2",
            HttpVersion::V2PriorKnowledge => "2-prior-knowledge",
            HttpVersion::V3 => "3",
            HttpVersion::V3Only => "3-only",
        }
    }

    fn from_option(name: &str) -> Option<Self> {
        Some(match name {
            "http1.0" => HttpVersion::V1_0,
            "http1.1" => HttpVersion::V1_1,
            "http2" => HttpVersion::V2,
            "http2-prior-knowledge" => HttpVersion::V2PriorKnowledge,
            "http3" => HttpVersion::V3,
            "http3-only" => HttpVersion::V3Only,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVersion {
    V1,
    V1_0,
    V1_1,
    V1_2,
    V1_3,
}

impl TlsVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsVersion::V1 => "1",
            TlsVersion::V1_0 => "1.0",
            TlsVersion::V1_1 => "1.1",
            TlsVersion::V1_2 => "1.2",
            TlsVersion::V1_3 => "1.3",
        }
    }

    fn from_option(name: &str) -> Option<Self> {
        Some(match name {
            "tlsv1" => TlsVersion::V1,
            "tlsv1.0" => TlsVersion::V1_0,
            "tlsv1.1" => TlsVersion::V1_1,
            "tlsv1.2" => TlsVersion::V1_2,
            "tlsv1.3" => TlsVersion::V1_3,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptValue {
    Flag(bool),
    Word(Word),
    List(Vec<Word>),
}

/// Options that apply to the whole curl run rather than one operation
const GLOBAL_STRINGS: &[&str] = &["trace", "trace-ascii", "stderr", "libcurl", "config", "parallel-max"];

const GLOBAL_FLAGS: &[&str] = &[
    "verbose",
    "version",
    "trace-time",
    "test-event",
    "progress-bar",
    "progress-meter",
    "fail-early",
    "styled-output",
    "help",
    "silent",
    "show-error",
    "parallel",
    "parallel-immediate",
];

/// The options of one operation, keyed by canonical option name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationConfig {
    options: IndexMap<&'static str, OptValue>,
    pub data: Vec<SrcDataParam>,
    pub url_query: Vec<SrcDataParam>,
    pub form: Vec<SrcFormParam>,
    pub json: bool,
    pub authtype: AuthMask,
    pub proxyauthtype: AuthMask,
    pub http_version: Option<HttpVersion>,
    pub tls_version: Option<TlsVersion>,
}

impl Default for OperationConfig {
    fn default() -> Self {
        OperationConfig {
            options: IndexMap::new(),
            data: Vec::new(),
            url_query: Vec::new(),
            form: Vec::new(),
            json: false,
            authtype: AuthMask::BASIC,
            proxyauthtype: AuthMask::BASIC,
            http_version: None,
            tls_version: None,
        }
    }
}

impl OperationConfig {
    pub fn get(&self, name: &str) -> Option<&OptValue> {
        self.options.get(name)
    }

    /// Value of a single-valued option
    pub fn word(&self, name: &str) -> Option<&Word> {
        match self.options.get(name)? {
            OptValue::Word(w) => Some(w),
            OptValue::List(l) => l.last(),
            OptValue::Flag(_) => None,
        }
    }

    /// Every value given for a list option, in order
    pub fn list(&self, name: &str) -> &[Word] {
        match self.options.get(name) {
            Some(OptValue::List(l)) => l,
            Some(OptValue::Word(w)) => std::slice::from_ref(w),
            _ => &[],
        }
    }

    /// `None` if the flag was never given, so `--no-foo` can be told apart
    /// from not passing it at all
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.options.get(name)? {
            OptValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_true(&self, name: &str) -> bool {
        self.flag(name).unwrap_or(false)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn urls(&self) -> &[Word] {
        self.list("url")
    }

    pub fn set(&mut self, name: &'static str, value: OptValue) {
        self.options.insert(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<OptValue> {
        self.options.shift_remove(name)
    }

    fn push(&mut self, name: &'static str, value: Word) {
        match self.options.get_mut(name) {
            Some(OptValue::List(l)) => l.push(value),
            _ => {
                self.options.insert(name, OptValue::List(vec![value]));
            }
        }
    }

    /// Whether `--next` may start a new operation after this one
    fn is_complete(&self) -> bool {
        let urls = self.urls().len();
        urls > 0 && urls >= self.list("upload-file").len() && urls >= self.list("output").len()
    }
}

/// Everything parsed from one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub configs: Vec<OperationConfig>,
    options: IndexMap<&'static str, OptValue>,
    /// `(canonical name, as written)` for every option, in order
    pub seen: Vec<(&'static str, String)>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            configs: vec![OperationConfig::default()],
            options: IndexMap::new(),
            seen: Vec::new(),
        }
    }
}

impl GlobalConfig {
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.options.get(name)? {
            OptValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn word(&self, name: &str) -> Option<&Word> {
        match self.options.get(name)? {
            OptValue::Word(w) => Some(w),
            _ => None,
        }
    }

    fn current(&mut self) -> &mut OperationConfig {
        if self.configs.is_empty() {
            self.configs.push(OperationConfig::default());
        }
        let last = self.configs.len() - 1;
        &mut self.configs[last]
    }
}

/// Knobs for [`parse_args`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgOptions<'a> {
    /// Unknown options are fatal instead of a diagnostic
    pub strict: bool,
    /// Canonical option names the caller can handle
    pub supported: Option<&'a [&'a str]>,
}

/// Parse `argv`, where `argv[0]` is the command name
pub fn parse_args(
    argv: &[Word],
    options: ArgOptions<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<GlobalConfig> {
    let mut parser = ArgParser {
        argv,
        options,
        global: GlobalConfig::default(),
        diagnostics,
    };
    parser.run()?;
    Ok(parser.global)
}

struct ArgParser<'a, 'd> {
    argv: &'a [Word],
    options: ArgOptions<'a>,
    global: GlobalConfig,
    diagnostics: &'d mut Diagnostics,
}

impl ArgParser<'_, '_> {
    fn run(&mut self) -> Result<()> {
        let mut still_flags = true;
        let argv = self.argv;
        let mut i = 1;
        while i < argv.len() {
            let arg = &argv[i];
            if still_flags && arg.starts_with("-") {
                if arg.eq_str("--") {
                    still_flags = false;
                } else if arg.starts_with("--") {
                    i = self.long_option(arg, i)?;
                } else {
                    i = self.short_options(arg, i)?;
                }
            } else {
                if let Some(Token::Variable { .. } | Token::Command { .. }) = arg.tokens().first() {
                    let token = &arg.tokens()[0];
                    let is_or_begins = if arg.tokens().len() == 1 { "is" } else { "begins with" };
                    self.diagnostics.push(
                        "ambiguous-argument",
                        format!(
                            "argument {} a {}, assuming it's a URL: {}",
                            is_or_begins,
                            token.kind_name(),
                            token.text()
                        ),
                    );
                }
                self.global.current().push("url", arg.clone());
                self.global.seen.push(("url", "--url".to_string()));
            }
            i += 1;
        }
        Ok(())
    }

    /// Handles `--name`, `--name value` and `--name=value`. Returns the index
    /// of the last argument consumed.
    fn long_option(&mut self, arg: &Word, mut i: usize) -> Result<usize> {
        let (name_word, inline_value) = match arg.index_of("=", 2) {
            Some(idx) => (arg.slice(..idx), Some(arg.slice(idx + 1..))),
            None => (arg.clone(), None),
        };
        if let Some(token) = name_word.first_shell_token() {
            return Err(could_be_anything(token));
        }
        let written = name_word.to_string();
        let lookup = &written[2..];

        let opt = match opts::lookup_long(lookup) {
            Lookup::Found(opt) => opt,
            Lookup::Ambiguous => {
                return Err(CurlconvError::parse(format!("option {}: is ambiguous", written)));
            }
            Lookup::Unknown => {
                self.unknown(&written, "is unknown")?;
                return Ok(i);
            }
        };

        if opt.takes_value() {
            let value = match inline_value {
                Some(value) => value,
                None => {
                    i += 1;
                    self.argv
                        .get(i)
                        .cloned()
                        .ok_or_else(|| requires_parameter(&written))?
                }
            };
            self.push_value(opt, value);
        } else {
            if inline_value.is_some() {
                return Err(CurlconvError::parse(format!(
                    "option {}: does not take a value",
                    written
                )));
            }
            self.set_flag(opt, opts::to_boolean(lookup));
        }
        self.check_option(opt, &written);
        Ok(i)
    }

    /// Handles `-v`, `-sL`, `-X POST` and `-XPOST`
    fn short_options(&mut self, arg: &Word, mut i: usize) -> Result<usize> {
        let written = arg.to_string();
        let len = arg.len();
        if len == 1 {
            self.unknown("-", "is unknown")?;
            return Ok(i);
        }

        let mut j = 1;
        while j < len {
            let c = match arg.char_at(j) {
                Some(WordChar::Char(c)) => c,
                Some(WordChar::Shell(token)) => return Err(could_be_anything(token)),
                None => break,
            };
            let Some(opt) = opts::lookup_short(c) else {
                let reason = opts::changed_short_option(c).unwrap_or("is unknown");
                self.unknown(&written, reason)?;
                j += 1;
                continue;
            };

            if opt.takes_value() {
                let value = if j + 1 < len {
                    let value = arg.slice(j + 1..);
                    j = len;
                    value
                } else if i + 1 < self.argv.len() {
                    i += 1;
                    self.argv[i].clone()
                } else {
                    return Err(requires_parameter(&written));
                };
                self.push_value(opt, value);
            } else {
                // `-N` is `--no-buffer`, so the toggle comes from the long spelling
                self.set_flag(opt, opts::to_boolean(opt.long));
            }
            self.check_option(opt, &format!("-{}", c));
            j += 1;
        }
        Ok(i)
    }

    fn unknown(&mut self, written: &str, reason: &str) -> Result<()> {
        let message = format!("option {}: {}", written, reason);
        if self.options.strict {
            return Err(CurlconvError::parse(message));
        }
        self.diagnostics.push("unknown-option", message);
        Ok(())
    }

    fn check_option(&mut self, opt: &'static LongOption, written: &str) {
        if let Some(supported) = self.options.supported {
            if !supported.contains(&opt.name) {
                let removed = opt
                    .removed
                    .map(|v| format!(", it was removed in curl {}", v))
                    .unwrap_or_default();
                self.diagnostics.push(
                    "unsupported-option",
                    format!("{} is not a supported option{}", written, removed),
                );
            }
        } else if let Some(version) = opt.removed {
            self.diagnostics
                .push("removed-option", format!("{} was removed in curl {}", written, version));
        }
        trace!(option = opt.name, written = written, "parsed option");
        self.global.seen.push((opt.name, written.to_string()));
    }

    fn push_value(&mut self, opt: &'static LongOption, value: Word) {
        let name = opt.name;
        if GLOBAL_STRINGS.contains(&name) {
            self.global.options.insert(name, OptValue::Word(value));
            return;
        }

        let config = self.global.current();
        match name {
            "data" | "data-ascii" => config.data.push(SrcDataParam::new(DataType::Data, value)),
            "data-binary" => {
                let kind = if value.starts_with("@") { DataType::Binary } else { DataType::Data };
                config.data.push(SrcDataParam::new(kind, value));
            }
            "data-raw" => {
                let kind = if value.starts_with("@") { DataType::Raw } else { DataType::Data };
                config.data.push(SrcDataParam::new(kind, value));
            }
            "data-urlencode" => config.data.push(SrcDataParam::new(DataType::Urlencode, value)),
            "json" => {
                config.json = true;
                config.data.push(SrcDataParam::new(DataType::Json, value));
            }
            "url-query" => {
                let param = if value.starts_with("+") {
                    SrcDataParam::new(DataType::Raw, value.slice(1..))
                } else {
                    SrcDataParam::new(DataType::Urlencode, value)
                };
                config.url_query.push(param);
            }
            "form" => config.form.push(SrcFormParam { value, kind: FormType::Form }),
            "form-string" => config.form.push(SrcFormParam { value, kind: FormType::String }),
            _ => {
                match name {
                    "aws-sigv4" => config.authtype |= AuthMask::AWS_SIGV4,
                    "oauth2-bearer" => config.authtype |= AuthMask::BEARER,
                    "abstract-unix-socket" => config.set("unix-socket", OptValue::Word(value.clone())),
                    _ => {}
                }
                if opt.kind == OptionKind::List {
                    config.push(name, value);
                } else {
                    config.set(name, OptValue::Word(value));
                }
            }
        }
    }

    fn set_flag(&mut self, opt: &'static LongOption, toggle: bool) {
        let name = opt.name;
        if GLOBAL_FLAGS.contains(&name) {
            self.global.options.insert(name, OptValue::Flag(toggle));
            return;
        }
        if name == "next" {
            if toggle && self.global.current().is_complete() {
                self.global.configs.push(OperationConfig::default());
            }
            return;
        }

        let config = self.global.current();
        if let Some(version) = HttpVersion::from_option(name) {
            config.http_version = Some(version);
            return;
        }
        if let Some(version) = TlsVersion::from_option(name) {
            config.tls_version = Some(version);
            return;
        }
        match name {
            "basic" => toggle_bit(&mut config.authtype, AuthMask::BASIC, toggle),
            "digest" => toggle_bit(&mut config.authtype, AuthMask::DIGEST, toggle),
            "negotiate" => toggle_bit(&mut config.authtype, AuthMask::NEGOTIATE, toggle),
            "ntlm" => toggle_bit(&mut config.authtype, AuthMask::NTLM, toggle),
            "ntlm-wb" => toggle_bit(&mut config.authtype, AuthMask::NTLM_WB, toggle),
            "proxy-basic" => toggle_bit(&mut config.proxyauthtype, AuthMask::BASIC, toggle),
            "proxy-digest" => toggle_bit(&mut config.proxyauthtype, AuthMask::DIGEST, toggle),
            "proxy-negotiate" => toggle_bit(&mut config.proxyauthtype, AuthMask::NEGOTIATE, toggle),
            "proxy-ntlm" => toggle_bit(&mut config.proxyauthtype, AuthMask::NTLM, toggle),
            "anyauth" if toggle => config.authtype = AuthMask::ANY,
            "proxy-anyauth" if toggle => config.proxyauthtype = AuthMask::ANY,
            "location-trusted" => config.set("location", OptValue::Flag(toggle)),
            _ => {}
        }
        config.set(name, OptValue::Flag(toggle));
    }
}

fn toggle_bit(mask: &mut AuthMask, bit: AuthMask, on: bool) {
    mask.set(bit, on);
}

fn could_be_anything(token: &Token) -> CurlconvError {
    let verb = if matches!(token, Token::Command { .. }) { "return" } else { "be" };
    CurlconvError::parse(format!(
        "this {} could {} anything: {}",
        token.kind_name(),
        verb,
        token.text()
    ))
}

fn requires_parameter(written: &str) -> CurlconvError {
    CurlconvError::parse(format!("option {}: requires parameter", written))
}
