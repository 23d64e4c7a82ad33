//! The Request IR
//!
//! One [`Request`] per curl operation (`--next` separated), with one
//! [`RequestUrl`] per URL in that operation. Emitters read these and never
//! modify them.

mod builder;
mod data;
mod multipart;

pub use builder::build_requests;
pub use data::{build_data, reads_stdin};
pub use multipart::{parse_boundary, parse_raw_form};

use crate::cookies::Cookies;
use crate::curl::args::{DataType, HttpVersion, TlsVersion};
use crate::curl::auth::AuthType;
use crate::curl::form::FormParam;
use crate::curl::url::CurlUrl;
use crate::diagnostics::Diagnostics;
use crate::errors::{CurlconvError, Result};
use crate::headers::Headers;
use crate::query::{QueryDict, QueryList};
use crate::word::Word;

/// A deferred file read from `@file` in `--data*` or `--url-query`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDataParam {
    /// Never [`DataType::Raw`]
    pub filetype: DataType,
    /// The part before `@` in `--data-urlencode name@file`
    pub name: Option<Word>,
    pub filename: Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataParam {
    Text(Word),
    File(FileDataParam),
}

/// What happened to `--data` and friends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataDisposition {
    /// No data was given
    #[default]
    Absent,
    /// Sent as the request body
    Body,
    /// `--get` turned it into the query string
    MovedToQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    /// As written on the command line
    pub original_url: Word,
    pub url: Word,
    pub url_obj: CurlUrl,
    /// First file the query string reads from
    pub query_reads_file: Option<String>,

    /// Equal to `url` when the query couldn't be split into pairs
    pub url_without_query_list: Word,
    pub query_list: Option<QueryList>,
    /// Only present if repeated keys are next to each other
    pub query_dict: Option<QueryDict>,

    pub url_without_query_array: Word,
    pub url_with_original_query: Word,
    /// The URL's own query plus `--url-query`/`--get --data`
    pub query_array: Option<Vec<DataParam>>,
    /// Only the URL's own query
    pub url_query_array: Option<Vec<DataParam>>,

    pub upload_file: Option<Word>,
    pub output: Option<Word>,

    pub method: Word,
    /// `(user, password)`, password is empty if not given
    pub auth: Option<(Word, Word)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyType {
    Http1,
    Http2,
    Socks4,
    Socks4a,
    Socks5,
    Socks5Hostname,
}

impl ProxyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyType::Http1 => "http1",
            ProxyType::Http2 => "http2",
            ProxyType::Socks4 => "socks4",
            ProxyType::Socks4a => "socks4a",
            ProxyType::Socks5 => "socks5",
            ProxyType::Socks5Hostname => "socks5-hostname",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetrcMode {
    Optional,
    Required,
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsOptions {
    pub insecure: bool,
    pub cert: Option<(Word, Option<Word>)>,
    pub cert_type: Option<Word>,
    pub cert_status: Option<bool>,
    pub key: Option<Word>,
    pub key_type: Option<Word>,
    pub pass: Option<Word>,
    pub cacert: Option<Word>,
    pub ca_native: Option<bool>,
    pub capath: Option<Word>,
    pub crlfile: Option<Word>,
    pub pinnedpubkey: Option<Word>,
    pub random_file: Option<Word>,
    pub egd_file: Option<Word>,
    pub hsts: Vec<Word>,
    pub alpn: Option<bool>,
    pub ciphers: Option<Word>,
    pub curves: Option<Word>,
    pub tls_version: Option<TlsVersion>,
    pub tls_max: Option<Word>,
    pub tls13_ciphers: Option<Word>,
    pub tlsauthtype: Option<Word>,
    pub tlspassword: Option<Word>,
    pub tlsuser: Option<Word>,
    pub ssl_allow_beast: Option<bool>,
    pub ssl_auto_client_cert: Option<bool>,
    pub ssl_no_revoke: Option<bool>,
    pub ssl_reqd: Option<bool>,
    pub ssl_revoke_best_effort: Option<bool>,
    pub ssl: Option<bool>,
    pub sslv2: Option<bool>,
    pub sslv3: Option<bool>,
    pub doh_url: Option<Word>,
    pub doh_insecure: Option<bool>,
    pub doh_cert_status: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyOptions {
    pub proxy: Option<Word>,
    pub proxy_type: Option<ProxyType>,
    /// `--proxy-user`, only kept when a proxy is set
    pub proxy_auth: Option<Word>,
    pub noproxy: Option<Word>,
    pub preproxy: Option<Word>,
    pub proxytunnel: Option<bool>,
    pub proxy_anyauth: Option<bool>,
    pub proxy_basic: Option<bool>,
    pub proxy_digest: Option<bool>,
    pub proxy_negotiate: Option<bool>,
    pub proxy_ntlm: Option<bool>,
    pub proxy_ca_native: Option<bool>,
    pub proxy_cacert: Option<Word>,
    pub proxy_capath: Option<Word>,
    pub proxy_cert_type: Option<Word>,
    pub proxy_cert: Option<Word>,
    pub proxy_ciphers: Option<Word>,
    pub proxy_crlfile: Option<Word>,
    pub proxy_insecure: Option<bool>,
    pub proxy_key: Option<Word>,
    pub proxy_key_type: Option<Word>,
    pub proxy_pass: Option<Word>,
    pub proxy_pinnedpubkey: Option<Word>,
    pub proxy_service_name: Option<Word>,
    pub proxy_ssl_allow_beast: Option<bool>,
    pub proxy_ssl_auto_client_cert: Option<bool>,
    pub proxy_tls13_ciphers: Option<Word>,
    pub proxy_tlsauthtype: Option<Word>,
    pub proxy_tlspassword: Option<Word>,
    pub proxy_tlsuser: Option<Word>,
    pub proxy_tlsv1: Option<bool>,
    pub proxy_user: Option<Word>,
    pub socks5_basic: Option<bool>,
    pub socks5_gssapi: Option<bool>,
    pub socks5_gssapi_nec: Option<bool>,
    pub haproxy_client_ip: Option<Word>,
    pub haproxy_protocol: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeoutOptions {
    /// `--max-time`
    pub timeout: Option<Word>,
    pub connect_timeout: Option<Word>,
    pub expect100_timeout: Option<Word>,
    pub happy_eyeballs_timeout_ms: Option<Word>,
    pub speed_limit: Option<Word>,
    pub speed_time: Option<Word>,
    pub limit_rate: Option<Word>,
    pub max_filesize: Option<Word>,
    pub keep_alive: Option<bool>,
    pub keep_alive_time: Option<Word>,
    pub retry: Option<Word>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectOptions {
    /// `--location`, `None` if never mentioned
    pub follow: Option<bool>,
    pub trusted: Option<bool>,
    pub max_redirects: Option<Word>,
    pub post301: Option<bool>,
    pub post302: Option<bool>,
    pub post303: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub http_version: Option<HttpVersion>,
    pub http0_9: Option<bool>,
    pub http2: bool,
    pub http3: bool,
    pub ipv4: Option<bool>,
    pub ipv6: Option<bool>,
    pub interface: Option<Word>,
    /// `(start, end)` of a `--local-port` range
    pub local_port: Option<(Word, Option<Word>)>,
    pub tcp_fastopen: Option<bool>,
    pub resolve: Vec<Word>,
    pub connect_to: Vec<Word>,
    pub unix_socket: Option<Word>,
    pub abstract_unix_socket: Option<Word>,
    pub alt_svc: Option<Word>,
    pub proto: Option<Word>,
    pub proto_redir: Option<Word>,
    pub proto_default: Option<Word>,
    pub ignore_content_length: Option<bool>,
    pub compressed: Option<bool>,
    pub transfer_encoding: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Never empty
    pub urls: Vec<RequestUrl>,
    pub auth_type: AuthType,
    pub proxy_auth_type: AuthType,
    pub headers: Headers,
    pub proxy_headers: Headers,

    pub stdin: Option<Word>,
    pub stdin_file: Option<Word>,

    pub globoff: Option<bool>,
    pub disallow_username_in_url: Option<bool>,
    pub path_as_is: Option<bool>,

    /// `--url-query`/`--get --data`, shared by every URL
    pub query_array: Option<Vec<DataParam>>,

    pub cookies: Option<Cookies>,
    /// `--cookie` values without `=` name files to read
    pub cookie_files: Vec<Word>,
    pub cookie_jar: Option<Word>,
    pub junk_session_cookies: Option<bool>,
    pub referer_auto: bool,

    pub data_disposition: DataDisposition,
    pub data: Option<Word>,
    pub data_array: Option<Vec<DataParam>>,
    /// First file the body reads from
    pub data_reads_file: Option<String>,
    pub is_data_binary: bool,
    pub multipart_uploads: Option<Vec<FormParam>>,
    /// The raw multipart body had parts that can't be expressed as form params
    pub multipart_uploads_doesnt_roundtrip: bool,
    pub form_escape: Option<bool>,

    pub aws_sigv4: Option<Word>,
    pub oauth2_bearer: Option<Word>,
    pub delegation: Option<Word>,
    pub krb: Option<Word>,
    pub sasl_authzid: Option<Word>,
    pub sasl_ir: Option<bool>,
    pub service_name: Option<Word>,
    pub netrc: Option<NetrcMode>,
    pub netrc_file: Option<Word>,

    pub tls: TlsOptions,
    pub proxy: ProxyOptions,
    pub timeouts: TimeoutOptions,
    pub redirects: RedirectOptions,
    pub connection: ConnectionOptions,

    pub fail: Option<bool>,
    pub ftp_skip_pasv_ip: Option<bool>,
    pub use_ascii: Option<bool>,
    pub continue_at: Option<Word>,
    pub crlf: Option<bool>,
    pub clobber: Option<bool>,
    pub remote_time: Option<bool>,

    // global options
    pub verbose: Option<bool>,
    pub silent: Option<bool>,
}

/// What an emitter can express beyond a single plain request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Support {
    pub multiple_urls: bool,
    pub data_reads_file: bool,
    pub query_reads_file: bool,
    pub cookie_files: bool,
}

/// The request an emitter that handles a single request should convert
pub fn get_first<'r>(
    requests: &'r [Request],
    diagnostics: &mut Diagnostics,
    support: Support,
) -> Result<&'r Request> {
    let request = requests
        .first()
        .ok_or_else(|| CurlconvError::parse("no curl requests to convert"))?;
    if requests.len() > 1 {
        diagnostics.push(
            "next",
            format!("got {} curl requests, only converting the first one", requests.len()),
        );
    }
    warn_if_parts_ignored(request, diagnostics, support);
    Ok(request)
}

/// Report the parts of a request an emitter will silently drop
pub fn warn_if_parts_ignored(request: &Request, diagnostics: &mut Diagnostics, support: Support) {
    if request.urls.len() > 1 && !support.multiple_urls {
        let urls: Vec<String> = request
            .urls
            .iter()
            .map(|u| format!("{:?}", u.original_url.to_string()))
            .collect();
        diagnostics.push(
            "multiple-urls",
            format!(
                "found {} URLs, only the first one will be used: {}",
                request.urls.len(),
                urls.join(", ")
            ),
        );
    }
    if let Some(file) = request.data_reads_file.as_ref().filter(|_| !support.data_reads_file) {
        diagnostics.push(
            "unsafe-data",
            format!(
                "the generated data content is wrong, {:?} means read the file {:?}",
                format!("@{}", file),
                file
            ),
        );
    }
    let query_file = request.urls.first().and_then(|u| u.query_reads_file.as_ref());
    if let Some(file) = query_file.filter(|_| !support.query_reads_file) {
        diagnostics.push(
            "unsafe-query",
            format!(
                "the generated URL query string is wrong, {:?} means read the file {:?}",
                format!("@{}", file),
                file
            ),
        );
    }
    if !request.cookie_files.is_empty() && !support.cookie_files {
        let files: Vec<String> = request
            .cookie_files
            .iter()
            .map(|c| format!("{:?}", c.to_string()))
            .collect();
        diagnostics.push(
            "cookie-files",
            format!("passing a file for --cookie/-b is not supported: {}", files.join(", ")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, ParseOptions};

    fn requests(command: &str) -> Vec<Request> {
        parse(command, &ParseOptions::default()).unwrap().0
    }

    #[test]
    fn test_get_first_reports_next() {
        let requests = requests("curl a.example --next b.example");
        let mut diagnostics = Diagnostics::new();
        let first = get_first(&requests, &mut diagnostics, Support::default()).unwrap();
        assert_eq!(first.urls[0].url.to_string(), "http://a.example");
        assert_eq!(diagnostics.codes(), vec!["next"]);
    }

    #[test]
    fn test_get_first_without_requests() {
        let mut diagnostics = Diagnostics::new();
        assert!(get_first(&[], &mut diagnostics, Support::default()).is_err());
    }

    #[test]
    fn test_file_data_is_unsafe_unless_supported() {
        let requests = requests("curl -d @body.json example.com");
        let mut diagnostics = Diagnostics::new();
        warn_if_parts_ignored(&requests[0], &mut diagnostics, Support::default());
        assert!(diagnostics.has("unsafe-data"));

        let mut diagnostics = Diagnostics::new();
        let support = Support {
            data_reads_file: true,
            ..Default::default()
        };
        warn_if_parts_ignored(&requests[0], &mut diagnostics, support);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_cookie_files_warn() {
        let requests = requests("curl -b jar.txt example.com");
        let mut diagnostics = Diagnostics::new();
        warn_if_parts_ignored(&requests[0], &mut diagnostics, Support::default());
        assert!(diagnostics.has("cookie-files"));
    }
}
