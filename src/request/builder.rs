//! Request builder
//!
//! Turns the option values of each operation into a [`Request`], resolving
//! the interactions between options the way curl does.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::data::build_data;
use super::multipart::{parse_boundary, parse_raw_form};
use super::{
    ConnectionOptions, DataDisposition, DataParam, NetrcMode, ProxyOptions, ProxyType, RedirectOptions,
    Request, RequestUrl, TimeoutOptions, TlsOptions,
};
use crate::cookies::{parse_cookies, parse_cookies_strict};
use crate::curl::args::{DataType, GlobalConfig, HttpVersion, OperationConfig, SrcDataParam};
use crate::curl::auth::{pick_auth, AuthType};
use crate::curl::form::parse_form;
use crate::curl::url::parse_url;
use crate::diagnostics::Diagnostics;
use crate::errors::{CurlconvError, Result};
use crate::headers::Headers;
use crate::query::parse_query_string;
use crate::word::{self, Word, WordChar};

/// What `parseFloat()` accepts as the start of a number
static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:Infinity|\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)")
        .expect("Invalid float regex")
});

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?\d+$").expect("Invalid integer regex"));

const CERT_TYPES: &[&str] = &["PEM", "DER", "ENG", "P12"];

/// Build one [`Request`] per operation.
///
/// `stdin` and `stdin_file` are what the shell redirected into curl, and
/// replace `@-` and `-T -`.
pub fn build_requests(
    global: &GlobalConfig,
    stdin: Option<&Word>,
    stdin_file: Option<&Word>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Request>> {
    let requests = global
        .configs
        .iter()
        .map(|config| build_request(global, config, stdin, stdin_file, diagnostics))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = requests.len(), "built requests");
    Ok(requests)
}

#[allow(clippy::too_many_arguments)]
fn build_url(
    config: &OperationConfig,
    url: &Word,
    upload_file: Option<&Word>,
    output_file: Option<&Word>,
    url_query: &[SrcDataParam],
    stdin: Option<&Word>,
    stdin_file: Option<&Word>,
    diagnostics: &mut Diagnostics,
) -> RequestUrl {
    let original_url = url.clone();
    let mut u = parse_url(url, config, diagnostics);

    let mut upload_file = upload_file.cloned();
    if let Some(file) = &upload_file {
        // curl appends the file name to URLs without a file part
        if u.path.is_empty() {
            u.path = file.prepend("/");
        } else if u.path.ends_with("/") {
            u.path = u.path.concat(file);
        }
        if config.is_true("get") {
            diagnostics.push(
                "data-ignored",
                "curl doesn't let you pass --get and --upload-file together",
            );
        }
    }

    let url_with_original_query = u.join(&[&u.path, &u.query, &u.fragment]);

    let mut query_array = None;
    let mut url_query_array = None;
    let mut query_reads_file = None;
    if !u.query.is_empty() || !url_query.is_empty() {
        let mut params = Vec::new();
        if u.query.len() > 1 {
            params.push(SrcDataParam::new(DataType::Raw, u.query.slice(1..)));
            url_query_array = Some(build_data(&params, stdin, stdin_file).0);
        }
        params.extend(url_query.iter().cloned());
        let (array, query, reads_file) = build_data(&params, stdin, stdin_file);
        query_array = Some(array);
        query_reads_file = reads_file;
        u.query = if query.is_empty() { Word::new() } else { query.prepend("?") };
    }

    let url_without_query_array = u.join(&[&u.path, &u.fragment]);
    let full_url = u.join(&[&u.path, &u.query, &u.fragment]);

    let query = (!u.query.is_empty()).then(|| u.query.slice(1..));
    let parsed = parse_query_string(query.as_ref());
    let url_without_query_list = if parsed.list.is_some() {
        u.join(&[&u.path, &u.fragment])
    } else {
        full_url.clone()
    };

    let has_body = !config.data.is_empty() || !config.form.is_empty();
    let method = match config.word("request").filter(|m| !m.eq_str("null")) {
        Some(method) => method.clone(),
        None if config.is_true("head") => Word::from("HEAD"),
        None if upload_file.as_ref().is_some_and(|f| f.to_bool()) => Word::from("PUT"),
        None if !config.is_true("get") && has_body => Word::from("POST"),
        None => Word::from("GET"),
    };

    if upload_file.as_ref().is_some_and(|f| f.eq_str("-") || f.eq_str(".")) {
        if let Some(stdin_file) = stdin_file {
            upload_file = Some(stdin_file.clone());
        } else if stdin.is_some() {
            diagnostics.push(
                "upload-file-with-stdin-content",
                "--upload-file with stdin content is not supported",
            );
        }
    }

    let auth = config.word("user").or(u.auth.as_ref()).map(|credentials| {
        match credentials.split_once(":") {
            Some((user, password)) => (user, password),
            None => (credentials.clone(), Word::new()),
        }
    });

    RequestUrl {
        original_url,
        url: full_url,
        url_obj: u,
        query_reads_file,
        url_without_query_list,
        query_list: parsed.list,
        query_dict: parsed.dict,
        url_without_query_array,
        url_with_original_query,
        query_array,
        url_query_array,
        upload_file,
        output: output_file.cloned(),
        method,
        auth,
    }
}

fn build_request(
    global: &GlobalConfig,
    config: &OperationConfig,
    stdin: Option<&Word>,
    stdin_file: Option<&Word>,
    diagnostics: &mut Diagnostics,
) -> Result<Request> {
    let urls = config.urls();
    if urls.is_empty() {
        return Err(CurlconvError::parse("no URL specified!"));
    }

    let mut headers = Headers::parse(config.list("header"), "--header", diagnostics);
    let proxy_headers = Headers::parse(config.list("proxy-header"), "--proxy-header", diagnostics);

    // --cookie is ignored when a Cookie header is passed, even an unset one
    let mut cookies = None;
    let mut cookie_files = Vec::new();
    match headers.get("cookie") {
        Some(Some(header)) => cookies = parse_cookies_strict(header),
        Some(None) => {}
        None => {
            let (strings, files): (Vec<Word>, Vec<Word>) =
                config.list("cookie").iter().cloned().partition(|c| c.contains("="));
            cookie_files = files;
            if !strings.is_empty() {
                let cookie = word::join(&strings, "; ");
                cookies = parse_cookies(&cookie);
                headers.set_if_missing("Cookie", cookie);
            }
        }
    }

    if let Some(user_agent) = config.word("user-agent") {
        headers.set_if_missing("User-Agent", user_agent.clone());
    }
    let mut referer_auto = false;
    if let Some(referer) = config.word("referer") {
        referer_auto = referer.contains(";auto");
        let referer = if referer.ends_with(";auto") {
            referer.slice(..referer.len() - 5)
        } else {
            referer.clone()
        };
        if !referer.is_empty() {
            headers.set_if_missing("Referer", referer);
        }
    }
    if let Some(range) = config.word("range") {
        let mut range = range.prepend("bytes=");
        if !range.contains("-") {
            range = range.append("-");
        }
        headers.set_if_missing("Range", range);
    }
    if let Some(time_cond) = config.word("time-cond") {
        let (header, date) = match time_cond.char_at(0) {
            Some(WordChar::Char('+')) => ("If-Modified-Since", time_cond.slice(1..)),
            Some(WordChar::Char('-')) => ("If-Unmodified-Since", time_cond.slice(1..)),
            Some(WordChar::Char('=')) => ("Last-Modified", time_cond.slice(1..)),
            _ => ("If-Modified-Since", time_cond.clone()),
        };
        headers.set_if_missing(header, date);
    }

    // --get --data replaces --url-query instead of adding to it
    let get = config.is_true("get");
    let url_query: &[SrcDataParam] = if get && !config.data.is_empty() {
        &config.data
    } else {
        &config.url_query
    };

    let mut data_disposition = DataDisposition::Absent;
    let mut data = None;
    let mut data_array = None;
    let mut data_reads_file = None;
    if !config.data.is_empty() {
        if get {
            data_disposition = DataDisposition::MovedToQuery;
        } else {
            let (array, text, reads_file) = build_data(&config.data, stdin, stdin_file);
            data_disposition = DataDisposition::Body;
            data = Some(text);
            data_array = Some(array);
            data_reads_file = reads_file;
        }
    }
    let query_array = (!url_query.is_empty()).then(|| build_data(url_query, stdin, stdin_file).0);

    let uploads = config.list("upload-file");
    let outputs = config.list("output");
    let request_urls: Vec<RequestUrl> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            build_url(
                config,
                url,
                uploads.get(i),
                outputs.get(i),
                url_query,
                stdin,
                stdin_file,
                diagnostics,
            )
        })
        .collect();

    if uploads.len() > urls.len() {
        diagnostics.push(
            "too-many-upload-files",
            format!("Got more --upload-file/-T options than URLs: {}", quoted_list(uploads)),
        );
    }
    if outputs.len() > urls.len() {
        diagnostics.push(
            "too-many-output-files",
            format!("Got more --output/-o options than URLs: {}", quoted_list(outputs)),
        );
    }

    let body = data_disposition == DataDisposition::Body;
    let mut multipart_uploads = None;
    if config.json {
        headers.set_if_missing("Content-Type", "application/json");
        headers.set_if_missing("Accept", "application/json");
    } else if body {
        headers.set_if_missing("Content-Type", "application/x-www-form-urlencoded");
    } else if !config.form.is_empty() {
        multipart_uploads = Some(parse_form(&config.form)?);
    }

    let mut multipart_uploads_doesnt_roundtrip = false;
    let raw_form = data
        .as_ref()
        .and_then(|d| d.as_literal())
        .filter(|_| data_reads_file.is_none() && config.form.is_empty() && multipart_uploads.is_none());
    if let Some(raw) = raw_form {
        let content_type = headers.get_value("content-type").and_then(|c| c.as_literal());
        let is_multipart = headers.get_content_type().as_deref() == Some("multipart/form-data");
        if let Some(boundary) = content_type.filter(|_| is_multipart).and_then(parse_boundary) {
            if let Some((form, roundtrips)) = parse_raw_form(raw, &boundary) {
                multipart_uploads = Some(form);
                multipart_uploads_doesnt_roundtrip = !roundtrips;
            }
        }
    }

    let mut auth_type = pick_auth(config.authtype);
    if config.is_true("negotiate") {
        auth_type = AuthType::Negotiate;
    }
    let aws_sigv4 = config.word("aws-sigv4").cloned();
    if aws_sigv4.is_some() {
        auth_type = AuthType::AwsSigv4;
    }
    let mut oauth2_bearer = None;
    if let Some(token) = config.word("oauth2-bearer").filter(|_| auth_type == AuthType::Bearer) {
        headers.set_if_missing("Authorization", token.prepend("Bearer "));
        oauth2_bearer = Some(token.clone());
    }

    let is_data_binary = data_array.iter().flatten().any(|d| {
        matches!(d, DataParam::File(f) if f.filetype == DataType::Binary)
    });

    let netrc = if config.is_true("netrc-optional") {
        Some(NetrcMode::Optional)
    } else if config.is_true("netrc") || config.is_set("netrc-file") {
        Some(NetrcMode::Required)
    } else if config.flag("netrc") == Some(false) {
        Some(NetrcMode::Ignored)
    } else {
        None
    };

    Ok(Request {
        urls: request_urls,
        auth_type,
        proxy_auth_type: pick_auth(config.proxyauthtype),
        headers,
        proxy_headers,
        stdin: stdin.cloned(),
        stdin_file: stdin_file.cloned(),
        globoff: config.flag("globoff"),
        disallow_username_in_url: config.flag("disallow-username-in-url"),
        path_as_is: config.flag("path-as-is"),
        query_array,
        cookies,
        cookie_files,
        cookie_jar: config.word("cookie-jar").cloned(),
        junk_session_cookies: config.flag("junk-session-cookies"),
        referer_auto,
        data_disposition,
        data,
        data_array,
        data_reads_file,
        is_data_binary,
        multipart_uploads,
        multipart_uploads_doesnt_roundtrip,
        form_escape: config.flag("form-escape"),
        aws_sigv4,
        oauth2_bearer,
        delegation: config.word("delegation").cloned(),
        krb: config.word("krb").cloned(),
        sasl_authzid: config.word("sasl-authzid").cloned(),
        sasl_ir: config.flag("sasl-ir"),
        service_name: config.word("service-name").cloned(),
        netrc,
        netrc_file: config.word("netrc-file").cloned(),
        tls: build_tls(config, diagnostics),
        proxy: build_proxy(config, diagnostics),
        timeouts: build_timeouts(config, diagnostics),
        redirects: build_redirects(config, diagnostics),
        connection: build_connection(config),
        fail: config.flag("fail").filter(|f| *f),
        ftp_skip_pasv_ip: config.flag("ftp-skip-pasv-ip"),
        use_ascii: config.flag("use-ascii").filter(|f| *f),
        continue_at: config.word("continue-at").cloned(),
        crlf: config.flag("crlf"),
        clobber: config.flag("clobber"),
        remote_time: config.flag("remote-time"),
        verbose: global.flag("verbose"),
        silent: global.flag("silent"),
    })
}

fn quoted_list(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| format!("{:?}", w.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split `--cert file:password` on the first colon that isn't escaped
fn split_cert(cert: &Word) -> (Word, Option<Word>) {
    if cert.starts_with("pkcs11:") || cert.index_of_first_char(":\\").is_none() {
        return (cert.clone(), None);
    }
    let mut backslashes = 0;
    for (i, c) in cert.chars().enumerate() {
        match c {
            WordChar::Char('\\') => backslashes += 1,
            WordChar::Char(':') if backslashes % 2 == 0 => {
                let password = cert.slice(i + 1..);
                return (cert.slice(..i), password.to_bool().then_some(password));
            }
            _ => backslashes = 0,
        }
    }
    (cert.clone(), None)
}

fn build_tls(config: &OperationConfig, diagnostics: &mut Diagnostics) -> TlsOptions {
    let cert_type = config.word("cert-type").cloned();
    if let Some(literal) = cert_type.as_ref().and_then(|t| t.as_literal()) {
        if !CERT_TYPES.contains(&literal.to_uppercase().as_str()) {
            diagnostics.push(
                "cert-type-unknown",
                format!("not supported file type {:?} for certificate", literal),
            );
        }
    }

    TlsOptions {
        insecure: config.is_true("insecure"),
        cert: config.word("cert").map(split_cert),
        cert_type,
        cert_status: config.flag("cert-status"),
        key: config.word("key").cloned(),
        key_type: config.word("key-type").cloned(),
        pass: config.word("pass").cloned(),
        cacert: config.word("cacert").cloned(),
        ca_native: config.flag("ca-native"),
        capath: config.word("capath").cloned(),
        crlfile: config.word("crlfile").cloned(),
        pinnedpubkey: config.word("pinnedpubkey").cloned(),
        random_file: config.word("random-file").cloned(),
        egd_file: config.word("egd-file").cloned(),
        hsts: config.list("hsts").to_vec(),
        alpn: config.flag("alpn"),
        ciphers: config.word("ciphers").cloned(),
        curves: config.word("curves").cloned(),
        tls_version: config.tls_version,
        tls_max: config.word("tls-max").cloned(),
        tls13_ciphers: config.word("tls13-ciphers").cloned(),
        tlsauthtype: config.word("tlsauthtype").cloned(),
        tlspassword: config.word("tlspassword").cloned(),
        tlsuser: config.word("tlsuser").cloned(),
        ssl_allow_beast: config.flag("ssl-allow-beast"),
        ssl_auto_client_cert: config.flag("ssl-auto-client-cert"),
        ssl_no_revoke: config.flag("ssl-no-revoke"),
        ssl_reqd: config.flag("ssl-reqd"),
        ssl_revoke_best_effort: config.flag("ssl-revoke-best-effort"),
        ssl: config.flag("ssl"),
        sslv2: config.flag("sslv2"),
        sslv3: config.flag("sslv3"),
        doh_url: config.word("doh-url").cloned(),
        doh_insecure: config.flag("doh-insecure"),
        doh_cert_status: config.flag("doh-cert-status"),
    }
}

fn build_proxy(config: &OperationConfig, diagnostics: &mut Diagnostics) -> ProxyOptions {
    let mut proxy = config.word("proxy").cloned();
    let mut proxy_type = None;
    let proxy_auth = config.word("proxy-user").filter(|_| proxy.is_some()).cloned();

    if config.is_true("proxy-http2") {
        proxy_type = Some(ProxyType::Http2);
    }
    // later ones win, like curl's own option handling
    let overrides = [
        ("proxy1.0", ProxyType::Http1),
        ("socks4", ProxyType::Socks4),
        ("socks4a", ProxyType::Socks4a),
        ("socks5", ProxyType::Socks5),
        ("socks5-hostname", ProxyType::Socks5Hostname),
    ];
    for (option, kind) in overrides {
        if let Some(host) = config.word(option) {
            proxy = Some(host.clone());
            proxy_type = Some(kind);
        }
    }

    let proxy_tlsauthtype = config.word("proxy-tlsauthtype").cloned();
    if let Some(literal) = proxy_tlsauthtype.as_ref().and_then(|t| t.as_literal()) {
        if literal != "SRP" {
            diagnostics.push(
                "proxy-tlsauthtype",
                format!("proxy-tlsauthtype is not supported: {}", literal),
            );
        }
    }

    ProxyOptions {
        proxy,
        proxy_type,
        proxy_auth,
        noproxy: config.word("noproxy").cloned(),
        preproxy: config.word("preproxy").cloned(),
        proxytunnel: config.flag("proxytunnel"),
        proxy_anyauth: config.flag("proxy-anyauth"),
        proxy_basic: config.flag("proxy-basic"),
        proxy_digest: config.flag("proxy-digest"),
        proxy_negotiate: config.flag("proxy-negotiate"),
        proxy_ntlm: config.flag("proxy-ntlm"),
        proxy_ca_native: config.flag("proxy-ca-native"),
        proxy_cacert: config.word("proxy-cacert").cloned(),
        proxy_capath: config.word("proxy-capath").cloned(),
        proxy_cert_type: config.word("proxy-cert-type").cloned(),
        proxy_cert: config.word("proxy-cert").cloned(),
        proxy_ciphers: config.word("proxy-ciphers").cloned(),
        proxy_crlfile: config.word("proxy-crlfile").cloned(),
        proxy_insecure: config.flag("proxy-insecure"),
        proxy_key: config.word("proxy-key").cloned(),
        proxy_key_type: config.word("proxy-key-type").cloned(),
        proxy_pass: config.word("proxy-pass").cloned(),
        proxy_pinnedpubkey: config.word("proxy-pinnedpubkey").cloned(),
        proxy_service_name: config.word("proxy-service-name").cloned(),
        proxy_ssl_allow_beast: config.flag("proxy-ssl-allow-beast"),
        proxy_ssl_auto_client_cert: config.flag("proxy-ssl-auto-client-cert"),
        proxy_tls13_ciphers: config.word("proxy-tls13-ciphers").cloned(),
        proxy_tlsauthtype,
        proxy_tlspassword: config.word("proxy-tlspassword").cloned(),
        proxy_tlsuser: config.word("proxy-tlsuser").cloned(),
        proxy_tlsv1: config.flag("proxy-tlsv1"),
        proxy_user: config.word("proxy-user").cloned(),
        socks5_basic: config.flag("socks5-basic"),
        socks5_gssapi: config.flag("socks5-gssapi"),
        socks5_gssapi_nec: config.flag("socks5-gssapi-nec"),
        haproxy_client_ip: config.word("haproxy-clientip").cloned(),
        haproxy_protocol: config.flag("haproxy-protocol"),
    }
}

/// Warn if a numeric option isn't a number. Only literal values can be checked.
fn check_number(
    config: &OperationConfig,
    option: &str,
    re: &Regex,
    code: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Word> {
    let value = config.word(option)?;
    if let Some(literal) = value.as_literal() {
        if !re.is_match(literal) {
            diagnostics.push(
                code,
                format!(
                    "option --{}: expected a proper numerical parameter: {:?}",
                    option, literal
                ),
            );
        }
    }
    Some(value.clone())
}

fn build_timeouts(config: &OperationConfig, diagnostics: &mut Diagnostics) -> TimeoutOptions {
    TimeoutOptions {
        timeout: check_number(config, "max-time", &FLOAT_PREFIX, "max-time-not-number", diagnostics),
        connect_timeout: check_number(
            config,
            "connect-timeout",
            &FLOAT_PREFIX,
            "connect-timeout-not-number",
            diagnostics,
        ),
        expect100_timeout: check_number(
            config,
            "expect100-timeout",
            &FLOAT_PREFIX,
            "expect100-timeout-not-number",
            diagnostics,
        ),
        happy_eyeballs_timeout_ms: config.word("happy-eyeballs-timeout-ms").cloned(),
        speed_limit: config.word("speed-limit").cloned(),
        speed_time: config.word("speed-time").cloned(),
        limit_rate: config.word("limit-rate").cloned(),
        max_filesize: config.word("max-filesize").cloned(),
        keep_alive: config.flag("keepalive"),
        keep_alive_time: config.word("keepalive-time").cloned(),
        retry: config.word("retry").cloned(),
    }
}

fn build_redirects(config: &OperationConfig, diagnostics: &mut Diagnostics) -> RedirectOptions {
    let max_redirects = check_number(config, "max-redirs", &INTEGER, "max-redirs-not-int", diagnostics)
        .map(|m| m.trim());
    RedirectOptions {
        follow: config.flag("location"),
        trusted: config.flag("location-trusted").filter(|t| *t),
        max_redirects,
        post301: config.flag("post301"),
        post302: config.flag("post302"),
        post303: config.flag("post303"),
    }
}

fn build_connection(config: &OperationConfig) -> ConnectionOptions {
    let http_version = config.http_version;
    let local_port = config.word("local-port").map(|port| match port.split_once("-") {
        Some((start, end)) if end.to_bool() => (start, Some(end)),
        _ => (port.clone(), None),
    });

    ConnectionOptions {
        http_version,
        http0_9: config.flag("http0.9"),
        http2: matches!(http_version, Some(HttpVersion::V2 | HttpVersion::V2PriorKnowledge)),
        http3: matches!(http_version, Some(HttpVersion::V3 | HttpVersion::V3Only)),
        ipv4: config.flag("ipv4"),
        ipv6: config.flag("ipv6"),
        interface: config.word("interface").cloned(),
        local_port,
        tcp_fastopen: config.flag("tcp-fastopen").filter(|f| *f),
        resolve: config.list("resolve").to_vec(),
        connect_to: config.list("connect-to").to_vec(),
        unix_socket: config.word("unix-socket").cloned(),
        abstract_unix_socket: config.word("abstract-unix-socket").cloned(),
        alt_svc: config.word("alt-svc").cloned(),
        proto: config.word("proto").cloned(),
        proto_redir: config.word("proto-redir").cloned(),
        proto_default: config.word("proto-default").cloned(),
        ignore_content_length: config.flag("ignore-content-length"),
        compressed: config.flag("compressed"),
        transfer_encoding: config.flag("tr-encoding"),
    }
}
