//! curl's command line option table
//!
//! Long options map to a canonical name. Negations (`--no-foo`) and
//! deprecated spellings share the canonical name of the option they affect.
//! Options curl deleted are kept with the version they were removed in.

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// A flag, possibly negated
    Bool,
    /// Takes a value, the last one wins
    String,
    /// Takes a value, every occurrence is kept
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongOption {
    /// The spelling accepted on the command line, without `--`
    pub long: &'static str,
    pub kind: OptionKind,
    /// Canonical name the value is stored under
    pub name: &'static str,
    /// Whether unambiguous prefixes of `long` are accepted
    pub expand: bool,
    /// curl version that removed the option
    pub removed: Option<&'static str>,
}

impl LongOption {
    const fn new(long: &'static str, kind: OptionKind) -> Self {
        LongOption {
            long,
            kind,
            name: long,
            expand: true,
            removed: None,
        }
    }

    pub const fn bool(long: &'static str) -> Self {
        Self::new(long, OptionKind::Bool)
    }

    pub const fn string(long: &'static str) -> Self {
        Self::new(long, OptionKind::String)
    }

    pub const fn list(long: &'static str) -> Self {
        Self::new(long, OptionKind::List)
    }

    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub const fn no_expand(mut self) -> Self {
        self.expand = false;
        self
    }

    pub const fn removed(mut self, version: &'static str) -> Self {
        self.removed = Some(version);
        self
    }

    pub fn takes_value(&self) -> bool {
        self.kind != OptionKind::Bool
    }
}

pub const LONG_OPTIONS: &[LongOption] = &[
    LongOption::list("url"),
    LongOption::string("dns-ipv4-addr"),
    LongOption::string("dns-ipv6-addr"),
    LongOption::string("random-file"),
    LongOption::string("egd-file"),
    LongOption::string("oauth2-bearer"),
    LongOption::string("connect-timeout"),
    LongOption::string("doh-url"),
    LongOption::string("ciphers"),
    LongOption::string("dns-interface"),
    LongOption::bool("disable-epsv"),
    LongOption::bool("no-disable-epsv").named("disable-epsv").no_expand(),
    LongOption::bool("disallow-username-in-url"),
    LongOption::bool("no-disallow-username-in-url").named("disallow-username-in-url").no_expand(),
    LongOption::bool("epsv"),
    LongOption::bool("no-epsv").named("epsv").no_expand(),
    LongOption::string("dns-servers"),
    LongOption::string("trace"),
    LongOption::bool("npn"),
    LongOption::bool("no-npn").named("npn").no_expand(),
    LongOption::string("trace-ascii"),
    LongOption::bool("alpn"),
    LongOption::bool("no-alpn").named("alpn").no_expand(),
    LongOption::string("limit-rate"),
    LongOption::string("rate"),
    LongOption::bool("compressed"),
    LongOption::bool("no-compressed").named("compressed").no_expand(),
    LongOption::bool("tr-encoding"),
    LongOption::bool("no-tr-encoding").named("tr-encoding").no_expand(),
    LongOption::bool("digest"),
    LongOption::bool("no-digest").named("digest").no_expand(),
    LongOption::bool("negotiate"),
    LongOption::bool("no-negotiate").named("negotiate").no_expand(),
    LongOption::bool("ntlm"),
    LongOption::bool("no-ntlm").named("ntlm").no_expand(),
    LongOption::bool("ntlm-wb"),
    LongOption::bool("no-ntlm-wb").named("ntlm-wb").no_expand(),
    LongOption::bool("basic"),
    LongOption::bool("no-basic").named("basic").no_expand(),
    LongOption::bool("anyauth"),
    LongOption::bool("no-anyauth").named("anyauth").no_expand(),
    LongOption::bool("wdebug"),
    LongOption::bool("no-wdebug").named("wdebug").no_expand(),
    LongOption::bool("ftp-create-dirs"),
    LongOption::bool("no-ftp-create-dirs").named("ftp-create-dirs").no_expand(),
    LongOption::bool("create-dirs"),
    LongOption::bool("no-create-dirs").named("create-dirs").no_expand(),
    LongOption::string("create-file-mode"),
    LongOption::string("max-redirs"),
    LongOption::bool("proxy-ntlm"),
    LongOption::bool("no-proxy-ntlm").named("proxy-ntlm").no_expand(),
    LongOption::bool("crlf"),
    LongOption::bool("no-crlf").named("crlf").no_expand(),
    LongOption::string("stderr"),
    LongOption::string("aws-sigv4"),
    LongOption::string("interface"),
    LongOption::string("krb"),
    LongOption::string("krb4").named("krb"),
    LongOption::bool("haproxy-protocol"),
    LongOption::bool("no-haproxy-protocol").named("haproxy-protocol").no_expand(),
    LongOption::string("haproxy-clientip"),
    LongOption::string("max-filesize"),
    LongOption::bool("disable-eprt"),
    LongOption::bool("no-disable-eprt").named("disable-eprt").no_expand(),
    LongOption::bool("eprt"),
    LongOption::bool("no-eprt").named("eprt").no_expand(),
    LongOption::bool("xattr"),
    LongOption::bool("no-xattr").named("xattr").no_expand(),
    LongOption::bool("ftp-ssl").named("ssl"),
    LongOption::bool("no-ftp-ssl").named("ssl").no_expand(),
    LongOption::bool("ssl"),
    LongOption::bool("no-ssl").named("ssl").no_expand(),
    LongOption::bool("ftp-pasv"),
    LongOption::bool("no-ftp-pasv").named("ftp-pasv").no_expand(),
    LongOption::string("socks5"),
    LongOption::bool("tcp-nodelay"),
    LongOption::bool("no-tcp-nodelay").named("tcp-nodelay").no_expand(),
    LongOption::bool("proxy-digest"),
    LongOption::bool("no-proxy-digest").named("proxy-digest").no_expand(),
    LongOption::bool("proxy-basic"),
    LongOption::bool("no-proxy-basic").named("proxy-basic").no_expand(),
    LongOption::string("retry"),
    LongOption::bool("retry-connrefused"),
    LongOption::bool("no-retry-connrefused").named("retry-connrefused").no_expand(),
    LongOption::string("retry-delay"),
    LongOption::string("retry-max-time"),
    LongOption::bool("proxy-negotiate"),
    LongOption::bool("no-proxy-negotiate").named("proxy-negotiate").no_expand(),
    LongOption::bool("form-escape"),
    LongOption::bool("no-form-escape").named("form-escape").no_expand(),
    LongOption::string("ftp-account"),
    LongOption::bool("proxy-anyauth"),
    LongOption::bool("no-proxy-anyauth").named("proxy-anyauth").no_expand(),
    LongOption::bool("trace-time"),
    LongOption::bool("no-trace-time").named("trace-time").no_expand(),
    LongOption::bool("ignore-content-length"),
    LongOption::bool("no-ignore-content-length").named("ignore-content-length").no_expand(),
    LongOption::bool("ftp-skip-pasv-ip"),
    LongOption::bool("no-ftp-skip-pasv-ip").named("ftp-skip-pasv-ip").no_expand(),
    LongOption::string("ftp-method"),
    LongOption::string("local-port"),
    LongOption::string("socks4"),
    LongOption::string("socks4a"),
    LongOption::string("ftp-alternative-to-user"),
    LongOption::bool("ftp-ssl-reqd").named("ssl-reqd"),
    LongOption::bool("no-ftp-ssl-reqd").named("ssl-reqd").no_expand(),
    LongOption::bool("ssl-reqd"),
    LongOption::bool("no-ssl-reqd").named("ssl-reqd").no_expand(),
    LongOption::bool("sessionid"),
    LongOption::bool("no-sessionid").named("sessionid").no_expand(),
    LongOption::bool("ftp-ssl-control"),
    LongOption::bool("no-ftp-ssl-control").named("ftp-ssl-control").no_expand(),
    LongOption::bool("ftp-ssl-ccc"),
    LongOption::bool("no-ftp-ssl-ccc").named("ftp-ssl-ccc").no_expand(),
    LongOption::string("ftp-ssl-ccc-mode"),
    LongOption::string("libcurl"),
    LongOption::bool("raw"),
    LongOption::bool("no-raw").named("raw").no_expand(),
    LongOption::bool("post301"),
    LongOption::bool("no-post301").named("post301").no_expand(),
    LongOption::bool("keepalive"),
    LongOption::bool("no-keepalive").named("keepalive").no_expand(),
    LongOption::string("socks5-hostname"),
    LongOption::string("keepalive-time"),
    LongOption::bool("post302"),
    LongOption::bool("no-post302").named("post302").no_expand(),
    LongOption::string("noproxy"),
    LongOption::bool("socks5-gssapi-nec"),
    LongOption::bool("no-socks5-gssapi-nec").named("socks5-gssapi-nec").no_expand(),
    LongOption::string("proxy1.0"),
    LongOption::string("tftp-blksize"),
    LongOption::string("mail-from"),
    LongOption::list("mail-rcpt"),
    LongOption::bool("ftp-pret"),
    LongOption::bool("no-ftp-pret").named("ftp-pret").no_expand(),
    LongOption::string("proto"),
    LongOption::string("proto-redir"),
    LongOption::list("resolve"),
    LongOption::string("delegation"),
    LongOption::string("mail-auth"),
    LongOption::bool("post303"),
    LongOption::bool("no-post303").named("post303").no_expand(),
    LongOption::bool("metalink"),
    LongOption::bool("no-metalink").named("metalink").no_expand(),
    LongOption::string("sasl-authzid"),
    LongOption::bool("sasl-ir"),
    LongOption::bool("no-sasl-ir").named("sasl-ir").no_expand(),
    LongOption::bool("test-event"),
    LongOption::bool("no-test-event").named("test-event").no_expand(),
    LongOption::string("unix-socket"),
    LongOption::bool("path-as-is"),
    LongOption::bool("no-path-as-is").named("path-as-is").no_expand(),
    LongOption::string("socks5-gssapi-service").named("proxy-service-name"),
    LongOption::string("proxy-service-name"),
    LongOption::string("service-name"),
    LongOption::string("proto-default"),
    LongOption::string("expect100-timeout"),
    LongOption::bool("tftp-no-options"),
    LongOption::bool("no-tftp-no-options").named("tftp-no-options").no_expand(),
    LongOption::list("connect-to"),
    LongOption::string("abstract-unix-socket"),
    LongOption::string("tls-max"),
    LongOption::bool("suppress-connect-headers"),
    LongOption::bool("no-suppress-connect-headers").named("suppress-connect-headers").no_expand(),
    LongOption::bool("compressed-ssh"),
    LongOption::bool("no-compressed-ssh").named("compressed-ssh").no_expand(),
    LongOption::string("happy-eyeballs-timeout-ms"),
    LongOption::bool("retry-all-errors"),
    LongOption::bool("no-retry-all-errors").named("retry-all-errors").no_expand(),
    LongOption::bool("trace-ids"),
    LongOption::bool("no-trace-ids").named("trace-ids").no_expand(),
    LongOption::bool("http1.0"),
    LongOption::bool("http1.1"),
    LongOption::bool("http2"),
    LongOption::bool("http2-prior-knowledge"),
    LongOption::bool("http3"),
    LongOption::bool("http3-only"),
    LongOption::bool("http0.9"),
    LongOption::bool("no-http0.9").named("http0.9").no_expand(),
    LongOption::bool("proxy-http2"),
    LongOption::bool("no-proxy-http2").named("proxy-http2").no_expand(),
    LongOption::bool("tlsv1"),
    LongOption::bool("tlsv1.0"),
    LongOption::bool("tlsv1.1"),
    LongOption::bool("tlsv1.2"),
    LongOption::bool("tlsv1.3"),
    LongOption::string("tls13-ciphers"),
    LongOption::string("proxy-tls13-ciphers"),
    LongOption::bool("sslv2"),
    LongOption::bool("sslv3"),
    LongOption::bool("ipv4"),
    LongOption::bool("ipv6"),
    LongOption::bool("append"),
    LongOption::bool("no-append").named("append").no_expand(),
    LongOption::string("user-agent"),
    LongOption::list("cookie"),
    LongOption::string("alt-svc"),
    LongOption::list("hsts"),
    LongOption::bool("use-ascii"),
    LongOption::bool("no-use-ascii").named("use-ascii").no_expand(),
    LongOption::string("cookie-jar"),
    LongOption::string("continue-at"),
    LongOption::list("data"),
    LongOption::string("data-raw"),
    LongOption::string("data-ascii"),
    LongOption::string("data-binary"),
    LongOption::string("data-urlencode"),
    LongOption::string("json"),
    LongOption::list("url-query"),
    LongOption::string("dump-header"),
    LongOption::string("referer"),
    LongOption::string("cert"),
    LongOption::string("cacert"),
    LongOption::string("cert-type"),
    LongOption::string("key"),
    LongOption::string("key-type"),
    LongOption::string("pass"),
    LongOption::string("engine"),
    LongOption::bool("ca-native"),
    LongOption::bool("no-ca-native").named("ca-native").no_expand(),
    LongOption::bool("proxy-ca-native"),
    LongOption::bool("no-proxy-ca-native").named("proxy-ca-native").no_expand(),
    LongOption::string("capath"),
    LongOption::string("pubkey"),
    LongOption::string("hostpubmd5"),
    LongOption::string("hostpubsha256"),
    LongOption::string("crlfile"),
    LongOption::string("tlsuser"),
    LongOption::string("tlspassword"),
    LongOption::string("tlsauthtype"),
    LongOption::bool("ssl-allow-beast"),
    LongOption::bool("no-ssl-allow-beast").named("ssl-allow-beast").no_expand(),
    LongOption::bool("ssl-auto-client-cert"),
    LongOption::bool("no-ssl-auto-client-cert").named("ssl-auto-client-cert").no_expand(),
    LongOption::bool("proxy-ssl-auto-client-cert"),
    LongOption::bool("no-proxy-ssl-auto-client-cert").named("proxy-ssl-auto-client-cert").no_expand(),
    LongOption::string("pinnedpubkey"),
    LongOption::string("proxy-pinnedpubkey"),
    LongOption::bool("cert-status"),
    LongOption::bool("no-cert-status").named("cert-status").no_expand(),
    LongOption::bool("doh-cert-status"),
    LongOption::bool("no-doh-cert-status").named("doh-cert-status").no_expand(),
    LongOption::bool("false-start"),
    LongOption::bool("no-false-start").named("false-start").no_expand(),
    LongOption::bool("ssl-no-revoke"),
    LongOption::bool("no-ssl-no-revoke").named("ssl-no-revoke").no_expand(),
    LongOption::bool("ssl-revoke-best-effort"),
    LongOption::bool("no-ssl-revoke-best-effort").named("ssl-revoke-best-effort").no_expand(),
    LongOption::bool("tcp-fastopen"),
    LongOption::bool("no-tcp-fastopen").named("tcp-fastopen").no_expand(),
    LongOption::string("proxy-tlsuser"),
    LongOption::string("proxy-tlspassword"),
    LongOption::string("proxy-tlsauthtype"),
    LongOption::string("proxy-cert"),
    LongOption::string("proxy-cert-type"),
    LongOption::string("proxy-key"),
    LongOption::string("proxy-key-type"),
    LongOption::string("proxy-pass"),
    LongOption::string("proxy-ciphers"),
    LongOption::string("proxy-crlfile"),
    LongOption::bool("proxy-ssl-allow-beast"),
    LongOption::bool("no-proxy-ssl-allow-beast").named("proxy-ssl-allow-beast").no_expand(),
    LongOption::string("login-options"),
    LongOption::string("proxy-cacert"),
    LongOption::string("proxy-capath"),
    LongOption::bool("proxy-insecure"),
    LongOption::bool("no-proxy-insecure").named("proxy-insecure").no_expand(),
    LongOption::bool("proxy-tlsv1"),
    LongOption::bool("socks5-basic"),
    LongOption::bool("no-socks5-basic").named("socks5-basic").no_expand(),
    LongOption::bool("socks5-gssapi"),
    LongOption::bool("no-socks5-gssapi").named("socks5-gssapi").no_expand(),
    LongOption::string("etag-save"),
    LongOption::string("etag-compare"),
    LongOption::string("curves"),
    LongOption::bool("fail"),
    LongOption::bool("no-fail").named("fail").no_expand(),
    LongOption::bool("fail-early"),
    LongOption::bool("no-fail-early").named("fail-early").no_expand(),
    LongOption::bool("styled-output"),
    LongOption::bool("no-styled-output").named("styled-output").no_expand(),
    LongOption::bool("mail-rcpt-allowfails"),
    LongOption::bool("no-mail-rcpt-allowfails").named("mail-rcpt-allowfails").no_expand(),
    LongOption::bool("fail-with-body"),
    LongOption::bool("no-fail-with-body").named("fail-with-body").no_expand(),
    LongOption::bool("remove-on-error"),
    LongOption::bool("no-remove-on-error").named("remove-on-error").no_expand(),
    LongOption::list("form"),
    LongOption::string("form-string"),
    LongOption::bool("globoff"),
    LongOption::bool("no-globoff").named("globoff").no_expand(),
    LongOption::bool("get"),
    LongOption::bool("no-get").named("get").no_expand(),
    LongOption::string("request-target"),
    LongOption::bool("help"),
    LongOption::bool("no-help").named("help").no_expand(),
    LongOption::list("header"),
    LongOption::list("proxy-header"),
    LongOption::bool("include"),
    LongOption::bool("no-include").named("include").no_expand(),
    LongOption::bool("head"),
    LongOption::bool("no-head").named("head").no_expand(),
    LongOption::bool("junk-session-cookies"),
    LongOption::bool("no-junk-session-cookies").named("junk-session-cookies").no_expand(),
    LongOption::bool("remote-header-name"),
    LongOption::bool("no-remote-header-name").named("remote-header-name").no_expand(),
    LongOption::bool("insecure"),
    LongOption::bool("no-insecure").named("insecure").no_expand(),
    LongOption::bool("doh-insecure"),
    LongOption::bool("no-doh-insecure").named("doh-insecure").no_expand(),
    LongOption::string("config"),
    LongOption::bool("list-only"),
    LongOption::bool("no-list-only").named("list-only").no_expand(),
    LongOption::bool("location"),
    LongOption::bool("no-location").named("location").no_expand(),
    LongOption::bool("location-trusted"),
    LongOption::bool("no-location-trusted").named("location-trusted").no_expand(),
    LongOption::string("max-time"),
    LongOption::bool("manual"),
    LongOption::bool("no-manual").named("manual").no_expand(),
    LongOption::bool("netrc"),
    LongOption::bool("no-netrc").named("netrc").no_expand(),
    LongOption::bool("netrc-optional"),
    LongOption::bool("no-netrc-optional").named("netrc-optional").no_expand(),
    LongOption::string("netrc-file"),
    LongOption::bool("buffer"),
    LongOption::bool("no-buffer").named("buffer").no_expand(),
    LongOption::list("output"),
    LongOption::bool("remote-name"),
    LongOption::bool("no-remote-name").named("remote-name").no_expand(),
    LongOption::bool("remote-name-all"),
    LongOption::bool("no-remote-name-all").named("remote-name-all").no_expand(),
    LongOption::string("output-dir"),
    LongOption::bool("clobber"),
    LongOption::bool("no-clobber").named("clobber").no_expand(),
    LongOption::bool("proxytunnel"),
    LongOption::bool("no-proxytunnel").named("proxytunnel").no_expand(),
    LongOption::string("ftp-port"),
    LongOption::bool("disable"),
    LongOption::bool("no-disable").named("disable").no_expand(),
    LongOption::list("quote"),
    LongOption::string("range"),
    LongOption::bool("remote-time"),
    LongOption::bool("no-remote-time").named("remote-time").no_expand(),
    LongOption::bool("silent"),
    LongOption::bool("no-silent").named("silent").no_expand(),
    LongOption::bool("show-error"),
    LongOption::bool("no-show-error").named("show-error").no_expand(),
    LongOption::list("telnet-option"),
    LongOption::list("upload-file"),
    LongOption::string("user"),
    LongOption::string("proxy-user"),
    LongOption::bool("verbose"),
    LongOption::bool("no-verbose").named("verbose").no_expand(),
    LongOption::bool("version"),
    LongOption::bool("no-version").named("version").no_expand(),
    LongOption::string("write-out"),
    LongOption::string("proxy"),
    LongOption::string("preproxy"),
    LongOption::string("request"),
    LongOption::string("speed-limit"),
    LongOption::string("speed-time"),
    LongOption::string("time-cond"),
    LongOption::bool("parallel"),
    LongOption::bool("no-parallel").named("parallel").no_expand(),
    LongOption::string("parallel-max"),
    LongOption::bool("parallel-immediate"),
    LongOption::bool("no-parallel-immediate").named("parallel-immediate").no_expand(),
    LongOption::bool("progress-bar"),
    LongOption::bool("no-progress-bar").named("progress-bar").no_expand(),
    LongOption::bool("progress-meter"),
    LongOption::bool("no-progress-meter").named("progress-meter").no_expand(),
    LongOption::bool("next"),
    LongOption::string("port").removed("7.3"),
    LongOption::bool("ftp-ascii").named("use-ascii").removed("7.10.7"),
    LongOption::string("3p-url").removed("7.16.0"),
    LongOption::string("3p-user").removed("7.16.0"),
    LongOption::string("3p-quote").removed("7.16.0"),
    LongOption::bool("http2.0").named("http2").removed("7.36.0"),
    LongOption::bool("no-http2.0").named("http2").removed("7.36.0"),
    LongOption::list("telnet-options").named("telnet-option").removed("7.49.0"),
    LongOption::string("http-request").named("request").removed("7.49.0"),
    LongOption::string("capath ").named("capath").removed("7.49.0"),
    LongOption::string("ftpport").named("ftp-port").removed("7.49.0"),
    LongOption::bool("environment").removed("7.54.1"),
    LongOption::bool("no-tlsv1").named("tlsv1").removed("7.54.1"),
    LongOption::bool("no-tlsv1.2").named("tlsv1.2").removed("7.54.1"),
    LongOption::bool("no-http2-prior-knowledge").named("http2-prior-knowledge").removed("7.54.1"),
    LongOption::bool("no-ipv6").named("ipv6").removed("7.54.1"),
    LongOption::bool("no-ipv4").named("ipv4").removed("7.54.1"),
    LongOption::bool("no-sslv2").named("sslv2").removed("7.54.1"),
    LongOption::bool("no-tlsv1.0").named("tlsv1.0").removed("7.54.1"),
    LongOption::bool("no-tlsv1.1").named("tlsv1.1").removed("7.54.1"),
    LongOption::bool("no-sslv3").named("sslv3").removed("7.54.1"),
    LongOption::bool("no-http1.0").named("http1.0").removed("7.54.1"),
    LongOption::bool("no-next").named("next").removed("7.54.1"),
    LongOption::bool("no-tlsv1.3").named("tlsv1.3").removed("7.54.1"),
    LongOption::bool("no-environment").named("environment").removed("7.54.1"),
    LongOption::bool("no-http1.1").named("http1.1").removed("7.54.1"),
    LongOption::bool("no-proxy-tlsv1").named("proxy-tlsv1").removed("7.54.1"),
    LongOption::bool("no-http2").named("http2").removed("7.54.1"),
];

/// Short option letters and the long option they stand for
pub const SHORT_OPTIONS: &[(char, &str)] = &[
    ('0', "http1.0"),
    ('1', "tlsv1"),
    ('2', "sslv2"),
    ('3', "sslv3"),
    ('4', "ipv4"),
    ('6', "ipv6"),
    ('a', "append"),
    ('A', "user-agent"),
    ('b', "cookie"),
    ('B', "use-ascii"),
    ('c', "cookie-jar"),
    ('C', "continue-at"),
    ('d', "data"),
    ('D', "dump-header"),
    ('e', "referer"),
    ('E', "cert"),
    ('f', "fail"),
    ('F', "form"),
    ('g', "globoff"),
    ('G', "get"),
    ('h', "help"),
    ('H', "header"),
    ('i', "include"),
    ('I', "head"),
    ('j', "junk-session-cookies"),
    ('J', "remote-header-name"),
    ('k', "insecure"),
    ('K', "config"),
    ('l', "list-only"),
    ('L', "location"),
    ('m', "max-time"),
    ('M', "manual"),
    ('n', "netrc"),
    ('N', "no-buffer"),
    ('o', "output"),
    ('O', "remote-name"),
    ('p', "proxytunnel"),
    ('P', "ftp-port"),
    ('q', "disable"),
    ('Q', "quote"),
    ('r', "range"),
    ('R', "remote-time"),
    ('s', "silent"),
    ('S', "show-error"),
    ('t', "telnet-option"),
    ('T', "upload-file"),
    ('u', "user"),
    ('U', "proxy-user"),
    ('v', "verbose"),
    ('V', "version"),
    ('w', "write-out"),
    ('x', "proxy"),
    ('X', "request"),
    ('Y', "speed-limit"),
    ('y', "speed-time"),
    ('z', "time-cond"),
    ('Z', "parallel"),
    ('#', "progress-bar"),
    (':', "next"),
];

/// Short options whose meaning changed or that no longer exist
pub const CHANGED_SHORT_OPTIONS: &[(char, &str)] = &[
    ('p', "used to be short for --port <port> (a since-deleted flag) until curl 7.3"),
    ('t', "used to be short for --upload (a since-deleted boolean flag) until curl 7.7"),
    ('c', "used to be short for --continue (a since-deleted boolean flag) until curl 7.9"),
    ('@', "used to be short for --create-dirs until curl 7.10.7"),
    ('Z', "used to be short for --max-redirs <num> until curl 7.10.7"),
    ('9', "used to be short for --crlf until curl 7.10.8"),
    ('8', "used to be short for --stderr <file> until curl 7.10.8"),
    ('7', "used to be short for --interface <name> until curl 7.10.8"),
    ('6', "used to be short for --krb <level> (which itself used to be --krb4 <level>) until curl 7.10.8"),
    ('5', "used to be another way to specify the url until curl 7.10.8"),
    ('*', "used to be another way to specify the url until curl 7.49.0"),
    ('~', "used to be short for --xattr until curl 7.49.0"),
];

/// Options every converter handles, either directly or because they only
/// affect parsing.
pub const COMMON_SUPPORTED_ARGS: &[&str] = &[
    "url",
    "proto-default",
    "globoff",
    "disallow-username-in-url",
    "request",
    "get",
    "head",
    "no-head",
    "header",
    "user-agent",
    "referer",
    "range",
    "time-cond",
    "cookie",
    "oauth2-bearer",
    "user",
    "basic",
    "no-basic",
    "data",
    "data-raw",
    "data-ascii",
    "data-binary",
    "data-urlencode",
    "json",
    "url-query",
];

static LONG_INDEX: Lazy<HashMap<&'static str, &'static LongOption>> =
    Lazy::new(|| LONG_OPTIONS.iter().map(|opt| (opt.long, opt)).collect());

/// Every unambiguous prefix of an expandable option. `None` marks a prefix
/// shared by more than one option.
static SHORTENED: Lazy<HashMap<String, Option<&'static LongOption>>> = Lazy::new(|| {
    let mut shortened: HashMap<String, Option<&'static LongOption>> = HashMap::new();
    for opt in LONG_OPTIONS.iter().filter(|o| o.expand && o.removed.is_none()) {
        for (end, _) in opt.long.char_indices().skip(1) {
            let prefix = &opt.long[..end];
            if LONG_INDEX.contains_key(prefix) {
                continue;
            }
            shortened
                .entry(prefix.to_string())
                .and_modify(|found| *found = None)
                .or_insert(Some(opt));
        }
    }
    shortened
});

static SHORT_INDEX: Lazy<HashMap<char, &'static LongOption>> = Lazy::new(|| {
    SHORT_OPTIONS
        .iter()
        .filter_map(|(c, long)| LONG_INDEX.get(long).map(|opt| (*c, *opt)))
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(&'static LongOption),
    Ambiguous,
    Unknown,
}

/// Look up a long option written without its leading `--`
pub fn lookup_long(name: &str) -> Lookup {
    match SHORTENED.get(name) {
        Some(Some(opt)) => Lookup::Found(opt),
        Some(None) => Lookup::Ambiguous,
        None => LONG_INDEX
            .get(name)
            .map_or(Lookup::Unknown, |opt| Lookup::Found(opt)),
    }
}

/// The long option a short option letter stands for
pub fn lookup_short(c: char) -> Option<&'static LongOption> {
    SHORT_INDEX.get(&c).copied()
}

/// Explanation for a short option curl used to accept
pub fn changed_short_option(c: char) -> Option<&'static str> {
    CHANGED_SHORT_OPTIONS
        .iter()
        .find(|(short, _)| *short == c)
        .map(|(_, message)| *message)
}

/// The value a boolean option is set to, given how it was spelled
pub fn to_boolean(opt: &str) -> bool {
    if opt.starts_with("no-disable-") {
        return true;
    }
    !(opt.starts_with("disable-") || opt.starts_with("no-"))
}
