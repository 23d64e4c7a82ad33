//! Authentication scheme selection
//!
//! curl accumulates the schemes enabled by `--basic`, `--digest`, ... into a
//! bit mask and picks the one it would try first.

use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Schemes enabled for server or proxy authentication
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AuthMask: u32 {
        const BASIC     = 1 << 0;
        const DIGEST    = 1 << 1;
        const NEGOTIATE = 1 << 2;
        const NTLM      = 1 << 3;
        const DIGEST_IE = 1 << 4;
        const NTLM_WB   = 1 << 5;
        const BEARER    = 1 << 6;
        const AWS_SIGV4 = 1 << 7;

        /// `--anyauth`
        const ANY = Self::BASIC.bits()
                  | Self::DIGEST.bits()
                  | Self::NEGOTIATE.bits()
                  | Self::NTLM.bits()
                  | Self::NTLM_WB.bits()
                  | Self::BEARER.bits()
                  | Self::AWS_SIGV4.bits();
    }
}

impl Default for AuthMask {
    fn default() -> Self {
        AuthMask::BASIC
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    None,
    Basic,
    Digest,
    Ntlm,
    NtlmWb,
    Negotiate,
    Bearer,
    AwsSigv4,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::None => "none",
            AuthType::Basic => "basic",
            AuthType::Digest => "digest",
            AuthType::Ntlm => "ntlm",
            AuthType::NtlmWb => "ntlm-wb",
            AuthType::Negotiate => "negotiate",
            AuthType::Bearer => "bearer",
            AuthType::AwsSigv4 => "aws-sigv4",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order curl tries schemes in when several are enabled
const PREFERENCE: &[(AuthMask, AuthType)] = &[
    (AuthMask::NEGOTIATE, AuthType::Negotiate),
    (AuthMask::BEARER, AuthType::Bearer),
    (AuthMask::DIGEST, AuthType::Digest),
    (AuthMask::NTLM, AuthType::Ntlm),
    (AuthMask::NTLM_WB, AuthType::NtlmWb),
    (AuthMask::BASIC, AuthType::Basic),
    (AuthMask::AWS_SIGV4, AuthType::AwsSigv4),
];

/// The single scheme a request will use
pub fn pick_auth(mask: AuthMask) -> AuthType {
    // without a server challenge there is nothing to negotiate with
    if mask == AuthMask::ANY {
        return AuthType::Basic;
    }
    PREFERENCE
        .iter()
        .find(|(bit, _)| mask.contains(*bit))
        .map_or(AuthType::None, |(_, auth)| *auth)
}
