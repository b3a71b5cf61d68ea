//! Authentication method enumeration.
//!
//! Methods are a fixed enumeration selected by configuration at startup;
//! adding a method means adding a variant, not runtime discovery.

use serde::{Deserialize, Serialize};

/// An authentication method supported by the backend chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    /// Email + password against the stored hash.
    Password,
    /// Unconditional bypass for test environments, gated by a caller flag.
    Dummy,
    /// Directory bind against an external LDAP server.
    Ldap,
    /// Identity asserted by a trusted upstream (reverse proxy header).
    RemoteHeader,
    /// Development-mode bypass, gated by the dev-mode toggle.
    DevBypass,
    /// OAuth2 identity federation (external provider).
    OAuth2,
}

impl AuthMethod {
    /// All methods, in registration order.
    pub const ALL: [Self; 6] = [
        Self::Password,
        Self::Dummy,
        Self::Ldap,
        Self::RemoteHeader,
        Self::DevBypass,
        Self::OAuth2,
    ];

    /// The identifier exposed on the `get_auth_backends` surface, if this
    /// method is part of that contract.
    #[must_use]
    pub const fn wire_id(self) -> Option<&'static str> {
        match self {
            Self::Password => Some("password"),
            Self::OAuth2 => Some("google"),
            Self::DevBypass => Some("dev"),
            Self::Dummy | Self::Ldap | Self::RemoteHeader => None,
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Password => "password",
            Self::Dummy => "dummy",
            Self::Ldap => "ldap",
            Self::RemoteHeader => "remote-header",
            Self::DevBypass => "dev",
            Self::OAuth2 => "oauth2",
        };
        write!(f, "{name}")
    }
}
