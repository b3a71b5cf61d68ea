//! Response envelopes and the boundary error mapping.
//!
//! Every success envelope carries `result: "success"` and an empty
//! `msg`; errors carry `result: "error"` and one stable message per
//! failure kind. The underlying [`AuthError`] stays attached so audit
//! code can distinguish lifecycle denials from credential denials even
//! though several kinds share an external message style.

use quill_auth::AuthError;
use serde::Serialize;

const SUCCESS: &str = "success";

/// Envelope for `fetch_api_key`.
#[derive(Debug, Serialize)]
pub struct FetchApiKeyResponse {
    /// Always `"success"`.
    pub result: &'static str,
    /// Always empty on success.
    pub msg: &'static str,
    /// The issued API credential.
    pub api_key: String,
}

impl FetchApiKeyResponse {
    pub(crate) fn new(api_key: String) -> Self {
        Self {
            result: SUCCESS,
            msg: "",
            api_key,
        }
    }
}

/// Envelope for `dev_fetch_api_key`.
#[derive(Debug, Serialize)]
pub struct DevFetchApiKeyResponse {
    /// Always `"success"`.
    pub result: &'static str,
    /// Always empty on success.
    pub msg: &'static str,
    /// Canonical email of the resolved account.
    pub email: String,
    /// The issued API credential.
    pub api_key: String,
}

impl DevFetchApiKeyResponse {
    pub(crate) fn new(email: String, api_key: String) -> Self {
        Self {
            result: SUCCESS,
            msg: "",
            email,
            api_key,
        }
    }
}

/// Envelope for `dev_get_emails`.
#[derive(Debug, Serialize)]
pub struct DevEmailsResponse {
    /// Always `"success"`.
    pub result: &'static str,
    /// Always empty on success.
    pub msg: &'static str,
    /// Emails of realm administrators.
    pub direct_admins: Vec<String>,
    /// Emails of regular users.
    pub direct_users: Vec<String>,
}

/// Envelope for `get_auth_backends`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct AuthBackendsResponse {
    /// Always `"success"`.
    pub result: &'static str,
    /// Always empty on success.
    pub msg: &'static str,
    /// Whether password authentication is registered.
    pub password: bool,
    /// Whether OAuth2 identity federation is registered.
    pub google: bool,
    /// Whether the dev bypass is registered.
    pub dev: bool,
}

/// Boundary error: one stable message/status pair per failure kind,
/// with the typed kind retained for audit.
#[derive(Debug, thiserror::Error)]
#[error("{msg}")]
pub struct ApiError {
    /// Stable user-visible message.
    pub msg: &'static str,
    /// HTTP status the external web tier should use.
    pub status: u16,
    /// The underlying failure kind.
    #[source]
    pub kind: AuthError,
}

impl ApiError {
    /// Serializable error envelope.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            result: "error",
            msg: self.msg,
        }
    }
}

/// The `result`/`msg` error body.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// Always `"error"`.
    pub result: &'static str,
    /// Stable message for the failure kind.
    pub msg: &'static str,
}

impl From<AuthError> for ApiError {
    fn from(kind: AuthError) -> Self {
        let (msg, status) = match &kind {
            AuthError::InvalidCredential | AuthError::UnsupportedMethod(_) => {
                ("Your username or password is incorrect.", 403)
            }
            AuthError::MethodDisabled(_) => ("Password auth is disabled", 403),
            AuthError::AccountInactive => ("Your account has been disabled", 403),
            AuthError::RealmInactive => ("Your realm has been deactivated", 403),
            AuthError::FeatureDisabled(_) => ("Dev environment not enabled.", 400),
            AuthError::AttestationInvalid => ("Your email address could not be verified.", 403),
            AuthError::FederationTransport(_) => {
                ("Authentication with the identity provider failed.", 502)
            }
            AuthError::Internal(_) => ("Internal server error", 500),
        };
        Self { msg, status, kind }
    }
}
