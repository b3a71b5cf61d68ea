//! Authentication error taxonomy.
//!
//! Every failure kind the chain can produce is a distinct variant so that
//! audit code can tell lifecycle denials apart from credential denials,
//! even when the external-facing message is generic.

use quill_model::AuthMethod;
use thiserror::Error;

/// Errors produced by the authentication core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No verifier is registered for the requested method.
    #[error("no backend registered for method {0}")]
    UnsupportedMethod(AuthMethod),

    /// The credential check itself failed (wrong password, rejected
    /// directory bind, unknown account).
    #[error("invalid credentials")]
    InvalidCredential,

    /// The account exists and the credential was valid, but the account
    /// has been deactivated.
    #[error("account is deactivated")]
    AccountInactive,

    /// The account exists and the credential was valid, but the realm
    /// has been deactivated.
    #[error("realm is deactivated")]
    RealmInactive,

    /// The method is registered but disabled by policy (e.g. password
    /// auth switched off for the deployment).
    #[error("authentication method {0} is disabled")]
    MethodDisabled(AuthMethod),

    /// A feature gate required by the operation is off (e.g. dev mode).
    #[error("{0} is not enabled")]
    FeatureDisabled(&'static str),

    /// The identity provider did not attest ownership of the claimed
    /// email address.
    #[error("identity attestation was not verified by the provider")]
    AttestationInvalid,

    /// Transport or protocol failure talking to the identity provider,
    /// including timeouts. Distinct from "no matching account".
    #[error("identity provider error: {0}")]
    FederationTransport(String),

    /// Unexpected invariant violation (malformed configuration, port
    /// contract breach). Fatal to the request.
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Checks whether this is a lifecycle denial rather than a
    /// credential failure.
    #[must_use]
    pub const fn is_lifecycle(&self) -> bool {
        matches!(self, Self::AccountInactive | Self::RealmInactive)
    }

    /// Checks whether this is a federation-level failure.
    #[must_use]
    pub const fn is_federation(&self) -> bool {
        matches!(
            self,
            Self::AttestationInvalid | Self::FederationTransport(_)
        )
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
