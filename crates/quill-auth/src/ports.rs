//! Capability ports consumed by the authentication core.
//!
//! The core never owns persistence or wire protocols; it reads account
//! and realm state through these traits and delegates directory binds,
//! provider exchanges, hash comparison, and session establishment to
//! external collaborators. State is fetched per attempt and never cached.

use async_trait::async_trait;
use quill_model::Account;
use thiserror::Error;
use uuid::Uuid;

use crate::error::AuthResult;

/// Resolves identities to account records.
#[async_trait]
pub trait AccountLookupPort: Send + Sync {
    /// Looks up an account by email. The key is case-insensitive;
    /// implementations match against the lowercased form.
    async fn by_email(&self, email: &str) -> AuthResult<Option<Account>>;

    /// Lists all known accounts. Used by the dev-mode identity listing.
    async fn list(&self) -> AuthResult<Vec<Account>>;
}

/// Reports current account and realm lifecycle state.
///
/// Read fresh on every attempt so that deactivation mid-stream takes
/// effect immediately.
#[async_trait]
pub trait RealmStatePort: Send + Sync {
    /// Whether the realm is active.
    async fn realm_active(&self, realm_id: Uuid) -> AuthResult<bool>;

    /// Whether the account is active.
    async fn account_active(&self, account_id: Uuid) -> AuthResult<bool>;
}

/// Creates or refreshes the local projection of a directory identity.
#[async_trait]
pub trait AccountProvisioningPort: Send + Sync {
    /// Upserts the account projection for a directory user and returns
    /// the current record. A brand-new identity receives fresh API
    /// credential material.
    async fn upsert_directory_account(
        &self,
        email: &str,
        full_name: &str,
    ) -> AuthResult<Account>;
}

/// Errors from the external directory capability.
///
/// All of these are treated as authentication failure by the LDAP
/// verifier, never propagated to the caller.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory rejected the bind credentials.
    #[error("directory bind rejected")]
    BindRejected,

    /// Connection or protocol failure.
    #[error("directory connection error: {0}")]
    Connection(String),

    /// The requested entry does not exist.
    #[error("directory entry not found")]
    EntryNotFound,
}

/// Attributes fetched from a directory entry after a successful bind.
#[derive(Debug, Clone, Default)]
pub struct DirectoryEntry {
    /// Display name attribute, if present.
    pub full_name: Option<String>,
    /// Group names the entry belongs to.
    pub groups: Vec<String>,
}

/// External directory-bind capability (LDAP wire protocol).
#[async_trait]
pub trait DirectoryPort: Send + Sync {
    /// Binds against the directory with the supplied credentials.
    async fn bind(&self, username: &str, password: &str) -> Result<(), DirectoryError>;

    /// Fetches the directory attributes for a user after a successful
    /// bind.
    async fn entry(&self, username: &str) -> Result<DirectoryEntry, DirectoryError>;
}

/// Errors from the external OAuth2 provider client.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport or protocol failure during the provider round trip.
    #[error("provider transport error: {0}")]
    Transport(String),
}

/// The identity claim extracted from a provider response.
#[derive(Debug, Clone)]
pub struct ProviderClaim {
    /// Claimed email address, if the provider supplied one.
    pub email: Option<String>,
    /// Optional display name.
    pub full_name: Option<String>,
    /// Whether the provider attested ownership of the email.
    pub attestation_valid: bool,
}

/// External OAuth2 provider client capability.
#[async_trait]
pub trait ProviderClientPort: Send + Sync {
    /// Exchanges an opaque provider response payload for an identity
    /// claim.
    async fn exchange(&self, response: &serde_json::Value) -> Result<ProviderClaim, ProviderError>;
}

/// External session-establishment capability.
///
/// The federation flow initiates the "complete login" side effect; its
/// mechanics belong to the web tier.
#[async_trait]
pub trait SessionPort: Send + Sync {
    /// Establishes a session for the resolved account.
    async fn complete_login(&self, account: &Account) -> AuthResult<()>;
}

/// Password-hash comparison capability.
pub trait PasswordHashPort: Send + Sync {
    /// Checks a candidate password against a stored opaque hash.
    /// Implementations must compare in constant time and never log the
    /// candidate.
    fn matches(&self, candidate: &str, stored_hash: &str) -> bool;
}
