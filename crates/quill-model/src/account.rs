//! Account domain model.
//!
//! Accounts are the identity records resolved by the authentication
//! backend chain. They are read-only from the core's perspective except
//! for the directory-projection upsert performed by the LDAP verifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A long-lived API credential attached to an account.
///
/// The value is opaque to the core; it is handed back verbatim by the
/// API-key issuer after a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps an existing credential value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates fresh credential material.
    ///
    /// Used when a brand-new identity is provisioned (e.g. first
    /// directory login); existing accounts keep their key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the credential value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An identity record within a realm.
///
/// The email address is the unique, case-insensitive lookup key; it is
/// stored lowercased. The `enabled` flag is toggled externally and read
/// fresh on every authentication attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: Uuid,
    /// Realm this account belongs to.
    pub realm_id: Uuid,
    /// Unique email within the realm (lowercased).
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Whether the account is active.
    pub enabled: bool,
    /// Whether the account is a realm administrator.
    pub is_admin: bool,
    /// Opaque PHC-formatted password hash, if a password is set.
    pub password_hash: Option<String>,
    /// Long-lived API credential.
    pub api_key: ApiKey,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new active account with a freshly generated API key.
    #[must_use]
    pub fn new(realm_id: Uuid, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            realm_id,
            email: email.into().to_lowercase(),
            full_name: String::new(),
            enabled: true,
            is_admin: false,
            password_hash: None,
            api_key: ApiKey::generate(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }

    /// Sets the stored password hash.
    #[must_use]
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Sets whether the account is a realm administrator.
    #[must_use]
    pub const fn with_is_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Sets whether the account is active.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
