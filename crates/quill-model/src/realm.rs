//! Realm domain model.
//!
//! A realm is the tenant boundary: every account belongs to exactly one
//! realm, and deactivating a realm denies authentication for all of its
//! accounts regardless of credential validity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant realm.
///
/// Realms isolate accounts from each other. The authentication chain
/// consults the realm's `enabled` flag after every successful credential
/// check; the flag is toggled by an external account-management
/// collaborator, never by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realm {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique realm name.
    pub name: String,
    /// Whether the realm is active.
    pub enabled: bool,
    /// When the realm was created.
    pub created_at: DateTime<Utc>,
    /// When the realm was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Realm {
    /// Creates a new active realm with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets whether the realm is active.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
