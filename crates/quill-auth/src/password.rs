//! Argon2id implementation of the password-hash capability.
//!
//! The core only depends on [`PasswordHashPort`]; this module supplies
//! the default implementation used in production and in test fixtures.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AuthError, AuthResult};
use crate::ports::PasswordHashPort;

/// Argon2id password hasher and comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHash;

impl Argon2PasswordHash {
    /// Creates the hasher with default Argon2id parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Hashes a password into a PHC-formatted string.
    ///
    /// Used by fixtures and by account provisioning; the verifiers never
    /// hash, only compare.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if hashing fails.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(hash.to_string())
    }
}

impl PasswordHashPort for Argon2PasswordHash {
    fn matches(&self, candidate: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        // Argon2::default() can verify any Argon2 variant
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}
