//! LDAP credential verifier.
//!
//! Delegates to the external directory-bind capability: bind with the
//! supplied credentials, fetch directory attributes on success, upsert
//! the local account projection, and enforce any configured group
//! requirement. Every directory fault, including a timeout, is an
//! authentication failure here, never a propagated error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quill_model::{Account, AuthMethod};

use crate::config::AuthConfig;
use crate::error::AuthResult;
use crate::ports::{AccountProvisioningPort, DirectoryEntry, DirectoryPort};
use crate::verifier::{CredentialVerifier, Proof};

/// Predicate over directory attributes that must hold before the entry
/// is accepted (e.g. membership in a required group).
pub type DirectoryRequirement = Arc<dyn Fn(&DirectoryEntry) -> bool + Send + Sync>;

/// Directory-backed credential verifier.
pub struct LdapVerifier {
    directory: Arc<dyn DirectoryPort>,
    provisioning: Arc<dyn AccountProvisioningPort>,
    requirement: Option<DirectoryRequirement>,
    timeout: Duration,
}

impl LdapVerifier {
    /// Creates the verifier. The external-call timeout comes from
    /// configuration.
    #[must_use]
    pub fn new(
        directory: Arc<dyn DirectoryPort>,
        provisioning: Arc<dyn AccountProvisioningPort>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            directory,
            provisioning,
            requirement: None,
            timeout: config.external_timeout,
        }
    }

    /// Sets the attribute requirement predicate.
    #[must_use]
    pub fn with_requirement(mut self, requirement: DirectoryRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    async fn bind_and_fetch(&self, username: &str, password: &str) -> Option<DirectoryEntry> {
        let bind = tokio::time::timeout(self.timeout, self.directory.bind(username, password));
        match bind.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::debug!(username, error = %err, "directory bind rejected");
                return None;
            }
            Err(_) => {
                tracing::warn!(username, "directory bind timed out");
                return None;
            }
        }

        let fetch = tokio::time::timeout(self.timeout, self.directory.entry(username));
        match fetch.await {
            Ok(Ok(entry)) => Some(entry),
            Ok(Err(err)) => {
                tracing::debug!(username, error = %err, "directory attribute fetch failed");
                None
            }
            Err(_) => {
                tracing::warn!(username, "directory attribute fetch timed out");
                None
            }
        }
    }
}

#[async_trait]
impl CredentialVerifier for LdapVerifier {
    fn method(&self) -> AuthMethod {
        AuthMethod::Ldap
    }

    async fn verify(&self, username: &str, proof: &Proof) -> AuthResult<Option<Account>> {
        let Proof::Password(password) = proof else {
            return Ok(None);
        };
        if password.is_empty() {
            // An empty bind password would be an anonymous bind.
            return Ok(None);
        }

        let Some(entry) = self.bind_and_fetch(username, password).await else {
            return Ok(None);
        };

        if let Some(requirement) = &self.requirement {
            if !requirement(&entry) {
                tracing::debug!(username, "directory entry failed the configured requirement");
                return Ok(None);
            }
        }

        let full_name = entry.full_name.as_deref().unwrap_or_default();
        let account = self
            .provisioning
            .upsert_directory_account(username, full_name)
            .await?;
        Ok(Some(account))
    }
}
