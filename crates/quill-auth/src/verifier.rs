//! Credential verifier trait and the synchronous verifier variants.
//!
//! A verifier validates one kind of proof-of-identity and returns a
//! candidate account or `None` (absent). Verifiers never apply the
//! lifecycle gate; that is the chain's job, so it cannot be skipped.

use std::sync::Arc;

use async_trait::async_trait;
use quill_model::{Account, AuthMethod};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::ports::{AccountLookupPort, PasswordHashPort};

/// Method-specific proof payload carried by an authentication attempt.
///
/// Constructed per call and discarded after resolution. OAuth2 provider
/// responses are handled by the federation flow, not by a synchronous
/// proof variant.
#[derive(Debug, Clone)]
pub enum Proof {
    /// Plaintext password (password and LDAP methods).
    Password(String),
    /// Caller-supplied toggle for the dummy bypass.
    DummyFlag(bool),
    /// Identity asserted by a trusted upstream; no secret carried.
    Asserted,
    /// No proof (dev bypass).
    None,
}

/// A single authentication method's credential-checking unit.
///
/// `Ok(None)` means the credential is absent or invalid for this method;
/// `Err` carries policy and internal failures. Lifecycle state is not
/// this trait's concern.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// The method this verifier handles.
    fn method(&self) -> AuthMethod;

    /// Validates the proof for the given username.
    async fn verify(&self, username: &str, proof: &Proof) -> AuthResult<Option<Account>>;
}

/// Email + password verification against the stored hash.
pub struct PasswordVerifier {
    accounts: Arc<dyn AccountLookupPort>,
    hasher: Arc<dyn PasswordHashPort>,
    auth_enabled: bool,
}

impl PasswordVerifier {
    /// Creates the verifier. The password-auth policy predicate is read
    /// from configuration at construction time.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountLookupPort>,
        hasher: Arc<dyn PasswordHashPort>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            accounts,
            hasher,
            auth_enabled: config.password_auth_enabled,
        }
    }
}

#[async_trait]
impl CredentialVerifier for PasswordVerifier {
    fn method(&self) -> AuthMethod {
        AuthMethod::Password
    }

    async fn verify(&self, username: &str, proof: &Proof) -> AuthResult<Option<Account>> {
        // Policy check runs before any lookup so the error path does not
        // leak which accounts exist.
        if !self.auth_enabled {
            return Err(AuthError::MethodDisabled(AuthMethod::Password));
        }
        let Proof::Password(password) = proof else {
            return Ok(None);
        };
        if password.is_empty() {
            return Ok(None);
        }
        let Some(account) = self.accounts.by_email(username).await? else {
            return Ok(None);
        };
        let Some(stored) = account.password_hash.as_deref() else {
            return Ok(None);
        };
        if self.hasher.matches(password, stored) {
            Ok(Some(account))
        } else {
            tracing::debug!(username, "password comparison failed");
            Ok(None)
        }
    }
}

/// Pure bypass for local and test environments.
///
/// Succeeds iff the caller passes the dummy flag and the account exists.
/// Wiring this into a production chain is the deployer's mistake; the
/// core does not enforce it.
pub struct DummyVerifier {
    accounts: Arc<dyn AccountLookupPort>,
}

impl DummyVerifier {
    /// Creates the verifier.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountLookupPort>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl CredentialVerifier for DummyVerifier {
    fn method(&self) -> AuthMethod {
        AuthMethod::Dummy
    }

    async fn verify(&self, username: &str, proof: &Proof) -> AuthResult<Option<Account>> {
        let Proof::DummyFlag(true) = proof else {
            return Ok(None);
        };
        self.accounts.by_email(username).await
    }
}

/// Development-mode bypass; a no-op unless dev mode is enabled.
pub struct DevBypassVerifier {
    accounts: Arc<dyn AccountLookupPort>,
    dev_mode: bool,
}

impl DevBypassVerifier {
    /// Creates the verifier with the dev-mode toggle from configuration.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountLookupPort>, config: &AuthConfig) -> Self {
        Self {
            accounts,
            dev_mode: config.dev_mode,
        }
    }
}

#[async_trait]
impl CredentialVerifier for DevBypassVerifier {
    fn method(&self) -> AuthMethod {
        AuthMethod::DevBypass
    }

    async fn verify(&self, username: &str, _proof: &Proof) -> AuthResult<Option<Account>> {
        if !self.dev_mode {
            return Ok(None);
        }
        self.accounts.by_email(username).await
    }
}

/// Pre-authenticated identity asserted by a trusted upstream such as a
/// reverse proxy. No secret is checked here; the trust boundary is the
/// web tier.
pub struct RemoteHeaderVerifier {
    accounts: Arc<dyn AccountLookupPort>,
    append_domain: Option<String>,
}

impl RemoteHeaderVerifier {
    /// Creates the verifier with the domain-append policy from
    /// configuration.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountLookupPort>, config: &AuthConfig) -> Self {
        Self {
            accounts,
            append_domain: config.sso_append_domain.clone(),
        }
    }

    /// Normalizes the asserted identifier. With a domain configured the
    /// raw value is treated as a local-part.
    fn normalize(&self, asserted: &str) -> String {
        match &self.append_domain {
            Some(domain) => format!("{asserted}@{domain}"),
            None => asserted.to_string(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for RemoteHeaderVerifier {
    fn method(&self) -> AuthMethod {
        AuthMethod::RemoteHeader
    }

    async fn verify(&self, username: &str, proof: &Proof) -> AuthResult<Option<Account>> {
        let Proof::Asserted = proof else {
            return Ok(None);
        };
        let email = self.normalize(username);
        self.accounts.by_email(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::Argon2PasswordHash;
    use uuid::Uuid;

    struct FixedAccounts(Vec<Account>);

    #[async_trait]
    impl AccountLookupPort for FixedAccounts {
        async fn by_email(&self, email: &str) -> AuthResult<Option<Account>> {
            let key = email.to_lowercase();
            Ok(self.0.iter().find(|a| a.email == key).cloned())
        }

        async fn list(&self) -> AuthResult<Vec<Account>> {
            Ok(self.0.clone())
        }
    }

    fn hamlet(hash: Option<String>) -> Account {
        let mut account = Account::new(Uuid::now_v7(), "hamlet@zulip.com");
        account.password_hash = hash;
        account
    }

    #[tokio::test]
    async fn password_verifier_accepts_correct_password() {
        let hasher = Argon2PasswordHash::new();
        let hash = hasher.hash("testpassword").unwrap();
        let accounts = Arc::new(FixedAccounts(vec![hamlet(Some(hash))]));
        let verifier = PasswordVerifier::new(accounts, Arc::new(hasher), &AuthConfig::new());

        let found = verifier
            .verify("hamlet@zulip.com", &Proof::Password("testpassword".into()))
            .await
            .unwrap();
        assert!(found.is_some());

        let wrong = verifier
            .verify("hamlet@zulip.com", &Proof::Password("wrong".into()))
            .await
            .unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn password_verifier_rejects_empty_password_even_with_empty_hash() {
        let hasher = Argon2PasswordHash::new();
        let accounts = Arc::new(FixedAccounts(vec![hamlet(Some(String::new()))]));
        let verifier = PasswordVerifier::new(accounts, Arc::new(hasher), &AuthConfig::new());

        let found = verifier
            .verify("hamlet@zulip.com", &Proof::Password(String::new()))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn password_verifier_checks_policy_before_lookup() {
        let hasher = Argon2PasswordHash::new();
        let hash = hasher.hash("testpassword").unwrap();
        let accounts = Arc::new(FixedAccounts(vec![hamlet(Some(hash))]));
        let config = AuthConfig::new().with_password_auth_enabled(false);
        let verifier = PasswordVerifier::new(accounts, Arc::new(hasher), &config);

        let err = verifier
            .verify("hamlet@zulip.com", &Proof::Password("testpassword".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MethodDisabled(AuthMethod::Password)));
    }

    #[tokio::test]
    async fn dummy_verifier_requires_flag() {
        let accounts = Arc::new(FixedAccounts(vec![hamlet(None)]));
        let verifier = DummyVerifier::new(accounts);

        let on = verifier
            .verify("hamlet@zulip.com", &Proof::DummyFlag(true))
            .await
            .unwrap();
        assert!(on.is_some());

        let off = verifier
            .verify("hamlet@zulip.com", &Proof::DummyFlag(false))
            .await
            .unwrap();
        assert!(off.is_none());
    }

    #[tokio::test]
    async fn dev_bypass_is_noop_when_dev_mode_off() {
        let accounts = Arc::new(FixedAccounts(vec![hamlet(None)]));
        let verifier = DevBypassVerifier::new(accounts, &AuthConfig::new());

        let found = verifier.verify("hamlet@zulip.com", &Proof::None).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn remote_header_appends_configured_domain() {
        let accounts = Arc::new(FixedAccounts(vec![hamlet(None)]));
        let config = AuthConfig::new().with_sso_append_domain("zulip.com");
        let verifier = RemoteHeaderVerifier::new(accounts, &config);

        let found = verifier.verify("hamlet", &Proof::Asserted).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn remote_header_without_domain_uses_raw_identifier() {
        let accounts = Arc::new(FixedAccounts(vec![hamlet(None)]));
        let verifier = RemoteHeaderVerifier::new(accounts, &AuthConfig::new());

        let found = verifier
            .verify("hamlet@zulip.com", &Proof::Asserted)
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = verifier.verify("hamlet", &Proof::Asserted).await.unwrap();
        assert!(missing.is_none());
    }
}
