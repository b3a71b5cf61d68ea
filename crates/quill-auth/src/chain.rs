//! Backend chain: verifier dispatch plus the mandatory lifecycle gate.
//!
//! The chain selects the verifier registered for the requested method,
//! runs it, and then checks that the account and its realm are still
//! active. That check runs for every method, the bypass variants
//! included. Credential correctness is necessary but never sufficient.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use quill_model::{Account, AuthMethod};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::ldap::LdapVerifier;
use crate::ports::{
    AccountLookupPort, AccountProvisioningPort, DirectoryPort, PasswordHashPort, RealmStatePort,
};
use crate::verifier::{
    CredentialVerifier, DevBypassVerifier, DummyVerifier, PasswordVerifier, Proof,
    RemoteHeaderVerifier,
};

/// The capability ports a chain built from configuration draws on.
///
/// The directory ports are only required when the LDAP method is
/// registered.
pub struct ChainPorts {
    /// Account lookup.
    pub accounts: Arc<dyn AccountLookupPort>,
    /// Lifecycle state reads.
    pub state: Arc<dyn RealmStatePort>,
    /// Password-hash comparison.
    pub hasher: Arc<dyn PasswordHashPort>,
    /// External directory bind, if LDAP is deployed.
    pub directory: Option<Arc<dyn DirectoryPort>>,
    /// Directory-projection upsert, if LDAP is deployed.
    pub provisioning: Option<Arc<dyn AccountProvisioningPort>>,
}

/// Builder for a [`BackendChain`].
pub struct ChainBuilder {
    state: Arc<dyn RealmStatePort>,
    verifiers: Vec<Box<dyn CredentialVerifier>>,
    reported: HashSet<AuthMethod>,
}

impl ChainBuilder {
    /// Registers a verifier instance.
    #[must_use]
    pub fn register(mut self, verifier: Box<dyn CredentialVerifier>) -> Self {
        self.verifiers.push(verifier);
        self
    }

    /// Marks a method as registered without a synchronous verifier.
    ///
    /// Used for OAuth2, which is driven by the federation flow but must
    /// still appear on the `get_auth_backends` surface.
    #[must_use]
    pub fn report(mut self, method: AuthMethod) -> Self {
        self.reported.insert(method);
        self
    }

    /// Builds the chain.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if two verifiers claim the same
    /// method; that is a configuration fault and must abort rather than
    /// silently pick one.
    pub fn build(self) -> AuthResult<BackendChain> {
        let mut verifiers: HashMap<AuthMethod, Box<dyn CredentialVerifier>> = HashMap::new();
        let mut registered = self.reported;
        for verifier in self.verifiers {
            let method = verifier.method();
            if verifiers.insert(method, verifier).is_some() {
                return Err(AuthError::Internal(format!(
                    "duplicate verifier registered for method {method}"
                )));
            }
            registered.insert(method);
        }
        Ok(BackendChain {
            state: self.state,
            verifiers,
            registered,
        })
    }
}

/// The authentication backend chain.
///
/// Stateless across attempts: every call reads lifecycle state fresh
/// through the realm-state port, so concurrent attempts cannot
/// interfere.
pub struct BackendChain {
    state: Arc<dyn RealmStatePort>,
    verifiers: HashMap<AuthMethod, Box<dyn CredentialVerifier>>,
    registered: HashSet<AuthMethod>,
}

impl BackendChain {
    /// Starts building a chain over the given realm-state port.
    #[must_use]
    pub fn builder(state: Arc<dyn RealmStatePort>) -> ChainBuilder {
        ChainBuilder {
            state,
            verifiers: Vec::new(),
            reported: HashSet::new(),
        }
    }

    /// Builds a chain from configuration: one verifier per registered
    /// method, the fixed enumeration selected at startup. OAuth2 is
    /// reported without a synchronous verifier; the federation flow
    /// drives it. Deployments needing a directory requirement predicate
    /// use [`Self::builder`] directly.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the configuration registers the
    /// LDAP method without supplying the directory ports; a malformed
    /// configuration aborts construction rather than silently dropping
    /// the method.
    pub fn from_config(config: &AuthConfig, ports: ChainPorts) -> AuthResult<Self> {
        let mut builder = Self::builder(ports.state.clone());
        for method in AuthMethod::ALL {
            if !config.is_registered(method) {
                continue;
            }
            let verifier: Box<dyn CredentialVerifier> = match method {
                AuthMethod::Password => Box::new(PasswordVerifier::new(
                    ports.accounts.clone(),
                    ports.hasher.clone(),
                    config,
                )),
                AuthMethod::Dummy => Box::new(DummyVerifier::new(ports.accounts.clone())),
                AuthMethod::DevBypass => {
                    Box::new(DevBypassVerifier::new(ports.accounts.clone(), config))
                }
                AuthMethod::RemoteHeader => {
                    Box::new(RemoteHeaderVerifier::new(ports.accounts.clone(), config))
                }
                AuthMethod::Ldap => {
                    let (Some(directory), Some(provisioning)) =
                        (ports.directory.clone(), ports.provisioning.clone())
                    else {
                        return Err(AuthError::Internal(
                            "ldap method registered without directory ports".to_string(),
                        ));
                    };
                    Box::new(LdapVerifier::new(directory, provisioning, config))
                }
                AuthMethod::OAuth2 => {
                    builder = builder.report(AuthMethod::OAuth2);
                    continue;
                }
            };
            builder = builder.register(verifier);
        }
        builder.build()
    }

    /// Whether a method is registered (verifier-backed or reported).
    #[must_use]
    pub fn is_registered(&self, method: AuthMethod) -> bool {
        self.registered.contains(&method)
    }

    /// The registered method set, for the `get_auth_backends` surface.
    #[must_use]
    pub fn registered_methods(&self) -> &HashSet<AuthMethod> {
        &self.registered
    }

    /// Authenticates a username with the given method and proof.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMethod` if no verifier handles the method.
    /// - `InvalidCredential` if the verifier reports absent.
    /// - `AccountInactive` / `RealmInactive` from the lifecycle gate.
    /// - Policy and internal kinds propagated from the verifier.
    pub async fn authenticate(
        &self,
        username: &str,
        method: AuthMethod,
        proof: &Proof,
    ) -> AuthResult<Account> {
        let Some(verifier) = self.verifiers.get(&method) else {
            return Err(AuthError::UnsupportedMethod(method));
        };

        let Some(account) = verifier.verify(username, proof).await? else {
            tracing::debug!(username, %method, "credential check failed");
            return Err(AuthError::InvalidCredential);
        };

        self.lifecycle_gate(&account).await?;
        tracing::debug!(username, %method, "authentication succeeded");
        Ok(account)
    }

    /// The mandatory post-check: account active, then realm active.
    ///
    /// Runs after every successful credential check, bypass verifiers
    /// included.
    pub async fn lifecycle_gate(&self, account: &Account) -> AuthResult<()> {
        if !self.state.account_active(account.id).await? {
            tracing::debug!(email = %account.email, "denied: account deactivated");
            return Err(AuthError::AccountInactive);
        }
        if !self.state.realm_active(account.realm_id).await? {
            tracing::debug!(email = %account.email, "denied: realm deactivated");
            return Err(AuthError::RealmInactive);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use uuid::Uuid;

    struct ToggleState {
        account_active: AtomicBool,
        realm_active: AtomicBool,
    }

    #[async_trait]
    impl RealmStatePort for ToggleState {
        async fn realm_active(&self, _realm_id: Uuid) -> AuthResult<bool> {
            Ok(self.realm_active.load(Ordering::SeqCst))
        }

        async fn account_active(&self, _account_id: Uuid) -> AuthResult<bool> {
            Ok(self.account_active.load(Ordering::SeqCst))
        }
    }

    struct AlwaysFinds(Account);

    #[async_trait]
    impl CredentialVerifier for AlwaysFinds {
        fn method(&self) -> AuthMethod {
            AuthMethod::Dummy
        }

        async fn verify(&self, _username: &str, _proof: &Proof) -> AuthResult<Option<Account>> {
            Ok(Some(self.0.clone()))
        }
    }

    fn chain_with_state(account: Account, state: Arc<ToggleState>) -> BackendChain {
        BackendChain::builder(state)
            .register(Box::new(AlwaysFinds(account)))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn unsupported_method_is_reported() {
        let account = Account::new(Uuid::now_v7(), "hamlet@zulip.com");
        let state = Arc::new(ToggleState {
            account_active: AtomicBool::new(true),
            realm_active: AtomicBool::new(true),
        });
        let chain = chain_with_state(account, state);

        let err = chain
            .authenticate("hamlet@zulip.com", AuthMethod::Ldap, &Proof::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedMethod(AuthMethod::Ldap)));
    }

    #[tokio::test]
    async fn lifecycle_gate_runs_even_for_bypass_verifiers() {
        let account = Account::new(Uuid::now_v7(), "hamlet@zulip.com");
        let state = Arc::new(ToggleState {
            account_active: AtomicBool::new(false),
            realm_active: AtomicBool::new(true),
        });
        let chain = chain_with_state(account, state.clone());

        let err = chain
            .authenticate("hamlet@zulip.com", AuthMethod::Dummy, &Proof::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountInactive));

        state.account_active.store(true, Ordering::SeqCst);
        state.realm_active.store(false, Ordering::SeqCst);
        let err = chain
            .authenticate("hamlet@zulip.com", AuthMethod::Dummy, &Proof::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RealmInactive));
    }

    #[tokio::test]
    async fn reported_methods_appear_without_a_verifier() {
        let account = Account::new(Uuid::now_v7(), "hamlet@zulip.com");
        let state = Arc::new(ToggleState {
            account_active: AtomicBool::new(true),
            realm_active: AtomicBool::new(true),
        });
        let chain = BackendChain::builder(state)
            .register(Box::new(AlwaysFinds(account)))
            .report(AuthMethod::OAuth2)
            .build()
            .unwrap();

        assert!(chain.is_registered(AuthMethod::OAuth2));
        let err = chain
            .authenticate("hamlet@zulip.com", AuthMethod::OAuth2, &Proof::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedMethod(AuthMethod::OAuth2)));
    }

    struct NoAccounts;

    #[async_trait]
    impl AccountLookupPort for NoAccounts {
        async fn by_email(&self, _email: &str) -> AuthResult<Option<Account>> {
            Ok(None)
        }

        async fn list(&self) -> AuthResult<Vec<Account>> {
            Ok(Vec::new())
        }
    }

    struct NeverMatches;

    impl PasswordHashPort for NeverMatches {
        fn matches(&self, _candidate: &str, _stored_hash: &str) -> bool {
            false
        }
    }

    fn ports_without_directory() -> ChainPorts {
        ChainPorts {
            accounts: Arc::new(NoAccounts),
            state: Arc::new(ToggleState {
                account_active: AtomicBool::new(true),
                realm_active: AtomicBool::new(true),
            }),
            hasher: Arc::new(NeverMatches),
            directory: None,
            provisioning: None,
        }
    }

    #[tokio::test]
    async fn from_config_registers_the_configured_enumeration() {
        let config = AuthConfig::new()
            .with_methods([
                AuthMethod::Password,
                AuthMethod::DevBypass,
                AuthMethod::OAuth2,
            ])
            .with_dev_mode(true);
        let chain = BackendChain::from_config(&config, ports_without_directory()).unwrap();

        assert!(chain.is_registered(AuthMethod::Password));
        assert!(chain.is_registered(AuthMethod::DevBypass));
        assert!(chain.is_registered(AuthMethod::OAuth2));
        assert!(!chain.is_registered(AuthMethod::Dummy));

        // OAuth2 is reported only; dispatching it is unsupported.
        let err = chain
            .authenticate("hamlet@zulip.com", AuthMethod::OAuth2, &Proof::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedMethod(AuthMethod::OAuth2)));
    }

    #[tokio::test]
    async fn from_config_rejects_ldap_without_directory_ports() {
        let config = AuthConfig::new().with_method(AuthMethod::Ldap);

        let result = BackendChain::from_config(&config, ports_without_directory());

        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn duplicate_registration_is_fatal() {
        let account = Account::new(Uuid::now_v7(), "hamlet@zulip.com");
        let state = Arc::new(ToggleState {
            account_active: AtomicBool::new(true),
            realm_active: AtomicBool::new(true),
        });
        let result = BackendChain::builder(state)
            .register(Box::new(AlwaysFinds(account.clone())))
            .register(Box::new(AlwaysFinds(account)))
            .build();

        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
