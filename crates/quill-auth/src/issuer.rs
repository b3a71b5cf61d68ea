//! API-key issuance over the backend chain.
//!
//! A thin consumer: verify the caller through the chain, then hand back
//! the account's long-lived API credential. The dev variant skips the
//! password check but never the lifecycle gate.

use std::sync::Arc;

use quill_model::{ApiKey, AuthMethod};

use crate::chain::BackendChain;
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::verifier::Proof;

/// An issued credential together with the resolved identity.
#[derive(Debug, Clone)]
pub struct IssuedKey {
    /// The account's canonical email.
    pub email: String,
    /// The long-lived API credential.
    pub api_key: ApiKey,
}

/// Issues API keys after chain authentication.
pub struct ApiKeyIssuer {
    chain: Arc<BackendChain>,
    dev_mode: bool,
}

impl ApiKeyIssuer {
    /// Creates the issuer. The dev-mode toggle gates [`Self::issue_dev`].
    #[must_use]
    pub fn new(chain: Arc<BackendChain>, config: &AuthConfig) -> Self {
        Self {
            chain,
            dev_mode: config.dev_mode,
        }
    }

    /// Issues the API key for a username authenticated by password.
    ///
    /// # Errors
    ///
    /// Any chain failure: `InvalidCredential`, `MethodDisabled`,
    /// `AccountInactive`, `RealmInactive`, `UnsupportedMethod`.
    pub async fn issue(&self, username: &str, password: &str) -> AuthResult<IssuedKey> {
        let account = self
            .chain
            .authenticate(
                username,
                AuthMethod::Password,
                &Proof::Password(password.to_string()),
            )
            .await?;
        Ok(IssuedKey {
            email: account.email,
            api_key: account.api_key,
        })
    }

    /// Issues the API key for a username without a credential check.
    ///
    /// Only available with dev mode enabled; the lifecycle gate still
    /// applies in full.
    ///
    /// # Errors
    ///
    /// `FeatureDisabled` when dev mode is off, plus any chain failure.
    pub async fn issue_dev(&self, username: &str) -> AuthResult<IssuedKey> {
        if !self.dev_mode {
            return Err(AuthError::FeatureDisabled("dev environment"));
        }
        let account = self
            .chain
            .authenticate(username, AuthMethod::DevBypass, &Proof::None)
            .await?;
        Ok(IssuedKey {
            email: account.email,
            api_key: account.api_key,
        })
    }
}
