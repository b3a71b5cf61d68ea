//! The typed API operations.
//!
//! HTTP routing and JSON formatting are the external web tier's job;
//! these operations produce the envelopes it serializes.

use std::sync::Arc;

use quill_auth::{
    AccountLookupPort, ApiKeyIssuer, AuthConfig, AuthError, BackendChain,
};
use quill_model::AuthMethod;

use crate::response::{
    ApiError, AuthBackendsResponse, DevEmailsResponse, DevFetchApiKeyResponse,
    FetchApiKeyResponse,
};

/// The authentication API surface over a backend chain.
pub struct AuthApi {
    chain: Arc<BackendChain>,
    issuer: ApiKeyIssuer,
    accounts: Arc<dyn AccountLookupPort>,
    dev_mode: bool,
}

impl AuthApi {
    /// Creates the surface over the given chain and account lookup.
    #[must_use]
    pub fn new(
        chain: Arc<BackendChain>,
        accounts: Arc<dyn AccountLookupPort>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            issuer: ApiKeyIssuer::new(chain.clone(), config),
            chain,
            accounts,
            dev_mode: config.dev_mode,
        }
    }

    /// `fetch_api_key`: password authentication, returns the API key.
    ///
    /// # Errors
    ///
    /// Denial, policy, and lifecycle kinds mapped to their stable
    /// message/status pairs.
    pub async fn fetch_api_key(
        &self,
        username: &str,
        password: &str,
    ) -> Result<FetchApiKeyResponse, ApiError> {
        let issued = self.issuer.issue(username, password).await?;
        Ok(FetchApiKeyResponse::new(issued.api_key.as_str().to_string()))
    }

    /// `dev_fetch_api_key`: dev-mode bypass, returns email and API key.
    ///
    /// # Errors
    ///
    /// `"Dev environment not enabled."` when dev mode is off, plus the
    /// lifecycle kinds.
    pub async fn dev_fetch_api_key(
        &self,
        username: &str,
    ) -> Result<DevFetchApiKeyResponse, ApiError> {
        let issued = self.issuer.issue_dev(username).await?;
        Ok(DevFetchApiKeyResponse::new(
            issued.email,
            issued.api_key.as_str().to_string(),
        ))
    }

    /// `dev_get_emails`: lists known identities, administrators and
    /// regular users separately. Dev-mode gated.
    ///
    /// # Errors
    ///
    /// `"Dev environment not enabled."` when dev mode is off.
    pub async fn dev_get_emails(&self) -> Result<DevEmailsResponse, ApiError> {
        if !self.dev_mode {
            return Err(AuthError::FeatureDisabled("dev environment").into());
        }
        let accounts = self.accounts.list().await?;
        let (admins, users): (Vec<_>, Vec<_>) = accounts.into_iter().partition(|a| a.is_admin);
        Ok(DevEmailsResponse {
            result: "success",
            msg: "",
            direct_admins: admins.into_iter().map(|a| a.email).collect(),
            direct_users: users.into_iter().map(|a| a.email).collect(),
        })
    }

    /// `get_auth_backends`: which public methods are registered.
    #[must_use]
    pub fn get_auth_backends(&self) -> AuthBackendsResponse {
        AuthBackendsResponse {
            result: "success",
            msg: "",
            password: self.chain.is_registered(AuthMethod::Password),
            google: self.chain.is_registered(AuthMethod::OAuth2),
            dev: self.chain.is_registered(AuthMethod::DevBypass),
        }
    }
}
