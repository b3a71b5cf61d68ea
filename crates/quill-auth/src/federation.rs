//! Identity federation flow (OAuth2/SSO).
//!
//! A staged flow layered over the same lifecycle rules as the chain:
//! exchange the external provider's response for a claimed email, then
//! resolve the local account and branch on existing-active,
//! existing-inactive, and no-match. Only the active branch establishes a
//! session.

use std::sync::Arc;
use std::time::Duration;

use quill_model::Account;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::ports::{AccountLookupPort, ProviderClientPort, RealmStatePort, SessionPort};

/// Terminal outcome of a federation attempt.
#[derive(Debug, Clone)]
pub enum FederationOutcome {
    /// Existing active account; session established.
    Resolved(Account),
    /// Existing but deactivated account; login denied, no session.
    InactiveMatch(Account),
    /// No matching account; the caller should offer registration.
    NoMatch {
        /// Email the provider attested.
        claimed_email: String,
    },
}

/// Diagnostics the caller can inspect regardless of outcome.
#[derive(Debug, Clone, Default)]
pub struct FederationDiagnostics {
    /// Whether the provider attested the claimed email. `None` until the
    /// provider round trip completes.
    pub attestation_valid: Option<bool>,
}

/// The email claim extracted from a valid provider response.
#[derive(Debug, Clone)]
pub struct ExtractedClaim {
    /// Attested email address.
    pub email: String,
    /// Optional display name supplied by the provider.
    pub full_name: Option<String>,
}

/// Multi-step OAuth2 identity federation flow.
pub struct IdentityFederationFlow {
    provider: Arc<dyn ProviderClientPort>,
    accounts: Arc<dyn AccountLookupPort>,
    state: Arc<dyn RealmStatePort>,
    sessions: Arc<dyn SessionPort>,
    timeout: Duration,
}

impl IdentityFederationFlow {
    /// Creates the flow over the given ports. The provider-call timeout
    /// comes from configuration.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ProviderClientPort>,
        accounts: Arc<dyn AccountLookupPort>,
        state: Arc<dyn RealmStatePort>,
        sessions: Arc<dyn SessionPort>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            provider,
            accounts,
            state,
            sessions,
            timeout: config.external_timeout,
        }
    }

    /// Exchanges the provider response for an email claim.
    ///
    /// # Errors
    ///
    /// - `FederationTransport` for provider faults and timeouts. These
    ///   are never retried here; callers own retry policy.
    /// - `AttestationInvalid` if the provider did not attest the email.
    pub async fn exchange(
        &self,
        response: &serde_json::Value,
        diagnostics: &mut FederationDiagnostics,
    ) -> AuthResult<ExtractedClaim> {
        let exchange = tokio::time::timeout(self.timeout, self.provider.exchange(response));
        let claim = match exchange.await {
            Ok(Ok(claim)) => claim,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "provider exchange failed");
                return Err(AuthError::FederationTransport(err.to_string()));
            }
            Err(_) => {
                tracing::warn!("provider exchange timed out");
                return Err(AuthError::FederationTransport(
                    "provider call timed out".to_string(),
                ));
            }
        };

        diagnostics.attestation_valid = Some(claim.attestation_valid);
        if !claim.attestation_valid {
            return Err(AuthError::AttestationInvalid);
        }
        let Some(email) = claim.email else {
            return Err(AuthError::FederationTransport(
                "provider claim carried no email".to_string(),
            ));
        };
        Ok(ExtractedClaim {
            email: email.to_lowercase(),
            full_name: claim.full_name,
        })
    }

    /// Resolves an extracted claim against the local account store.
    ///
    /// The `Resolved` branch applies the realm gate and triggers session
    /// establishment; the other branches have no side effects.
    ///
    /// # Errors
    ///
    /// `RealmInactive` if the matched account's realm is deactivated.
    pub async fn resolve(&self, claim: ExtractedClaim) -> AuthResult<FederationOutcome> {
        let Some(account) = self.accounts.by_email(&claim.email).await? else {
            tracing::debug!(email = %claim.email, "federation claim matched no account");
            return Ok(FederationOutcome::NoMatch {
                claimed_email: claim.email,
            });
        };

        if !self.state.account_active(account.id).await? {
            tracing::debug!(email = %account.email, "federation denied: account deactivated");
            return Ok(FederationOutcome::InactiveMatch(account));
        }
        if !self.state.realm_active(account.realm_id).await? {
            tracing::debug!(email = %account.email, "federation denied: realm deactivated");
            return Err(AuthError::RealmInactive);
        }

        self.sessions.complete_login(&account).await?;
        Ok(FederationOutcome::Resolved(account))
    }

    /// Runs the whole flow: exchange, then resolve.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::exchange`] or [`Self::resolve`].
    pub async fn run(
        &self,
        response: &serde_json::Value,
        diagnostics: &mut FederationDiagnostics,
    ) -> AuthResult<FederationOutcome> {
        let claim = self.exchange(response, diagnostics).await?;
        self.resolve(claim).await
    }
}
