//! # quill-auth
//!
//! Pluggable authentication backend chain for a multi-tenant messaging
//! service.
//!
//! The core verifies user credentials across multiple methods (password,
//! LDAP, remote-header SSO, OAuth2 identity federation, development-mode
//! bypass) while enforcing realm and account lifecycle state. All
//! persistence, wire protocols, and session mechanics live behind
//! capability ports; every attempt is stateless and reads lifecycle
//! state fresh.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use quill_auth::{AuthConfig, BackendChain, PasswordVerifier, Proof};
//! use quill_model::AuthMethod;
//!
//! let config = AuthConfig::new();
//! let chain = BackendChain::builder(state)
//!     .register(Box::new(PasswordVerifier::new(accounts, hasher, &config)))
//!     .build()?;
//! let account = chain
//!     .authenticate("hamlet@zulip.com", AuthMethod::Password, &proof)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod chain;
pub mod config;
pub mod error;
pub mod federation;
pub mod issuer;
pub mod ldap;
pub mod password;
pub mod ports;
pub mod verifier;

pub use chain::{BackendChain, ChainBuilder, ChainPorts};
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use federation::{
    ExtractedClaim, FederationDiagnostics, FederationOutcome, IdentityFederationFlow,
};
pub use issuer::{ApiKeyIssuer, IssuedKey};
pub use ldap::{DirectoryRequirement, LdapVerifier};
pub use password::Argon2PasswordHash;
pub use ports::{
    AccountLookupPort, AccountProvisioningPort, DirectoryEntry, DirectoryError, DirectoryPort,
    PasswordHashPort, ProviderClaim, ProviderClientPort, ProviderError, RealmStatePort,
    SessionPort,
};
pub use verifier::{
    CredentialVerifier, DevBypassVerifier, DummyVerifier, PasswordVerifier, Proof,
    RemoteHeaderVerifier,
};
