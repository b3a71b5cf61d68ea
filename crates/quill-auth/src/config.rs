//! Injected configuration for the authentication core.
//!
//! Deployment toggles (dev mode, password-auth policy, domain append,
//! external-call timeout) are plain values read at call time, never
//! mutable globals.

use std::collections::HashSet;
use std::time::Duration;

use quill_model::AuthMethod;

/// Configuration for chain construction and policy predicates.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Methods registered for this deployment. A method absent from this
    /// set yields `UnsupportedMethod` at dispatch time.
    pub registered_methods: HashSet<AuthMethod>,
    /// Policy predicate: whether password authentication is allowed.
    /// Checked by the password verifier before any account lookup.
    pub password_auth_enabled: bool,
    /// Whether the development-mode bypass surfaces are enabled.
    pub dev_mode: bool,
    /// Domain appended to asserted remote-header local-parts, if set.
    pub sso_append_domain: Option<String>,
    /// Bound on external directory/provider calls. A slow collaborator
    /// produces a denial, not a hang.
    pub external_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            registered_methods: HashSet::from([AuthMethod::Password]),
            password_auth_enabled: true,
            dev_mode: false,
            sso_append_domain: None,
            external_timeout: Duration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Creates the default configuration (password only, dev mode off).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a method.
    #[must_use]
    pub fn with_method(mut self, method: AuthMethod) -> Self {
        self.registered_methods.insert(method);
        self
    }

    /// Replaces the registered method set.
    #[must_use]
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = AuthMethod>) -> Self {
        self.registered_methods = methods.into_iter().collect();
        self
    }

    /// Sets the password-auth policy predicate.
    #[must_use]
    pub const fn with_password_auth_enabled(mut self, enabled: bool) -> Self {
        self.password_auth_enabled = enabled;
        self
    }

    /// Sets the dev-mode toggle.
    #[must_use]
    pub const fn with_dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        self
    }

    /// Sets the remote-header domain-append policy.
    #[must_use]
    pub fn with_sso_append_domain(mut self, domain: impl Into<String>) -> Self {
        self.sso_append_domain = Some(domain.into());
        self
    }

    /// Sets the external-call timeout.
    #[must_use]
    pub const fn with_external_timeout(mut self, timeout: Duration) -> Self {
        self.external_timeout = timeout;
        self
    }

    /// Whether a method is registered.
    #[must_use]
    pub fn is_registered(&self, method: AuthMethod) -> bool {
        self.registered_methods.contains(&method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registers_password_only() {
        let config = AuthConfig::new();

        assert!(config.is_registered(AuthMethod::Password));
        assert!(!config.is_registered(AuthMethod::DevBypass));
        assert!(config.password_auth_enabled);
        assert!(!config.dev_mode);
    }

    #[test]
    fn builder_pattern_works() {
        let config = AuthConfig::new()
            .with_method(AuthMethod::DevBypass)
            .with_dev_mode(true)
            .with_sso_append_domain("zulip.com")
            .with_external_timeout(Duration::from_millis(250));

        assert!(config.is_registered(AuthMethod::DevBypass));
        assert!(config.dev_mode);
        assert_eq!(config.sso_append_domain.as_deref(), Some("zulip.com"));
        assert_eq!(config.external_timeout, Duration::from_millis(250));
    }
}
