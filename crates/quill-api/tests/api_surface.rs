//! External surface tests: stable messages, status codes, and the
//! `get_auth_backends` mapping.

use std::sync::Arc;

use quill_api::AuthApi;
use quill_auth::{
    AccountLookupPort, Argon2PasswordHash, AuthConfig, AuthError, BackendChain, ChainPorts,
};
use quill_model::AuthMethod;
use quill_test_support::{seeded_directory, InMemoryDirectory, FIXTURE_PASSWORD};

const EMAIL: &str = "hamlet@zulip.com";

fn api_over(directory: &Arc<InMemoryDirectory>, config: &AuthConfig) -> AuthApi {
    let lookup: Arc<dyn AccountLookupPort> = directory.clone();
    let ports = ChainPorts {
        accounts: lookup.clone(),
        state: directory.clone(),
        hasher: Arc::new(Argon2PasswordHash::new()),
        directory: None,
        provisioning: None,
    };
    let chain = Arc::new(BackendChain::from_config(config, ports).expect("chain builds"));
    AuthApi::new(chain, lookup, config)
}

#[tokio::test]
async fn fetch_api_key_success() {
    let directory = Arc::new(seeded_directory().unwrap());
    let api = api_over(&directory, &AuthConfig::new());

    let response = api.fetch_api_key(EMAIL, FIXTURE_PASSWORD).await.unwrap();

    assert_eq!(response.result, "success");
    let expected = directory.account(EMAIL).unwrap().api_key;
    assert_eq!(response.api_key, expected.as_str());
}

#[tokio::test]
async fn fetch_api_key_wrong_password() {
    let directory = Arc::new(seeded_directory().unwrap());
    let api = api_over(&directory, &AuthConfig::new());

    let err = api.fetch_api_key(EMAIL, "wrong").await.unwrap_err();

    assert_eq!(err.msg, "Your username or password is incorrect.");
    assert_eq!(err.status, 403);
    assert!(matches!(err.kind, AuthError::InvalidCredential));
}

#[tokio::test]
async fn fetch_api_key_password_auth_disabled() {
    let directory = Arc::new(seeded_directory().unwrap());
    let config = AuthConfig::new().with_password_auth_enabled(false);
    let api = api_over(&directory, &config);

    let err = api.fetch_api_key(EMAIL, FIXTURE_PASSWORD).await.unwrap_err();

    assert_eq!(err.msg, "Password auth is disabled");
    assert_eq!(err.status, 403);
}

#[tokio::test]
async fn fetch_api_key_inactive_account_and_realm() {
    let directory = Arc::new(seeded_directory().unwrap());
    let api = api_over(&directory, &AuthConfig::new());

    directory.set_account_active(EMAIL, false);
    let err = api.fetch_api_key(EMAIL, FIXTURE_PASSWORD).await.unwrap_err();
    assert_eq!(err.msg, "Your account has been disabled");
    assert!(matches!(err.kind, AuthError::AccountInactive));

    directory.set_account_active(EMAIL, true);
    directory.set_realm_active(directory.default_realm_id(), false);
    let err = api.fetch_api_key(EMAIL, FIXTURE_PASSWORD).await.unwrap_err();
    assert_eq!(err.msg, "Your realm has been deactivated");
    assert!(matches!(err.kind, AuthError::RealmInactive));
}

#[tokio::test]
async fn dev_fetch_api_key_success() {
    let directory = Arc::new(seeded_directory().unwrap());
    let config = AuthConfig::new()
        .with_method(AuthMethod::DevBypass)
        .with_dev_mode(true);
    let api = api_over(&directory, &config);

    let response = api.dev_fetch_api_key(EMAIL).await.unwrap();

    assert_eq!(response.email, EMAIL);
    let expected = directory.account(EMAIL).unwrap().api_key;
    assert_eq!(response.api_key, expected.as_str());
}

#[tokio::test]
async fn dev_fetch_api_key_applies_lifecycle_gate() {
    let directory = Arc::new(seeded_directory().unwrap());
    let config = AuthConfig::new()
        .with_method(AuthMethod::DevBypass)
        .with_dev_mode(true);
    let api = api_over(&directory, &config);

    directory.set_account_active(EMAIL, false);
    let err = api.dev_fetch_api_key(EMAIL).await.unwrap_err();
    assert_eq!(err.msg, "Your account has been disabled");

    directory.set_account_active(EMAIL, true);
    directory.set_realm_active(directory.default_realm_id(), false);
    let err = api.dev_fetch_api_key(EMAIL).await.unwrap_err();
    assert_eq!(err.msg, "Your realm has been deactivated");
}

#[tokio::test]
async fn dev_fetch_api_key_requires_dev_mode() {
    let directory = Arc::new(seeded_directory().unwrap());
    let config = AuthConfig::new().with_method(AuthMethod::DevBypass);
    let api = api_over(&directory, &config);

    let err = api.dev_fetch_api_key(EMAIL).await.unwrap_err();

    assert_eq!(err.msg, "Dev environment not enabled.");
    assert_eq!(err.status, 400);
}

#[tokio::test]
async fn dev_get_emails_groups_admins_and_users() {
    let directory = Arc::new(seeded_directory().unwrap());
    let config = AuthConfig::new().with_dev_mode(true);
    let api = api_over(&directory, &config);

    let response = api.dev_get_emails().await.unwrap();

    assert_eq!(response.direct_admins, ["iago@zulip.com"]);
    assert_eq!(
        response.direct_users,
        ["hamlet@zulip.com", "othello@zulip.com"]
    );
}

#[tokio::test]
async fn dev_get_emails_requires_dev_mode() {
    let directory = Arc::new(seeded_directory().unwrap());
    let api = api_over(&directory, &AuthConfig::new());

    let err = api.dev_get_emails().await.unwrap_err();

    assert_eq!(err.msg, "Dev environment not enabled.");
    assert_eq!(err.status, 400);
}

#[tokio::test]
async fn get_auth_backends_reports_registered_methods() {
    let directory = Arc::new(seeded_directory().unwrap());
    // Only OAuth2 and the dev bypass registered.
    let config = AuthConfig::new()
        .with_methods([AuthMethod::OAuth2, AuthMethod::DevBypass])
        .with_dev_mode(true);
    let api = api_over(&directory, &config);

    let response = api.get_auth_backends();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({
            "result": "success",
            "msg": "",
            "password": false,
            "google": true,
            "dev": true,
        })
    );
}

#[tokio::test]
async fn get_auth_backends_default_is_password_only() {
    let directory = Arc::new(seeded_directory().unwrap());
    let api = api_over(&directory, &AuthConfig::new());

    let response = api.get_auth_backends();

    assert!(response.password);
    assert!(!response.google);
    assert!(!response.dev);
}
