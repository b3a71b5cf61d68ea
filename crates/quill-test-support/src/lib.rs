//! In-memory implementations of the quill-auth ports plus canonical
//! fixtures, shared by the integration suites.

#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use quill_auth::{
    AccountLookupPort, AccountProvisioningPort, AuthError, AuthResult, RealmStatePort,
    SessionPort,
};
use quill_model::{Account, Realm};
use uuid::Uuid;

/// The password every seeded fixture account can authenticate with.
pub const FIXTURE_PASSWORD: &str = "testpassword";

/// In-memory account and realm store implementing the lookup, state,
/// and provisioning ports. Lifecycle flags are mutable so tests can
/// deactivate and reactivate entities mid-scenario.
pub struct InMemoryDirectory {
    realms: Mutex<HashMap<Uuid, Realm>>,
    accounts: Mutex<HashMap<String, Account>>,
    default_realm_id: Uuid,
}

impl InMemoryDirectory {
    /// Creates an empty store whose provisioned accounts land in the
    /// given realm.
    #[must_use]
    pub fn new(default_realm: Realm) -> Self {
        let default_realm_id = default_realm.id;
        Self {
            realms: Mutex::new(HashMap::from([(default_realm_id, default_realm)])),
            accounts: Mutex::new(HashMap::new()),
            default_realm_id,
        }
    }

    /// The realm provisioned accounts are placed in.
    #[must_use]
    pub const fn default_realm_id(&self) -> Uuid {
        self.default_realm_id
    }

    /// Adds a realm.
    pub fn add_realm(&self, realm: Realm) {
        self.realms.lock().unwrap().insert(realm.id, realm);
    }

    /// Adds an account.
    pub fn add_account(&self, account: Account) {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.email.clone(), account);
    }

    /// Returns a snapshot of an account by email.
    #[must_use]
    pub fn account(&self, email: &str) -> Option<Account> {
        self.accounts.lock().unwrap().get(&email.to_lowercase()).cloned()
    }

    /// Toggles an account's active flag.
    pub fn set_account_active(&self, email: &str, active: bool) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&email.to_lowercase()) {
            account.enabled = active;
        }
    }

    /// Toggles a realm's active flag.
    pub fn set_realm_active(&self, realm_id: Uuid, active: bool) {
        if let Some(realm) = self.realms.lock().unwrap().get_mut(&realm_id) {
            realm.enabled = active;
        }
    }
}

#[async_trait]
impl AccountLookupPort for InMemoryDirectory {
    async fn by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        Ok(self.account(email))
    }

    async fn list(&self) -> AuthResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.lock().unwrap().values().cloned().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(accounts)
    }
}

#[async_trait]
impl RealmStatePort for InMemoryDirectory {
    async fn realm_active(&self, realm_id: Uuid) -> AuthResult<bool> {
        Ok(self
            .realms
            .lock()
            .unwrap()
            .get(&realm_id)
            .is_some_and(|r| r.enabled))
    }

    async fn account_active(&self, account_id: Uuid) -> AuthResult<bool> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.id == account_id)
            .is_some_and(|a| a.enabled))
    }
}

#[async_trait]
impl AccountProvisioningPort for InMemoryDirectory {
    async fn upsert_directory_account(&self, email: &str, full_name: &str) -> AuthResult<Account> {
        let key = email.to_lowercase();
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .entry(key.clone())
            .or_insert_with(|| Account::new(self.default_realm_id, key));
        account.full_name = full_name.to_string();
        Ok(account.clone())
    }
}

/// Session port that records which accounts were logged in.
#[derive(Default)]
pub struct RecordingSessions {
    logins: Mutex<Vec<String>>,
}

impl RecordingSessions {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails of accounts a session was established for, in order.
    #[must_use]
    pub fn logins(&self) -> Vec<String> {
        self.logins.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionPort for RecordingSessions {
    async fn complete_login(&self, account: &Account) -> AuthResult<()> {
        self.logins.lock().unwrap().push(account.email.clone());
        Ok(())
    }
}

/// Seeds the canonical fixture realm and accounts.
///
/// `hamlet@zulip.com` and `othello@zulip.com` are regular users;
/// `iago@zulip.com` is a realm administrator. All three can authenticate
/// with [`FIXTURE_PASSWORD`].
///
/// # Errors
///
/// Returns `AuthError::Internal` if fixture password hashing fails.
pub fn seeded_directory() -> Result<InMemoryDirectory, AuthError> {
    let hasher = quill_auth::Argon2PasswordHash::new();
    let realm = Realm::new("zulip");
    let realm_id = realm.id;
    let directory = InMemoryDirectory::new(realm);

    for (email, name, admin) in [
        ("hamlet@zulip.com", "King Hamlet", false),
        ("othello@zulip.com", "Othello", false),
        ("iago@zulip.com", "Iago", true),
    ] {
        let account = Account::new(realm_id, email)
            .with_full_name(name)
            .with_is_admin(admin)
            .with_password_hash(hasher.hash(FIXTURE_PASSWORD)?);
        directory.add_account(account);
    }
    Ok(directory)
}
