//! Session state: the signed-in user and the loading flag.
//!
//! The session is mirrored to a key/value store under [`STORAGE_KEY_USER`].
//! The storage backend is abstracted by [`SessionStorage`] so the browser can
//! plug in `localStorage` while tests use [`MemoryStorage`].

use crate::error::Result;
use crate::mock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Storage key holding the JSON-serialized [`User`].
pub const STORAGE_KEY_USER: &str = "user";

/// The signed-in researcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Generated avatar URL for a display name.
    pub fn avatar_url(name: &str) -> String {
        let query = serde_urlencoded::to_string([("name", name), ("background", "random")])
            .unwrap_or_else(|_| "background=random".to_string());
        format!("https://ui-avatars.com/api/?{}", query)
    }

    /// Uppercased first letter of the name, shown when there is no avatar.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// The ways a user can sign in. Every variant succeeds and fabricates a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    Credentials {
        email: String,
        password: String,
    },
    Google,
    Github,
    Register {
        name: String,
        email: String,
        password: String,
        organization: String,
    },
}

impl SignIn {
    /// Fabricate the user record this sign-in resolves to.
    pub fn fabricate(&self, now: DateTime<Utc>) -> User {
        match self {
            SignIn::Credentials { email, .. } => mock::login_user(email),
            SignIn::Google => mock::google_user(),
            SignIn::Github => mock::github_user(),
            SignIn::Register {
                name,
                email,
                organization,
                ..
            } => mock::registered_user(name, email, organization, now),
        }
    }

    /// Short name used in logs.
    pub fn method(&self) -> &'static str {
        match self {
            SignIn::Credentials { .. } => "password",
            SignIn::Google => "google",
            SignIn::Github => "github",
            SignIn::Register { .. } => "register",
        }
    }
}

/// Key/value persistence for the session mirror.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory [`SessionStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a user record.
    pub fn with_user(user: &User) -> Result<Self> {
        let mut storage = Self::new();
        storage.set(STORAGE_KEY_USER, &serde_json::to_string(user)?)?;
        Ok(storage)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Snapshot of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Session state bound to its storage mirror.
///
/// A new session starts loading; [`Session::restore`] reads the stored record
/// once and clears the flag. Network-backed operations bracket themselves
/// with [`Session::begin_operation`] and either [`Session::complete_sign_in`]
/// or [`Session::finish_operation`].
#[derive(Debug, Clone)]
pub struct Session<S> {
    state: SessionState,
    storage: S,
}

impl<S: SessionStorage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self {
            state: SessionState {
                user: None,
                is_loading: true,
            },
            storage,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Restore the user from storage. A corrupt record is discarded.
    pub fn restore(&mut self) -> Result<Option<&User>> {
        let stored = self.storage.get(STORAGE_KEY_USER);
        self.state.is_loading = false;

        match stored? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    debug!(user_id = %user.id, "session restored");
                    self.state.user = Some(user);
                }
                Err(e) => {
                    warn!("discarding unreadable stored session: {}", e);
                    self.storage.remove(STORAGE_KEY_USER)?;
                    self.state.user = None;
                }
            },
            None => self.state.user = None,
        }

        Ok(self.state.user.as_ref())
    }

    pub fn begin_operation(&mut self) {
        self.state.is_loading = true;
    }

    /// Clear the loading flag without changing the user (failed sign-in,
    /// password reset).
    pub fn finish_operation(&mut self) {
        self.state.is_loading = false;
    }

    /// Install a signed-in user and mirror it to storage.
    pub fn complete_sign_in(&mut self, user: User) -> Result<()> {
        self.state.is_loading = false;
        self.persist(&user)?;
        debug!(user_id = %user.id, "signed in");
        self.state.user = Some(user);
        Ok(())
    }

    /// Replace the current user's details (profile save).
    pub fn update_user(&mut self, user: User) -> Result<()> {
        self.persist(&user)?;
        self.state.user = Some(user);
        Ok(())
    }

    /// Clear the session and its stored record.
    pub fn logout(&mut self) -> Result<()> {
        self.state.user = None;
        self.state.is_loading = false;
        self.storage.remove(STORAGE_KEY_USER)?;
        debug!("signed out");
        Ok(())
    }

    fn persist(&mut self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(STORAGE_KEY_USER, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mockall::predicate::eq;

    fn sample_user() -> User {
        mock::login_user("ada@lab.org")
    }

    #[test]
    fn new_session_is_loading_and_anonymous() {
        let session = Session::new(MemoryStorage::new());
        assert!(session.is_loading());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn restore_without_record_stays_anonymous() {
        let mut session = Session::new(MemoryStorage::new());
        let restored = session.restore().expect("restore");
        assert!(restored.is_none());
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn restore_reads_stored_user() {
        let user = sample_user();
        let storage = MemoryStorage::with_user(&user).expect("storage");
        let mut session = Session::new(storage);

        session.restore().expect("restore");

        assert_eq!(session.user(), Some(&user));
    }

    #[test]
    fn restore_discards_corrupt_record() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY_USER, "{not json").expect("set");
        let mut session = Session::new(storage);

        let restored = session.restore().expect("restore");

        assert!(restored.is_none());
        assert_eq!(session.storage().get(STORAGE_KEY_USER).expect("get"), None);
    }

    #[test]
    fn sign_in_mirrors_user_to_storage() {
        let mut session = Session::new(MemoryStorage::new());
        session.restore().expect("restore");
        session.begin_operation();
        assert!(session.is_loading());

        session.complete_sign_in(sample_user()).expect("sign in");

        assert!(!session.is_loading());
        let raw = session
            .storage()
            .get(STORAGE_KEY_USER)
            .expect("get")
            .expect("stored record");
        let stored: User = serde_json::from_str(&raw).expect("json");
        assert_eq!(stored.email, "ada@lab.org");
    }

    #[test]
    fn logout_clears_state_and_record() {
        let mut session = Session::new(MemoryStorage::new());
        session.complete_sign_in(sample_user()).expect("sign in");

        session.logout().expect("logout");

        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get(STORAGE_KEY_USER).expect("get"), None);

        // A reload afterwards finds nothing to restore.
        let mut reloaded = Session::new(session.storage().clone());
        assert!(reloaded.restore().expect("restore").is_none());
    }

    #[test]
    fn logout_removes_the_user_key() {
        let mut storage = MockSessionStorage::new();
        storage
            .expect_set()
            .with(eq(STORAGE_KEY_USER), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_remove()
            .with(eq(STORAGE_KEY_USER))
            .times(1)
            .returning(|_| Ok(()));

        let mut session = Session::new(storage);
        session.complete_sign_in(sample_user()).expect("sign in");
        session.logout().expect("logout");
    }

    #[test]
    fn storage_failure_surfaces_on_restore() {
        let mut storage = MockSessionStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(Error::Storage("quota exceeded".to_string())));

        let mut session = Session::new(storage);

        assert!(matches!(session.restore(), Err(Error::Storage(_))));
        assert!(!session.is_loading());
    }

    #[test]
    fn fabricated_users_match_sign_in_method() {
        let now = Utc::now();
        let google = SignIn::Google.fabricate(now);
        assert_eq!(google.id, "789012");
        assert_eq!(google.email, "google.user@example.com");

        let github = SignIn::Github.fabricate(now);
        assert_eq!(github.role, "developer");

        let registered = SignIn::Register {
            name: "Grace Hopper".to_string(),
            email: "grace@navy.mil".to_string(),
            password: "secret".to_string(),
            organization: "Navy".to_string(),
        }
        .fabricate(now);
        assert_eq!(
            registered.id,
            format!("{}-{}", mock::account_id("grace@navy.mil"), now.timestamp_millis())
        );
        assert_eq!(registered.organization, "Navy");
        assert_eq!(registered.role, "researcher");
    }

    #[test]
    fn password_sign_ins_get_one_account_per_email() {
        let now = Utc::now();
        let credentials = |email: &str| SignIn::Credentials {
            email: email.to_string(),
            password: "pw".to_string(),
        };

        let alice = credentials("alice@lab.org").fabricate(now);
        let bob = credentials("bob@lab.org").fabricate(now);
        assert_ne!(alice.id, bob.id);
        assert_eq!(alice.id.len(), 12);

        // Same address, any casing or padding, same account
        let again = credentials(" Alice@Lab.org ").fabricate(now);
        assert_eq!(again.id, alice.id);
    }

    #[test]
    fn same_millisecond_registrations_stay_apart() {
        let now = Utc::now();
        let register = |email: &str| SignIn::Register {
            name: "New User".to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
            organization: "Lab".to_string(),
        };

        let first = register("one@lab.org").fabricate(now);
        let second = register("two@lab.org").fabricate(now);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn avatar_url_encodes_name() {
        assert_eq!(
            User::avatar_url("Test User"),
            "https://ui-avatars.com/api/?name=Test+User&background=random"
        );
    }

    #[test]
    fn user_serialization_omits_missing_avatar() {
        let mut user = sample_user();
        user.avatar = None;
        let json = serde_json::to_value(&user).expect("json");
        assert!(json.get("avatar").is_none());
    }
}
