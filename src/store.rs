//! Per-user mock state.
//!
//! Each signed-in user gets a workspace seeded from the canned data on first
//! sign-in. Workspaces live in memory only and are lost on restart.

use crate::types::{AppError, Result};
use chrono::{DateTime, Utc};
use gpu_portal_core::{mock, NotificationStore, RequestHistory, User};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// One user's notifications, request history and profile.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub user: User,
    pub notifications: NotificationStore,
    pub history: RequestHistory,
}

impl Workspace {
    pub fn seeded(user: User, now: DateTime<Utc>) -> Self {
        Self {
            user,
            notifications: NotificationStore::new(mock::notifications(now)),
            history: RequestHistory::new(mock::request_history(now)),
        }
    }
}

/// All workspaces plus the revoked-token list. Locks are never held across
/// an `.await`.
#[derive(Debug, Default)]
pub struct PortalStore {
    workspaces: RwLock<HashMap<String, Workspace>>,
    /// Revoked token hash -> the token's own expiry
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl PortalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sign-in. An existing workspace keeps its data and takes the
    /// new user record; otherwise one is seeded.
    pub fn sign_in(&self, user: User, now: DateTime<Utc>) {
        let mut workspaces = self.workspaces.write();
        match workspaces.get_mut(&user.id) {
            Some(workspace) => workspace.user = user,
            None => {
                debug!(user_id = %user.id, "seeding workspace");
                workspaces.insert(user.id.clone(), Workspace::seeded(user, now));
            }
        }
    }

    pub fn read<R>(&self, user_id: &str, f: impl FnOnce(&Workspace) -> R) -> Result<R> {
        let workspaces = self.workspaces.read();
        workspaces.get(user_id).map(f).ok_or_else(|| unknown(user_id))
    }

    pub fn write<R>(&self, user_id: &str, f: impl FnOnce(&mut Workspace) -> R) -> Result<R> {
        let mut workspaces = self.workspaces.write();
        workspaces.get_mut(user_id).map(f).ok_or_else(|| unknown(user_id))
    }

    /// Remember a token as revoked until it would have expired anyway.
    /// Entries whose expiry has passed are dropped on the way in.
    pub fn revoke(&self, token_hash: String, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        let mut revoked = self.revoked.write();
        let before = revoked.len();
        revoked.retain(|_, exp| *exp > now);
        if revoked.len() < before {
            debug!(pruned = before - revoked.len(), "pruned expired revocations");
        }
        if expires_at > now {
            revoked.insert(token_hash, expires_at);
        }
    }

    pub fn is_revoked(&self, token_hash: &str) -> bool {
        self.revoked.read().contains_key(token_hash)
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked.read().len()
    }

    pub fn user_count(&self) -> usize {
        self.workspaces.read().len()
    }
}

fn unknown(user_id: &str) -> AppError {
    AppError::Auth(format!(
        "No session for user '{}'; please sign in again",
        user_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gpu_portal_core::RequestStatus;

    #[test]
    fn sign_in_seeds_once() {
        let store = PortalStore::new();
        let now = Utc::now();
        let user = mock::login_user("a@lab.org");
        let id = user.id.clone();
        store.sign_in(user, now);

        store
            .write(&id, |ws| ws.history.cancel("103").map(|_| ()))
            .expect("workspace")
            .expect("cancel");

        // Signing in again keeps the history but refreshes the user record
        let mut renamed = mock::login_user("a@lab.org");
        renamed.name = "Ada".to_string();
        store.sign_in(renamed, now);

        let (name, status) = store
            .read(&id, |ws| {
                (ws.user.name.clone(), ws.history.get("103").map(|r| r.status))
            })
            .expect("workspace");
        assert_eq!(name, "Ada");
        assert_eq!(status, Some(RequestStatus::Cancelled));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn password_users_with_different_emails_do_not_share() {
        let store = PortalStore::new();
        let now = Utc::now();
        let alice = mock::login_user("alice@lab.org");
        let bob = mock::login_user("bob@lab.org");
        let (alice_id, bob_id) = (alice.id.clone(), bob.id.clone());
        store.sign_in(alice, now);
        store
            .write(&alice_id, |ws| ws.history.cancel("106").map(|_| ()))
            .expect("workspace")
            .expect("cancel");
        store.sign_in(bob, now);

        assert_eq!(store.user_count(), 2);
        let alice_email = store
            .read(&alice_id, |ws| ws.user.email.clone())
            .expect("workspace");
        assert_eq!(alice_email, "alice@lab.org");
        let bob_status = store
            .read(&bob_id, |ws| ws.history.get("106").map(|r| r.status))
            .expect("workspace");
        assert_eq!(bob_status, Some(RequestStatus::Pending));
    }

    #[test]
    fn workspaces_are_isolated() {
        let store = PortalStore::new();
        let now = Utc::now();
        store.sign_in(mock::google_user(), now);
        store.sign_in(mock::github_user(), now);

        store
            .write("789012", |ws| ws.notifications.clear_all())
            .expect("workspace");

        let github_unread = store
            .read("345678", |ws| ws.notifications.unread_count())
            .expect("workspace");
        assert_eq!(github_unread, 2);
    }

    #[test]
    fn unknown_user_is_an_auth_error() {
        let store = PortalStore::new();
        assert!(matches!(
            store.read("nobody", |_| ()),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn revocation() {
        let store = PortalStore::new();
        let now = Utc::now();
        assert!(!store.is_revoked("abc"));
        store.revoke("abc".to_string(), now + Duration::minutes(15), now);
        assert!(store.is_revoked("abc"));
    }

    #[test]
    fn expired_revocations_are_pruned_on_insert() {
        let store = PortalStore::new();
        let now = Utc::now();
        store.revoke("old".to_string(), now + Duration::minutes(1), now);
        store.revoke("fresh".to_string(), now + Duration::minutes(30), now);
        assert_eq!(store.revoked_count(), 2);

        // Ten minutes on, "old" has expired and goes on the next insert
        let later = now + Duration::minutes(10);
        store.revoke("newer".to_string(), later + Duration::minutes(15), later);
        assert!(!store.is_revoked("old"));
        assert!(store.is_revoked("fresh"));
        assert!(store.is_revoked("newer"));
        assert_eq!(store.revoked_count(), 2);

        // A token that is already expired is not worth remembering
        store.revoke("stale".to_string(), later - Duration::seconds(1), later);
        assert!(!store.is_revoked("stale"));
    }
}
