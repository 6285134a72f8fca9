//! Global application state

use crate::types::{AuthResponse, Toast, ToastKind};
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::callback::Timeout;
use gpu_portal_core::{
    theme::DARK_CLASS, Error as CoreError, NotificationStore, Session, SessionState,
    SessionStorage, Theme, User,
};
use leptos::prelude::*;

const STORAGE_KEY_TOKEN: &str = "gpu_portal_token";
const TOAST_DURATION_MS: u32 = 4_000;

/// `localStorage`-backed session mirror. Values are stored as-is, so the
/// `user` key holds the plain JSON user record.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> gpu_portal_core::Result<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| CoreError::Storage(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> gpu_portal_core::Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| CoreError::Storage(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> gpu_portal_core::Result<()> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|e| CoreError::Storage(format!("{:?}", e)))
    }
}

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Signed-in user and loading flag, mirrored to `localStorage`
    pub session: RwSignal<Session<BrowserStorage>>,
    /// Access token for the gated API
    pub token: RwSignal<Option<String>>,
    /// Notifications shared by the top bar and the notifications page
    pub notifications: RwSignal<NotificationStore>,
    /// Whether the one-time notification fetch has completed
    pub notifications_loaded: RwSignal<bool>,
    /// Visible toasts, oldest first
    pub toasts: RwSignal<Vec<Toast>>,
    next_toast_id: RwSignal<u64>,
    /// Side menu drawer open (small screens)
    pub sidebar_open: RwSignal<bool>,
    /// Colour scheme, persisted to `localStorage`
    pub theme: RwSignal<Theme>,
    /// API base URL; empty means same origin (Trunk proxies `/api` in development)
    pub api_base: RwSignal<String>,
}

impl AppState {
    pub fn new() -> Self {
        let token: Option<String> = LocalStorage::get(STORAGE_KEY_TOKEN).ok();

        Self {
            session: RwSignal::new(Session::new(BrowserStorage)),
            token: RwSignal::new(token),
            notifications: RwSignal::new(NotificationStore::default()),
            notifications_loaded: RwSignal::new(false),
            toasts: RwSignal::new(vec![]),
            next_toast_id: RwSignal::new(0),
            sidebar_open: RwSignal::new(false),
            theme: RwSignal::new(Theme::restore(&BrowserStorage).unwrap_or_else(|e| {
                tracing::warn!("Failed to read stored theme: {}", e);
                Theme::default()
            })),
            api_base: RwSignal::new(String::new()),
        }
    }

    /// Read the stored user once at startup. A user without a token cannot
    /// reach the gated API, so that combination is signed out.
    pub fn restore_session(&self) {
        self.session.update(|session| {
            if let Err(e) = session.restore() {
                tracing::warn!("Failed to restore session: {}", e);
            }
        });

        let orphaned = self.token.get_untracked().is_none()
            && self.session.with_untracked(|s| s.is_authenticated());
        if orphaned {
            tracing::debug!("stored user has no token, signing out");
            self.sign_out();
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.session.with(|s| s.state().clone())
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.user().cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.session.with(|s| s.is_loading())
    }

    /// Mark an auth call as in flight.
    pub fn begin_auth(&self) {
        self.session.update(|s| s.begin_operation());
    }

    /// Clear the in-flight flag after a failed auth call or a password reset.
    pub fn finish_auth(&self) {
        self.session.update(|s| s.finish_operation());
    }

    pub fn save_auth(&self, auth: AuthResponse) {
        if let Err(e) = LocalStorage::set(STORAGE_KEY_TOKEN, &auth.access_token) {
            tracing::warn!("Failed to store token: {}", e);
        }
        self.token.set(Some(auth.access_token));

        self.session.update(|s| {
            if let Err(e) = s.complete_sign_in(auth.user) {
                tracing::warn!("Failed to persist session: {}", e);
            }
        });
        self.notifications_loaded.set(false);
    }

    /// Replace the signed-in user after a profile save.
    pub fn update_user(&self, user: User) {
        self.session.update(|s| {
            if let Err(e) = s.update_user(user) {
                tracing::warn!("Failed to persist profile: {}", e);
            }
        });
    }

    pub fn sign_out(&self) {
        LocalStorage::delete(STORAGE_KEY_TOKEN);
        self.token.set(None);

        self.session.update(|s| {
            if let Err(e) = s.logout() {
                tracing::warn!("Failed to clear stored session: {}", e);
            }
        });
        self.notifications.set(NotificationStore::default());
        self.notifications_loaded.set(false);
    }

    /// Flip between light and dark and remember the choice.
    pub fn toggle_theme(&self) {
        self.theme.update(|t| *t = t.toggled());
        if let Err(e) = self.theme.get_untracked().save(&mut BrowserStorage) {
            tracing::warn!("Failed to store theme: {}", e);
        }
    }

    /// Show a toast that dismisses itself.
    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_toast_id.get_untracked();
        self.next_toast_id.set(id + 1);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                kind,
                message: message.into(),
            })
        });

        let toasts = self.toasts;
        Timeout::new(TOAST_DURATION_MS, move || {
            toasts.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn dismiss_toast(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

/// Set or clear the `dark` class on `<html>`.
pub fn apply_theme(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    if let Err(e) = root.class_list().toggle_with_force(DARK_CLASS, theme.is_dark()) {
        tracing::warn!("Failed to apply theme: {:?}", e);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
