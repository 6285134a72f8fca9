//! API request handlers.
//!
//! Every handler waits the configured simulated latency before answering from
//! the caller's in-memory workspace.

use crate::utils::toml_config::MockConfig;
use crate::AppState;
use std::time::Duration;

/// Sign-in, registration, password reset and logout.
pub mod auth;
/// Dashboard snapshot.
pub mod dashboard;
/// Health check.
pub mod health;
/// Notification list and read-state changes.
pub mod notifications;
/// Current user and profile edits.
pub mod profile;
/// Request history, submission and cancellation.
pub mod requests;
/// GPU catalog.
pub mod resources;

/// Sleep for the latency `pick` selects from the live `[mock]` config.
pub(crate) async fn simulate_latency(state: &AppState, pick: impl FnOnce(&MockConfig) -> u64) {
    let millis = pick(&state.config_manager.config().mock);
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
