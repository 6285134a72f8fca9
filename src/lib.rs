//! # GPU Portal
//!
//! Mock backend for a research-cluster dashboard where researchers request
//! and track GPU allocations. Every answer comes from canned data after a
//! configurable simulated latency; nothing is scheduled or persisted.
//!
//! ## Overview
//!
//! GPU Portal can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `gpu-portal` binary
//! 2. **As a library** - Build the router into your own binary or tests
//!
//! The domain model (sessions, notifications, catalog filters, the request
//! workflow, history and dashboard aggregation) lives in
//! [`gpu_portal_core`], which the Leptos UI shares.
//!
//! ### Building the App
//!
//! ```rust,ignore
//! use gpu_portal::{api::routes::build_app, AppState, PortalConfigManager};
//!
//! let config_manager = PortalConfigManager::new("gpu-portal.toml")?;
//! let state = AppState::from_config(config_manager)?;
//! let app = build_app(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ui` | Embed the Leptos UI from `ui/dist` into the binary |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |
//! | `full` | Both of the above |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - JWT authentication and middleware
//! - [`cli`] - Command-line parsing, `init` scaffolding and output
//! - [`store`] - Per-user in-memory mock state
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - TOML configuration with hot reload
//!
//! ## Configuration
//!
//! `gpu-portal.toml` holds the server, auth, mock latency and UI settings.
//! It is reloaded when the file changes; simulated latencies pick up the new
//! values on the next request.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// JWT authentication and middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Per-user mock state.
pub mod store;
/// Core types (requests, responses, errors).
pub mod types;
/// Embedded UI assets.
#[cfg(feature = "ui")]
pub mod ui;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use store::{PortalStore, Workspace};
pub use types::{AppError, Result};
pub use utils::toml_config::{PortalConfig, PortalConfigManager};

use crate::auth::jwt::AuthService;
use crate::utils::toml_config::ConfigError;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration with hot-reload support
    pub config_manager: Arc<PortalConfigManager>,
    /// Token issuing and verification
    pub auth_service: Arc<AuthService>,
    /// Per-user workspaces and revoked tokens
    pub store: Arc<PortalStore>,
}

impl AppState {
    /// State for a loaded configuration. Fails when the JWT secret is missing.
    pub fn from_config(config_manager: PortalConfigManager) -> std::result::Result<Self, ConfigError> {
        let config = config_manager.config();
        let auth_service = AuthService::new(config.jwt_secret()?, config.auth.jwt_access_expiry);

        Ok(Self {
            config_manager: Arc::new(config_manager),
            auth_service: Arc::new(auth_service),
            store: Arc::new(PortalStore::new()),
        })
    }
}
