//! Token authentication for the gated API
//!
//! Sign-in endpoints fabricate a user and issue an access token; every other
//! `/api` route requires it.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - token encoding, decoding and hashing
//! - [`auth::middleware`](crate::auth::middleware) - Axum middleware and extractor
//!
//! # Usage
//!
//! ```ignore
//! use gpu_portal::auth::middleware::AuthUser;
//!
//! async fn protected_handler(AuthUser(claims): AuthUser) -> String {
//!     format!("Hello, {}!", claims.email)
//! }
//! ```
//!
//! Logging out revokes the presented token by storing its SHA-256 hash.
//!
//! # Configuration
//!
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"   # env var holding the secret (min 32 chars)
//! jwt_access_expiry = 900         # token validity in seconds
//! ```

/// JWT token generation, validation and hashing.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
