//! HTTP API Handlers and Routes
//!
//! The mock backend's REST layer, built on Axum. Handlers wait the configured
//! simulated latency and answer from canned, per-user in-memory data.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::openapi`](crate::api::openapi) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/login` - Sign in with email and password
//! - `POST /api/auth/register` - Create an account and sign in
//! - `POST /api/auth/oauth/{provider}` - Sign in with `google` or `github`
//! - `POST /api/auth/forgot-password` - Request a reset link
//! - `POST /api/auth/logout` - Revoke the current token
//!
//! ## Profile
//! - `GET /api/session` - Signed-in user
//! - `GET /api/profile`, `PUT /api/profile` - Read and edit the profile
//!
//! ## Notifications (`/api/notifications`)
//! - `GET /api/notifications?filter=all|unread|read` - List with unread count
//! - `POST /api/notifications/read-all` - Mark all read
//! - `POST /api/notifications/{id}/read` - Mark one read
//! - `DELETE /api/notifications/{id}` - Delete one
//! - `DELETE /api/notifications` - Clear all
//!
//! ## Resources and Requests
//! - `GET /api/resources` - Filtered GPU catalog
//! - `GET /api/request-form?gpu=` - Form defaults, GPU choices and research fields
//! - `GET /api/requests` - Filtered request history
//! - `POST /api/requests` - Submit a request form
//! - `POST /api/requests/{id}/cancel` - Cancel a pending request
//! - `GET /api/dashboard` - Summary, allocations and usage chart
//!
//! ## Health (`/api/health`)
//! - `GET /api/health` - Health check endpoint
//!
//! # Authentication
//!
//! Everything except health and sign-in requires the token returned at
//! sign-in:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The document is served at `/api-docs/openapi.json`. With the `swagger-ui`
//! feature, interactive documentation is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Aggregated OpenAPI document.
pub mod openapi;
/// Router configuration and route definitions.
pub mod routes;
