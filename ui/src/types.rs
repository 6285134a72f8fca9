//! API request/response types mirrored from the backend, plus UI-only types

use gpu_portal_core::{GpuResource, Notification, RequestForm, User};
use serde::{Deserialize, Serialize};

// ============= Auth =============

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub organization: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: String,
}

// ============= Notifications =============

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

// ============= Requests =============

#[derive(Debug, Clone, Deserialize)]
pub struct RequestFormContext {
    pub form: RequestForm,
    pub gpu_models: Vec<GpuResource>,
    pub research_fields: Vec<String>,
}

// ============= Toasts =============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "toast-info",
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}
