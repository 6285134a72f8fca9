use gpu_portal_core::{Notification, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= Authentication Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub organization: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Successful sign-in: the fabricated user plus a token for the gated API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    /// Token id; tokens minted in the same second stay distinct
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

// ============= Generic Responses =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

// ============= Notification Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    /// `all`, `unread` or `read`
    #[serde(default)]
    pub filter: gpu_portal_core::ReadFilter,
}

// ============= Request Form Types =============

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestFormQuery {
    /// Catalog id to preselect
    pub gpu: Option<String>,
}

/// Everything the request form needs to render.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RequestFormContext {
    pub form: gpu_portal_core::RequestForm,
    pub gpu_models: Vec<gpu_portal_core::GpuResource>,
    pub research_fields: Vec<String>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<gpu_portal_core::Error> for AppError {
    fn from(err: gpu_portal_core::Error) -> Self {
        use gpu_portal_core::Error;
        match err {
            Error::Validation(e) => AppError::InvalidInput(e.to_string()),
            Error::InvalidInput(msg) => AppError::InvalidInput(msg),
            Error::NotFound(id) => AppError::NotFound(format!("Request '{}' not found", id)),
            e @ (Error::InvalidTransition { .. } | Error::Workflow(_)) => {
                AppError::Conflict(e.to_string())
            }
            e @ (Error::Storage(_) | Error::Serialization(_)) => AppError::Internal(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Auth(msg) => (axum::http::StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (axum::http::StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
