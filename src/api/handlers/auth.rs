use super::simulate_latency;
use crate::{
    auth::middleware::{bearer_token, AuthUser},
    types::{
        AppError, AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse,
        RegisterRequest, Result,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use gpu_portal_core::SignIn;
use tracing::info;

/// Fabricate the user for `method`, seed their workspace and issue a token.
async fn sign_in(state: &AppState, method: SignIn) -> Result<Json<AuthResponse>> {
    simulate_latency(state, |mock| mock.auth).await;

    let now = Utc::now();
    let user = method.fabricate(now);
    let token = state.auth_service.generate_token(&user.id, &user.email)?;
    state.store.sign_in(user.clone(), now);

    info!(user_id = %user.id, method = method.method(), "signed in");

    Ok(Json(AuthResponse {
        user,
        access_token: token.access_token,
        expires_in: token.expires_in,
    }))
}

/// Login with email and password
///
/// Credentials are not checked; any email signs in as the demo researcher.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if payload.email.trim().is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()));
    }

    sign_in(
        &state,
        SignIn::Credentials {
            email: payload.email,
            password: payload.password,
        },
    )
    .await
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = AuthResponse),
        (status = 400, description = "Missing name or email")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Name and email are required".to_string(),
        ));
    }

    sign_in(
        &state,
        SignIn::Register {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            organization: payload.organization,
        },
    )
    .await
}

/// Sign in through an identity provider
#[utoipa::path(
    post,
    path = "/api/auth/oauth/{provider}",
    params(("provider" = String, Path, description = "`google` or `github`")),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 404, description = "Unknown provider")
    ),
    tag = "auth"
)]
pub async fn oauth_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<AuthResponse>> {
    let method = match provider.as_str() {
        "google" => SignIn::Google,
        "github" => SignIn::Github,
        other => {
            return Err(AppError::NotFound(format!(
                "Unknown identity provider '{}'",
                other
            )))
        }
    };

    sign_in(&state, method).await
}

/// Request a password reset link
///
/// Always succeeds; no email is sent.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset requested", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    simulate_latency(&state, |mock| mock.auth).await;

    info!(email = %payload.email, "password reset requested");

    Ok(Json(MessageResponse::new(format!(
        "If an account exists for {}, a reset link is on its way",
        payload.email
    ))))
}

/// Sign out, revoking the presented token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;
    let expires_at =
        DateTime::from_timestamp(claims.exp as i64, 0).unwrap_or(DateTime::<Utc>::MAX_UTC);
    state
        .store
        .revoke(state.auth_service.hash_token(token), expires_at, Utc::now());

    info!(user_id = %claims.sub, "signed out");

    Ok(Json(MessageResponse::new("Signed out")))
}
