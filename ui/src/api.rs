//! API client for the GPU Portal backend

use crate::state::AppState;
use crate::types::*;
use gloo_net::http::{Request, RequestBuilder, Response};
use gpu_portal_core::{
    DashboardSnapshot, GpuResource, ProfileDraft, RequestForm, ResourceRequest, User,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn authorize(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(t) => req.header("Authorization", &format!("Bearer {}", t)),
        None => req,
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, String> {
    if !resp.ok() {
        let status = resp.status();
        if let Ok(err) = resp.json::<ApiError>().await {
            return Err(err.error);
        }
        return Err(format!("Request failed with status {}", status));
    }

    resp.json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Bodyless request with optional authentication
async fn send_with_auth<R: serde::de::DeserializeOwned>(
    req: RequestBuilder,
    token: Option<&str>,
) -> Result<R, String> {
    let resp = authorize(req, token)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read_json(resp).await
}

/// GET with optional authentication
pub async fn fetch_with_auth<T: serde::de::DeserializeOwned>(
    url: &str,
    token: Option<&str>,
) -> Result<T, String> {
    send_with_auth(Request::get(url), token).await
}

/// POST a JSON body with optional authentication
pub async fn post_with_auth<T, R>(url: &str, body: &T, token: Option<&str>) -> Result<R, String>
where
    T: serde::Serialize,
    R: serde::de::DeserializeOwned,
{
    let req = authorize(Request::post(url), token)
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    let resp = req
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read_json(resp).await
}

/// PUT a JSON body with authentication
pub async fn put_with_auth<T, R>(url: &str, body: &T, token: &str) -> Result<R, String>
where
    T: serde::Serialize,
    R: serde::de::DeserializeOwned,
{
    let req = authorize(Request::put(url), Some(token))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    let resp = req
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read_json(resp).await
}

// ============= Auth =============

pub async fn login(base_url: &str, email: &str, password: &str) -> Result<AuthResponse, String> {
    let url = format!("{}/api/auth/login", base_url);
    let body = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    post_with_auth(&url, &body, None).await
}

pub async fn register(base_url: &str, body: &RegisterRequest) -> Result<AuthResponse, String> {
    let url = format!("{}/api/auth/register", base_url);
    post_with_auth(&url, body, None).await
}

/// Sign in with `google` or `github`
pub async fn oauth_login(base_url: &str, provider: &str) -> Result<AuthResponse, String> {
    let url = format!("{}/api/auth/oauth/{}", base_url, provider);
    send_with_auth(Request::post(&url), None).await
}

pub async fn forgot_password(base_url: &str, email: &str) -> Result<MessageResponse, String> {
    let url = format!("{}/api/auth/forgot-password", base_url);
    let body = ForgotPasswordRequest {
        email: email.to_string(),
    };
    post_with_auth(&url, &body, None).await
}

pub async fn logout(base_url: &str, token: &str) -> Result<MessageResponse, String> {
    let url = format!("{}/api/auth/logout", base_url);
    send_with_auth(Request::post(&url), Some(token)).await
}

// ============= Profile =============

pub async fn fetch_profile(base_url: &str, token: &str) -> Result<User, String> {
    let url = format!("{}/api/profile", base_url);
    fetch_with_auth(&url, Some(token)).await
}

pub async fn update_profile(
    base_url: &str,
    token: &str,
    draft: &ProfileDraft,
) -> Result<User, String> {
    let url = format!("{}/api/profile", base_url);
    put_with_auth(&url, draft, token).await
}

// ============= Notifications =============

pub async fn fetch_notifications(
    base_url: &str,
    token: &str,
) -> Result<NotificationsResponse, String> {
    let url = format!("{}/api/notifications", base_url);
    fetch_with_auth(&url, Some(token)).await
}

pub async fn mark_notification_read(
    base_url: &str,
    token: &str,
    id: &str,
) -> Result<NotificationsResponse, String> {
    let url = format!("{}/api/notifications/{}/read", base_url, id);
    send_with_auth(Request::post(&url), Some(token)).await
}

pub async fn mark_all_notifications_read(
    base_url: &str,
    token: &str,
) -> Result<NotificationsResponse, String> {
    let url = format!("{}/api/notifications/read-all", base_url);
    send_with_auth(Request::post(&url), Some(token)).await
}

pub async fn delete_notification(
    base_url: &str,
    token: &str,
    id: &str,
) -> Result<NotificationsResponse, String> {
    let url = format!("{}/api/notifications/{}", base_url, id);
    send_with_auth(Request::delete(&url), Some(token)).await
}

pub async fn clear_notifications(
    base_url: &str,
    token: &str,
) -> Result<NotificationsResponse, String> {
    let url = format!("{}/api/notifications", base_url);
    send_with_auth(Request::delete(&url), Some(token)).await
}

// ============= Resources and requests =============

pub async fn fetch_resources(base_url: &str, token: &str) -> Result<Vec<GpuResource>, String> {
    let url = format!("{}/api/resources", base_url);
    fetch_with_auth(&url, Some(token)).await
}

pub async fn fetch_request_form(
    base_url: &str,
    token: &str,
    gpu: Option<&str>,
) -> Result<RequestFormContext, String> {
    let url = match gpu {
        Some(gpu) => {
            let query = serde_urlencoded::to_string([("gpu", gpu)])
                .map_err(|e| format!("Failed to encode query: {}", e))?;
            format!("{}/api/request-form?{}", base_url, query)
        }
        None => format!("{}/api/request-form", base_url),
    };
    fetch_with_auth(&url, Some(token)).await
}

pub async fn submit_request(
    base_url: &str,
    token: &str,
    form: &RequestForm,
) -> Result<ResourceRequest, String> {
    let url = format!("{}/api/requests", base_url);
    post_with_auth(&url, form, Some(token)).await
}

pub async fn fetch_requests(base_url: &str, token: &str) -> Result<Vec<ResourceRequest>, String> {
    let url = format!("{}/api/requests", base_url);
    fetch_with_auth(&url, Some(token)).await
}

pub async fn cancel_request(
    base_url: &str,
    token: &str,
    id: &str,
) -> Result<ResourceRequest, String> {
    let url = format!("{}/api/requests/{}/cancel", base_url, id);
    send_with_auth(Request::post(&url), Some(token)).await
}

pub async fn fetch_dashboard(base_url: &str, token: &str) -> Result<DashboardSnapshot, String> {
    let url = format!("{}/api/dashboard", base_url);
    fetch_with_auth(&url, Some(token)).await
}

// ============= State loaders =============

/// Load notifications into app state once per session
pub fn load_notifications(state: AppState) {
    spawn_local(async move {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        match fetch_notifications(&base, &token).await {
            Ok(resp) => {
                state.notifications.update(|store| store.load(resp.notifications));
                state.notifications_loaded.set(true);
            }
            Err(e) => tracing::error!("Failed to load notifications: {}", e),
        }
    });
}

/// Notification change already applied locally; mirror it to the backend.
#[derive(Debug, Clone)]
pub enum NotificationSync {
    MarkRead(String),
    MarkAllRead,
    Delete(String),
    ClearAll,
}

pub fn sync_notifications(state: AppState, change: NotificationSync) {
    spawn_local(async move {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        let result = match &change {
            NotificationSync::MarkRead(id) => mark_notification_read(&base, &token, id).await,
            NotificationSync::MarkAllRead => mark_all_notifications_read(&base, &token).await,
            NotificationSync::Delete(id) => delete_notification(&base, &token, id).await,
            NotificationSync::ClearAll => clear_notifications(&base, &token).await,
        };
        if let Err(e) = result {
            tracing::warn!("Failed to sync notification change {:?}: {}", change, e);
        }
    });
}
