use super::simulate_latency;
use crate::{
    auth::middleware::AuthUser,
    types::{AppError, MessageResponse, NotificationQuery, NotificationsResponse, Result},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use gpu_portal_core::NotificationStore;
use tracing::debug;

fn snapshot(store: &NotificationStore, query: &NotificationQuery) -> NotificationsResponse {
    NotificationsResponse {
        notifications: store.filter(query.filter).into_iter().cloned().collect(),
        unread_count: store.unread_count(),
    }
}

/// List notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications, newest first", body = NotificationsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationsResponse>> {
    simulate_latency(&state, |mock| mock.notifications).await;

    let response = state
        .store
        .read(&claims.sub, |ws| snapshot(&ws.notifications, &query))?;
    Ok(Json(response))
}

/// Mark every notification as read
#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All marked read", body = NotificationsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<NotificationsResponse>> {
    let response = state.store.write(&claims.sub, |ws| {
        ws.notifications.mark_all_as_read();
        snapshot(&ws.notifications, &NotificationQuery::default())
    })?;
    Ok(Json(response))
}

/// Mark one notification as read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = NotificationsResponse),
        (status = 404, description = "No such notification"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<NotificationsResponse>> {
    let response = state.store.write(&claims.sub, |ws| {
        ws.notifications
            .mark_as_read(&id)
            .then(|| snapshot(&ws.notifications, &NotificationQuery::default()))
    })?;

    response.map(Json).ok_or_else(|| missing(&id))
}

/// Delete one notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Deleted", body = NotificationsResponse),
        (status = 404, description = "No such notification"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<NotificationsResponse>> {
    let response = state.store.write(&claims.sub, |ws| {
        ws.notifications
            .delete(&id)
            .then(|| snapshot(&ws.notifications, &NotificationQuery::default()))
    })?;

    debug!(user_id = %claims.sub, notification_id = %id, "notification deleted");

    response.map(Json).ok_or_else(|| missing(&id))
}

/// Delete every notification
#[utoipa::path(
    delete,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Cleared", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn clear_notifications(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MessageResponse>> {
    state
        .store
        .write(&claims.sub, |ws| ws.notifications.clear_all())?;
    Ok(Json(MessageResponse::new("All notifications cleared")))
}

fn missing(id: &str) -> AppError {
    AppError::NotFound(format!("Notification '{}' not found", id))
}
