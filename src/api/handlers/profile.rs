use super::simulate_latency;
use crate::{auth::middleware::AuthUser, types::Result, AppState};
use axum::{extract::State, Json};
use gpu_portal_core::{ProfileDraft, User};
use tracing::info;

/// Current session user
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Signed-in user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "profile"
)]
pub async fn session(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<User>> {
    let user = state.store.read(&claims.sub, |ws| ws.user.clone())?;
    Ok(Json(user))
}

/// Get the profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<User>> {
    simulate_latency(&state, |mock| mock.page_load).await;
    session(State(state), AuthUser(claims)).await
}

/// Update the profile
///
/// Id and role are kept; the rest comes from the draft.
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = ProfileDraft,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Name or email missing"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(draft): Json<ProfileDraft>,
) -> Result<Json<User>> {
    simulate_latency(&state, |mock| mock.profile_save).await;

    let user = state.store.write(&claims.sub, |ws| {
        draft.apply_to(&ws.user).map(|updated| {
            ws.user = updated.clone();
            updated
        })
    })??;

    info!(user_id = %user.id, "profile updated");

    Ok(Json(user))
}
