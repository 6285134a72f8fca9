use super::simulate_latency;
use crate::{auth::middleware::AuthUser, AppState};
use axum::{extract::State, Json};
use chrono::Utc;
use gpu_portal_core::{mock, DashboardSnapshot};

/// Dashboard summary, allocations, recent requests and usage chart
///
/// The chart series are re-randomized on every call.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardSnapshot),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Json<DashboardSnapshot> {
    simulate_latency(&state, |mock| mock.page_load).await;

    let now = Utc::now();
    Json(DashboardSnapshot::build(
        mock::active_allocations(now),
        mock::recent_requests(now),
        mock::cluster_availability(),
        &mut rand::rng(),
        now,
    ))
}
