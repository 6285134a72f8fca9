use super::simulate_latency;
use crate::{auth::middleware::AuthUser, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use gpu_portal_core::{mock, GpuResource, ResourceFilter};

/// List GPU models matching the filter
#[utoipa::path(
    get,
    path = "/api/resources",
    params(ResourceFilter),
    responses(
        (status = 200, description = "Matching GPU models", body = Vec<GpuResource>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "resources"
)]
pub async fn list_resources(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(filter): Query<ResourceFilter>,
) -> Json<Vec<GpuResource>> {
    simulate_latency(&state, |mock| mock.page_load).await;

    let catalog = mock::catalog();
    Json(filter.apply(&catalog).into_iter().cloned().collect())
}
