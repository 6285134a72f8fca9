use super::simulate_latency;
use crate::{
    auth::middleware::AuthUser,
    types::{RequestFormContext, RequestFormQuery, Result},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use gpu_portal_core::{
    mock, request::RESEARCH_FIELDS, HistoryFilter, RequestForm, ResourceRequest,
};
use tracing::info;

/// Blank request form with the GPU choices and research fields
#[utoipa::path(
    get,
    path = "/api/request-form",
    params(RequestFormQuery),
    responses(
        (status = 200, description = "Form defaults and choices", body = RequestFormContext),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "requests"
)]
pub async fn request_form(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(query): Query<RequestFormQuery>,
) -> Json<RequestFormContext> {
    simulate_latency(&state, |mock| mock.request_form).await;

    Json(RequestFormContext {
        form: RequestForm::with_preselected_gpu(query.gpu.as_deref()),
        gpu_models: mock::catalog(),
        research_fields: RESEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
    })
}

/// List the caller's requests matching the filter
#[utoipa::path(
    get,
    path = "/api/requests",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Matching requests", body = Vec<ResourceRequest>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(filter): Query<HistoryFilter>,
) -> Result<Json<Vec<ResourceRequest>>> {
    simulate_latency(&state, |mock| mock.page_load).await;

    let now = Utc::now();
    let requests = state.store.read(&claims.sub, |ws| {
        ws.history
            .filter(&filter, now)
            .into_iter()
            .cloned()
            .collect()
    })?;
    Ok(Json(requests))
}

/// Submit a resource request
///
/// The form is validated field by field; the first failure is returned as
/// the error message and nothing is recorded.
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = RequestForm,
    responses(
        (status = 201, description = "Request recorded as pending", body = ResourceRequest),
        (status = 400, description = "First validation failure"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(form): Json<RequestForm>,
) -> Result<(StatusCode, Json<ResourceRequest>)> {
    let validated = form
        .validate(&mock::catalog())
        .map_err(gpu_portal_core::Error::from)?;

    simulate_latency(&state, |mock| mock.submit_request).await;

    let now = Utc::now();
    let request = state.store.write(&claims.sub, |ws| {
        let request = validated.into_request(ws.history.next_id(), now);
        ws.history.push(request.clone());
        request
    })?;

    info!(
        user_id = %claims.sub,
        request_id = %request.id,
        gpu = %request.gpu_type,
        quantity = request.quantity,
        "resource request submitted"
    );

    Ok((StatusCode::CREATED, Json(request)))
}

/// Cancel a pending request
#[utoipa::path(
    post,
    path = "/api/requests/{id}/cancel",
    params(("id" = String, Path, description = "Request id")),
    responses(
        (status = 200, description = "Cancelled request", body = ResourceRequest),
        (status = 404, description = "No such request"),
        (status = 409, description = "Request is not pending"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "requests"
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ResourceRequest>> {
    let request = state
        .store
        .write(&claims.sub, |ws| ws.history.cancel(&id).cloned())??;

    info!(user_id = %claims.sub, request_id = %id, "resource request cancelled");

    Ok(Json(request))
}
