use crate::api::handlers::{
    auth, dashboard, health, notifications, profile, requests, resources,
};
use crate::auth::middleware::auth_middleware;
use crate::AppState;
use axum::{
    http::{HeaderValue, Uri},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Routes mounted under `/api`.
pub fn create_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/oauth/{provider}", post(auth::oauth_login))
        .route("/auth/forgot-password", post(auth::forgot_password));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route("/auth/logout", post(auth::logout))
        .route("/session", get(profile::session))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        // Notification routes
        .route(
            "/notifications",
            get(notifications::list_notifications).delete(notifications::clear_notifications),
        )
        .route(
            "/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/notifications/{id}",
            axum::routing::delete(notifications::delete_notification),
        )
        .route("/notifications/{id}/read", post(notifications::mark_read))
        // Catalog and requests
        .route("/resources", get(resources::list_resources))
        .route(
            "/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/request-form", get(requests::request_form))
        .route("/requests/{id}/cancel", post(requests::cancel_request))
        .route("/dashboard", get(dashboard::get_dashboard))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    public_routes
        .merge(protected_routes)
        .fallback(api_not_found)
}

async fn api_not_found(uri: Uri) -> crate::types::AppError {
    crate::types::AppError::NotFound(format!("No route for {}", uri.path()))
}

/// The full application: API, OpenAPI document, UI and HTTP layers.
pub fn build_app(state: AppState) -> Router {
    let config = state.config_manager.config();

    let app = Router::new().nest("/api", create_router(state.clone()));

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", crate::api::openapi::ApiDoc::openapi()),
        )
    };

    #[cfg(not(feature = "swagger-ui"))]
    let app = app.route("/api-docs/openapi.json", get(openapi_json));

    #[cfg(feature = "ui")]
    let app = app.fallback(crate::ui::serve_ui);

    #[cfg(not(feature = "ui"))]
    let app = {
        use tower_http::services::{ServeDir, ServeFile};
        let dist = &config.ui.dist_dir;
        app.fallback_service(
            ServeDir::new(dist).not_found_service(ServeFile::new(dist.join("index.html"))),
        )
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server.cors_origins)),
    )
    .with_state(state)
}

#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::api::openapi::ApiDoc::openapi())
}

/// Any origin when the list is empty, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
