use crate::api::handlers;
use crate::types::{
    AuthResponse, ForgotPasswordRequest, HealthResponse, LoginRequest, MessageResponse,
    NotificationsResponse, RegisterRequest, RequestFormContext,
};
use gpu_portal_core::{
    ActiveAllocation, AllocationStatus, ClusterAvailability, DashboardSnapshot, DashboardSummary,
    GpuResource, Manufacturer, ModelAvailability, Notification, NotificationKind, ProfileDraft,
    ReadFilter, RecentRequest, RequestForm, RequestStatus, ResourceRequest, TimeFrame, UsageChart,
    User, WarningLevel,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GPU Portal API",
        description = "Mock backend for the GPU resource portal. All data is canned."
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::oauth_login,
        handlers::auth::forgot_password,
        handlers::auth::logout,
        handlers::profile::session,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::notifications::list_notifications,
        handlers::notifications::mark_all_read,
        handlers::notifications::mark_read,
        handlers::notifications::delete_notification,
        handlers::notifications::clear_notifications,
        handlers::resources::list_resources,
        handlers::requests::request_form,
        handlers::requests::list_requests,
        handlers::requests::create_request,
        handlers::requests::cancel_request,
        handlers::dashboard::get_dashboard,
    ),
    components(schemas(
        LoginRequest,
        RegisterRequest,
        ForgotPasswordRequest,
        AuthResponse,
        MessageResponse,
        HealthResponse,
        NotificationsResponse,
        RequestFormContext,
        User,
        ProfileDraft,
        Notification,
        NotificationKind,
        ReadFilter,
        GpuResource,
        Manufacturer,
        RequestForm,
        ResourceRequest,
        RequestStatus,
        TimeFrame,
        DashboardSnapshot,
        DashboardSummary,
        ActiveAllocation,
        AllocationStatus,
        WarningLevel,
        RecentRequest,
        ClusterAvailability,
        ModelAvailability,
        UsageChart,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Mock sign-in and token handling"),
        (name = "profile", description = "Signed-in user"),
        (name = "notifications", description = "Notification list and read state"),
        (name = "resources", description = "GPU catalog"),
        (name = "requests", description = "Resource requests and history"),
        (name = "dashboard", description = "Usage overview"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by gated paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/auth/login",
            "/api/auth/oauth/{provider}",
            "/api/notifications/{id}/read",
            "/api/request-form",
            "/api/requests/{id}/cancel",
            "/api/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
