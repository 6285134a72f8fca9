use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use gpu_portal_core::mock;

use gpu_portal::{
    api::routes::build_app,
    auth::jwt::AuthService,
    utils::toml_config::{MockConfig, PortalConfig},
    AppState, PortalConfigManager, PortalStore,
};

const TEST_SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

/// State with zero simulated latency
fn create_test_state() -> AppState {
    let config = PortalConfig {
        mock: MockConfig::instant(),
        ..PortalConfig::default()
    };

    AppState {
        config_manager: Arc::new(PortalConfigManager::from_config(config)),
        auth_service: Arc::new(AuthService::new(TEST_SECRET.to_string(), 900)),
        store: Arc::new(PortalStore::new()),
    }
}

fn create_test_server() -> TestServer {
    TestServer::new(build_app(create_test_state())).expect("Failed to create test server")
}

/// Sign in with email/password and return the access token
async fn login(server: &TestServer) -> String {
    login_as(server, "researcher@lab.org").await
}

async fn login_as(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    body["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

// ============= Health Check Tests =============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/api/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document() {
    let server = create_test_server();

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["paths"]["/api/requests"].is_object());
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let server = create_test_server();

    let response = server.get("/api/does-not-exist").await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert!(body["error"].is_string());
}

// ============= Authentication Tests =============

#[tokio::test]
async fn test_login_returns_demo_user() {
    let server = create_test_server();

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "someone@lab.org",
            "password": "anything"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], mock::account_id("someone@lab.org"));
    assert_eq!(body["user"]["name"], "Test User");
    assert_eq!(body["user"]["email"], "someone@lab.org");
    assert_eq!(body["user"]["role"], "researcher");
    assert!(body["access_token"].is_string());
    assert_eq!(body["expires_in"], 900);
}

#[tokio::test]
async fn test_login_requires_email() {
    let server = create_test_server();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "  ", "password": "x" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_register_uses_submitted_details() {
    let server = create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Ada Lovelace",
            "email": "ada@lab.org",
            "password": "password123",
            "organization": "Analytical Engines"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["name"], "Ada Lovelace");
    assert_eq!(body["user"]["organization"], "Analytical Engines");
    assert_eq!(body["user"]["role"], "researcher");
    assert!(body["user"]["avatar"]
        .as_str()
        .expect("avatar")
        .starts_with("https://ui-avatars.com/api/?name=Ada"));
    let id = body["user"]["id"].as_str().expect("id");
    let account = mock::account_id("ada@lab.org");
    assert!(id.starts_with(&format!("{}-", account)));
    assert!(id[account.len() + 1..].chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_oauth_providers() {
    let server = create_test_server();

    let response = server.post("/api/auth/oauth/google").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], "789012");

    let response = server.post("/api/auth/oauth/github").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], "345678");
    assert_eq!(body["user"]["role"], "developer");

    let response = server.post("/api/auth/oauth/myspace").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_forgot_password_always_succeeds() {
    let server = create_test_server();

    let response = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "nobody@lab.org" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["message"]
        .as_str()
        .expect("message")
        .contains("nobody@lab.org"));
}

#[tokio::test]
async fn test_gated_routes_require_token() {
    let server = create_test_server();

    for path in [
        "/api/session",
        "/api/profile",
        "/api/notifications",
        "/api/resources",
        "/api/requests",
        "/api/dashboard",
    ] {
        let response = server.get(path).await;
        response.assert_status_unauthorized();
    }

    let response = server
        .get("/api/session")
        .add_header("Authorization", "Bearer not.a.token")
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_session_and_logout() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .get("/api/session")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "researcher@lab.org");

    let response = server
        .post("/api/auth/logout")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();

    // The revoked token no longer works
    let response = server
        .get("/api/session")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_unauthorized();

    // A fresh sign-in does
    let token = login(&server).await;
    let response = server
        .get("/api/session")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
}

// ============= Profile Tests =============

#[tokio::test]
async fn test_update_profile() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .put("/api/profile")
        .add_header("Authorization", bearer(&token))
        .json(&json!({
            "name": "  Grace Hopper ",
            "email": "grace@navy.mil",
            "organization": "US Navy",
            "avatar": ""
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], mock::account_id("researcher@lab.org"));
    assert_eq!(body["role"], "researcher");
    assert_eq!(body["name"], "Grace Hopper");
    assert!(body.get("avatar").is_none());

    let response = server
        .get("/api/profile")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["organization"], "US Navy");
}

#[tokio::test]
async fn test_update_profile_requires_name() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .put("/api/profile")
        .add_header("Authorization", bearer(&token))
        .json(&json!({
            "name": "",
            "email": "grace@navy.mil",
            "organization": "US Navy"
        }))
        .await;

    response.assert_status_bad_request();
}

// ============= Notification Tests =============

#[tokio::test]
async fn test_notifications_lifecycle() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .get("/api/notifications")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["notifications"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["unread_count"], 2);

    let response = server
        .get("/api/notifications")
        .add_query_param("filter", "unread")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["notifications"].as_array().map(Vec::len), Some(2));

    let response = server
        .post("/api/notifications/1/read")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["unread_count"], 1);

    let response = server
        .delete("/api/notifications/3")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["notifications"].as_array().map(Vec::len), Some(2));

    let response = server
        .post("/api/notifications/read-all")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["unread_count"], 0);

    let response = server
        .delete("/api/notifications")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/notifications")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["notifications"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["unread_count"], 0);
}

#[tokio::test]
async fn test_unknown_notification_is_404() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .post("/api/notifications/999/read")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_not_found();

    let response = server
        .delete("/api/notifications/999")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_not_found();
}

// ============= Resource Tests =============

#[tokio::test]
async fn test_resources_filter() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .get("/api/resources")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 6);

    let response = server
        .get("/api/resources")
        .add_query_param("manufacturer", "nvidia")
        .add_query_param("min_memory", 24)
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Vec<Value> = response.json();
    let names: Vec<&str> = body.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, ["NVIDIA RTX 4090", "NVIDIA A100", "NVIDIA V100"]);

    let response = server
        .get("/api/resources")
        .add_query_param("search", "mi250")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["id"], "6");
}

// ============= Request Tests =============

fn valid_form() -> Value {
    json!({
        "gpu_model": "2",
        "quantity": 2,
        "duration_days": 14,
        "research_field": "Computer Vision",
        "project_name": "Segmentation",
        "project_description": "Training a segmentation model",
        "agree_to_terms": true
    })
}

#[tokio::test]
async fn test_request_form_preselects_gpu() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .get("/api/request-form")
        .add_query_param("gpu", "2")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["form"]["gpu_model"], "2");
    assert_eq!(body["form"]["quantity"], 1);
    assert_eq!(body["form"]["duration_days"], 7);
    assert_eq!(body["form"]["agree_to_terms"], false);
    assert_eq!(body["gpu_models"].as_array().map(Vec::len), Some(6));
    assert_eq!(body["research_fields"].as_array().map(Vec::len), Some(8));

    let response = server
        .get("/api/request-form")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["form"]["gpu_model"], "");
}

#[tokio::test]
async fn test_request_history_filters() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .get("/api/requests")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 6);

    let response = server
        .get("/api/requests")
        .add_query_param("search", "rtx")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Vec<Value> = response.json();
    let ids: Vec<&str> = body.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, ["101", "106"]);

    let response = server
        .get("/api/requests")
        .add_query_param("status", "pending")
        .add_query_param("time_frame", "last7days")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Vec<Value> = response.json();
    let ids: Vec<&str> = body.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, ["103", "106"]);

    let response = server
        .get("/api/requests")
        .add_query_param("status", "all")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 6);
}

#[tokio::test]
async fn test_submit_request() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .post("/api/requests")
        .add_header("Authorization", bearer(&token))
        .json(&valid_form())
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["id"], "107");
    assert_eq!(body["gpu_type"], "NVIDIA A100");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["quantity"], 2);

    let response = server
        .get("/api/requests")
        .add_query_param("search", "107")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
}

#[tokio::test]
async fn test_submit_request_reports_first_failure() {
    let server = create_test_server();
    let token = login(&server).await;

    let mut form = valid_form();
    form["research_field"] = json!("");
    form["agree_to_terms"] = json!(false);

    let response = server
        .post("/api/requests")
        .add_header("Authorization", bearer(&token))
        .json(&form)
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Please select a research field");

    let mut form = valid_form();
    form["quantity"] = json!(5);
    let response = server
        .post("/api/requests")
        .add_header("Authorization", bearer(&token))
        .json(&form)
        .await;
    let body: Value = response.json();
    assert_eq!(body["error"], "Quantity must be between 1 and 4");

    // Nothing was recorded
    let response = server
        .get("/api/requests")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 6);
}

#[tokio::test]
async fn test_cancel_request() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .post("/api/requests/103/cancel")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "cancelled");

    // Only pending requests can be cancelled
    let response = server
        .post("/api/requests/103/cancel")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    let response = server
        .post("/api/requests/101/cancel")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    let response = server
        .post("/api/requests/999/cancel")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_users_do_not_share_history() {
    let server = create_test_server();
    let token = login(&server).await;

    server
        .post("/api/requests/106/cancel")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    let response = server.post("/api/auth/oauth/google").await;
    let body: Value = response.json();
    let google_token = body["access_token"].as_str().expect("token").to_string();

    let response = server
        .get("/api/requests")
        .add_query_param("status", "pending")
        .add_header("Authorization", bearer(&google_token))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);
}

#[tokio::test]
async fn test_password_users_keep_their_own_session() {
    let server = create_test_server();
    let alice = login_as(&server, "alice@lab.org").await;

    server
        .post("/api/requests/106/cancel")
        .add_header("Authorization", bearer(&alice))
        .await
        .assert_status_ok();

    let bob = login_as(&server, "bob@lab.org").await;

    let response = server
        .get("/api/session")
        .add_header("Authorization", bearer(&alice))
        .await;
    let body: Value = response.json();
    assert_eq!(body["email"], "alice@lab.org");

    let response = server
        .get("/api/profile")
        .add_header("Authorization", bearer(&bob))
        .await;
    let body: Value = response.json();
    assert_eq!(body["email"], "bob@lab.org");

    // Alice's cancellation stays in Alice's history
    let response = server
        .get("/api/requests")
        .add_query_param("status", "pending")
        .add_header("Authorization", bearer(&bob))
        .await;
    let body: Vec<Value> = response.json();
    let ids: Vec<&str> = body.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, ["103", "106"]);

    let response = server
        .get("/api/requests")
        .add_query_param("status", "pending")
        .add_header("Authorization", bearer(&alice))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
}

// ============= Dashboard Tests =============

#[tokio::test]
async fn test_dashboard_snapshot() {
    let server = create_test_server();
    let token = login(&server).await;

    let response = server
        .get("/api/dashboard")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["availability"]["total"], 48);
    assert_eq!(body["availability"]["available"], 16);
    assert_eq!(body["allocations"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["recent_requests"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["chart"]["labels"].as_array().map(Vec::len), Some(7));
    assert_eq!(body["summary"]["usage_rate"], 67);
}
