//! Embedded Leptos UI.
//!
//! Assets under `ui/dist` are compiled into the binary. Unknown paths get
//! `index.html` so the client-side router can resolve them.

use axum::{
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "ui/dist"]
#[allow_missing = true]
struct UiAssets;

pub async fn serve_ui(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    if let Some(content) = UiAssets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return ([(header::CONTENT_TYPE, mime.to_string())], content.data).into_response();
    }

    match UiAssets::get("index.html") {
        Some(index) => Html(index.data).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            "UI assets not found. Build the UI with `trunk build --release` in ui/",
        )
            .into_response(),
    }
}
