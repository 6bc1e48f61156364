use std::io::ErrorKind;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

use crate::state::SharedState;

pub const LANDING_NOT_FOUND: &str = "<h1>index.html not found</h1>";

/// Read the landing page from disk on every request.
pub async fn landing(State(state): State<SharedState>) -> Html<String> {
    match tokio::fs::read_to_string(&state.config.landing_page).await {
        Ok(html) => Html(html),
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to read landing page {}: {e}",
                    state.config.landing_page.display()
                );
            }
            Html(LANDING_NOT_FOUND.to_string())
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
