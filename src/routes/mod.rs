pub mod leads;
pub mod pages;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/lead", post(leads::create))
        .route("/api/leads/count", get(leads::count))
}

pub fn page_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(pages::landing))
        .route("/health", get(pages::health))
}
