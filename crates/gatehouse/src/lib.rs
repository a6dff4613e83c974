// Gatehouse identity service library
// Decision: Shared library so the server binary and integration tests build
// the same router

pub mod auth;
pub mod config;
pub mod error;
pub mod oauth;
pub mod openapi;
pub mod storage;

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Health endpoint payload
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Assemble the API router from module states (extracted for tests)
pub fn api_router(
    auth_state: auth::routes::AppState,
    oauth_state: oauth::routes::AppState,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::routes::routes(auth_state))
        .merge(oauth::routes::routes(oauth_state))
}
