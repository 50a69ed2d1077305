//! Liveness endpoint.
//!
//! `GET /health` answers without taking the station lock, so it stays
//! responsive even while a tick holds the write lock.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::AppState;
use crate::ticker::RunState;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    ticker: RunState,
}

/// Handle `GET /health`.
async fn health(State((_, control, _)): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ticker: control.state(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
