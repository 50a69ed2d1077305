//! Pause and resume the tickers, standing in for a dashboard that stops
//! updating while hidden and restarts when shown again.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Serialize;
use tracing::info;

use super::AppState;
use crate::ticker::RunState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/ticker/pause", post(pause))
        .route("/api/ticker/resume", post(resume))
}

#[derive(Debug, Serialize)]
struct ControlResponse {
    ticker: RunState,
}

async fn pause(State((_, control, _)): State<AppState>) -> impl IntoResponse {
    // ---
    info!("POST /api/ticker/pause");
    respond(control.pause(), RunState::Paused)
}

async fn resume(State((_, control, _)): State<AppState>) -> impl IntoResponse {
    // ---
    info!("POST /api/ticker/resume");
    respond(control.resume(), RunState::Running)
}

/// `409 Conflict` when the requested state could not be reached (the
/// tickers are shutting down).
fn respond(state: RunState, wanted: RunState) -> impl IntoResponse {
    let status = if state == wanted {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    (status, Json(ControlResponse { ticker: state }))
}
