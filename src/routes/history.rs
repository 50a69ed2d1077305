use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use super::AppState;
use crate::models::Reading;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/history", get(handler))
}

/// Rolling history, oldest first.
async fn handler(State((station, _, _)): State<AppState>) -> Json<Vec<Reading>> {
    // ---
    let station = station.read().await;
    let history: Vec<Reading> = station.history().iter().cloned().collect();
    debug!(len = history.len(), "GET /api/history");
    Json(history)
}
