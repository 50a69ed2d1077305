use axum::{extract::State, routing::get, Json, Router};

use super::AppState;
use crate::charts::ChartSnapshot;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/charts", get(handler))
}

/// Snapshot from the last chart tick; may lag the live history.
async fn handler(State((station, _, _)): State<AppState>) -> Json<ChartSnapshot> {
    Json(station.read().await.charts().clone())
}
