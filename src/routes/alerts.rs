use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::debug;

use super::AppState;
use crate::models::Alert;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/alerts", get(handler))
}

#[derive(Debug, Serialize)]
struct AlertsResponse {
    count: usize,
    /// Most recent first.
    alerts: Vec<Alert>,
}

async fn handler(State((station, _, _)): State<AppState>) -> Json<AlertsResponse> {
    // ---
    let station = station.read().await;
    let alerts = station.active_alerts().as_slice().to_vec();
    debug!(count = alerts.len(), "GET /api/alerts");
    Json(AlertsResponse {
        count: alerts.len(),
        alerts,
    })
}
