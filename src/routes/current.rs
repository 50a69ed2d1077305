//! `GET /api/current`: the live reading plus the labels a dashboard card
//! shows next to it.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::debug;

use super::AppState;
use crate::models::{AirQualityLevel, Metric, PerMetric, Reading, UvLevel, WeatherCondition};
use crate::ticker::RunState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/current", get(handler))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentResponse {
    location: String,
    reading: Reading,
    units: PerMetric<String>,
    condition: &'static str,
    uv_level: &'static str,
    air_quality_level: &'static str,
    tick_count: u64,
    ticker: RunState,
}

async fn handler(State((station, control, config)): State<AppState>) -> Json<CurrentResponse> {
    // ---
    let station = station.read().await;
    let reading = station.current_reading().clone();
    let units = PerMetric::from_fn(|m| station.config().sensors.get(m).unit.clone());

    debug!(tick = station.tick_count(), "GET /api/current");

    Json(CurrentResponse {
        location: config.location.clone(),
        condition: WeatherCondition::from_reading(&reading).label(),
        uv_level: UvLevel::from_index(reading.value(Metric::UvIndex)).label(),
        air_quality_level: AirQualityLevel::from_aqi(reading.value(Metric::AirQuality)).label(),
        units,
        reading,
        tick_count: station.tick_count(),
        ticker: control.state(),
    })
}
