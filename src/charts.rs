//! Chart-ready projection of the rolling history.
//!
//! Rebuilt on the slow chart tick rather than on every data tick, so a chart
//! may lag the live history by up to one chart period.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::generator::History;
use crate::models::Metric;

/// Labels and series for the history charts, oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    // ---
    pub refreshed_at: DateTime<Utc>,
    /// 12-hour clock labels, e.g. `06:45 PM`.
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub pressure: Vec<f64>,
    pub wind_speed: Vec<f64>,
}

impl ChartSnapshot {
    pub fn from_history(history: &History, refreshed_at: DateTime<Utc>) -> Self {
        // ---
        let series =
            |metric: Metric| -> Vec<f64> { history.iter().map(|r| r.value(metric)).collect() };

        Self {
            refreshed_at,
            labels: history
                .iter()
                .map(|r| r.timestamp.format("%I:%M %p").to_string())
                .collect(),
            temperature: series(Metric::Temperature),
            humidity: series(Metric::Humidity),
            pressure: series(Metric::Pressure),
            wind_speed: series(Metric::WindSpeed),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
