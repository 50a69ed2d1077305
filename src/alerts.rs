//! Threshold alerts.
//!
//! [`evaluate`] turns the current reading into the list of currently violated
//! conditions, in a fixed metric-check order. [`AlertLog`] keeps a bounded,
//! most-recent-first record: each tick's alerts are prepended to the
//! truncated previous log. Nothing is deduplicated, so a condition that stays
//! violated appends a fresh alert every tick, and a resolved one simply stops
//! being regenerated while its old entries age out.
//!
//! Pressure thresholds are configured but never evaluated, and humidity only
//! has a high-side check.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Threshold;
use crate::models::{AirQualityLevel, Alert, Metric, PerMetric, Reading, Severity};

// ---

/// Derive the alerts fired by `reading` against `thresholds`.
///
/// Order is temperature, humidity, wind speed, UV index, air quality.
/// Comparisons are strict and a missing bound never fires.
pub fn evaluate(
    reading: &Reading,
    thresholds: &PerMetric<Threshold>,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    // ---
    let mut alerts = Vec::new();

    let temperature = reading.value(Metric::Temperature);
    if below(temperature, thresholds.temperature.min) {
        alerts.push(new_alert(
            "temp-low",
            Severity::Warning,
            "Low Temperature Alert",
            format!("Temperature has dropped to {temperature:.1}°C"),
            Metric::Temperature,
            now,
        ));
    } else if above(temperature, thresholds.temperature.max) {
        alerts.push(new_alert(
            "temp-high",
            Severity::Critical,
            "High Temperature Alert",
            format!("Temperature has risen to {temperature:.1}°C"),
            Metric::Temperature,
            now,
        ));
    }

    let humidity = reading.value(Metric::Humidity);
    if above(humidity, thresholds.humidity.max) {
        alerts.push(new_alert(
            "humidity-high",
            Severity::Warning,
            "High Humidity Alert",
            format!("Humidity level at {humidity:.1}%"),
            Metric::Humidity,
            now,
        ));
    }

    let wind_speed = reading.value(Metric::WindSpeed);
    if above(wind_speed, thresholds.wind_speed.max) {
        alerts.push(new_alert(
            "wind-high",
            Severity::Critical,
            "High Wind Speed Alert",
            format!("Wind speed reached {wind_speed:.1} km/h"),
            Metric::WindSpeed,
            now,
        ));
    }

    let uv_index = reading.value(Metric::UvIndex);
    if above(uv_index, thresholds.uv_index.max) {
        alerts.push(new_alert(
            "uv-high",
            Severity::Warning,
            "High UV Index Alert",
            format!("UV Index at dangerous level: {uv_index:.1}"),
            Metric::UvIndex,
            now,
        ));
    }

    let aqi = reading.value(Metric::AirQuality);
    if above(aqi, thresholds.air_quality.max) {
        alerts.push(new_alert(
            "aqi-high",
            Severity::Critical,
            "Poor Air Quality Alert",
            format!(
                "Air Quality Index: {aqi:.1} - {}",
                AirQualityLevel::from_aqi(aqi).label()
            ),
            Metric::AirQuality,
            now,
        ));
    }

    alerts
}

/// Prepend `new_alerts` to the first `max_retained` entries of `previous`.
pub fn merge_into_log(
    new_alerts: Vec<Alert>,
    previous: &[Alert],
    max_retained: usize,
) -> Vec<Alert> {
    let kept = previous.len().min(max_retained);
    let mut log = new_alerts;
    log.extend_from_slice(&previous[..kept]);
    log
}

fn below(value: f64, bound: Option<f64>) -> bool {
    bound.is_some_and(|min| value < min)
}

fn above(value: f64, bound: Option<f64>) -> bool {
    bound.is_some_and(|max| value > max)
}

fn new_alert(
    id: &str,
    severity: Severity,
    title: &str,
    message: String,
    metric: Metric,
    timestamp: DateTime<Utc>,
) -> Alert {
    Alert {
        id: id.to_string(),
        instance_id: Uuid::new_v4(),
        severity,
        title: title.to_string(),
        message,
        timestamp,
        sensor: metric.sensor().to_string(),
        metric,
    }
}

// ---

/// Bounded, most-recent-first record of fired alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AlertLog {
    alerts: Vec<Alert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend this tick's alerts, keeping at most `max_retained` older ones.
    pub fn record(&mut self, new_alerts: Vec<Alert>, max_retained: usize) {
        self.alerts = merge_into_log(new_alerts, &self.alerts, max_retained);
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Most recent first.
    pub fn iter(&self) -> std::slice::Iter<'_, Alert> {
        self.alerts.iter()
    }

    pub fn as_slice(&self) -> &[Alert] {
        &self.alerts
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::config::SimulationConfig;
    use chrono::TimeZone;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 26, 18, 45, 0).unwrap()
    }

    /// A reading that trips nothing under the default thresholds.
    fn calm_reading() -> Reading {
        Reading::new(
            test_now(),
            PerMetric {
                temperature: 25.0,
                humidity: 50.0,
                pressure: 1010.0,
                wind_speed: 10.0,
                uv_index: 3.0,
                air_quality: 40.0,
            },
        )
    }

    fn thresholds() -> PerMetric<Threshold> {
        SimulationConfig::default().alerts
    }

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_calm_reading_fires_nothing() {
        // ---
        assert!(evaluate(&calm_reading(), &thresholds(), test_now()).is_empty());
    }

    #[test]
    fn test_low_temperature_warning() {
        // ---
        let mut reading = calm_reading();
        reading.values.temperature = 10.0;
        let thresholds = PerMetric {
            temperature: Threshold::new(Some(15.0), Some(40.0)),
            ..thresholds()
        };

        let alerts = evaluate(&reading, &thresholds, test_now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "temp-low");
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].metric, Metric::Temperature);
        assert_eq!(alerts[0].sensor, "Temperature Sensor");
        assert_eq!(alerts[0].timestamp, test_now());
        assert_eq!(alerts[0].message, "Temperature has dropped to 10.0°C");
    }

    #[test]
    fn test_high_temperature_critical() {
        // ---
        let mut reading = calm_reading();
        reading.values.temperature = 41.5;

        let alerts = evaluate(&reading, &thresholds(), test_now());
        assert_eq!(ids(&alerts), vec!["temp-high"]);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_temperature_checks_are_exclusive() {
        // ---
        // A degenerate threshold where both sides would hold: only the low side fires.
        let mut reading = calm_reading();
        reading.values.temperature = 20.0;
        let thresholds = PerMetric {
            temperature: Threshold::new(Some(30.0), Some(10.0)),
            ..thresholds()
        };

        assert_eq!(ids(&evaluate(&reading, &thresholds, test_now())), vec!["temp-low"]);
    }

    #[test]
    fn test_bounds_are_strict() {
        // ---
        let mut reading = calm_reading();
        reading.values.temperature = 40.0;
        reading.values.humidity = 95.0;
        reading.values.wind_speed = 30.0;
        reading.values.uv_index = 8.0;
        reading.values.air_quality = 150.0;

        assert!(evaluate(&reading, &thresholds(), test_now()).is_empty());
    }

    #[test]
    fn test_missing_bounds_never_fire() {
        // ---
        let mut reading = calm_reading();
        reading.values.temperature = -50.0;
        reading.values.air_quality = 500.0;
        let thresholds = PerMetric::from_fn(|_| Threshold::none());

        assert!(evaluate(&reading, &thresholds, test_now()).is_empty());
    }

    #[test]
    fn test_low_humidity_and_pressure_are_never_checked() {
        // ---
        let mut reading = calm_reading();
        reading.values.humidity = 5.0;
        reading.values.pressure = 900.0;

        assert!(evaluate(&reading, &thresholds(), test_now()).is_empty());
    }

    #[test]
    fn test_all_conditions_in_fixed_order() {
        // ---
        let reading = Reading::new(
            test_now(),
            PerMetric {
                temperature: 45.0,
                humidity: 99.0,
                pressure: 1100.0,
                wind_speed: 40.0,
                uv_index: 10.0,
                air_quality: 250.0,
            },
        );

        let alerts = evaluate(&reading, &thresholds(), test_now());
        assert_eq!(
            ids(&alerts),
            vec!["temp-high", "humidity-high", "wind-high", "uv-high", "aqi-high"]
        );

        let severities: Vec<Severity> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::Warning,
                Severity::Critical,
                Severity::Warning,
                Severity::Critical,
            ]
        );
    }

    #[test]
    fn test_aqi_message_carries_label() {
        // ---
        let mut reading = calm_reading();
        reading.values.air_quality = 175.0;
        let thresholds = PerMetric {
            air_quality: Threshold::max_only(150.0),
            ..thresholds()
        };

        let alerts = evaluate(&reading, &thresholds, test_now());
        assert_eq!(ids(&alerts), vec!["aqi-high"]);
        assert!(alerts[0].message.ends_with("- Unhealthy"));
        assert!(!alerts[0].message.contains("Unhealthy for Sensitive Groups"));
    }

    #[test]
    fn test_aqi_labels_at_brackets() {
        // ---
        // Lower the threshold so every bracket fires
        let thresholds = PerMetric {
            air_quality: Threshold::max_only(0.0),
            ..thresholds()
        };
        let cases = [
            (50.0, "Good"),
            (100.0, "Moderate"),
            (150.0, "Unhealthy for Sensitive Groups"),
            (200.0, "Unhealthy"),
            (300.0, "Very Unhealthy"),
            (300.5, "Hazardous"),
        ];

        for (aqi, label) in cases {
            let mut reading = calm_reading();
            reading.values.air_quality = aqi;
            let alerts = evaluate(&reading, &thresholds, test_now());
            assert_eq!(alerts.len(), 1);
            assert!(
                alerts[0].message.ends_with(&format!("- {label}")),
                "AQI {aqi}: {}",
                alerts[0].message
            );
        }
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        // ---
        let mut reading = calm_reading();
        reading.values.temperature = 12.0;
        reading.values.uv_index = 9.5;

        let first = evaluate(&reading, &thresholds(), test_now());
        let second = evaluate(&reading, &thresholds(), test_now());

        assert_eq!(ids(&first), ids(&second));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.severity, b.severity);
            assert_eq!(a.title, b.title);
            assert_eq!(a.message, b.message);
            assert_eq!(a.timestamp, b.timestamp);
            // Only the per-instance id differs
            assert_ne!(a.instance_id, b.instance_id);
        }
    }

    #[test]
    fn test_merge_prepends_and_truncates() {
        // ---
        let mut reading = calm_reading();
        reading.values.temperature = 10.0;
        let fired = evaluate(&reading, &thresholds(), test_now());

        let mut log = AlertLog::new();
        for _ in 0..15 {
            log.record(fired.clone(), 10);
            assert!(log.len() <= 10 + fired.len());
        }
        // Persistent violation re-appends every tick, no dedup
        assert_eq!(log.len(), 11);
        assert!(log.iter().all(|a| a.id == "temp-low"));
    }

    #[test]
    fn test_merge_keeps_newest_first() {
        // ---
        let mut hot = calm_reading();
        hot.values.temperature = 45.0;
        let mut windy = calm_reading();
        windy.values.wind_speed = 35.0;

        let previous = evaluate(&hot, &thresholds(), test_now());
        let fresh = evaluate(&windy, &thresholds(), test_now());

        let merged = merge_into_log(fresh, &previous, 10);
        assert_eq!(ids(&merged), vec!["wind-high", "temp-high"]);

        // Retention zero drops everything older than this tick
        let merged = merge_into_log(Vec::new(), &merged, 0);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_drops_oldest_first() {
        // ---
        let mut reading = calm_reading();
        reading.values.uv_index = 9.0;
        let thresholds = thresholds();

        let mut log = AlertLog::new();
        let mut stamps = Vec::new();
        for minute in 0..5 {
            let now = test_now() + chrono::Duration::minutes(minute);
            stamps.push(now);
            log.record(evaluate(&reading, &thresholds, now), 2);
        }

        let kept: Vec<_> = log.iter().map(|a| a.timestamp).collect();
        assert_eq!(kept, vec![stamps[4], stamps[3], stamps[2]]);
    }
}
