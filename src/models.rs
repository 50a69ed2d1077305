//! Data models for the simulated weather station.
//!
//! A [`Reading`] is one timestamped snapshot of every [`Metric`]. Alerts are
//! derived from readings by [`crate::alerts`]; the descriptive labels below
//! (air quality, UV level, weather condition) are shared by the evaluator and
//! the presentation routes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---

/// One monitored environmental quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    UvIndex,
    AirQuality,
}

impl Metric {
    /// Every metric, in declaration order.
    pub const ALL: [Metric; 6] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pressure,
        Metric::WindSpeed,
        Metric::UvIndex,
        Metric::AirQuality,
    ];

    /// Wire name, matching the serialized field names of a [`Reading`].
    pub fn name(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Pressure => "pressure",
            Metric::WindSpeed => "windSpeed",
            Metric::UvIndex => "uvIndex",
            Metric::AirQuality => "airQuality",
        }
    }

    /// Name of the physical sensor that reports this metric.
    pub fn sensor(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature Sensor",
            Metric::Humidity => "Humidity Sensor",
            Metric::Pressure => "Pressure Sensor",
            Metric::WindSpeed => "Wind Sensor",
            Metric::UvIndex => "UV Sensor",
            Metric::AirQuality => "Air Quality Sensor",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of `T` for each metric.
///
/// Used both for readings (`PerMetric<f64>`) and for the per-metric
/// configuration tables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerMetric<T> {
    pub temperature: T,
    pub humidity: T,
    pub pressure: T,
    pub wind_speed: T,
    pub uv_index: T,
    pub air_quality: T,
}

impl<T> PerMetric<T> {
    /// Build a table by calling `f` once per metric, in declaration order.
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        // Field initializers evaluate in source order, which is `Metric::ALL` order.
        PerMetric {
            temperature: f(Metric::Temperature),
            humidity: f(Metric::Humidity),
            pressure: f(Metric::Pressure),
            wind_speed: f(Metric::WindSpeed),
            uv_index: f(Metric::UvIndex),
            air_quality: f(Metric::AirQuality),
        }
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::Pressure => &self.pressure,
            Metric::WindSpeed => &self.wind_speed,
            Metric::UvIndex => &self.uv_index,
            Metric::AirQuality => &self.air_quality,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut T {
        match metric {
            Metric::Temperature => &mut self.temperature,
            Metric::Humidity => &mut self.humidity,
            Metric::Pressure => &mut self.pressure,
            Metric::WindSpeed => &mut self.wind_speed,
            Metric::UvIndex => &mut self.uv_index,
            Metric::AirQuality => &mut self.air_quality,
        }
    }

    /// Iterate `(metric, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// A single timestamped snapshot of all metric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    // ---
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub values: PerMetric<f64>,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, values: PerMetric<f64>) -> Self {
        Self { timestamp, values }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        *self.values.get(metric)
    }
}

// ---

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A notification that a metric's current value violates a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    // ---
    /// Condition identifier derived from metric and direction, e.g. `temp-low`.
    pub id: String,
    /// Unique per emitted instance; repeated firings of one condition differ here.
    pub instance_id: Uuid,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub sensor: String,
    pub metric: Metric,
}

// ---

/// Qualitative air quality band for an AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirQualityLevel {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AirQualityLevel {
    /// Classify an AQI value. Bracket upper bounds are inclusive.
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            Self::Good
        } else if aqi <= 100.0 {
            Self::Moderate
        } else if aqi <= 150.0 {
            Self::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            Self::Unhealthy
        } else if aqi <= 300.0 {
            Self::VeryUnhealthy
        } else {
            Self::Hazardous
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

/// UV exposure band for a UV index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn from_index(uv: f64) -> Self {
        if uv <= 2.0 {
            Self::Low
        } else if uv <= 5.0 {
            Self::Moderate
        } else if uv <= 7.0 {
            Self::High
        } else if uv <= 10.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }
}

/// Coarse sky condition shown next to the headline temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Sunny,
    PartlyCloudy,
    Rainy,
    Stormy,
    Cool,
    Cloudy,
}

impl WeatherCondition {
    /// Derive the condition from a reading. First matching rule wins.
    pub fn from_reading(reading: &Reading) -> Self {
        let temp = reading.value(Metric::Temperature);
        let humidity = reading.value(Metric::Humidity);
        let pressure = reading.value(Metric::Pressure);

        if temp > 30.0 && humidity < 50.0 {
            Self::Sunny
        } else if temp > 25.0 && humidity < 70.0 {
            Self::PartlyCloudy
        } else if humidity > 80.0 {
            Self::Rainy
        } else if pressure < 1000.0 {
            Self::Stormy
        } else if temp < 20.0 {
            Self::Cool
        } else {
            Self::Cloudy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Rainy => "Rainy",
            Self::Stormy => "Stormy",
            Self::Cool => "Cool",
            Self::Cloudy => "Cloudy",
        }
    }
}
