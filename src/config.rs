//! Configuration for the weather station simulator.
//!
//! Two layers live here:
//! - [`SimulationConfig`]: the static tables that drive the simulation (valid
//!   ranges, variance fractions, alert thresholds, buffer capacities). Its
//!   [`Default`] is the reference station profile.
//! - [`Config`]: the service configuration loaded from environment variables
//!   (with optional `.env` file support provided by the caller), wrapping a
//!   validated [`SimulationConfig`].
//!
//! All values are fixed at startup. Invalid values are reported as
//! [`ConfigError`] and abort initialization.
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Metric, PerMetric};

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional environment variable with no default.
macro_rules! parse_env_opt {
    ($var_name:expr, $ty:ty) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

pub const DEFAULT_HISTORY_CAPACITY: usize = 24;
pub const DEFAULT_ALERT_RETENTION: usize = 10;
/// Upper bound on the rolling history. The cold-start history spans one
/// hour per entry, so this is a little over a year.
pub const MAX_HISTORY_CAPACITY: usize = 10_000;
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(5_000);
pub const DEFAULT_CHART_INTERVAL: Duration = Duration::from_millis(30_000);
pub const DEFAULT_LOCATION: &str = "Kumasi, Ghana";

// ---

/// Invalid configuration detected at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid range for {metric}: min {min} must be finite and below max {max}")]
    InvalidRange { metric: Metric, min: f64, max: f64 },

    #[error("invalid variance fraction for {metric}: {variance} (must be finite and >= 0)")]
    InvalidVariance { metric: Metric, variance: f64 },

    #[error("inverted alert threshold for {metric}: min {min} > max {max}")]
    InvertedThreshold { metric: Metric, min: f64, max: f64 },

    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("history capacity {capacity} exceeds the maximum of {max}")]
    HistoryCapacityTooLarge { capacity: usize, max: usize },

    #[error("{name} interval must be non-zero")]
    ZeroInterval { name: &'static str },
}

/// Generation bounds and random-walk step for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    pub min: f64,
    pub max: f64,
    pub unit: String,
    /// Maximum per-tick change as a fraction of the current value.
    pub variance: f64,
}

impl SensorSpec {
    pub fn new(min: f64, max: f64, unit: &str, variance: f64) -> Self {
        Self {
            min,
            max,
            unit: unit.to_string(),
            variance,
        }
    }
}

/// Alert bounds for one metric. Either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Threshold {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Threshold {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn max_only(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Static tables that drive the signal generator and the alert evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    // ---
    pub sensors: PerMetric<SensorSpec>,
    pub alerts: PerMetric<Threshold>,

    /// Maximum number of readings retained in the rolling history.
    pub history_capacity: usize,

    /// Number of previous alerts kept when new alerts are prepended.
    pub alert_retention: usize,

    /// Seed for the random generator. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sensors: PerMetric {
                temperature: SensorSpec::new(18.0, 35.0, "°C", 0.05),
                humidity: SensorSpec::new(30.0, 90.0, "%", 0.03),
                pressure: SensorSpec::new(995.0, 1025.0, "hPa", 0.002),
                wind_speed: SensorSpec::new(0.0, 25.0, "km/h", 0.1),
                uv_index: SensorSpec::new(0.0, 11.0, "", 0.05),
                air_quality: SensorSpec::new(0.0, 300.0, "AQI", 0.02),
            },
            alerts: PerMetric {
                temperature: Threshold::new(Some(15.0), Some(40.0)),
                humidity: Threshold::new(Some(20.0), Some(95.0)),
                // Configured for completeness; the evaluator never checks pressure.
                pressure: Threshold::new(Some(990.0), Some(1030.0)),
                wind_speed: Threshold::max_only(30.0),
                uv_index: Threshold::max_only(8.0),
                air_quality: Threshold::max_only(150.0),
            },
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            alert_retention: DEFAULT_ALERT_RETENTION,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Check every table entry, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // ---
        for (metric, spec) in self.sensors.iter() {
            if !spec.min.is_finite() || !spec.max.is_finite() || spec.min >= spec.max {
                return Err(ConfigError::InvalidRange {
                    metric,
                    min: spec.min,
                    max: spec.max,
                });
            }
            if !spec.variance.is_finite() || spec.variance < 0.0 {
                return Err(ConfigError::InvalidVariance {
                    metric,
                    variance: spec.variance,
                });
            }
        }

        for (metric, threshold) in self.alerts.iter() {
            if let (Some(min), Some(max)) = (threshold.min, threshold.max) {
                if min > max {
                    return Err(ConfigError::InvertedThreshold { metric, min, max });
                }
            }
        }

        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryCapacityTooLarge {
                capacity: self.history_capacity,
                max: MAX_HISTORY_CAPACITY,
            });
        }

        Ok(())
    }
}

/// Strongly typed service configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Address the HTTP adapter binds to.
    pub bind_addr: SocketAddr,

    /// Display label for the station.
    pub location: String,

    /// Period of the data + alerts tick.
    pub update_interval: Duration,

    /// Period of the chart refresh tick.
    pub chart_interval: Duration,

    pub simulation: SimulationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            location: DEFAULT_LOCATION.to_string(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            chart_interval: DEFAULT_CHART_INTERVAL,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `STATION_BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
/// - `STATION_LOCATION` – station label (default: `Kumasi, Ghana`)
/// - `UPDATE_INTERVAL_MS` – data tick period (default: 5000)
/// - `CHART_INTERVAL_MS` – chart refresh period (default: 30000)
/// - `HISTORY_CAPACITY` – rolling history length (default: 24)
/// - `ALERT_RETENTION` – previous alerts kept per tick (default: 10)
/// - `SIM_SEED` – RNG seed for reproducible runs
///
/// Returns an error if any variable is malformed or the resulting
/// configuration fails validation.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let bind_addr = parse_env!("STATION_BIND_ADDR", SocketAddr, defaults.bind_addr);
    let location = env::var("STATION_LOCATION").unwrap_or(defaults.location);
    let update_ms = parse_env!(
        "UPDATE_INTERVAL_MS",
        u64,
        defaults.update_interval.as_millis() as u64
    );
    let chart_ms = parse_env!(
        "CHART_INTERVAL_MS",
        u64,
        defaults.chart_interval.as_millis() as u64
    );
    let history_capacity = parse_env!("HISTORY_CAPACITY", usize, DEFAULT_HISTORY_CAPACITY);
    let alert_retention = parse_env!("ALERT_RETENTION", usize, DEFAULT_ALERT_RETENTION);
    let seed = parse_env_opt!("SIM_SEED", u64);

    let config = Config {
        bind_addr,
        location,
        update_interval: Duration::from_millis(update_ms),
        chart_interval: Duration::from_millis(chart_ms),
        simulation: SimulationConfig {
            history_capacity,
            alert_retention,
            seed,
            ..defaults.simulation
        },
    };

    config.validate().context("Invalid station configuration")?;
    Ok(config)
}

impl Config {
    /// Validate intervals and the simulation tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // ---
        if self.update_interval.is_zero() {
            return Err(ConfigError::ZeroInterval { name: "update" });
        }
        if self.chart_interval.is_zero() {
            return Err(ConfigError::ZeroInterval { name: "chart" });
        }
        self.simulation.validate()
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        let sim = &self.simulation;

        tracing::info!("Configuration loaded:");
        tracing::info!("  STATION_BIND_ADDR  : {}", self.bind_addr);
        tracing::info!("  STATION_LOCATION   : {}", self.location);
        tracing::info!("  UPDATE_INTERVAL_MS : {}", self.update_interval.as_millis());
        tracing::info!("  CHART_INTERVAL_MS  : {}", self.chart_interval.as_millis());
        tracing::info!("  HISTORY_CAPACITY   : {}", sim.history_capacity);
        tracing::info!("  ALERT_RETENTION    : {}", sim.alert_retention);
        tracing::info!("  SIM_SEED           : {:?}", sim.seed);

        for (metric, spec) in sim.sensors.iter() {
            let threshold = sim.alerts.get(metric);
            tracing::debug!(
                "  {:<12} range [{}, {}] {} variance {} alert min {:?} max {:?}",
                metric.name(),
                spec.min,
                spec.max,
                spec.unit,
                spec.variance,
                threshold.min,
                threshold.max
            );
        }
    }
}
