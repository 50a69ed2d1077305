//! The simulated station: sole owner of the simulation state.
//!
//! A [`Station`] holds the live reading, the rolling history, the alert log
//! and the latest chart snapshot. [`Station::tick`] is the only mutator of
//! the first three; [`Station::refresh_charts`] rebuilds the snapshot. Both
//! are synchronous and never block, so an owning loop or a test can drive
//! them directly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::alerts::{self, AlertLog};
use crate::charts::ChartSnapshot;
use crate::config::{ConfigError, SimulationConfig};
use crate::generator::{History, SignalGenerator};
use crate::models::{Reading, Severity};

/// Station shared between the tickers (writers) and the HTTP routes (readers).
pub type SharedStation = Arc<RwLock<Station>>;

// ---

#[derive(Debug)]
pub struct Station {
    config: SimulationConfig,
    generator: SignalGenerator,
    current: Reading,
    history: History,
    alerts: AlertLog,
    charts: ChartSnapshot,
    ticks: u64,
}

impl Station {
    /// Validate `config` and build the startup state at the current instant.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::new_at(config, Utc::now())
    }

    /// Like [`Station::new`] with an explicit "now".
    ///
    /// The initial reading is evaluated once, so alerts may already be
    /// present before the first tick.
    pub fn new_at(config: SimulationConfig, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        // ---
        config.validate()?;

        let mut generator = SignalGenerator::new(config.seed);
        let (current, history) = generator.initialize(&config, now);

        let mut alerts = AlertLog::new();
        alerts.record(
            alerts::evaluate(&current, &config.alerts, now),
            config.alert_retention,
        );

        let charts = ChartSnapshot::from_history(&history, now);

        info!(
            history = history.len(),
            alerts = alerts.len(),
            seeded = config.seed.is_some(),
            "Station initialized"
        );

        Ok(Self {
            config,
            generator,
            current,
            history,
            alerts,
            charts,
            ticks: 0,
        })
    }

    /// Wrap the station for sharing across tasks.
    pub fn into_shared(self) -> SharedStation {
        Arc::new(RwLock::new(self))
    }

    pub fn current_reading(&self) -> &Reading {
        &self.current
    }

    /// Rolling history, oldest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Alert log, most recent first.
    pub fn active_alerts(&self) -> &AlertLog {
        &self.alerts
    }

    /// Snapshot built by the last chart refresh.
    pub fn charts(&self) -> &ChartSnapshot {
        &self.charts
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of data ticks since startup.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Advance the simulation by one step at the current instant.
    pub fn tick(&mut self) -> usize {
        self.tick_at(Utc::now())
    }

    /// Advance the simulation by one step.
    ///
    /// Walks every metric, appends the new reading to the history (evicting
    /// the oldest entry when full), evaluates thresholds and prepends any
    /// fired alerts to the log. Returns the number of alerts fired.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> usize {
        // ---
        self.current = self
            .generator
            .next_reading(&self.current, &self.config.sensors, now);
        self.history.push(self.current.clone());
        self.ticks += 1;

        let fired = alerts::evaluate(&self.current, &self.config.alerts, now);
        for alert in &fired {
            match alert.severity {
                Severity::Critical => warn!(id = %alert.id, "{}", alert.message),
                _ => info!(id = %alert.id, "{}", alert.message),
            }
        }
        let count = fired.len();
        self.alerts.record(fired, self.config.alert_retention);

        debug!(
            tick = self.ticks,
            temperature = self.current.values.temperature,
            humidity = self.current.values.humidity,
            pressure = self.current.values.pressure,
            wind_speed = self.current.values.wind_speed,
            uv_index = self.current.values.uv_index,
            air_quality = self.current.values.air_quality,
            alerts = self.alerts.len(),
            "Weather data updated"
        );

        count
    }

    /// Rebuild the chart snapshot from the history at the current instant.
    pub fn refresh_charts(&mut self) {
        self.refresh_charts_at(Utc::now());
    }

    pub fn refresh_charts_at(&mut self, now: DateTime<Utc>) {
        self.charts = ChartSnapshot::from_history(&self.history, now);
        debug!(points = self.charts.len(), "Charts refreshed");
    }
}
