//! Simulated IoT weather station.
//!
//! All readings are synthetic. The [`Station`] owns the simulation state and
//! advances it one synchronous [`Station::tick`] at a time; the
//! [`ticker`] module drives those ticks on a schedule, and [`routes`] serves
//! the results as JSON for a dashboard.
//!
//! Module layout:
//! - `config`    – static tables and environment loading
//! - `models`    – metrics, readings, alerts, descriptive labels
//! - `generator` – random-walk signal generation and the rolling history
//! - `alerts`    – threshold evaluation and the bounded alert log
//! - `charts`    – chart projection of the history
//! - `station`   – owner of the simulation state
//! - `ticker`    – periodic scheduling with pause/resume
//! - `routes`    – HTTP presentation adapter

pub mod alerts;
pub mod charts;
pub mod config;
pub mod generator;
pub mod models;
pub mod routes;
pub mod station;
pub mod ticker;

pub use config::{Config, ConfigError, SensorSpec, SimulationConfig, Threshold};
pub use models::{Alert, Metric, PerMetric, Reading, Severity};
pub use station::{SharedStation, Station};
pub use ticker::{RunState, Schedule, TickerControl};
