//! HTTP presentation adapter.
//!
//! Each sibling module owns one endpoint group and exports a subrouter; this
//! gateway merges them and attaches the shared state, so `main.rs` never
//! needs to know about individual endpoints. Handlers only read the station
//! (or flip the ticker run state); no simulation logic lives here.

use axum::Router;

use crate::{Config, SharedStation, TickerControl};

mod alerts;
mod charts;
mod control;
mod current;
mod health;
mod history;

/// State shared by every route.
pub type AppState = (SharedStation, TickerControl, Config);

// ---

pub fn router(station: SharedStation, control: TickerControl, config: Config) -> Router {
    // ---
    Router::new()
        .merge(current::router())
        .merge(history::router())
        .merge(alerts::router())
        .merge(charts::router())
        .merge(control::router())
        .merge(health::router())
        .with_state((station, control, config))
}
