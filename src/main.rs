//! Application entry point for the `weatherstation-sim` service.
//!
//! This binary orchestrates the full startup sequence:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Building the simulated station (fails fast on invalid configuration)
//! - Spawning the data and chart tickers
//! - Mounting all API routes via the `routes` gateway
//! - Binding the Axum HTTP server and serving until Ctrl-C
//!
//! # Environment Variables
//! - `STATION_BIND_ADDR`, `STATION_LOCATION`, `UPDATE_INTERVAL_MS`,
//!   `CHART_INTERVAL_MS`, `HISTORY_CAPACITY`, `ALERT_RETENTION`, `SIM_SEED`
//!   – see [`weatherstation_sim::config::load_from_env`]
//! - `STATION_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `STATION_SPAN_EVENTS` (optional) – span event mode for tracing
use std::env;

use anyhow::{Context, Result};
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use weatherstation_sim::{config, routes, ticker, Schedule, Station, TickerControl};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let station = Station::new(cfg.simulation.clone())
        .context("Failed to initialize station")?
        .into_shared();
    let control = TickerControl::new();

    let tickers = [
        Schedule::data(cfg.update_interval),
        Schedule::charts(cfg.chart_interval),
    ]
    .map(|schedule| tokio::spawn(ticker::run(schedule, station.clone(), control.subscribe())));

    // Build app from routes gateway
    let app: Router = routes::router(station, control.clone(), cfg.clone());

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.bind_addr))?;
    tracing::info!("Listening on {}", cfg.bind_addr);

    let shutdown_control = control.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
            tracing::info!("Shutdown requested");
            shutdown_control.stop();
        })
        .await?;

    // Covers the server exiting on its own as well
    control.stop();
    for handle in tickers {
        handle.await.context("Ticker task panicked")?;
    }

    tracing::info!("Weather station stopped");
    Ok(())
}

// ---

/// Install the global subscriber: compact output with target, file and line.
///
/// `RUST_LOG` wins when set. Otherwise the filter is `STATION_LOG_LEVEL`
/// (default `debug`) with hyper held at `warn`. `STATION_SPAN_EVENTS` picks
/// `full` or `enter_exit` span events, else close events only. Color is
/// forced by `FORCE_COLOR` or follows TTY detection.
fn init_tracing() {
    // ---
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = env::var("STATION_LOG_LEVEL")
            .ok()
            .and_then(|v| v.trim().parse::<Level>().ok())
            .unwrap_or(Level::DEBUG);
        EnvFilter::new(format!("{},hyper=warn", level.as_str().to_lowercase()))
    });

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events_from_env())
        .with_env_filter(env_filter)
        .with_ansi(color_from_env())
        .compact()
        .init();
}

fn span_events_from_env() -> FmtSpan {
    match env::var("STATION_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    }
}

fn color_from_env() -> bool {
    let forced = env::var("FORCE_COLOR").ok().and_then(|v| match v.as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    });
    forced.unwrap_or_else(|| std::io::stdout().is_terminal())
}
