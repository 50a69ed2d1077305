use std::net::SocketAddr;

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use weatherstation_sim::{routes, Config, SharedStation, SimulationConfig, Station, TickerControl};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reading {
    timestamp: DateTime<Utc>,
    temperature: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    uv_index: f64,
    air_quality: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Current {
    location: String,
    reading: Reading,
    condition: String,
    uv_level: String,
    air_quality_level: String,
    tick_count: u64,
    ticker: String,
}

#[derive(Debug, Deserialize)]
struct AlertEntry {
    id: String,
    severity: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Alerts {
    count: usize,
    alerts: Vec<AlertEntry>,
}

#[derive(Debug, Deserialize)]
struct Control {
    ticker: String,
}

// ---

/// Serve the router on an ephemeral port. Tickers are not spawned, so the
/// test drives the station directly.
async fn spawn_app(
    simulation: SimulationConfig,
) -> Result<(String, SharedStation, TickerControl)> {
    // ---
    let config = Config {
        location: "Test Station".to_string(),
        simulation: simulation.clone(),
        ..Config::default()
    };
    let station = Station::new(simulation)?.into_shared();
    let control = TickerControl::new();
    let app = routes::router(station.clone(), control.clone(), config);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok((format!("http://{addr}"), station, control))
}

fn seeded(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

#[tokio::test]
async fn current_reading_within_ranges() -> Result<()> {
    // ---
    let (base, _station, _control) = spawn_app(seeded(1)).await?;
    let client = Client::new();

    let current: Current = client
        .get(format!("{base}/api/current"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(current.location, "Test Station");
    assert_eq!(current.tick_count, 0);
    assert_eq!(current.ticker, "running");
    assert!(!current.condition.is_empty());
    assert!(!current.uv_level.is_empty());
    assert!(!current.air_quality_level.is_empty());

    // Default profile ranges
    let r = &current.reading;
    assert!(r.timestamp > DateTime::from_timestamp(0, 0).unwrap());
    assert!((18.0..=35.0).contains(&r.temperature));
    assert!((30.0..=90.0).contains(&r.humidity));
    assert!((995.0..=1025.0).contains(&r.pressure));
    assert!((0.0..=25.0).contains(&r.wind_speed));
    assert!((0.0..=11.0).contains(&r.uv_index));
    assert!((0.0..=300.0).contains(&r.air_quality));

    Ok(())
}

#[tokio::test]
async fn history_stays_bounded_across_ticks() -> Result<()> {
    // ---
    let (base, station, _control) = spawn_app(seeded(2)).await?;
    let client = Client::new();
    let url = format!("{base}/api/history");

    let before: Vec<Reading> = client.get(&url).send().await?.json().await?;
    assert_eq!(before.len(), 24);
    for pair in before.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp, "history not oldest first");
    }

    {
        let mut station = station.write().await;
        for _ in 0..30 {
            station.tick();
        }
    }

    let after: Vec<Reading> = client.get(&url).send().await?.json().await?;
    assert_eq!(after.len(), 24);

    let current: Current = client
        .get(format!("{base}/api/current"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(current.tick_count, 30);
    assert_eq!(after.last().unwrap().timestamp, current.reading.timestamp);

    Ok(())
}

#[tokio::test]
async fn alerts_endpoint_reports_fired_conditions() -> Result<()> {
    // ---
    // An AQI ceiling below the valid range guarantees an aqi-high every tick
    let mut simulation = seeded(3);
    simulation.alerts = weatherstation_sim::PerMetric::from_fn(|_| Default::default());
    simulation.alerts.air_quality = weatherstation_sim::Threshold::max_only(-1.0);
    simulation.sensors.air_quality.min = 1.0;
    simulation.alert_retention = 3;

    let (base, station, _control) = spawn_app(simulation).await?;
    let client = Client::new();

    for _ in 0..5 {
        station.write().await.tick();
    }

    let alerts: Alerts = client
        .get(format!("{base}/api/alerts"))
        .send()
        .await?
        .json()
        .await?;

    // One new alert plus three retained
    assert_eq!(alerts.count, 4);
    assert_eq!(alerts.alerts.len(), 4);
    for alert in &alerts.alerts {
        assert_eq!(alert.id, "aqi-high");
        assert_eq!(alert.severity, "critical");
        assert!(alert.message.starts_with("Air Quality Index:"));
    }

    Ok(())
}

#[tokio::test]
async fn pause_and_resume_round_trip() -> Result<()> {
    // ---
    let (base, _station, control) = spawn_app(seeded(4)).await?;
    let client = Client::new();

    let resp = client.post(format!("{base}/api/ticker/pause")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Control = resp.json().await?;
    assert_eq!(body.ticker, "paused");

    let resp = client.post(format!("{base}/api/ticker/resume")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Control = resp.json().await?;
    assert_eq!(body.ticker, "running");

    // Once stopped, resuming is refused
    control.stop();
    let resp = client.post(format!("{base}/api/ticker/resume")).send().await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let health: serde_json::Value = client
        .get(format!("{base}/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["ticker"], "stopped");

    Ok(())
}

#[tokio::test]
async fn charts_endpoint_matches_history_length() -> Result<()> {
    // ---
    let (base, station, _control) = spawn_app(seeded(5)).await?;
    let client = Client::new();

    station.write().await.refresh_charts();

    let charts: serde_json::Value = client
        .get(format!("{base}/api/charts"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(charts["labels"].as_array().map(Vec::len), Some(24));
    assert_eq!(charts["temperature"].as_array().map(Vec::len), Some(24));
    assert_eq!(charts["windSpeed"].as_array().map(Vec::len), Some(24));
    assert!(charts.get("refreshedAt").is_some());

    Ok(())
}
