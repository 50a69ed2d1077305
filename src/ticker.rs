//! Periodic drivers for the station.
//!
//! Each [`Schedule`] runs in its own task on a `tokio::time` interval and
//! takes the station's write lock only for the duration of one synchronous
//! step, so ticks of one schedule never overlap.
//!
//! All schedules follow a shared [`RunState`] published through
//! [`TickerControl`]. Pausing stops ticking without queueing missed ticks;
//! resuming starts a fresh schedule whose first tick lands one full period
//! later. `Stopped` is terminal.

use std::{fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::station::{SharedStation, Station};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Paused,
    Stopped,
}

/// Handle used to pause, resume and stop every ticker subscribed to it.
#[derive(Debug, Clone)]
pub struct TickerControl {
    tx: Arc<watch::Sender<RunState>>,
}

impl Default for TickerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerControl {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RunState::Running);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> RunState {
        *self.tx.borrow()
    }

    pub fn pause(&self) -> RunState {
        self.transition(RunState::Paused)
    }

    pub fn resume(&self) -> RunState {
        self.transition(RunState::Running)
    }

    pub fn stop(&self) -> RunState {
        self.transition(RunState::Stopped)
    }

    /// Move to `next` unless already there or stopped. Returns the state
    /// in effect afterwards.
    fn transition(&self, next: RunState) -> RunState {
        let changed = self.tx.send_if_modified(|state| {
            if *state == RunState::Stopped || *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
        if changed {
            tracing::info!(state = ?next, "Ticker state changed");
        }
        self.state()
    }
}

/// A named periodic step over the station.
#[derive(Clone, Copy)]
pub struct Schedule {
    pub name: &'static str,
    pub period: Duration,
    pub step: fn(&mut Station, DateTime<Utc>),
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("name", &self.name)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl Schedule {
    /// Fast tick: walk the readings and evaluate alerts.
    pub fn data(period: Duration) -> Self {
        Self {
            name: "data",
            period,
            step: |station, now| {
                station.tick_at(now);
            },
        }
    }

    /// Slow tick: rebuild the chart snapshot.
    pub fn charts(period: Duration) -> Self {
        Self {
            name: "charts",
            period,
            step: |station, now| station.refresh_charts_at(now),
        }
    }
}

/// Drive `schedule` against `station` until the control channel says
/// `Stopped` or its sender is dropped.
pub async fn run(
    schedule: Schedule,
    station: SharedStation,
    mut control: watch::Receiver<RunState>,
) {
    // ---
    tracing::info!(
        ticker = schedule.name,
        period_ms = schedule.period.as_millis() as u64,
        "Ticker started"
    );

    'outer: loop {
        let state = *control.borrow_and_update();
        match state {
            RunState::Stopped => break,
            RunState::Paused => {
                tracing::debug!(ticker = schedule.name, "Ticker waiting for resume");
                if control.changed().await.is_err() {
                    break;
                }
                continue;
            }
            RunState::Running => {}
        }

        let mut interval = time::interval_at(Instant::now() + schedule.period, schedule.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                changed = control.changed() => {
                    if changed.is_err() {
                        break 'outer;
                    }
                    // Re-read the state; a resume always gets a fresh interval.
                    continue 'outer;
                }
                _ = interval.tick() => {
                    let mut station = station.write().await;
                    (schedule.step)(&mut *station, Utc::now());
                }
            }
        }
    }

    tracing::info!(ticker = schedule.name, "Ticker stopped");
}
