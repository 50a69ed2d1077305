//! Synthetic signal generation.
//!
//! The generator produces an initial reading, a cold-start history, and on
//! every tick a new reading obtained by a bounded multiplicative random walk:
//!
//! ```text
//! delta     = uniform(-1, 1) * variance * v
//! new value = clamp(v + delta, min, max)
//! ```
//!
//! Clamping discards any excess past a bound, so values pushed outward
//! repeatedly stick at that bound. A value of exactly zero never moves.

use std::collections::{vec_deque, VecDeque};

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Serializer};

use crate::config::{SensorSpec, SimulationConfig};
use crate::models::{PerMetric, Reading};

// ---

/// Rolling window of readings, oldest first, bounded to a fixed capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Append a reading, evicting and returning the oldest one if the
    /// window would otherwise exceed its capacity.
    pub fn push(&mut self, reading: Reading) -> Option<Reading> {
        self.readings.push_back(reading);
        if self.readings.len() > self.capacity {
            self.readings.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&Reading> {
        self.readings.front()
    }

    pub fn newest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    pub fn get(&self, index: usize) -> Option<&Reading> {
        self.readings.get(index)
    }

    /// Iterate oldest → newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, Reading> {
        self.readings.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Reading;
    type IntoIter = vec_deque::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.readings.iter())
    }
}

// ---

/// Random source for the simulated sensors.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    rng: StdRng,
}

impl SignalGenerator {
    /// Create a generator. A seed makes every draw reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Build the startup state: a live reading plus an independent
    /// cold-start history.
    ///
    /// The history is not a backfill of the live reading; there is no
    /// continuity between its newest entry and the returned reading.
    pub fn initialize(
        &mut self,
        config: &SimulationConfig,
        now: DateTime<Utc>,
    ) -> (Reading, History) {
        // ---
        let current = self.random_reading(&config.sensors, now);
        let history = self.cold_start_history(&config.sensors, config.history_capacity, now);
        (current, history)
    }

    /// Draw every metric uniformly from its valid range, one decimal place.
    pub fn random_reading(
        &mut self,
        sensors: &PerMetric<SensorSpec>,
        timestamp: DateTime<Utc>,
    ) -> Reading {
        let values = PerMetric::from_fn(|metric| {
            let spec = sensors.get(metric);
            random_in_range(&mut self.rng, spec.min, spec.max)
        });
        Reading::new(timestamp, values)
    }

    /// `capacity` independent readings stamped `capacity`, ..., 1 hours
    /// before `now`, oldest first.
    pub fn cold_start_history(
        &mut self,
        sensors: &PerMetric<SensorSpec>,
        capacity: usize,
        now: DateTime<Utc>,
    ) -> History {
        // ---
        let mut history = History::with_capacity(capacity);
        for hours_ago in (1..=capacity as i64).rev() {
            let reading = self.random_reading(sensors, now - Duration::hours(hours_ago));
            history.push(reading);
        }
        history
    }

    /// Advance every metric of `previous` by one random-walk step.
    pub fn next_reading(
        &mut self,
        previous: &Reading,
        sensors: &PerMetric<SensorSpec>,
        now: DateTime<Utc>,
    ) -> Reading {
        // ---
        let values = PerMetric::from_fn(|metric| {
            let spec = sensors.get(metric);
            add_variance(
                &mut self.rng,
                previous.value(metric),
                spec.variance,
                spec.min,
                spec.max,
            )
        });
        Reading::new(now, values)
    }
}

/// Uniform value in `[min, max]`, rounded to one decimal place.
fn random_in_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let value = rng.gen_range(min..=max);
    // Rounding can step past a bound that is not itself on the 0.1 grid.
    ((value * 10.0).round() / 10.0).clamp(min, max)
}

/// One bounded multiplicative random-walk step.
fn add_variance<R: Rng>(rng: &mut R, value: f64, variance: f64, min: f64, max: f64) -> f64 {
    let delta = rng.gen_range(-1.0..=1.0) * variance * value;
    (value + delta).clamp(min, max)
}
