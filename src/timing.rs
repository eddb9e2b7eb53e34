//! Explicit timing context for benchmark runs
//!
//! The caller creates a [`TimingContext`], passes it to each measured call
//! and reads the measurements back. Nothing is stored process-wide, so
//! independent runs (or threads) never share a clock.

use serde::Serialize;
use std::time::{Duration, Instant};

/// One timed section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub label: String,
    #[serde(rename = "nanos", serialize_with = "serialize_nanos")]
    pub elapsed: Duration,
}

impl Measurement {
    pub fn nanos(&self) -> u128 {
        self.elapsed.as_nanos()
    }
}

fn serialize_nanos<S: serde::Serializer>(elapsed: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(elapsed.as_nanos())
}

/// Ordered collection of measurements owned by one caller
#[derive(Debug, Default, Clone)]
pub struct TimingContext {
    measurements: Vec<Measurement>,
}

impl TimingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, record how long it took under `label`, and return its result
    pub fn measure<T>(&mut self, label: impl Into<String>, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let label = label.into();
        if elapsed.is_zero() {
            tracing::warn!(label = %label, "measured time is 0 ns");
        }
        self.measurements.push(Measurement { label, elapsed });
        result
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Most recent measurement with this label
    pub fn get(&self, label: &str) -> Option<&Measurement> {
        self.measurements.iter().rev().find(|m| m.label == label)
    }

    /// Sum of all measurements
    pub fn total(&self) -> Duration {
        self.measurements.iter().map(|m| m.elapsed).sum()
    }

    pub fn clear(&mut self) {
        self.measurements.clear();
    }
}
