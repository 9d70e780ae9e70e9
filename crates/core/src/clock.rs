// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable simulation time
//!
//! All simulation timestamps (chair departures, ticket expiry, opening time)
//! are `tokio::time::Instant`s so that tests running on a paused tokio runtime
//! see the same virtual time as the actors.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
}

/// Runtime clock (follows tokio's virtual time when paused)
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for pure state tests that never await.
///
/// Clones share the same reading, so a clock handed to the code under test
/// can still be advanced from the test body.
#[derive(Clone)]
pub struct FakeClock {
    started: Instant,
    current: Arc<Mutex<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(started: Instant) -> Self {
        Self {
            started,
            current: Arc::new(Mutex::new(started)),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }

    /// Total time advanced since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.now().duration_since(self.started)
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
