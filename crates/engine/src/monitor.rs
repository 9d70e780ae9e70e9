// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic status line

use crate::error::EngineError;
use crate::park::Park;
use lift_core::{Clock, SharedState};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub elapsed: Duration,
    pub at_station: u32,
    pub on_platform: u32,
    pub active_chairs: u32,
    pub total_rides: u32,
    pub tickets_sold: u32,
    pub halted: bool,
}

impl StatusLine {
    pub fn capture(state: &SharedState, now: Instant) -> Self {
        Self {
            elapsed: state.elapsed(now),
            at_station: state.people_at_station,
            on_platform: state.people_on_platform,
            active_chairs: state.active_chairs,
            total_rides: state.total_rides,
            tickets_sold: state.tickets_sold,
            halted: state.emergency_halted,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>5.1}s] station={} platform={} chairs={} rides={} tickets={}",
            self.elapsed.as_secs_f64(),
            self.at_station,
            self.on_platform,
            self.active_chairs,
            self.total_rides,
            self.tickets_sold
        )?;
        if self.halted {
            f.write_str(" HALTED")?;
        }
        Ok(())
    }
}

/// Log a status line every monitor interval until shutdown
pub async fn run_monitor<C: Clock>(park: Arc<Park<C>>) -> Result<(), EngineError> {
    let mut interval = tokio::time::interval(park.config().attendants.monitor_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let token = park.shutdown_token().clone();

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let line = StatusLine::capture(&park.state(), park.now());
                tracing::info!(
                    elapsed_ms = line.elapsed.as_millis() as u64,
                    at_station = line.at_station,
                    on_platform = line.on_platform,
                    active_chairs = line.active_chairs,
                    total_rides = line.total_rides,
                    tickets_sold = line.tickets_sold,
                    "{line}"
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
