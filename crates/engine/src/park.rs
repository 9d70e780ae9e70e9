// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Park context shared by every actor
//!
//! Holds the configuration, the gate set, the shared state store (behind the
//! state lock), the transition log (behind the log lock) and the shutdown
//! token. When both locks are needed, take the state lock first.

use crate::error::GateError;
use crate::gates::Gates;
use chrono::Utc;
use lift_core::{
    Clock, ParkConfig, ParkSnapshot, SharedState, SystemClock, TransitionEntry, TransitionLog,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub struct Park<C: Clock = SystemClock> {
    config: ParkConfig,
    gates: Gates,
    state: Mutex<SharedState>,
    log: Mutex<TransitionLog>,
    clock: C,
    shutdown: CancellationToken,
    run_id: Uuid,
}

impl<C: Clock> Park<C> {
    pub fn new(config: ParkConfig, clock: C) -> Self {
        let state = SharedState::new(&config, clock.now());
        let log = TransitionLog::new(config.station.transition_log_capacity);
        Self {
            gates: Gates::new(&config),
            state: Mutex::new(state),
            log: Mutex::new(log),
            clock,
            shutdown: CancellationToken::new(),
            run_id: Uuid::new_v4(),
            config,
        }
    }

    pub fn config(&self) -> &ParkConfig {
        &self.config
    }

    pub fn gates(&self) -> &Gates {
        &self.gates
    }

    /// Lock the shared state. Never hold the guard across an await.
    pub fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn log(&self) -> MutexGuard<'_, TransitionLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    pub fn request_shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Gates open and the lift running
    pub fn is_operating(&self) -> bool {
        let state = self.state();
        state.operating_hours && state.system_active
    }

    pub fn is_halted(&self) -> bool {
        self.state().emergency_halted
    }

    /// Random stream for one actor; reproducible when the config has a seed
    pub fn rng(&self, stream: u64) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9).wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }

    /// Sleep for `duration` unless shutdown comes first
    pub async fn pause(&self, duration: Duration) -> Result<(), GateError> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(GateError::Interrupted),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Record a gate passage in the transition log
    pub fn record_passage(&self, ticket_id: u32, visitor_id: u32, gate_id: usize, ride_number: u32) {
        let recorded = self.log().append(TransitionEntry {
            ticket_id,
            visitor_id,
            gate_id,
            ride_number,
            recorded_at: Utc::now(),
        });
        tracing::info!(
            target: "registry",
            ticket_id,
            visitor_id,
            gate = gate_id,
            ride_number,
            recorded,
            "gate passage"
        );
    }

    /// Take every chair still in flight off the cable and return its
    /// chair-pool permit. Only safe once the attendants have exited.
    pub fn recall_chairs(&self) -> usize {
        let recalled = {
            let mut state = self.state();
            let slots = state.active_chair_ids();
            slots
                .into_iter()
                .filter_map(|slot| state.recall_chair(slot))
                .count()
        };
        if recalled > 0 {
            tracing::info!(recalled, "recalled chairs still on the cable");
            self.gates.chair_pool.release(recalled);
        }
        recalled
    }

    /// Consistent end-of-run view
    pub fn snapshot(&self) -> ParkSnapshot {
        let state = self.state();
        let log = self.log();
        ParkSnapshot::capture(&state, &log, self.now())
    }
}

#[cfg(test)]
#[path = "park_tests.rs"]
mod tests;
