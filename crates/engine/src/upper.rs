// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upper-station attendant
//!
//! Unloads chairs whose travel time has elapsed and returns their chair-pool
//! permits.

use crate::error::EngineError;
use crate::halt::AttendantLink;
use crate::park::Park;
use lift_core::Clock;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

pub struct UpperAttendant<C: Clock> {
    park: Arc<Park<C>>,
    link: AttendantLink,
    rng: StdRng,
}

impl<C: Clock> UpperAttendant<C> {
    pub fn new(park: Arc<Park<C>>, link: AttendantLink, rng: StdRng) -> Self {
        Self { park, link, rng }
    }

    pub async fn run(mut self) -> Result<(), EngineError> {
        let park = Arc::clone(&self.park);
        let token = park.shutdown_token().clone();
        let tick = park.config().attendants.tick;
        let me = self.link.me();
        park.state().mark_ready(me);
        tracing::info!("upper attendant on duty");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                message = self.link.recv() => self.link.handle(&park, message),
                wake = park.gates().wake(me).acquire(&token) => {
                    if let Ok(signal) = wake {
                        signal.forget();
                        tracing::debug!(halted = park.is_halted(), "woken by lower attendant");
                    }
                }
                _ = tokio::time::sleep(tick) => {}
            }

            if park.is_halted() {
                continue;
            }
            match self.link.maybe_halt(&park, &mut self.rng).await {
                Ok(_) => {}
                Err(e) if e.is_interrupted() => break,
                Err(e) => tracing::warn!(error = %e, "halt failed"),
            }
            self.unload_arrivals();
        }

        tracing::info!("upper attendant off duty");
        Ok(())
    }

    /// Unload every chair that has reached the top. Returns the number unloaded.
    pub fn unload_arrivals(&mut self) -> usize {
        let park = Arc::clone(&self.park);
        let ride = park.config().lift.ride_duration;
        let exits = park.config().station.exit_count.max(1);

        let arrived = park.state().arrived_chairs(park.now(), ride);
        let mut unloaded = 0;
        for slot in arrived {
            let released = park.state().release_chair(slot);
            let Some(chair) = released else {
                continue;
            };
            for passenger in &chair.passengers {
                let exit = self.rng.gen_range(0..exits);
                tracing::debug!(visitor_id = passenger, exit, "passenger leaves the upper station");
            }
            tracing::info!(
                chair = slot,
                passengers = chair.passenger_count(),
                bikes = chair.bike_count,
                "chair arrived"
            );
            // Outside the state lock, before the next chair
            park.gates().chair_pool.release(1);
            unloaded += 1;
        }
        unloaded
    }
}

#[cfg(test)]
#[path = "upper_tests.rs"]
mod tests;
