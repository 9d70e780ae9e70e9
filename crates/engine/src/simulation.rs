// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation coordinator
//!
//! Starts the staff, lets visitors in while the park is open, then runs the
//! closing sequence: stop admissions, give the station a short drain, signal
//! shutdown, join every actor within a bounded budget and abort the rest.

use crate::cashier::Cashier;
use crate::error::EngineError;
use crate::halt;
use crate::lower::LowerAttendant;
use crate::messages::{Desk, INBOX_CAPACITY};
use crate::monitor::run_monitor;
use crate::park::Park;
use crate::spawner::VisitorGenerator;
use crate::upper::UpperAttendant;
use crate::visitor::{VisitSummary, VisitorActor};
use lift_core::{Clock, ParkSnapshot, SystemClock, Ticket, VisitorProfile};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;
use uuid::Uuid;

// Random stream ids; visitors use their own id offset past these
const LOWER_STREAM: u64 = 1;
const UPPER_STREAM: u64 = 2;
const GENERATOR_STREAM: u64 = 3;
const VISITOR_STREAM_BASE: u64 = 16;

/// Outcome of a finished run
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub snapshot: ParkSnapshot,
    /// Visitors whose actor returned, normally or cut short by shutdown
    pub visitors_exited: usize,
    /// Visitors whose actor ended with an error
    pub visitors_failed: usize,
    /// Actors still running when the join budget ran out
    pub aborted: usize,
}

pub struct Simulation<C: Clock = SystemClock> {
    park: Arc<Park<C>>,
    desk: Desk,
    staff: JoinSet<Result<(), EngineError>>,
    visitors: JoinSet<Result<VisitSummary, EngineError>>,
    visitors_exited: usize,
    visitors_failed: usize,
}

impl<C: Clock + 'static> Simulation<C> {
    /// Open the ticket office and put both attendants and the monitor on duty
    pub fn start(park: Arc<Park<C>>) -> Self {
        let (tickets, ticket_inbox) = mpsc::channel(INBOX_CAPACITY);
        let (lower, lower_inbox) = mpsc::channel(INBOX_CAPACITY);
        let (lower_link, upper_link) = halt::link();

        let mut staff = JoinSet::new();
        let run_id = park.run_id();
        staff.spawn(
            Cashier::new(Arc::clone(&park), ticket_inbox)
                .run()
                .instrument(tracing::info_span!("cashier", %run_id)),
        );
        staff.spawn(
            LowerAttendant::new(
                Arc::clone(&park),
                lower_inbox,
                lower_link,
                park.rng(LOWER_STREAM),
            )
            .run()
            .instrument(tracing::info_span!("lower_attendant", %run_id)),
        );
        staff.spawn(
            UpperAttendant::new(Arc::clone(&park), upper_link, park.rng(UPPER_STREAM))
                .run()
                .instrument(tracing::info_span!("upper_attendant", %run_id)),
        );
        staff.spawn(
            run_monitor(Arc::clone(&park)).instrument(tracing::info_span!("monitor", %run_id)),
        );
        tracing::info!(%run_id, "park open");

        Self {
            park,
            desk: Desk { tickets, lower },
            staff,
            visitors: JoinSet::new(),
            visitors_exited: 0,
            visitors_failed: 0,
        }
    }

    pub fn park(&self) -> &Arc<Park<C>> {
        &self.park
    }

    /// Channels to the staff, for visitors driven from outside
    pub fn desk(&self) -> &Desk {
        &self.desk
    }

    /// Send a visitor into the park
    pub fn admit(&mut self, profile: VisitorProfile) {
        self.spawn_visitor(profile, None);
    }

    /// Send a visitor who already holds a ticket
    pub fn admit_with_ticket(&mut self, profile: VisitorProfile, ticket: Ticket) {
        self.spawn_visitor(profile, Some(ticket));
    }

    fn spawn_visitor(&mut self, profile: VisitorProfile, ticket: Option<Ticket>) {
        let span = tracing::info_span!("visitor", id = profile.id, age = profile.age, kind = ?profile.kind);
        let rng = self.park.rng(VISITOR_STREAM_BASE + u64::from(profile.id));
        tracing::debug!(parent: &span, vip = profile.vip, chaperone_id = ?profile.chaperone_id, "arrived");
        let mut actor = VisitorActor::new(Arc::clone(&self.park), self.desk.clone(), profile, rng);
        if let Some(ticket) = ticket {
            actor = actor.with_ticket(ticket);
        }
        self.visitors.spawn(actor.run().instrument(span));
    }

    /// Visitors still inside
    pub fn visitors_inside(&self) -> usize {
        self.visitors.len()
    }

    /// Run the whole day: spawn arrivals until closing time, then close
    pub async fn run(mut self) -> RunReport {
        let park = Arc::clone(&self.park);
        let closing_at = park.state().closing_at();
        let mut generator = VisitorGenerator::new(park.rng(GENERATOR_STREAM));
        let mut spawn_tick = tokio::time::interval(park.config().visitors.spawn_interval);

        loop {
            tokio::select! {
                biased;
                _ = park.shutdown_token().cancelled() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                _ = tokio::time::sleep_until(closing_at) => break,
                _ = spawn_tick.tick() => {
                    for profile in generator.arrivals(&park) {
                        self.admit(profile);
                    }
                    self.reap();
                }
            }
        }
        self.close().await
    }

    fn reap(&mut self) {
        while let Some(done) = self.visitors.try_join_next() {
            self.tally(done);
        }
    }

    fn tally(&mut self, done: Result<Result<VisitSummary, EngineError>, JoinError>) {
        match done {
            Ok(Ok(_)) => self.visitors_exited += 1,
            Ok(Err(_)) => self.visitors_failed += 1,
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                tracing::error!(error = %e, "visitor task failed");
                self.visitors_failed += 1;
            }
        }
    }

    /// Closing sequence. Safe to call at any time; shutdown skips the drain.
    pub async fn close(mut self) -> RunReport {
        let park = Arc::clone(&self.park);
        let config = park.config();

        park.state().operating_hours = false;
        tracing::info!("operating hours over, gates closed");

        if !park.is_shutting_down() {
            let deadline = park.now() + config.station.closing_drain;
            while !park.state().station_empty() && park.now() < deadline {
                if park.pause(config.attendants.tick).await.is_err() {
                    break;
                }
            }
        }

        park.state().system_active = false;
        park.request_shutdown();
        tracing::info!(
            visitors = self.visitors.len(),
            "shutdown signalled, waiting for actors"
        );

        let join_timeout = config.attendants.join_timeout;
        let joined = tokio::time::timeout(join_timeout, self.join_all()).await;
        let mut aborted = 0;
        if joined.is_err() {
            aborted = self.visitors.len() + self.staff.len();
            tracing::warn!(aborted, "actors did not exit in time, aborting");
            self.visitors.abort_all();
            self.staff.abort_all();
            self.join_all().await;
        }

        park.recall_chairs();
        let snapshot = park.snapshot();
        tracing::info!(
            total_rides = snapshot.total_rides,
            tickets_sold = snapshot.tickets_sold,
            visitors = snapshot.visitors_created,
            "park closed"
        );

        RunReport {
            run_id: park.run_id(),
            snapshot,
            visitors_exited: self.visitors_exited,
            visitors_failed: self.visitors_failed,
            aborted,
        }
    }

    async fn join_all(&mut self) {
        while let Some(done) = self.visitors.join_next().await {
            self.tally(done);
        }
        while let Some(done) = self.staff.join_next().await {
            match done {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "staff member stopped with an error"),
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::error!(error = %e, "staff task failed"),
            }
        }
    }
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod tests;
