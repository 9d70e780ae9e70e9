// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lower-station attendant
//!
//! Batches platform requests into chair groups and dispatches chairs. Each
//! visitor admitted into the forming group has its own pass opened, plus one
//! platform-entry permit, so only admitted visitors step onto the platform. A
//! group leaves once it is complete, or once no new request has come in for
//! the grace interval, and only when every member stands on the platform.

use crate::error::{EngineError, GateError};
use crate::gate::Gate;
use crate::halt::AttendantLink;
use crate::messages::{ChairAssignment, LowerMessage};
use crate::park::Park;
use lift_core::{ChairGroup, Clock, GroupRules, SeatError, WaitingLine};
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

pub struct LowerAttendant<C: Clock> {
    park: Arc<Park<C>>,
    inbox: mpsc::Receiver<LowerMessage>,
    link: AttendantLink,
    rng: StdRng,
    line: WaitingLine,
    group: ChairGroup,
    replies: HashMap<u32, oneshot::Sender<ChairAssignment>>,
    passes: HashMap<u32, Arc<Gate>>,
    boarding: HashSet<u32>,
    last_request: Instant,
}

impl<C: Clock> LowerAttendant<C> {
    pub fn new(
        park: Arc<Park<C>>,
        inbox: mpsc::Receiver<LowerMessage>,
        link: AttendantLink,
        rng: StdRng,
    ) -> Self {
        let group = ChairGroup::new(GroupRules::from_config(park.config()));
        let last_request = park.now();
        Self {
            park,
            inbox,
            link,
            rng,
            line: WaitingLine::new(),
            group,
            replies: HashMap::new(),
            passes: HashMap::new(),
            boarding: HashSet::new(),
            last_request,
        }
    }

    pub async fn run(mut self) -> Result<(), EngineError> {
        let park = Arc::clone(&self.park);
        let token = park.shutdown_token().clone();
        let tick = park.config().attendants.tick;
        let me = self.link.me();
        park.state().mark_ready(me);
        tracing::info!("lower attendant on duty");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                message = self.link.recv() => self.link.handle(&park, message),
                wake = park.gates().wake(me).acquire(&token) => {
                    if let Ok(signal) = wake {
                        signal.forget();
                        tracing::debug!(halted = park.is_halted(), "woken by upper attendant");
                    }
                }
                message = self.inbox.recv() => match message {
                    Some(message) => self.receive(message),
                    None => break,
                },
                _ = tokio::time::sleep(tick) => {}
            }

            match self.step().await {
                Ok(()) => {}
                Err(e) if e.is_interrupted() => break,
                Err(e) => tracing::warn!(error = %e, "lower attendant step failed"),
            }
        }

        tracing::info!(
            waiting = self.line.len(),
            forming = self.group.len(),
            "lower attendant off duty"
        );
        Ok(())
    }

    fn receive(&mut self, message: LowerMessage) {
        match message {
            LowerMessage::Platform {
                candidate,
                pass,
                chair,
            } => {
                tracing::debug!(
                    visitor_id = candidate.visitor_id,
                    kind = ?candidate.kind,
                    age = candidate.age,
                    "platform request"
                );
                self.replies.insert(candidate.visitor_id, chair);
                self.passes.insert(candidate.visitor_id, pass);
                self.line.push(candidate);
                self.last_request = self.park.now();
            }
            LowerMessage::BoardingReady { visitor_id } => {
                self.boarding.insert(visitor_id);
            }
        }
    }

    /// One round of station work
    async fn step(&mut self) -> Result<(), EngineError> {
        let park = Arc::clone(&self.park);
        if park.is_halted() {
            return Ok(());
        }

        let readmit = park.state().take_readmissions();
        if !readmit.is_empty() {
            tracing::info!(visitors = ?readmit, "re-admitting visitors held by the halt");
            for visitor_id in readmit {
                self.let_through(visitor_id);
            }
        }

        if self.link.maybe_halt(&park, &mut self.rng).await? {
            return Ok(());
        }

        self.admit();
        if self.ready_to_dispatch(park.now()) {
            self.dispatch().await?;
        }
        Ok(())
    }

    /// Move every admissible waiting visitor into the forming group
    fn admit(&mut self) {
        let admitted = self.line.fill(&mut self.group);
        for candidate in &admitted {
            tracing::debug!(
                visitor_id = candidate.visitor_id,
                seated = self.group.len(),
                "admitted to the platform"
            );
            self.let_through(candidate.visitor_id);
        }
    }

    /// Open one visitor's pass and hand out the platform permit it spends
    fn let_through(&self, visitor_id: u32) {
        match self.passes.get(&visitor_id) {
            Some(pass) => {
                pass.release(1);
                self.park.gates().platform_entry.release(1);
            }
            None => tracing::debug!(visitor_id, "no pass on file"),
        }
    }

    fn ready_to_dispatch(&self, now: Instant) -> bool {
        if self.group.is_empty() {
            return false;
        }
        let all_boarding = self
            .group
            .members()
            .iter()
            .all(|m| self.boarding.contains(&m.visitor_id));
        if !all_boarding {
            return false;
        }
        let grace = self.park.config().station.group_grace;
        self.group.is_complete() || now.duration_since(self.last_request) >= grace
    }

    /// Send the forming group up on the next free chair
    async fn dispatch(&mut self) -> Result<(), EngineError> {
        let park = Arc::clone(&self.park);
        let tick = park.config().attendants.tick;

        // Bounded so resume requests keep being answered while the pool is empty
        let permit = match park
            .gates()
            .chair_pool
            .acquire_timeout(park.shutdown_token(), tick)
            .await
        {
            Ok(permit) => permit,
            Err(GateError::TimedOut) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let passengers = self.group.passenger_ids();
        let bikes = self.group.cyclists();
        let seated = park.state().seat_chair(&passengers, bikes, park.now());
        let chair_id = match seated {
            Ok(slot) => slot,
            Err(SeatError::Halted) => return Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "chair refused");
                return Ok(());
            }
        };
        permit.forget();

        for member in self.group.take() {
            self.boarding.remove(&member.visitor_id);
            self.passes.remove(&member.visitor_id);
            let Some(reply) = self.replies.remove(&member.visitor_id) else {
                continue;
            };
            if reply.send(ChairAssignment { chair_id }).is_err() {
                tracing::debug!(visitor_id = member.visitor_id, "passenger gone before boarding");
            }
        }
        tracing::info!(chair = chair_id, ?passengers, bikes, "chair dispatched");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lower_tests.rs"]
mod tests;
