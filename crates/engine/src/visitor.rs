// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visitor actor
//!
//! Walks one visitor through the park: ticket, entry gate, platform, chair,
//! the ride up and an optional route, then either another ride or home. The
//! station-capacity permit taken at the entry gate is held until the ride is
//! over.

use crate::error::{EngineError, GateError};
use crate::gate::{Gate, GatePermit};
use crate::messages::{ChairAssignment, Desk, LowerMessage, TicketRequest};
use crate::park::Park;
use lift_core::{
    Clock, PlatformAdmission, PlatformCandidate, RouteClass, Ticket, TicketType, Visitor,
    VisitorProfile, VisitorStatus,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Where the visitor is counted in the shared state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Counted {
    Nowhere,
    Station,
    Platform,
}

/// How a visit ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitSummary {
    pub visitor_id: u32,
    pub rides: u32,
    pub tickets_bought: u32,
    pub interrupted: bool,
}

pub struct VisitorActor<C: Clock> {
    park: Arc<Park<C>>,
    desk: Desk,
    rng: StdRng,
    visitor: Visitor,
    counted: Counted,
    tickets_bought: u32,
}

impl<C: Clock> VisitorActor<C> {
    pub fn new(park: Arc<Park<C>>, desk: Desk, profile: VisitorProfile, rng: StdRng) -> Self {
        Self {
            park,
            desk,
            rng,
            visitor: Visitor::new(profile),
            counted: Counted::Nowhere,
            tickets_bought: 0,
        }
    }

    /// Give the visitor a ticket up front (tests and pre-sold passes)
    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.visitor.ticket = Some(ticket);
        self
    }

    pub async fn run(mut self) -> Result<VisitSummary, EngineError> {
        let result = self.visit().await;
        self.uncount();
        // Any status may end the visit
        self.visitor.advance(VisitorStatus::Finished)?;

        let summary = VisitSummary {
            visitor_id: self.visitor.id(),
            rides: self.visitor.ride_count,
            tickets_bought: self.tickets_bought,
            interrupted: matches!(&result, Err(e) if e.is_interrupted()),
        };
        match result {
            Ok(()) => {
                tracing::info!(rides = summary.rides, "visitor leaves the park");
                Ok(summary)
            }
            Err(e) if e.is_interrupted() => {
                tracing::debug!(status = ?self.visitor.status(), "visit cut short by shutdown");
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(error = %e, "visit aborted");
                Err(e)
            }
        }
    }

    async fn visit(&mut self) -> Result<(), EngineError> {
        loop {
            if self.park.is_shutting_down() {
                return Err(GateError::Interrupted.into());
            }
            if !self.visitor.has_valid_ticket(self.park.now()) {
                if !self.park.is_operating() {
                    return Ok(());
                }
                self.buy_ticket().await?;
            }
            self.visitor.advance(VisitorStatus::HasTicket)?;

            if !self.ride().await? {
                return Ok(());
            }

            let again = self.visitor.has_valid_ticket(self.park.now())
                && self.park.is_operating()
                && self.rng.gen_range(0..100) < self.park.config().visitors.repeat_ride_percent;
            if !again {
                return Ok(());
            }
        }
    }

    async fn buy_ticket(&mut self) -> Result<(), EngineError> {
        let ticket_type = TicketType::ALL[self.rng.gen_range(0..TicketType::ALL.len())];
        let (reply, response) = oneshot::channel();
        let profile = &self.visitor.profile;
        let request = TicketRequest {
            visitor_id: profile.id,
            ticket_type,
            age: profile.age,
            vip: profile.vip,
            reply,
        };
        self.desk
            .tickets
            .send(request)
            .await
            .map_err(|_| EngineError::ChannelClosed { channel: "tickets" })?;

        let ticket = self.answer(response, "tickets").await?;
        tracing::debug!(ticket_id = ticket.id, %ticket_type, "ticket bought");
        self.visitor.ticket = Some(ticket);
        self.tickets_bought += 1;
        Ok(())
    }

    /// One ride from the entry gate to the top. Returns false if the gates
    /// refused the visitor.
    async fn ride(&mut self) -> Result<bool, EngineError> {
        let park = Arc::clone(&self.park);
        let Some(_station) = self.pass_entry_gate(&park).await? else {
            return Ok(false);
        };
        self.visitor.advance(VisitorStatus::AtLowerStation)?;

        let chair = self.wait_for_platform().await?;
        self.visitor.advance(VisitorStatus::OnPlatform)?;
        self.desk
            .lower
            .send(LowerMessage::BoardingReady {
                visitor_id: self.visitor.id(),
            })
            .await
            .map_err(|_| EngineError::ChannelClosed { channel: "lower" })?;

        let assignment = self.answer(chair, "chair").await?;
        park.state().leave_platform();
        self.counted = Counted::Nowhere;
        self.visitor.advance(VisitorStatus::OnChair)?;
        tracing::debug!(chair = assignment.chair_id, "seated");

        park.pause(park.config().lift.ride_duration).await?;
        self.visitor.advance(VisitorStatus::AtUpperStation)?;

        if self.visitor.profile.is_cyclist() {
            self.visitor.advance(VisitorStatus::OnRoute)?;
            let route = RouteClass::random(&mut self.rng);
            tracing::debug!(?route, "riding a route");
            park.pause(route.duration(&park.config().visitors)).await?;
        }
        self.visitor.ride_count += 1;
        // The station permit is returned as `_station` drops here
        Ok(true)
    }

    /// Take a station place and pass an entry gate. `None` if refused.
    async fn pass_entry_gate<'p>(
        &mut self,
        park: &'p Park<C>,
    ) -> Result<Option<GatePermit<'p>>, EngineError> {
        if !park.is_operating() || !self.visitor.has_valid_ticket(park.now()) {
            return Ok(None);
        }
        let token = park.shutdown_token();
        let gates = park.gates();

        let vip_slot = if self.visitor.profile.vip {
            Some(gates.vip_priority.acquire(token).await?)
        } else {
            None
        };
        let station = gates.station_capacity.acquire(token).await?;

        let free = gates
            .entry
            .iter()
            .enumerate()
            .find_map(|(id, gate)| gate.try_acquire().ok().map(|permit| (id, permit)));
        let (gate_id, entry) = match free {
            Some(found) => found,
            None => {
                let id = self.rng.gen_range(0..gates.entry.len().max(1));
                match gates.entry.get(id) {
                    Some(gate) => (id, gate.acquire(token).await?),
                    None => return Ok(None),
                }
            }
        };

        let ride_number = self.visitor.ride_count + 1;
        let Some(ticket) = self.visitor.ticket.as_mut() else {
            return Ok(None);
        };
        ticket.record_use();
        let ticket_id = ticket.id;
        park.record_passage(ticket_id, self.visitor.profile.id, gate_id, ride_number);
        park.state().enter_station(gate_id, self.visitor.profile.id, park.now());
        self.counted = Counted::Station;

        drop(entry);
        drop(vip_slot);
        Ok(Some(station))
    }

    /// Ask for a platform place and wait to be let through
    async fn wait_for_platform(&mut self) -> Result<oneshot::Receiver<ChairAssignment>, EngineError> {
        let park = Arc::clone(&self.park);
        let pass = Arc::new(Gate::binary(format!("platform_pass[{}]", self.visitor.id())));
        let (chair, assignment) = oneshot::channel();
        self.desk
            .lower
            .send(LowerMessage::Platform {
                candidate: PlatformCandidate::from(&self.visitor.profile),
                pass: Arc::clone(&pass),
                chair,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed { channel: "lower" })?;
        self.visitor.advance(VisitorStatus::WaitingForPlatform)?;

        loop {
            // Only the attendant opens this visitor's pass
            pass.acquire(park.shutdown_token()).await?.forget();
            park.gates()
                .platform_entry
                .acquire(park.shutdown_token())
                .await?
                .forget();
            let admission = park.state().admit_to_platform(self.visitor.id(), park.now());
            match admission {
                PlatformAdmission::Admitted => break,
                PlatformAdmission::Deferred => {
                    tracing::debug!("platform closed by a halt, waiting again");
                }
            }
        }
        self.counted = Counted::Platform;
        Ok(assignment)
    }

    /// Wait for a reply, or shutdown
    async fn answer<T>(
        &self,
        response: oneshot::Receiver<T>,
        channel: &'static str,
    ) -> Result<T, EngineError> {
        tokio::select! {
            biased;
            _ = self.park.shutdown_token().cancelled() => Err(GateError::Interrupted.into()),
            reply = response => reply.map_err(|_| EngineError::ChannelClosed { channel }),
        }
    }

    /// Undo the occupancy count of an unfinished step
    fn uncount(&mut self) {
        match self.counted {
            Counted::Nowhere => {}
            Counted::Station => self.park.state().leave_station(),
            Counted::Platform => self.park.state().leave_platform(),
        }
        self.counted = Counted::Nowhere;
    }
}

#[cfg(test)]
#[path = "visitor_tests.rs"]
mod tests;
