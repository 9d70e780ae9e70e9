// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state store
//!
//! The single piece of mutable memory shared by all actors. It is always
//! accessed through one mutex; every method here is one critical section, so
//! related fields (station/platform counters, a chair record and the active
//! chair count) never become visible half-updated.

use crate::config::ParkConfig;
use crate::registry::{TransitionEntry, TransitionLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// The two station attendants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendantId {
    Lower,
    Upper,
}

impl AttendantId {
    pub fn peer(self) -> Self {
        match self {
            AttendantId::Lower => AttendantId::Upper,
            AttendantId::Upper => AttendantId::Lower,
        }
    }

    pub fn index(self) -> usize {
        match self {
            AttendantId::Lower => 0,
            AttendantId::Upper => 1,
        }
    }
}

impl fmt::Display for AttendantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendantId::Lower => f.write_str("lower"),
            AttendantId::Upper => f.write_str("upper"),
        }
    }
}

/// A physical gate as seen by the shared state
#[derive(Clone, Debug, PartialEq)]
pub struct GateRecord {
    pub id: usize,
    pub is_open: bool,
    pub current_visitor: Option<u32>,
    pub last_used_at: Option<Instant>,
}

impl GateRecord {
    fn new(id: usize, is_open: bool) -> Self {
        Self {
            id,
            is_open,
            current_visitor: None,
            last_used_at: None,
        }
    }
}

/// One slot of the chair ring
#[derive(Clone, Debug, PartialEq)]
pub struct Chair {
    pub id: usize,
    pub active: bool,
    pub passengers: Vec<u32>,
    pub bike_count: usize,
    pub departed_at: Option<Instant>,
}

impl Chair {
    fn empty(id: usize) -> Self {
        Self {
            id,
            active: false,
            passengers: Vec::new(),
            bike_count: 0,
            departed_at: None,
        }
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }
}

/// Outcome of a visitor moving from the station onto the platform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformAdmission {
    /// Counters moved; the visitor is on the platform
    Admitted,
    /// The lift is halted; the visitor waits for a fresh admission
    Deferred,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeatError {
    #[error("lift is halted")]
    Halted,
    #[error("no free chair")]
    NoFreeChair,
    #[error("cannot dispatch an empty chair")]
    EmptyGroup,
    #[error("group of {0} exceeds chair capacity")]
    Overfull(usize),
}

#[derive(Clone, Debug)]
pub struct SharedState {
    pub system_active: bool,
    pub emergency_halted: bool,
    pub operating_hours: bool,
    pub halted_by: Option<AttendantId>,
    pub people_at_station: u32,
    pub people_on_platform: u32,
    pub active_chairs: u32,
    pub total_rides: u32,
    pub tickets_sold: u32,
    /// Visitors whose platform admission was deferred by a halt
    pub pending_readmissions: Vec<u32>,
    /// Resume acknowledgments, indexed by [`AttendantId::index`]
    pub attendant_ready: [bool; 2],
    pub entry_gates: Vec<GateRecord>,
    pub platform_gates: Vec<GateRecord>,
    chairs: Vec<Chair>,
    next_chair_slot: usize,
    next_visitor_id: u32,
    next_ticket_id: u32,
    max_concurrent_chairs: u32,
    chair_capacity: usize,
    opened_at: Instant,
    closing_at: Instant,
}

impl SharedState {
    pub fn new(config: &ParkConfig, opened_at: Instant) -> Self {
        Self {
            system_active: true,
            emergency_halted: false,
            operating_hours: true,
            halted_by: None,
            people_at_station: 0,
            people_on_platform: 0,
            active_chairs: 0,
            total_rides: 0,
            tickets_sold: 0,
            pending_readmissions: Vec::new(),
            attendant_ready: [false; 2],
            entry_gates: (0..config.station.entry_gates)
                .map(|id| GateRecord::new(id, true))
                .collect(),
            platform_gates: (0..config.station.platform_gates)
                .map(|id| GateRecord::new(id, false))
                .collect(),
            chairs: (0..config.lift.total_chairs).map(Chair::empty).collect(),
            next_chair_slot: 0,
            next_visitor_id: 1,
            next_ticket_id: 1,
            max_concurrent_chairs: config.lift.max_concurrent_chairs as u32,
            chair_capacity: config.lift.chair_capacity,
            opened_at,
            closing_at: opened_at + config.simulation_duration,
        }
    }

    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    /// Scheduled end of operating hours; day passes expire here
    pub fn closing_at(&self) -> Instant {
        self.closing_at
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.duration_since(self.opened_at)
    }

    pub fn allocate_visitor_id(&mut self) -> u32 {
        let id = self.next_visitor_id;
        self.next_visitor_id += 1;
        id
    }

    pub fn visitors_created(&self) -> u32 {
        self.next_visitor_id - 1
    }

    /// Take the next ticket id and count the sale
    pub fn record_ticket_sale(&mut self) -> u32 {
        let id = self.next_ticket_id;
        self.next_ticket_id += 1;
        self.tickets_sold += 1;
        id
    }

    /// Undo a sale whose ticket never reached the buyer; the id is not reused
    pub fn void_ticket_sale(&mut self) {
        self.tickets_sold = self.tickets_sold.saturating_sub(1);
    }

    /// A visitor passed an entry gate into the station
    pub fn enter_station(&mut self, gate_id: usize, visitor_id: u32, now: Instant) {
        self.people_at_station += 1;
        if let Some(gate) = self.entry_gates.get_mut(gate_id) {
            gate.current_visitor = Some(visitor_id);
            gate.last_used_at = Some(now);
        }
    }

    /// A visitor left the station without reaching the platform
    pub fn leave_station(&mut self) {
        self.people_at_station = self.people_at_station.saturating_sub(1);
    }

    /// Move one visitor from the station onto the platform, unless halted
    pub fn admit_to_platform(&mut self, visitor_id: u32, now: Instant) -> PlatformAdmission {
        if self.emergency_halted {
            self.pending_readmissions.push(visitor_id);
            return PlatformAdmission::Deferred;
        }
        self.people_at_station = self.people_at_station.saturating_sub(1);
        self.people_on_platform += 1;
        if !self.platform_gates.is_empty() {
            let slot = visitor_id as usize % self.platform_gates.len();
            let gate = &mut self.platform_gates[slot];
            gate.current_visitor = Some(visitor_id);
            gate.last_used_at = Some(now);
        }
        PlatformAdmission::Admitted
    }

    /// Take the deferred platform admissions once the lift runs again
    pub fn take_readmissions(&mut self) -> Vec<u32> {
        if self.emergency_halted {
            return Vec::new();
        }
        std::mem::take(&mut self.pending_readmissions)
    }

    /// A visitor left the platform (boarded, or aborted)
    pub fn leave_platform(&mut self) {
        self.people_on_platform = self.people_on_platform.saturating_sub(1);
    }

    /// Record a dispatched chair in the next free ring slot.
    ///
    /// The caller must hold a chair-pool permit. Refused while halted.
    pub fn seat_chair(
        &mut self,
        passengers: &[u32],
        bike_count: usize,
        now: Instant,
    ) -> Result<usize, SeatError> {
        if self.emergency_halted {
            return Err(SeatError::Halted);
        }
        if passengers.is_empty() {
            return Err(SeatError::EmptyGroup);
        }
        if passengers.len() > self.chair_capacity {
            return Err(SeatError::Overfull(passengers.len()));
        }
        if self.active_chairs >= self.max_concurrent_chairs {
            return Err(SeatError::NoFreeChair);
        }

        let ring = self.chairs.len();
        let slot = (0..ring)
            .map(|offset| (self.next_chair_slot + offset) % ring)
            .find(|&idx| !self.chairs[idx].active)
            .ok_or(SeatError::NoFreeChair)?;

        let chair = &mut self.chairs[slot];
        chair.active = true;
        chair.passengers = passengers.to_vec();
        chair.bike_count = bike_count;
        chair.departed_at = Some(now);

        self.next_chair_slot = (slot + 1) % ring;
        self.active_chairs += 1;
        Ok(slot)
    }

    /// Chairs whose travel time has elapsed
    pub fn arrived_chairs(&self, now: Instant, ride_duration: Duration) -> Vec<usize> {
        self.chairs
            .iter()
            .filter(|c| c.active)
            .filter(|c| c.departed_at.is_some_and(|t| now.duration_since(t) >= ride_duration))
            .map(|c| c.id)
            .collect()
    }

    /// Ids of every chair still in flight
    pub fn active_chair_ids(&self) -> Vec<usize> {
        self.chairs.iter().filter(|c| c.active).map(|c| c.id).collect()
    }

    /// Unload an arrived chair and count the ride.
    ///
    /// Returns the chair as it was before clearing, or `None` if the slot was
    /// not active (so a permit is never returned twice).
    pub fn release_chair(&mut self, slot: usize) -> Option<Chair> {
        let chair = self.chairs.get_mut(slot)?;
        if !chair.active {
            return None;
        }
        let arrived = chair.clone();
        *chair = Chair::empty(slot);
        self.active_chairs = self.active_chairs.saturating_sub(1);
        self.total_rides += 1;
        Some(arrived)
    }

    /// Take a chair off the cable without counting a ride (shutdown only)
    pub fn recall_chair(&mut self, slot: usize) -> Option<Chair> {
        let chair = self.chairs.get_mut(slot)?;
        if !chair.active {
            return None;
        }
        let recalled = std::mem::replace(chair, Chair::empty(slot));
        self.active_chairs = self.active_chairs.saturating_sub(1);
        Some(recalled)
    }

    pub fn chair(&self, slot: usize) -> Option<&Chair> {
        self.chairs.get(slot)
    }

    pub fn chairs(&self) -> &[Chair] {
        &self.chairs
    }

    /// Active chair count agrees with the chair ring and the pool size
    pub fn is_consistent(&self) -> bool {
        let flagged = self.chairs.iter().filter(|c| c.active).count() as u32;
        flagged == self.active_chairs && self.active_chairs <= self.max_concurrent_chairs
    }

    /// Declare a stoppage; false if one is already in effect
    pub fn declare_halt(&mut self, by: AttendantId) -> bool {
        if self.emergency_halted {
            return false;
        }
        self.emergency_halted = true;
        self.halted_by = Some(by);
        self.attendant_ready = [false; 2];
        true
    }

    /// Lift the stoppage; false if there was none
    pub fn clear_halt(&mut self) -> bool {
        if !self.emergency_halted {
            return false;
        }
        self.emergency_halted = false;
        self.halted_by = None;
        true
    }

    pub fn mark_ready(&mut self, attendant: AttendantId) {
        self.attendant_ready[attendant.index()] = true;
    }

    pub fn is_ready(&self, attendant: AttendantId) -> bool {
        self.attendant_ready[attendant.index()]
    }

    /// Nobody is left between the entry gates and the chairs
    pub fn station_empty(&self) -> bool {
        self.people_at_station == 0 && self.people_on_platform == 0
    }
}

/// Read-only end-of-run view for reporting
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParkSnapshot {
    pub generated_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub system_active: bool,
    pub operating_hours: bool,
    pub emergency_halted: bool,
    pub people_at_station: u32,
    pub people_on_platform: u32,
    pub active_chairs: u32,
    pub total_rides: u32,
    pub tickets_sold: u32,
    pub visitors_created: u32,
    pub transitions: Vec<TransitionEntry>,
    pub unrecorded_transitions: u64,
    pub rides_per_ticket: BTreeMap<u32, u32>,
}

impl ParkSnapshot {
    pub fn capture(state: &SharedState, log: &TransitionLog, now: Instant) -> Self {
        Self {
            generated_at: Utc::now(),
            elapsed_secs: state.elapsed(now).as_secs_f64(),
            system_active: state.system_active,
            operating_hours: state.operating_hours,
            emergency_halted: state.emergency_halted,
            people_at_station: state.people_at_station,
            people_on_platform: state.people_on_platform,
            active_chairs: state.active_chairs,
            total_rides: state.total_rides,
            tickets_sold: state.tickets_sold,
            visitors_created: state.visitors_created(),
            transitions: log.entries().to_vec(),
            unrecorded_transitions: log.unrecorded(),
            rides_per_ticket: log.rides_per_ticket(),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
