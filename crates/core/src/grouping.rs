// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chair-group formation at the lower station
//!
//! Waiting visitors are batched into chair-sized groups. A rider with a bike
//! takes two seats (rider plus bicycle), so with four seats and two bikes a
//! chair carries four pedestrians, one cyclist and two pedestrians, or two
//! cyclists alone. A child in the chaperone band only joins a group that
//! already holds its chaperone.

use crate::config::ParkConfig;
use crate::visitor::{VisitorKind, VisitorProfile};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A platform request as seen by the lower attendant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCandidate {
    pub visitor_id: u32,
    pub kind: VisitorKind,
    pub needs_chaperone: bool,
    pub chaperone_id: Option<u32>,
    pub age: u32,
}

impl From<&VisitorProfile> for PlatformCandidate {
    fn from(profile: &VisitorProfile) -> Self {
        Self {
            visitor_id: profile.id,
            kind: profile.kind,
            needs_chaperone: profile.needs_chaperone,
            chaperone_id: profile.chaperone_id,
            age: profile.age,
        }
    }
}

/// Why a candidate cannot join the forming group right now
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refusal {
    /// Every seat is taken
    Full,
    /// The chair already carries the maximum number of bikes
    BikeLimit,
    /// Seats are left, but not enough for this rider (and bike)
    NoRoom,
    /// Supervised child whose chaperone is not in the group
    ChaperoneAbsent,
    /// The chaperone already supervises the maximum number of children here
    ChaperoneBusy,
}

/// Seat and supervision limits for one chair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupRules {
    pub capacity: usize,
    pub max_bikes: usize,
    pub max_children_per_chaperone: usize,
}

impl GroupRules {
    pub fn from_config(config: &ParkConfig) -> Self {
        Self {
            capacity: config.lift.chair_capacity,
            max_bikes: config.lift.max_bikes_per_chair,
            max_children_per_chaperone: config.visitors.max_children_per_chaperone,
        }
    }
}

/// The group currently being formed for the next chair
#[derive(Clone, Debug)]
pub struct ChairGroup {
    rules: GroupRules,
    members: Vec<PlatformCandidate>,
}

impl ChairGroup {
    pub fn new(rules: GroupRules) -> Self {
        Self {
            rules,
            members: Vec::with_capacity(rules.capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[PlatformCandidate] {
        &self.members
    }

    pub fn cyclists(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.kind == VisitorKind::Cyclist)
            .count()
    }

    pub fn pedestrians(&self) -> usize {
        self.members.len() - self.cyclists()
    }

    pub fn contains(&self, visitor_id: u32) -> bool {
        self.members.iter().any(|m| m.visitor_id == visitor_id)
    }

    fn children_of(&self, chaperone_id: u32) -> usize {
        self.members
            .iter()
            .filter(|m| m.needs_chaperone && m.chaperone_id == Some(chaperone_id))
            .count()
    }

    /// Seats in use, counting each bike as a seat
    fn seats_used(&self) -> usize {
        self.pedestrians() + 2 * self.cyclists()
    }

    /// Check whether `candidate` may join, in rule order: free seat, bikes,
    /// room for the rider, chaperone present, chaperone load.
    pub fn admits(&self, candidate: &PlatformCandidate) -> Result<(), Refusal> {
        if self.members.len() >= self.rules.capacity {
            return Err(Refusal::Full);
        }

        let needed = match candidate.kind {
            VisitorKind::Cyclist => {
                if self.cyclists() >= self.rules.max_bikes {
                    return Err(Refusal::BikeLimit);
                }
                2
            }
            VisitorKind::Pedestrian => {
                if self.rules.max_bikes > 0 && self.cyclists() >= self.rules.max_bikes {
                    return Err(Refusal::BikeLimit);
                }
                1
            }
        };
        if self.seats_used() + needed > self.rules.capacity {
            return Err(Refusal::NoRoom);
        }

        if candidate.needs_chaperone {
            let chaperone = candidate
                .chaperone_id
                .filter(|id| self.contains(*id))
                .ok_or(Refusal::ChaperoneAbsent)?;
            if self.children_of(chaperone) >= self.rules.max_children_per_chaperone {
                return Err(Refusal::ChaperoneBusy);
            }
        }

        Ok(())
    }

    /// Add a candidate, enforcing [`ChairGroup::admits`]
    pub fn try_add(&mut self, candidate: PlatformCandidate) -> Result<(), Refusal> {
        self.admits(&candidate)?;
        self.members.push(candidate);
        Ok(())
    }

    /// No further rider of any kind fits
    pub fn is_complete(&self) -> bool {
        self.members.len() >= self.rules.capacity
            || (self.rules.max_bikes > 0 && self.cyclists() >= self.rules.max_bikes)
            || self.seats_used() >= self.rules.capacity
    }

    pub fn passenger_ids(&self) -> Vec<u32> {
        self.members.iter().map(|m| m.visitor_id).collect()
    }

    /// Empty the group for the next chair, handing back its members
    pub fn take(&mut self) -> Vec<PlatformCandidate> {
        std::mem::take(&mut self.members)
    }
}

/// FIFO of visitors waiting for a place in a group
#[derive(Clone, Debug, Default)]
pub struct WaitingLine {
    queue: VecDeque<PlatformCandidate>,
}

impl WaitingLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: PlatformCandidate) {
        self.queue.push_back(candidate);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformCandidate> {
        self.queue.iter()
    }

    pub fn remove(&mut self, visitor_id: u32) -> Option<PlatformCandidate> {
        let idx = self.queue.iter().position(|c| c.visitor_id == visitor_id)?;
        self.queue.remove(idx)
    }

    /// Admit every candidate that currently qualifies, front to back.
    ///
    /// Admitting a chaperone can qualify children queued before it, so scans
    /// repeat until a pass admits no one or the group completes. Candidates
    /// that never qualify keep their place in line.
    pub fn fill(&mut self, group: &mut ChairGroup) -> Vec<PlatformCandidate> {
        let mut admitted = Vec::new();
        loop {
            let mut progressed = false;
            let mut idx = 0;
            while idx < self.queue.len() && !group.is_complete() {
                if group.admits(&self.queue[idx]).is_ok() {
                    if let Some(candidate) = self.queue.remove(idx) {
                        group.members.push(candidate.clone());
                        admitted.push(candidate);
                        progressed = true;
                    }
                } else {
                    idx += 1;
                }
            }
            if !progressed || group.is_complete() {
                return admitted;
            }
        }
    }
}

#[cfg(test)]
#[path = "grouping_tests.rs"]
mod tests;
