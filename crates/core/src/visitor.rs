// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visitor profile and status machine
//!
//! A visitor is owned by its own actor. Other actors only ever see the
//! profile fields carried in messages (id, kind, age, chaperone flags).

use crate::config::VisitorConfig;
use crate::ticket::Ticket;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitorKind {
    Pedestrian,
    Cyclist,
}

impl fmt::Display for VisitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitorKind::Pedestrian => f.write_str("pedestrian"),
            VisitorKind::Cyclist => f.write_str("cyclist"),
        }
    }
}

/// Where a visitor is in its visit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitorStatus {
    New,
    HasTicket,
    AtLowerStation,
    WaitingForPlatform,
    OnPlatform,
    OnChair,
    AtUpperStation,
    OnRoute,
    Finished,
}

impl VisitorStatus {
    /// Whether the status machine allows moving from `self` to `next`
    pub fn can_transition(self, next: VisitorStatus) -> bool {
        use VisitorStatus::*;
        match (self, next) {
            (Finished, _) => false,
            (_, Finished) => true,
            (New, HasTicket)
            | (HasTicket, AtLowerStation)
            | (AtLowerStation, WaitingForPlatform)
            | (WaitingForPlatform, OnPlatform)
            | (OnPlatform, OnChair)
            | (OnChair, AtUpperStation)
            | (AtUpperStation, OnRoute) => true,
            // Another ride: straight to the gate with a valid ticket, or back to the office
            (AtUpperStation | OnRoute, HasTicket | New) => true,
            _ => false,
        }
    }
}

impl fmt::Display for VisitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("visitor {visitor_id}: invalid transition {from} -> {to}")]
    InvalidTransition {
        visitor_id: u32,
        from: VisitorStatus,
        to: VisitorStatus,
    },
}

/// Bike route classes at the upper station
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteClass {
    Easy,
    Medium,
    Hard,
}

impl RouteClass {
    pub const ALL: [RouteClass; 3] = [RouteClass::Easy, RouteClass::Medium, RouteClass::Hard];

    pub fn duration(self, config: &VisitorConfig) -> Duration {
        match self {
            RouteClass::Easy => config.route_easy,
            RouteClass::Medium => config.route_medium,
            RouteClass::Hard => config.route_hard,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// The part of a visitor other actors may learn about
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorProfile {
    pub id: u32,
    pub age: u32,
    pub kind: VisitorKind,
    pub vip: bool,
    /// Age inside the configured child band
    pub needs_chaperone: bool,
    pub chaperone_id: Option<u32>,
}

impl VisitorProfile {
    pub fn new(
        id: u32,
        age: u32,
        kind: VisitorKind,
        vip: bool,
        chaperone_id: Option<u32>,
        config: &VisitorConfig,
    ) -> Self {
        Self {
            id,
            age,
            kind,
            vip,
            needs_chaperone: (config.chaperone_min_age..config.chaperone_max_age).contains(&age),
            chaperone_id,
        }
    }

    /// Draw a random profile. Without a given age the visitor is 4 to 79;
    /// only visitors old enough may arrive with a bike.
    pub fn generate(
        id: u32,
        age: Option<u32>,
        chaperone_id: Option<u32>,
        rng: &mut impl Rng,
        config: &VisitorConfig,
    ) -> Self {
        let age = age.unwrap_or_else(|| rng.gen_range(4..80));
        let kind = if age >= config.cyclist_min_age && rng.gen_range(0..100) < config.cyclist_percent
        {
            VisitorKind::Cyclist
        } else {
            VisitorKind::Pedestrian
        };
        let vip = rng.gen_range(0..100) < config.vip_percent;
        Self::new(id, age, kind, vip, chaperone_id, config)
    }

    pub fn is_cyclist(&self) -> bool {
        self.kind == VisitorKind::Cyclist
    }
}

/// A visitor's private state, owned by its actor
#[derive(Clone, Debug)]
pub struct Visitor {
    pub profile: VisitorProfile,
    pub ticket: Option<Ticket>,
    status: VisitorStatus,
    pub ride_count: u32,
}

impl Visitor {
    pub fn new(profile: VisitorProfile) -> Self {
        Self {
            profile,
            ticket: None,
            status: VisitorStatus::New,
            ride_count: 0,
        }
    }

    pub fn id(&self) -> u32 {
        self.profile.id
    }

    pub fn status(&self) -> VisitorStatus {
        self.status
    }

    /// Move to the next status, rejecting transitions the machine does not allow
    pub fn advance(&mut self, next: VisitorStatus) -> Result<(), StatusError> {
        if !self.status.can_transition(next) {
            return Err(StatusError::InvalidTransition {
                visitor_id: self.profile.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn has_valid_ticket(&self, now: tokio::time::Instant) -> bool {
        self.ticket.as_ref().is_some_and(|t| t.is_valid(now))
    }
}

#[cfg(test)]
#[path = "visitor_tests.rs"]
mod tests;
