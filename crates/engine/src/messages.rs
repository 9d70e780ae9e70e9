// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messages exchanged between actors
//!
//! Every request that expects an answer carries its own one-shot reply
//! channel, which stands in for the requester's identity.

use crate::gate::Gate;
use lift_core::{AttendantId, PlatformCandidate, Ticket, TicketType};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Capacity of every actor inbox
pub const INBOX_CAPACITY: usize = 256;

/// A purchase at the ticket office
#[derive(Debug)]
pub struct TicketRequest {
    pub visitor_id: u32,
    pub ticket_type: TicketType,
    pub age: u32,
    pub vip: bool,
    pub reply: oneshot::Sender<Ticket>,
}

/// The chair a visitor has been seated on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChairAssignment {
    pub chair_id: usize,
}

/// Messages handled by the lower-station attendant
#[derive(Debug)]
pub enum LowerMessage {
    /// A visitor inside the station asks for a place on the platform
    Platform {
        candidate: PlatformCandidate,
        /// Opened once this visitor is admitted into the forming group
        pass: Arc<Gate>,
        chair: oneshot::Sender<ChairAssignment>,
    },
    /// A visitor reached the platform and is ready to board
    BoardingReady { visitor_id: u32 },
}

/// Messages between the two attendants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttendantMessage {
    /// The halting attendant asks its peer to confirm readiness
    Resume { from: AttendantId },
}

/// Senders a visitor uses to reach the staff
#[derive(Clone, Debug)]
pub struct Desk {
    pub tickets: mpsc::Sender<TicketRequest>,
    pub lower: mpsc::Sender<LowerMessage>,
}
