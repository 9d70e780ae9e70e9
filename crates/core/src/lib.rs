// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lift-core: domain model for the chairlift park simulation
//!
//! This crate provides:
//! - Injected configuration with validation
//! - Tickets, pricing and validity rules
//! - Visitor profiles and the visitor status machine
//! - The shared state store and the bounded transition log
//! - Chair-group admission rules (bikes, seats, chaperones)
//!
//! Nothing here blocks or spawns; the actors live in `lift-engine`.

pub mod clock;
pub mod config;
pub mod grouping;
pub mod registry;
pub mod state;
pub mod ticket;
pub mod visitor;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    AttendantConfig, ConfigError, LiftConfig, ParkConfig, StationConfig, TicketConfig,
    VisitorConfig,
};
pub use grouping::{ChairGroup, GroupRules, PlatformCandidate, Refusal, WaitingLine};
pub use registry::{TransitionEntry, TransitionLog};
pub use state::{
    AttendantId, Chair, GateRecord, ParkSnapshot, PlatformAdmission, SeatError, SharedState,
};
pub use ticket::{price, Ticket, TicketType};
pub use visitor::{RouteClass, StatusError, Visitor, VisitorKind, VisitorProfile, VisitorStatus};
