// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Chairlift park engine: gates, actors and the simulation coordinator

mod cashier;
mod error;
mod gate;
mod gates;
mod halt;
mod lower;
mod messages;
mod monitor;
mod park;
mod simulation;
mod spawner;
mod upper;
mod visitor;

pub use cashier::Cashier;
pub use error::{EngineError, GateError};
pub use gate::{Gate, GateKind, GatePermit};
pub use gates::Gates;
pub use halt::{link, AttendantLink};
pub use lower::LowerAttendant;
pub use messages::{AttendantMessage, ChairAssignment, Desk, LowerMessage, TicketRequest};
pub use monitor::{run_monitor, StatusLine};
pub use park::Park;
pub use simulation::{RunReport, Simulation};
pub use spawner::VisitorGenerator;
pub use upper::UpperAttendant;
pub use visitor::{VisitSummary, VisitorActor};
