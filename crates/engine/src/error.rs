// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lift engine

use lift_core::StatusError;
use thiserror::Error;

/// Outcome of a gate operation that did not yield a permit
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// Shutdown was requested while waiting; a normal abort path
    #[error("interrupted by shutdown")]
    Interrupted,
    #[error("timed out waiting for gate")]
    TimedOut,
    /// `try_acquire` found no free permit
    #[error("gate busy")]
    Busy,
}

/// Errors that abort one step of one actor
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("gate error: {0}")]
    Gate(#[from] GateError),
    #[error("channel closed: {channel}")]
    ChannelClosed { channel: &'static str },
    #[error("visitor status error: {0}")]
    Status(#[from] StatusError),
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl EngineError {
    /// Shutdown interrupted a wait; callers unwind quietly
    pub fn is_interrupted(&self) -> bool {
        matches!(self, EngineError::Gate(GateError::Interrupted))
    }
}
