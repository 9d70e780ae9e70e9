// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Halt/resume handshake between the two attendants
//!
//! The halting attendant sets the halted flag, wakes its peer, waits out the
//! stoppage, then asks the peer to confirm readiness and waits (bounded) on
//! the sync gate before clearing the flag and waking the peer again. The peer
//! answers a resume request by marking itself ready and signaling the sync
//! gate.

use crate::error::{EngineError, GateError};
use crate::messages::AttendantMessage;
use crate::park::Park;
use lift_core::{AttendantId, Clock};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::mpsc;

/// One attendant's end of the attendant-to-attendant channel
pub struct AttendantLink {
    me: AttendantId,
    inbox: mpsc::Receiver<AttendantMessage>,
    peer: mpsc::Sender<AttendantMessage>,
}

/// Linked ends for the lower and upper attendant
pub fn link() -> (AttendantLink, AttendantLink) {
    let (to_lower, lower_inbox) = mpsc::channel(8);
    let (to_upper, upper_inbox) = mpsc::channel(8);
    (
        AttendantLink {
            me: AttendantId::Lower,
            inbox: lower_inbox,
            peer: to_upper,
        },
        AttendantLink {
            me: AttendantId::Upper,
            inbox: upper_inbox,
            peer: to_lower,
        },
    )
}

impl AttendantLink {
    pub fn me(&self) -> AttendantId {
        self.me
    }

    /// Wait for a message from the peer. Pending forever once the peer is gone.
    pub async fn recv(&mut self) -> AttendantMessage {
        match self.inbox.recv().await {
            Some(message) => message,
            None => std::future::pending().await,
        }
    }

    /// Answer a message from the peer
    pub fn handle<C: Clock>(&self, park: &Park<C>, message: AttendantMessage) {
        match message {
            AttendantMessage::Resume { from } => {
                park.state().mark_ready(self.me);
                park.gates().halt_sync.release(1);
                tracing::info!(attendant = %self.me, halted_by = %from, "ready to resume");
            }
        }
    }

    /// Randomly declare a stoppage. Returns true if a halt was run.
    pub async fn maybe_halt<C: Clock>(
        &self,
        park: &Park<C>,
        rng: &mut StdRng,
    ) -> Result<bool, EngineError> {
        let chance = park.config().attendants.halt_chance;
        if chance <= 0.0 || !rng.gen_bool(chance.min(1.0)) {
            return Ok(false);
        }
        self.halt(park).await
    }

    /// Run the full halt/resume protocol as the halting attendant.
    ///
    /// Returns false without doing anything if a halt is already in effect.
    pub async fn halt<C: Clock>(&self, park: &Park<C>) -> Result<bool, EngineError> {
        if !park.state().declare_halt(self.me) {
            return Ok(false);
        }
        tracing::warn!(attendant = %self.me, "emergency halt");
        // Drop a late acknowledgment left over from an earlier halt
        if let Ok(stale) = park.gates().halt_sync.try_acquire() {
            stale.forget();
        }
        park.gates().wake(self.me.peer()).release(1);

        let outcome = self.resume(park).await;

        // The flag never outlives the protocol, even on shutdown
        park.state().clear_halt();
        park.state().mark_ready(self.me);
        park.gates().wake(self.me.peer()).release(1);

        outcome?;
        tracing::info!(attendant = %self.me, "lift resumed");
        Ok(true)
    }

    async fn resume<C: Clock>(&self, park: &Park<C>) -> Result<(), EngineError> {
        let attendants = &park.config().attendants;
        park.pause(attendants.halt_duration).await?;

        self.peer
            .send(AttendantMessage::Resume { from: self.me })
            .await
            .map_err(|_| EngineError::ChannelClosed {
                channel: "attendant",
            })?;

        match park
            .gates()
            .halt_sync
            .acquire_timeout(park.shutdown_token(), attendants.resume_ack_timeout)
            .await
        {
            Ok(permit) => {
                permit.forget();
                Ok(())
            }
            Err(GateError::TimedOut) => {
                tracing::warn!(
                    attendant = %self.me,
                    peer = %self.me.peer(),
                    "no resume acknowledgment, resuming anyway"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "halt_tests.rs"]
mod tests;
