// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource gates
//!
//! A gate is a named semaphore with a fixed meaning. Every blocking acquire
//! races the shutdown token, so a waiting actor always returns promptly once
//! shutdown is requested.
//!
//! Permits may be released by a different actor than the one that acquired
//! them (the lower attendant takes a chair-pool permit, the upper attendant
//! gives it back), so a [`GatePermit`] can be forgotten and the count restored
//! later with [`Gate::release`].

use crate::error::GateError;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateKind {
    /// Any number of permits
    Counting,
    /// Signal gate, never holds more than one pending permit
    Binary,
    /// Mutual exclusion, one holder at a time
    Mutex,
}

#[derive(Debug)]
pub struct Gate {
    name: String,
    kind: GateKind,
    initial: usize,
    permits: Semaphore,
    // Serializes the check-then-add of capped releases
    release_lock: Mutex<()>,
}

impl Gate {
    pub fn new(name: impl Into<String>, kind: GateKind, initial: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            initial,
            permits: Semaphore::new(initial),
            release_lock: Mutex::new(()),
        }
    }

    pub fn counting(name: impl Into<String>, initial: usize) -> Self {
        Self::new(name, GateKind::Counting, initial)
    }

    /// A binary signal gate that starts closed
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, GateKind::Binary, 0)
    }

    pub fn mutex(name: impl Into<String>) -> Self {
        Self::new(name, GateKind::Mutex, 1)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for one permit, or until shutdown is requested
    pub async fn acquire(&self, shutdown: &CancellationToken) -> Result<GatePermit<'_>, GateError> {
        if shutdown.is_cancelled() {
            return Err(GateError::Interrupted);
        }
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => Err(GateError::Interrupted),
            permit = self.permits.acquire() => match permit {
                Ok(permit) => {
                    permit.forget();
                    Ok(GatePermit::new(self, 1))
                }
                // The semaphore is never closed
                Err(_) => Err(GateError::Interrupted),
            },
        }
    }

    /// Like [`Gate::acquire`], giving up after `limit`
    pub async fn acquire_timeout(
        &self,
        shutdown: &CancellationToken,
        limit: Duration,
    ) -> Result<GatePermit<'_>, GateError> {
        match tokio::time::timeout(limit, self.acquire(shutdown)).await {
            Ok(result) => result,
            Err(_) => Err(GateError::TimedOut),
        }
    }

    /// Take one permit without waiting
    pub fn try_acquire(&self) -> Result<GatePermit<'_>, GateError> {
        self.try_acquire_many(1)
    }

    pub fn try_acquire_many(&self, count: usize) -> Result<GatePermit<'_>, GateError> {
        let n = u32::try_from(count).map_err(|_| GateError::Busy)?;
        let permit = self
            .permits
            .try_acquire_many(n)
            .map_err(|_| GateError::Busy)?;
        permit.forget();
        Ok(GatePermit::new(self, count))
    }

    /// Return `count` permits. Binary and mutex gates hold at most one.
    pub fn release(&self, count: usize) {
        if count == 0 {
            return;
        }
        match self.kind {
            GateKind::Counting => self.permits.add_permits(count),
            GateKind::Binary | GateKind::Mutex => {
                let _guard = self.release_lock.lock().unwrap_or_else(|e| e.into_inner());
                if self.permits.available_permits() == 0 {
                    self.permits.add_permits(1);
                }
            }
        }
    }
}

/// Permits held from a gate; returned on drop unless forgotten
#[must_use = "dropping a permit releases it immediately"]
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a Gate,
    count: usize,
}

impl<'a> GatePermit<'a> {
    fn new(gate: &'a Gate, count: usize) -> Self {
        Self { gate, count }
    }

    pub fn gate(&self) -> &'a Gate {
        self.gate
    }

    /// Keep the permits taken; someone else will [`Gate::release`] them
    pub fn forget(mut self) {
        self.count = 0;
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release(self.count);
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
