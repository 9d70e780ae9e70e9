// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded transition log of gate passages
//!
//! Entries past capacity are not recorded. Nothing is evicted and no error
//! is raised; only a counter of unrecorded passages is kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded gate passage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub ticket_id: u32,
    pub visitor_id: u32,
    pub gate_id: usize,
    pub ride_number: u32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct TransitionLog {
    capacity: usize,
    entries: Vec<TransitionEntry>,
    unrecorded: u64,
}

impl TransitionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity.min(4096)),
            unrecorded: 0,
        }
    }

    /// Append a passage; returns false when the log is full
    pub fn append(&mut self, entry: TransitionEntry) -> bool {
        if self.entries.len() >= self.capacity {
            self.unrecorded += 1;
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Passages that arrived after the log filled up
    pub fn unrecorded(&self) -> u64 {
        self.unrecorded
    }

    pub fn entries(&self) -> &[TransitionEntry] {
        &self.entries
    }

    /// Recorded passages per ticket, ordered by ticket id
    pub fn rides_per_ticket(&self) -> BTreeMap<u32, u32> {
        let mut rides = BTreeMap::new();
        for entry in &self.entries {
            *rides.entry(entry.ticket_id).or_insert(0) += 1;
        }
        rides
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
