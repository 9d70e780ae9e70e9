// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tickets, pricing and validity
//!
//! A ticket is created once by the ticket office and from then on only its
//! owner touches it. Validity is re-checked before every gate passage; once a
//! ticket runs out of uses or passes its expiry it stays invalid.

use crate::config::TicketConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Kinds of ticket sold at the office
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketType {
    Single,
    Timed1,
    Timed2,
    Timed3,
    Day,
}

impl TicketType {
    pub const ALL: [TicketType; 5] = [
        TicketType::Single,
        TicketType::Timed1,
        TicketType::Timed2,
        TicketType::Timed3,
        TicketType::Day,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TicketType::Single => "single",
            TicketType::Timed1 => "timed-1",
            TicketType::Timed2 => "timed-2",
            TicketType::Timed3 => "timed-3",
            TicketType::Day => "day",
        }
    }

    /// Base price before discounts
    pub fn base_price(self, config: &TicketConfig) -> u32 {
        match self {
            TicketType::Single => config.price_single,
            TicketType::Timed1 => config.price_timed_1,
            TicketType::Timed2 => config.price_timed_2,
            TicketType::Timed3 => config.price_timed_3,
            TicketType::Day => config.price_day,
        }
    }

    /// Validity window of a timed tier
    pub fn tier_duration(self, config: &TicketConfig) -> Option<Duration> {
        match self {
            TicketType::Timed1 => Some(config.timed_1_duration),
            TicketType::Timed2 => Some(config.timed_2_duration),
            TicketType::Timed3 => Some(config.timed_3_duration),
            TicketType::Single | TicketType::Day => None,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Price of a ticket for a visitor of the given age.
///
/// Children below the child threshold and seniors above the senior threshold
/// pay the discounted price, rounded down.
pub fn price(ticket_type: TicketType, age: u32, config: &TicketConfig) -> u32 {
    let base = ticket_type.base_price(config);
    if age < config.child_discount_below || age > config.senior_discount_above {
        let kept = u64::from(100u32.saturating_sub(config.discount_percent));
        // Never above `base`, so it fits back into u32
        u32::try_from(u64::from(base) * kept / 100).unwrap_or(base)
    } else {
        base
    }
}

/// A purchased ticket
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    pub id: u32,
    pub ticket_type: TicketType,
    pub purchased_at: Instant,
    /// `None` means no time limit
    pub expires_at: Option<Instant>,
    pub use_count: u32,
    /// `None` means unlimited uses
    pub max_uses: Option<u32>,
    pub active: bool,
    pub vip: bool,
    pub owner_id: u32,
}

impl Ticket {
    /// Build a freshly issued ticket.
    ///
    /// Single rides get one use and no expiry; timed tiers expire one tier
    /// duration after purchase; day passes expire at closing time.
    pub fn issue(
        id: u32,
        ticket_type: TicketType,
        vip: bool,
        owner_id: u32,
        now: Instant,
        closing_at: Instant,
        config: &TicketConfig,
    ) -> Self {
        let (max_uses, expires_at) = match ticket_type {
            TicketType::Single => (Some(1), None),
            TicketType::Day => (None, Some(closing_at)),
            timed => (None, timed.tier_duration(config).map(|d| now + d)),
        };

        Self {
            id,
            ticket_type,
            purchased_at: now,
            expires_at,
            use_count: 0,
            max_uses,
            active: true,
            vip,
            owner_id,
        }
    }

    /// Whether the ticket may pass a gate at `now`
    pub fn is_valid(&self, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        if let Some(max) = self.max_uses {
            if self.use_count >= max {
                return false;
            }
        }
        self.expires_at.map_or(true, |expiry| now < expiry)
    }

    /// Count one gate passage; exhausting the uses deactivates the ticket
    pub fn record_use(&mut self) {
        self.use_count += 1;
        if self.max_uses.is_some_and(|max| self.use_count >= max) {
            self.active = false;
        }
    }

    /// Uses left, `None` when unlimited
    pub fn remaining_uses(&self) -> Option<u32> {
        self.max_uses.map(|max| max.saturating_sub(self.use_count))
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
