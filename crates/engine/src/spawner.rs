// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visitor generator
//!
//! Families arrive while the park is open: an adult, sometimes with one or
//! two young children in their care. Arrivals stop at the visitor cap.

use crate::park::Park;
use lift_core::{Clock, VisitorProfile};
use rand::rngs::StdRng;
use rand::Rng;

pub struct VisitorGenerator {
    rng: StdRng,
}

impl VisitorGenerator {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Profiles arriving on this spawn tick, possibly none
    pub fn arrivals<C: Clock>(&mut self, park: &Park<C>) -> Vec<VisitorProfile> {
        let config = park.config();
        let visitors = &config.visitors;
        if !park.is_operating() || self.rng.gen_range(0..100) >= visitors.spawn_percent {
            return Vec::new();
        }

        let children = if self.rng.gen_range(0..100) < visitors.family_percent {
            self.rng.gen_range(1..=2)
        } else {
            0
        };
        let ids = {
            let mut state = park.state();
            let room = config.max_visitors.saturating_sub(state.visitors_created());
            let wanted = (1 + children).min(room);
            (0..wanted)
                .map(|_| state.allocate_visitor_id())
                .collect::<Vec<_>>()
        };
        let Some((&adult_id, child_ids)) = ids.split_first() else {
            return Vec::new();
        };

        let adult_age = self.rng.gen_range(20..70);
        let mut family = vec![VisitorProfile::generate(
            adult_id,
            Some(adult_age),
            None,
            &mut self.rng,
            visitors,
        )];
        for &child_id in child_ids {
            let age = self.rng.gen_range(4..8);
            family.push(VisitorProfile::generate(
                child_id,
                Some(age),
                Some(adult_id),
                &mut self.rng,
                visitors,
            ));
        }
        family
    }
}

#[cfg(test)]
#[path = "spawner_tests.rs"]
mod tests;
