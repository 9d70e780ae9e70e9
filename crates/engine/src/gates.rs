// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The park's full gate set

use crate::gate::Gate;
use lift_core::{AttendantId, ParkConfig};

#[derive(Debug)]
pub struct Gates {
    /// Visitors between the entry gates and the end of their ride
    pub station_capacity: Gate,
    /// Released once per visitor admitted by the lower attendant
    pub platform_entry: Gate,
    /// One permit per chair in flight
    pub chair_pool: Gate,
    pub ticket_office: Gate,
    /// At most one VIP passes the entry gates ahead of the queue at a time
    pub vip_priority: Gate,
    /// Rendezvous for the resume handshake
    pub halt_sync: Gate,
    wake: [Gate; 2],
    pub entry: Vec<Gate>,
    /// Platform-side gates; allocated closed and not acquired by any actor
    pub platform: Vec<Gate>,
}

impl Gates {
    pub fn new(config: &ParkConfig) -> Self {
        Self {
            station_capacity: Gate::counting(
                "station_capacity",
                config.station.max_station_occupancy,
            ),
            platform_entry: Gate::counting("platform_entry", 0),
            chair_pool: Gate::counting("chair_pool", config.lift.max_concurrent_chairs),
            ticket_office: Gate::mutex("ticket_office"),
            vip_priority: Gate::mutex("vip_priority"),
            halt_sync: Gate::binary("halt_sync"),
            wake: [Gate::binary("lower_wake"), Gate::binary("upper_wake")],
            entry: (0..config.station.entry_gates)
                .map(|id| Gate::mutex(format!("entry_gate[{id}]")))
                .collect(),
            platform: (0..config.station.platform_gates)
                .map(|id| Gate::binary(format!("platform_gate[{id}]")))
                .collect(),
        }
    }

    /// Wake-up signal addressed to `attendant`
    pub fn wake(&self, attendant: AttendantId) -> &Gate {
        &self.wake[attendant.index()]
    }

    /// Every gate, for inspection after a run
    pub fn all(&self) -> impl Iterator<Item = &Gate> {
        [
            &self.station_capacity,
            &self.platform_entry,
            &self.chair_pool,
            &self.ticket_office,
            &self.vip_priority,
            &self.halt_sync,
        ]
        .into_iter()
        .chain(self.wake.iter())
        .chain(self.entry.iter())
        .chain(self.platform.iter())
    }
}
