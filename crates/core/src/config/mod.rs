// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Park configuration
//!
//! Every capacity, price, age threshold and timing constant the actors use is
//! injected through [`ParkConfig`]. The defaults reproduce a 60 second day on
//! a 72-chair lift; any field can be overridden from a TOML file:
//!
//! ```toml
//! simulation_duration = "2m"
//! max_visitors = 200
//!
//! [lift]
//! ride_duration = "3s"
//!
//! [station]
//! max_station_occupancy = 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Accepted simulation duration range, in seconds
pub const SIMULATION_SECS_RANGE: std::ops::RangeInclusive<u64> = 10..=3600;
/// Accepted visitor cap range
pub const MAX_VISITORS_RANGE: std::ops::RangeInclusive<u32> = 1..=500;

/// Configuration errors; the only hard-fail path of a run
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("simulation duration must be between 10 and 3600 seconds, got {0}")]
    DurationOutOfRange(u64),

    #[error("visitor count must be between 1 and 500, got {0}")]
    VisitorsOutOfRange(u32),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration for one simulation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkConfig {
    /// How long the park stays open
    #[serde(with = "humantime_serde")]
    pub simulation_duration: Duration,
    /// Maximum number of visitors generated over the run
    pub max_visitors: u32,
    /// Seed for every actor's random stream; entropy when absent
    pub seed: Option<u64>,
    pub lift: LiftConfig,
    pub station: StationConfig,
    pub tickets: TicketConfig,
    pub visitors: VisitorConfig,
    pub attendants: AttendantConfig,
}

/// Chairs and the cable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftConfig {
    /// Physical chairs on the cable (size of the chair ring)
    pub total_chairs: usize,
    /// Chairs allowed in flight at once
    pub max_concurrent_chairs: usize,
    /// Seats per chair
    pub chair_capacity: usize,
    /// Bicycles per chair
    pub max_bikes_per_chair: usize,
    /// Travel time from the lower to the upper station
    #[serde(with = "humantime_serde")]
    pub ride_duration: Duration,
}

/// Lower and upper station layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub entry_gates: usize,
    pub platform_gates: usize,
    /// Visitors allowed between the entry gates and the chair
    pub max_station_occupancy: usize,
    /// Egress exits at the upper station
    pub exit_count: usize,
    /// Capacity of the transition log; later passages are not recorded
    pub transition_log_capacity: usize,
    /// How long the lower attendant waits for arrivals before sending a partial group
    #[serde(with = "humantime_serde")]
    pub group_grace: Duration,
    /// How long the park waits for the station to empty after closing
    #[serde(with = "humantime_serde")]
    pub closing_drain: Duration,
}

/// Prices, discounts and validity of tickets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketConfig {
    pub price_single: u32,
    pub price_timed_1: u32,
    pub price_timed_2: u32,
    pub price_timed_3: u32,
    pub price_day: u32,
    #[serde(with = "humantime_serde")]
    pub timed_1_duration: Duration,
    #[serde(with = "humantime_serde")]
    pub timed_2_duration: Duration,
    #[serde(with = "humantime_serde")]
    pub timed_3_duration: Duration,
    pub discount_percent: u32,
    /// Discount applies strictly below this age
    pub child_discount_below: u32,
    /// Discount applies strictly above this age
    pub senior_discount_above: u32,
}

/// Visitor population and behaviour
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitorConfig {
    /// Lower bound (inclusive) of the age band that needs a chaperone
    pub chaperone_min_age: u32,
    /// Upper bound (exclusive) of the age band that needs a chaperone
    pub chaperone_max_age: u32,
    pub max_children_per_chaperone: usize,
    pub vip_percent: u32,
    pub cyclist_percent: u32,
    pub cyclist_min_age: u32,
    /// Chance of taking another ride while the ticket is still valid
    pub repeat_ride_percent: u32,
    /// Chance per spawn tick that a new family arrives
    pub spawn_percent: u32,
    /// Chance that an arriving adult brings children
    pub family_percent: u32,
    #[serde(with = "humantime_serde")]
    pub spawn_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub route_easy: Duration,
    #[serde(with = "humantime_serde")]
    pub route_medium: Duration,
    #[serde(with = "humantime_serde")]
    pub route_hard: Duration,
}

/// Attendant pacing and the halt/resume handshake
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendantConfig {
    /// Polling period of both attendants
    #[serde(with = "humantime_serde")]
    pub tick: Duration,
    /// Probability per tick that an attendant declares a stoppage
    pub halt_chance: f64,
    /// How long a declared stoppage lasts before resume is attempted
    #[serde(with = "humantime_serde")]
    pub halt_duration: Duration,
    /// Bounded wait for the other attendant's resume acknowledgment
    #[serde(with = "humantime_serde")]
    pub resume_ack_timeout: Duration,
    /// Period of the status monitor
    #[serde(with = "humantime_serde")]
    pub monitor_interval: Duration,
    /// Overall budget for actors to exit after shutdown
    #[serde(with = "humantime_serde")]
    pub join_timeout: Duration,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            simulation_duration: Duration::from_secs(60),
            max_visitors: 100,
            seed: None,
            lift: LiftConfig::default(),
            station: StationConfig::default(),
            tickets: TicketConfig::default(),
            visitors: VisitorConfig::default(),
            attendants: AttendantConfig::default(),
        }
    }
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            total_chairs: 72,
            max_concurrent_chairs: 36,
            chair_capacity: 4,
            max_bikes_per_chair: 2,
            ride_duration: Duration::from_secs(2),
        }
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            entry_gates: 4,
            platform_gates: 3,
            max_station_occupancy: 50,
            exit_count: 2,
            transition_log_capacity: 1000,
            group_grace: Duration::from_millis(500),
            closing_drain: Duration::from_secs(3),
        }
    }
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            price_single: 15,
            price_timed_1: 30,
            price_timed_2: 50,
            price_timed_3: 70,
            price_day: 100,
            timed_1_duration: Duration::from_secs(15),
            timed_2_duration: Duration::from_secs(30),
            timed_3_duration: Duration::from_secs(45),
            discount_percent: 25,
            child_discount_below: 10,
            senior_discount_above: 65,
        }
    }
}

impl Default for VisitorConfig {
    fn default() -> Self {
        Self {
            chaperone_min_age: 4,
            chaperone_max_age: 8,
            max_children_per_chaperone: 2,
            vip_percent: 1,
            cyclist_percent: 40,
            cyclist_min_age: 12,
            repeat_ride_percent: 50,
            spawn_percent: 70,
            family_percent: 25,
            spawn_interval: Duration::from_secs(1),
            route_easy: Duration::from_secs(3),
            route_medium: Duration::from_secs(5),
            route_hard: Duration::from_secs(8),
        }
    }
}

impl Default for AttendantConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            halt_chance: 1.0 / 3000.0,
            halt_duration: Duration::from_secs(2),
            resume_ack_timeout: Duration::from_secs(5),
            monitor_interval: Duration::from_millis(500),
            join_timeout: Duration::from_secs(30),
        }
    }
}

impl ParkConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_simulation_secs(mut self, secs: u64) -> Self {
        self.simulation_duration = Duration::from_secs(secs);
        self
    }

    pub fn with_max_visitors(mut self, max_visitors: u32) -> Self {
        self.max_visitors = max_visitors;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject parameters the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.simulation_duration.as_secs();
        if !SIMULATION_SECS_RANGE.contains(&secs) {
            return Err(ConfigError::DurationOutOfRange(secs));
        }
        if !MAX_VISITORS_RANGE.contains(&self.max_visitors) {
            return Err(ConfigError::VisitorsOutOfRange(self.max_visitors));
        }

        let lift = &self.lift;
        ensure(lift.total_chairs > 0, "lift.total_chairs", "must be positive")?;
        ensure(
            (1..=lift.total_chairs).contains(&lift.max_concurrent_chairs),
            "lift.max_concurrent_chairs",
            "must be between 1 and lift.total_chairs",
        )?;
        ensure(lift.chair_capacity > 0, "lift.chair_capacity", "must be positive")?;
        ensure(
            lift.max_bikes_per_chair * 2 <= lift.chair_capacity,
            "lift.max_bikes_per_chair",
            "each bicycle takes a seat next to its rider",
        )?;

        let station = &self.station;
        ensure(station.entry_gates > 0, "station.entry_gates", "must be positive")?;
        ensure(station.platform_gates > 0, "station.platform_gates", "must be positive")?;
        ensure(
            station.max_station_occupancy > 0,
            "station.max_station_occupancy",
            "must be positive",
        )?;
        ensure(station.exit_count > 0, "station.exit_count", "must be positive")?;

        let tickets = &self.tickets;
        ensure(
            tickets.discount_percent <= 100,
            "tickets.discount_percent",
            "must not exceed 100",
        )?;

        let visitors = &self.visitors;
        ensure(
            visitors.chaperone_min_age < visitors.chaperone_max_age,
            "visitors.chaperone_min_age",
            "must be below visitors.chaperone_max_age",
        )?;
        for (field, percent) in [
            ("visitors.vip_percent", visitors.vip_percent),
            ("visitors.cyclist_percent", visitors.cyclist_percent),
            ("visitors.repeat_ride_percent", visitors.repeat_ride_percent),
            ("visitors.spawn_percent", visitors.spawn_percent),
            ("visitors.family_percent", visitors.family_percent),
        ] {
            ensure(percent <= 100, field, "must not exceed 100")?;
        }
        ensure(
            !visitors.spawn_interval.is_zero(),
            "visitors.spawn_interval",
            "must be positive",
        )?;

        ensure(
            (0.0..=1.0).contains(&self.attendants.halt_chance),
            "attendants.halt_chance",
            "must be a probability",
        )?;
        ensure(
            !self.attendants.tick.is_zero(),
            "attendants.tick",
            "must be positive",
        )?;
        ensure(
            !self.attendants.monitor_interval.is_zero(),
            "attendants.monitor_interval",
            "must be positive",
        )?;

        Ok(())
    }
}

fn ensure(condition: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests;
