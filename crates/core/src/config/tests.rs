// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn defaults_are_valid() {
    let config = ParkConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.lift.max_concurrent_chairs, 36);
    assert_eq!(config.station.max_station_occupancy, 50);
    assert_eq!(config.tickets.price_day, 100);
}

#[parameterized(
    too_short = { 9 },
    too_long = { 3601 },
    zero = { 0 },
)]
fn rejects_simulation_duration_out_of_range(secs: u64) {
    let config = ParkConfig::default().with_simulation_secs(secs);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DurationOutOfRange(s)) if s == secs
    ));
}

#[parameterized(
    none = { 0 },
    too_many = { 501 },
)]
fn rejects_visitor_cap_out_of_range(count: u32) {
    let config = ParkConfig::default().with_max_visitors(count);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::VisitorsOutOfRange(n)) if n == count
    ));
}

#[parameterized(
    lower_bound = { 10, 1 },
    upper_bound = { 3600, 500 },
)]
fn accepts_range_bounds(secs: u64, visitors: u32) {
    let config = ParkConfig::default()
        .with_simulation_secs(secs)
        .with_max_visitors(visitors);
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_more_concurrent_chairs_than_chairs() {
    let mut config = ParkConfig::default();
    config.lift.max_concurrent_chairs = config.lift.total_chairs + 1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "lift.max_concurrent_chairs", .. })
    ));
}

#[test]
fn rejects_inverted_chaperone_band() {
    let mut config = ParkConfig::default();
    config.visitors.chaperone_min_age = 8;
    config.visitors.chaperone_max_age = 4;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "visitors.chaperone_min_age", .. })
    ));
}

#[parameterized(
    spawn_interval = { "[visitors]\nspawn_interval = \"0s\"\n", "visitors.spawn_interval" },
    monitor_interval = { "[attendants]\nmonitor_interval = \"0s\"\n", "attendants.monitor_interval" },
    tick = { "[attendants]\ntick = \"0ms\"\n", "attendants.tick" },
)]
fn rejects_zero_periods(toml: &str, expected: &str) {
    let config = ParkConfig::from_toml_str(toml).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field, .. }) if field == expected
    ));
}

#[test]
fn partial_toml_keeps_defaults() {
    let config = ParkConfig::from_toml_str(
        r#"
simulation_duration = "2m"
max_visitors = 20

[lift]
ride_duration = "500ms"

[station]
max_station_occupancy = 2
"#,
    )
    .unwrap();

    assert_eq!(config.simulation_duration, Duration::from_secs(120));
    assert_eq!(config.max_visitors, 20);
    assert_eq!(config.lift.ride_duration, Duration::from_millis(500));
    assert_eq!(config.lift.chair_capacity, 4);
    assert_eq!(config.station.max_station_occupancy, 2);
    assert_eq!(config.station.entry_gates, 4);
}

#[test]
fn load_reads_and_validates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("park.toml");
    std::fs::write(&path, "simulation_duration = \"5s\"\n").unwrap();

    assert!(matches!(
        ParkConfig::load(&path),
        Err(ConfigError::DurationOutOfRange(5))
    ));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(matches!(ParkConfig::load(&path), Err(ConfigError::Read(p, _)) if p == path));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        ParkConfig::from_toml_str("max_visitors = \"many\""),
        Err(ConfigError::Parse(_))
    ));
}
