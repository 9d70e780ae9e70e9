// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};

fn small_config() -> ParkConfig {
    let mut config = ParkConfig::default();
    config.lift.total_chairs = 4;
    config.lift.max_concurrent_chairs = 2;
    config.station.entry_gates = 2;
    config.station.platform_gates = 2;
    config
}

#[test]
fn new_state_is_open_and_empty() {
    let clock = FakeClock::new();
    let state = SharedState::new(&small_config(), clock.now());

    assert!(state.system_active);
    assert!(state.operating_hours);
    assert!(!state.emergency_halted);
    assert_eq!(state.halted_by, None);
    assert_eq!(state.active_chairs, 0);
    assert!(state.chairs().iter().all(|c| !c.active && c.passengers.is_empty()));
    assert!(state.entry_gates.iter().all(|g| g.is_open));
    assert!(state.platform_gates.iter().all(|g| !g.is_open));
    assert!(state.is_consistent());
}

#[test]
fn ids_are_monotonic_and_sales_counted() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());

    assert_eq!(state.allocate_visitor_id(), 1);
    assert_eq!(state.allocate_visitor_id(), 2);
    assert_eq!(state.visitors_created(), 2);

    assert_eq!(state.record_ticket_sale(), 1);
    assert_eq!(state.record_ticket_sale(), 2);
    assert_eq!(state.tickets_sold, 2);
}

#[test]
fn platform_admission_moves_one_unit() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());

    state.enter_station(1, 10, clock.now());
    assert_eq!(state.people_at_station, 1);
    assert_eq!(state.entry_gates[1].current_visitor, Some(10));

    assert_eq!(state.admit_to_platform(10, clock.now()), PlatformAdmission::Admitted);
    assert_eq!(state.people_at_station, 0);
    assert_eq!(state.people_on_platform, 1);

    state.leave_platform();
    assert!(state.station_empty());
}

#[test]
fn halted_admission_is_deferred_until_resume() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());
    state.enter_station(0, 1, clock.now());
    assert!(state.declare_halt(AttendantId::Upper));

    assert_eq!(state.admit_to_platform(1, clock.now()), PlatformAdmission::Deferred);
    assert_eq!(state.people_at_station, 1);
    assert_eq!(state.people_on_platform, 0);
    assert_eq!(state.pending_readmissions, vec![1]);
    // Not handed out while still halted
    assert!(state.take_readmissions().is_empty());

    assert!(state.clear_halt());
    assert_eq!(state.take_readmissions(), vec![1]);
    assert!(state.take_readmissions().is_empty());
}

#[test]
fn only_one_halt_at_a_time() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());

    assert!(state.declare_halt(AttendantId::Lower));
    assert!(!state.declare_halt(AttendantId::Upper));
    assert_eq!(state.halted_by, Some(AttendantId::Lower));

    assert!(state.clear_halt());
    assert!(!state.clear_halt());
    assert_eq!(state.halted_by, None);
}

#[test]
fn chairs_are_assigned_round_robin() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());

    assert_eq!(state.seat_chair(&[1, 2], 0, clock.now()), Ok(0));
    assert_eq!(state.seat_chair(&[3], 1, clock.now()), Ok(1));
    assert_eq!(state.active_chairs, 2);
    assert!(state.is_consistent());

    // Pool exhausted
    assert_eq!(
        state.seat_chair(&[4], 0, clock.now()),
        Err(SeatError::NoFreeChair)
    );

    assert!(state.release_chair(0).is_some());
    assert_eq!(state.seat_chair(&[4], 0, clock.now()), Ok(2));
    assert!(state.release_chair(1).is_some());
    assert_eq!(state.seat_chair(&[5], 0, clock.now()), Ok(3));
    assert!(state.release_chair(2).is_some());
    // Wraps around the ring
    assert_eq!(state.seat_chair(&[6], 0, clock.now()), Ok(0));
    assert!(state.is_consistent());
}

#[test]
fn seat_skips_slots_still_in_flight() {
    let clock = FakeClock::new();
    let mut config = small_config();
    config.lift.total_chairs = 3;
    config.lift.max_concurrent_chairs = 3;
    let mut state = SharedState::new(&config, clock.now());

    for id in 0..3 {
        state.seat_chair(&[id], 0, clock.now()).unwrap();
    }
    // Slot 1 arrives first; the cursor (slot 0) is still busy
    state.release_chair(1).unwrap();
    assert_eq!(state.seat_chair(&[9], 0, clock.now()), Ok(1));
}

#[test]
fn seat_is_refused_while_halted_or_malformed() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());

    assert_eq!(state.seat_chair(&[], 0, clock.now()), Err(SeatError::EmptyGroup));
    assert_eq!(
        state.seat_chair(&[1, 2, 3, 4, 5], 0, clock.now()),
        Err(SeatError::Overfull(5))
    );

    state.declare_halt(AttendantId::Lower);
    assert_eq!(state.seat_chair(&[1], 0, clock.now()), Err(SeatError::Halted));
    assert_eq!(state.active_chairs, 0);
}

#[test]
fn arrival_follows_ride_duration() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());
    let ride = Duration::from_secs(2);

    state.seat_chair(&[1, 2], 1, clock.now()).unwrap();
    clock.advance(Duration::from_secs(1));
    state.seat_chair(&[3], 0, clock.now()).unwrap();

    clock.advance(Duration::from_secs(1));
    assert_eq!(state.arrived_chairs(clock.now(), ride), vec![0]);

    clock.advance(Duration::from_secs(1));
    assert_eq!(state.arrived_chairs(clock.now(), ride), vec![0, 1]);
}

#[test]
fn release_counts_a_ride_once() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());
    state.seat_chair(&[7, 8], 2, clock.now()).unwrap();

    let chair = state.release_chair(0).unwrap();
    assert_eq!(chair.passengers, vec![7, 8]);
    assert_eq!(chair.bike_count, 2);
    assert_eq!(state.total_rides, 1);
    assert_eq!(state.active_chairs, 0);

    assert!(state.release_chair(0).is_none());
    assert_eq!(state.total_rides, 1);
    assert!(state.chair(0).is_some_and(|c| c.passengers.is_empty()));
}

#[test]
fn snapshot_copies_counters_and_log() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());
    let mut log = TransitionLog::new(10);

    let ticket = state.record_ticket_sale();
    log.append(TransitionEntry {
        ticket_id: ticket,
        visitor_id: 1,
        gate_id: 0,
        ride_number: 1,
        recorded_at: Utc::now(),
    });
    clock.advance(Duration::from_secs(5));

    let snapshot = ParkSnapshot::capture(&state, &log, clock.now());
    assert_eq!(snapshot.tickets_sold, 1);
    assert_eq!(snapshot.transitions.len(), 1);
    assert_eq!(snapshot.rides_per_ticket.get(&ticket), Some(&1));
    assert_eq!(snapshot.elapsed_secs, 5.0);
}

#[test]
fn recalled_chairs_are_not_counted_as_rides() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());
    state.seat_chair(&[1], 0, clock.now()).unwrap();
    state.seat_chair(&[2], 0, clock.now()).unwrap();

    let recalled: Vec<_> = state
        .active_chair_ids()
        .into_iter()
        .filter_map(|slot| state.recall_chair(slot))
        .collect();

    assert_eq!(recalled.len(), 2);
    assert_eq!(state.active_chairs, 0);
    assert_eq!(state.total_rides, 0);
    assert!(state.recall_chair(0).is_none());
    assert!(state.is_consistent());
}

#[test]
fn voided_sale_is_not_counted() {
    let clock = FakeClock::new();
    let mut state = SharedState::new(&small_config(), clock.now());

    assert_eq!(state.record_ticket_sale(), 1);
    state.void_ticket_sale();
    assert_eq!(state.tickets_sold, 0);
    // Ids stay unique
    assert_eq!(state.record_ticket_sale(), 2);
}
