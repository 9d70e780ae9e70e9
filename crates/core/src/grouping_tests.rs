// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn rules() -> GroupRules {
    GroupRules {
        capacity: 4,
        max_bikes: 2,
        max_children_per_chaperone: 2,
    }
}

fn walker(id: u32) -> PlatformCandidate {
    PlatformCandidate {
        visitor_id: id,
        kind: VisitorKind::Pedestrian,
        needs_chaperone: false,
        chaperone_id: None,
        age: 30,
    }
}

fn rider(id: u32) -> PlatformCandidate {
    PlatformCandidate {
        kind: VisitorKind::Cyclist,
        ..walker(id)
    }
}

fn child(id: u32, chaperone: u32) -> PlatformCandidate {
    PlatformCandidate {
        visitor_id: id,
        kind: VisitorKind::Pedestrian,
        needs_chaperone: true,
        chaperone_id: Some(chaperone),
        age: 5,
    }
}

fn group_of(seated: &[PlatformCandidate]) -> ChairGroup {
    let mut group = ChairGroup::new(rules());
    for candidate in seated {
        group.try_add(candidate.clone()).unwrap();
    }
    group
}

#[test]
fn rules_follow_config() {
    let config = ParkConfig::default();
    assert_eq!(GroupRules::from_config(&config), rules());
}

#[parameterized(
    empty_takes_walker = { &[], walker(9), Ok(()) },
    empty_takes_rider = { &[], rider(9), Ok(()) },
    four_walkers_full = { &[walker(1), walker(2), walker(3), walker(4)], walker(9), Err(Refusal::Full) },
    one_rider_two_walkers_no_room = { &[rider(1), walker(2), walker(3)], walker(9), Err(Refusal::NoRoom) },
    one_rider_one_walker_takes_walker = { &[rider(1), walker(2)], walker(9), Ok(()) },
    one_rider_one_walker_refuses_rider = { &[rider(1), walker(2)], rider(9), Err(Refusal::NoRoom) },
    two_riders_refuse_walker = { &[rider(1), rider(2)], walker(9), Err(Refusal::BikeLimit) },
    two_riders_refuse_rider = { &[rider(1), rider(2)], rider(9), Err(Refusal::BikeLimit) },
    three_walkers_refuse_rider = { &[walker(1), walker(2), walker(3)], rider(9), Err(Refusal::NoRoom) },
    child_without_chaperone = { &[walker(1)], child(9, 2), Err(Refusal::ChaperoneAbsent) },
    child_with_chaperone = { &[walker(2)], child(9, 2), Ok(()) },
    chaperone_at_limit = { &[walker(2), child(3, 2), child(4, 2)], child(9, 2), Err(Refusal::ChaperoneBusy) },
)]
fn admission(seated: &[PlatformCandidate], candidate: PlatformCandidate, expected: Result<(), Refusal>) {
    assert_eq!(group_of(seated).admits(&candidate), expected);
}

#[test]
fn chaperone_limit_applies_below_capacity() {
    let mut group = ChairGroup::new(GroupRules {
        capacity: 6,
        max_bikes: 2,
        max_children_per_chaperone: 2,
    });
    group.try_add(walker(1)).unwrap();
    group.try_add(child(2, 1)).unwrap();
    group.try_add(child(3, 1)).unwrap();

    assert_eq!(group.admits(&child(4, 1)), Err(Refusal::ChaperoneBusy));
    assert_eq!(group.admits(&walker(5)), Ok(()));
}

#[parameterized(
    four_walkers = { &[walker(1), walker(2), walker(3), walker(4)], true },
    three_walkers = { &[walker(1), walker(2), walker(3)], false },
    rider_and_two_walkers = { &[rider(1), walker(2), walker(3)], true },
    rider_and_walker = { &[rider(1), walker(2)], false },
    two_riders = { &[rider(1), rider(2)], true },
    empty = { &[], false },
)]
fn completion(seated: &[PlatformCandidate], complete: bool) {
    assert_eq!(group_of(seated).is_complete(), complete);
}

#[test]
fn take_resets_the_group() {
    let mut group = group_of(&[walker(1), rider(2)]);
    assert_eq!(group.passenger_ids(), vec![1, 2]);
    assert_eq!(group.cyclists(), 1);

    let members = group.take();
    assert_eq!(members.len(), 2);
    assert!(group.is_empty());
    assert_eq!(group.cyclists(), 0);
}

#[test]
fn fill_rescans_after_chaperone_joins() {
    let mut line = WaitingLine::new();
    line.push(child(2, 1));
    line.push(child(3, 1));
    line.push(walker(1));

    let mut group = ChairGroup::new(rules());
    let admitted: Vec<_> = line.fill(&mut group).iter().map(|c| c.visitor_id).collect();

    assert_eq!(admitted, [1, 2, 3]);
    assert!(line.is_empty());
}

#[test]
fn fill_preserves_arrival_order_for_walkers() {
    let mut line = WaitingLine::new();
    for id in 1..=6 {
        line.push(walker(id));
    }

    let mut group = ChairGroup::new(rules());
    line.fill(&mut group);

    assert_eq!(group.passenger_ids(), vec![1, 2, 3, 4]);
    let left: Vec<_> = line.iter().map(|c| c.visitor_id).collect();
    assert_eq!(left, [5, 6]);
}

#[test]
fn fill_skips_a_rider_that_no_longer_fits() {
    let mut line = WaitingLine::new();
    line.push(rider(1));
    line.push(walker(2));
    line.push(rider(3));
    line.push(walker(4));

    let mut group = ChairGroup::new(rules());
    line.fill(&mut group);

    assert_eq!(group.passenger_ids(), vec![1, 2, 4]);
    assert!(group.is_complete());
    assert_eq!(line.iter().map(|c| c.visitor_id).collect::<Vec<_>>(), [3]);
}

#[test]
fn child_waits_while_chaperone_is_absent() {
    let mut line = WaitingLine::new();
    line.push(child(5, 99));
    line.push(walker(1));

    let mut group = ChairGroup::new(rules());
    let admitted = line.fill(&mut group);

    assert_eq!(admitted, vec![walker(1)]);
    assert_eq!(line.len(), 1);
    assert!(line.remove(5).is_some());
    assert!(line.remove(5).is_none());
}

// Property-based tests

use proptest::prelude::*;

fn arb_line() -> impl Strategy<Value = Vec<PlatformCandidate>> {
    // Children reference a chaperone among the first few ids, which may or
    // may not be in the line.
    proptest::collection::vec((any::<bool>(), any::<bool>(), 0u32..6), 0..24).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (cyclist, is_child, chaperone))| {
                let id = idx as u32 + 1;
                if is_child && chaperone != id {
                    child(id, chaperone)
                } else if cyclist {
                    rider(id)
                } else {
                    walker(id)
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn formed_groups_respect_bike_and_chaperone_limits(candidates in arb_line()) {
        let total = candidates.len();
        let mut line = WaitingLine::new();
        for candidate in candidates {
            line.push(candidate);
        }

        let mut seated = 0;
        loop {
            let mut group = ChairGroup::new(rules());
            let admitted = line.fill(&mut group);
            if admitted.is_empty() {
                break;
            }
            seated += admitted.len();

            let bikes = group.cyclists();
            let count = group.len();
            prop_assert!(bikes <= 2);
            prop_assert!(count <= 4);
            if bikes == 1 {
                prop_assert!(count <= 3);
            }
            if bikes == 2 {
                prop_assert_eq!(count, 2);
            }

            for member in group.members().iter().filter(|m| m.needs_chaperone) {
                let chaperone = member.chaperone_id;
                prop_assert!(chaperone.is_some_and(|id| group.contains(id)));
                let load = group
                    .members()
                    .iter()
                    .filter(|m| m.needs_chaperone && m.chaperone_id == chaperone)
                    .count();
                prop_assert!(load <= 2);
            }
        }

        // Nobody is lost: every candidate is either seated or still waiting
        prop_assert_eq!(seated + line.len(), total);
    }
}
