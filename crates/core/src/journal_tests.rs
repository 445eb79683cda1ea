// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use Direction::{East, West};

fn admitted(direction: Direction, occupants: usize) -> CrossingEvent {
    CrossingEvent::Admitted {
        direction,
        occupants,
        waited: false,
    }
}

fn departed(direction: Direction, occupants: usize) -> CrossingEvent {
    CrossingEvent::Departed {
        direction,
        occupants,
    }
}

#[test]
fn journal_assigns_sequence_numbers() {
    let journal = Journal::new();
    assert!(journal.is_empty());

    journal.record(admitted(West, 1));
    journal.record(departed(West, 0));

    let entries = journal.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 0);
    assert_eq!(entries[1].seq, 1);
    assert_eq!(entries[1].event, departed(West, 0));
}

#[test]
fn clones_share_entries() {
    let journal = Journal::new();
    let other = journal.clone();

    other.record(admitted(East, 1));

    assert_eq!(journal.len(), 1);
}

#[test]
fn audit_accepts_alternating_batches() {
    let events = vec![
        admitted(West, 1),
        admitted(West, 2),
        CrossingEvent::Parked {
            direction: East,
            waiting: 1,
        },
        departed(West, 1),
        departed(West, 0),
        CrossingEvent::BatchReleased {
            direction: East,
            size: 1,
            handed_off: false,
        },
        CrossingEvent::Woken { direction: East },
        CrossingEvent::Admitted {
            direction: East,
            occupants: 1,
            waited: true,
        },
        departed(East, 0),
    ];

    assert_eq!(audit(&events), Ok(()));
}

#[test]
fn audit_accepts_hand_off() {
    let events = vec![
        admitted(West, 1),
        CrossingEvent::Parked {
            direction: East,
            waiting: 1,
        },
        CrossingEvent::Parked {
            direction: East,
            waiting: 2,
        },
        departed(West, 0),
        CrossingEvent::BatchReleased {
            direction: East,
            size: 2,
            handed_off: true,
        },
        CrossingEvent::Woken { direction: East },
        CrossingEvent::Woken { direction: East },
        departed(East, 1),
        departed(East, 0),
    ];

    assert_eq!(audit(&events), Ok(()));
}

#[test]
fn audit_detects_mixed_occupancy() {
    let events = vec![admitted(West, 1), admitted(East, 2)];

    assert_eq!(
        audit(&events),
        Err(InvariantViolation::MixedOccupancy {
            occupying: West,
            entering: East,
        })
    );
}

#[test]
fn audit_detects_departure_from_empty_crossing() {
    let events = vec![departed(East, 0)];

    assert_eq!(
        audit(&events),
        Err(InvariantViolation::Underflow { direction: East })
    );
}

#[test]
fn audit_detects_count_mismatch() {
    let events = vec![admitted(West, 1), admitted(West, 3)];

    assert_eq!(
        audit(&events),
        Err(InvariantViolation::CountMismatch {
            event: "admitted",
            recorded: 3,
            expected: 2,
        })
    );
}

#[test]
fn audit_detects_batch_larger_than_parked() {
    let events = vec![
        admitted(West, 1),
        CrossingEvent::Parked {
            direction: East,
            waiting: 1,
        },
        departed(West, 0),
        CrossingEvent::BatchReleased {
            direction: East,
            size: 2,
            handed_off: false,
        },
    ];

    assert_eq!(
        audit(&events),
        Err(InvariantViolation::CountMismatch {
            event: "batch_released",
            recorded: 2,
            expected: 1,
        })
    );
}

#[test]
fn entries_serialize_flat() {
    let entry = JournalEntry {
        seq: 4,
        event: CrossingEvent::BatchReleased {
            direction: West,
            size: 3,
            handed_off: false,
        },
    };

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["seq"], 4);
    assert_eq!(json["event"], "batch_released");
    assert_eq!(json["direction"], "west");
    assert_eq!(json["size"], 3);
}

#[test]
fn fields_include_direction_first() {
    let fields = admitted(East, 2).fields();
    assert_eq!(fields[0], ("direction", "East".to_string()));
    assert!(fields.contains(&("occupants", "2".to_string())));
}
