// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol event journal
//!
//! The controller records every state transition here while it still holds
//! its lock, so the journal order is the order in which transitions took
//! effect. Replaying it with [`Journal::audit`] re-checks mutual exclusion
//! for the whole history rather than for a single snapshot.

use crate::direction::{Direction, PerDirection};
use crate::error::InvariantViolation;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A state transition performed by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrossingEvent {
    /// An agent was admitted by its own `enter`
    Admitted {
        direction: Direction,
        occupants: usize,
        waited: bool,
    },
    /// An agent suspended on its direction's wait condition
    Parked { direction: Direction, waiting: usize },
    /// A released agent re-acquired the lock
    Woken { direction: Direction },
    Departed {
        direction: Direction,
        occupants: usize,
    },
    /// An emptying exit released every agent parked on `direction`
    BatchReleased {
        direction: Direction,
        size: usize,
        handed_off: bool,
    },
}

impl CrossingEvent {
    /// Event name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            CrossingEvent::Admitted { .. } => "admitted",
            CrossingEvent::Parked { .. } => "parked",
            CrossingEvent::Woken { .. } => "woken",
            CrossingEvent::Departed { .. } => "departed",
            CrossingEvent::BatchReleased { .. } => "batch_released",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            CrossingEvent::Admitted { direction, .. }
            | CrossingEvent::Parked { direction, .. }
            | CrossingEvent::Woken { direction }
            | CrossingEvent::Departed { direction, .. }
            | CrossingEvent::BatchReleased { direction, .. } => *direction,
        }
    }

    /// Key-value pairs for structured logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("direction", self.direction().to_string())];
        match self {
            CrossingEvent::Admitted {
                occupants, waited, ..
            } => {
                fields.push(("occupants", occupants.to_string()));
                fields.push(("waited", waited.to_string()));
            }
            CrossingEvent::Parked { waiting, .. } => {
                fields.push(("waiting", waiting.to_string()));
            }
            CrossingEvent::Woken { .. } => {}
            CrossingEvent::Departed { occupants, .. } => {
                fields.push(("occupants", occupants.to_string()));
            }
            CrossingEvent::BatchReleased {
                size, handed_off, ..
            } => {
                fields.push(("size", size.to_string()));
                fields.push(("handed_off", handed_off.to_string()));
            }
        }
        fields
    }
}

/// A journal entry with its position in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq: u64,
    #[serde(flatten)]
    pub event: CrossingEvent,
}

/// Shared, append-only record of crossing events
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: CrossingEvent) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let seq = entries.len() as u64;
        entries.push(JournalEntry { seq, event });
    }

    /// Get all recorded entries
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn events(&self) -> Vec<CrossingEvent> {
        self.entries().into_iter().map(|entry| entry.event).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replay the journal and verify that both directions never shared the
    /// crossing and that every recorded occupant count adds up
    pub fn audit(&self) -> Result<(), InvariantViolation> {
        audit(&self.events())
    }
}

/// Replay `events` against a fresh crossing
pub fn audit(events: &[CrossingEvent]) -> Result<(), InvariantViolation> {
    let mut current: Option<Direction> = None;
    let mut occupants = 0usize;
    let mut waiting: PerDirection<usize> = PerDirection::default();

    for event in events {
        match *event {
            CrossingEvent::Admitted {
                direction,
                occupants: recorded,
                ..
            } => {
                if let Some(occupying) = current.filter(|d| *d != direction) {
                    return Err(InvariantViolation::MixedOccupancy {
                        occupying,
                        entering: direction,
                    });
                }
                current = Some(direction);
                occupants += 1;
                expect_count(event, recorded, occupants)?;
            }
            CrossingEvent::Departed {
                direction,
                occupants: recorded,
            } => {
                if current != Some(direction) || occupants == 0 {
                    return Err(InvariantViolation::Underflow { direction });
                }
                occupants -= 1;
                if occupants == 0 {
                    current = None;
                }
                expect_count(event, recorded, occupants)?;
            }
            CrossingEvent::Parked {
                direction,
                waiting: recorded,
            } => {
                waiting[direction] += 1;
                expect_count(event, recorded, waiting[direction])?;
            }
            CrossingEvent::BatchReleased {
                direction,
                size,
                handed_off,
            } => {
                // A batch is everyone parked on the direction, no more, no less.
                expect_count(event, size, std::mem::take(&mut waiting[direction]))?;
                if handed_off {
                    if let Some(occupying) = current {
                        return Err(InvariantViolation::MixedOccupancy {
                            occupying,
                            entering: direction,
                        });
                    }
                    current = Some(direction);
                    occupants = size;
                }
            }
            CrossingEvent::Woken { .. } => {}
        }
    }

    Ok(())
}

fn expect_count(
    event: &CrossingEvent,
    recorded: usize,
    expected: usize,
) -> Result<(), InvariantViolation> {
    if recorded == expected {
        Ok(())
    } else {
        Err(InvariantViolation::CountMismatch {
            event: event.name(),
            recorded,
            expected,
        })
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
