// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crossing controller: admission, departure and batch release
//!
//! Any number of agents travelling one direction may share the crossing;
//! agents of the other direction park on their direction's condition until
//! the last occupant leaves. The emptying exit releases, as one batch,
//! exactly the agents parked on the opposite direction at that instant.
//!
//! Work done while inside happens without the lock; only the bookkeeping in
//! `enter` and `exit` is serialized.

use crate::direction::{Direction, PerDirection};
use crate::error::{CrossingError, InvariantViolation, ParseError};
use crate::journal::{CrossingEvent, Journal};
use crate::state::CrossingState;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Condvar, Mutex, MutexGuard};

/// What an emptying exit does with the agents it releases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleasePolicy {
    /// Reset the crossing to empty and let the released agents compete for
    /// it. Newcomers of either direction may get in first.
    #[default]
    Batch,
    /// Admit the released batch atomically, so the crossing switches
    /// direction before anyone else can enter.
    HandOff,
}

impl ReleasePolicy {
    pub fn name(self) -> &'static str {
        match self {
            ReleasePolicy::Batch => "batch",
            ReleasePolicy::HandOff => "hand-off",
        }
    }
}

impl std::fmt::Display for ReleasePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReleasePolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "batch" => Ok(ReleasePolicy::Batch),
            "hand-off" | "handoff" => Ok(ReleasePolicy::HandOff),
            _ => Err(ParseError::new("release policy", s)),
        }
    }
}

/// Outcome of a successful `enter`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the agent had to park before being admitted
    pub waited: bool,
    /// Occupants inside right after admission, including this agent
    pub occupants: usize,
}

/// Outcome of a successful `exit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// Occupants still inside after this agent left
    pub remaining: usize,
    /// Size of the opposite-direction batch this exit released
    pub released: usize,
}

/// Coordinates two-direction access to a single crossing
#[derive(Debug, Default)]
pub struct CrossingController {
    state: Mutex<CrossingState>,
    lanes: PerDirection<Condvar>,
    policy: ReleasePolicy,
    journal: Option<Journal>,
}

impl CrossingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ReleasePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Record every transition into `journal`
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }

    pub fn journal(&self) -> Option<&Journal> {
        self.journal.as_ref()
    }

    /// Block until an agent travelling `direction` is admitted
    pub fn enter(&self, direction: Direction) -> Admission {
        let mut state = self.lock();
        let mut waited = false;

        while !state.admits(direction) {
            waited = true;
            let ticket = state.park(direction);
            self.record(CrossingEvent::Parked {
                direction,
                waiting: state.waiting(direction),
            });

            // Only a batch release bumps the generation; anything else is a
            // spurious wake and goes straight back to sleep.
            state = self.lanes[direction]
                .wait_while(state, |s| s.generation[direction] == ticket)
                .unwrap_or_else(|e| e.into_inner());

            state.take_release(direction);
            self.record(CrossingEvent::Woken { direction });

            if self.policy == ReleasePolicy::HandOff {
                // The releasing exit already admitted the whole batch.
                return Admission {
                    waited,
                    occupants: state.occupant_count(),
                };
            }
        }

        state.admit(direction);
        let occupants = state.occupant_count();
        self.record(CrossingEvent::Admitted {
            direction,
            occupants,
            waited,
        });

        Admission { waited, occupants }
    }

    /// Enter only if no blocking is needed
    pub fn try_enter(&self, direction: Direction) -> Option<Admission> {
        let mut state = self.lock();
        if !state.admits(direction) {
            return None;
        }

        state.admit(direction);
        let occupants = state.occupant_count();
        self.record(CrossingEvent::Admitted {
            direction,
            occupants,
            waited: false,
        });

        Some(Admission {
            waited: false,
            occupants,
        })
    }

    /// Leave the crossing; the last occupant releases the opposite batch
    pub fn exit(&self, direction: Direction) -> Result<Departure, CrossingError> {
        let mut state = self.lock();
        let remaining = state.depart(direction)?;
        self.record(CrossingEvent::Departed {
            direction,
            occupants: remaining,
        });

        if remaining > 0 {
            return Ok(Departure {
                remaining,
                released: 0,
            });
        }

        let opposite = direction.opposite();
        let released = state.release_batch(opposite);
        if released > 0 {
            let handed_off = self.policy == ReleasePolicy::HandOff;
            if handed_off {
                state.hand_off(opposite, released);
            }
            self.record(CrossingEvent::BatchReleased {
                direction: opposite,
                size: released,
                handed_off,
            });
            tracing::info!(
                direction = %opposite,
                size = released,
                policy = %self.policy,
                "batch released"
            );
            self.lanes[opposite].notify_all();
        }

        Ok(Departure {
            remaining,
            released,
        })
    }

    /// Enter and get a guard that exits when dropped
    pub fn cross(&self, direction: Direction) -> CrossingGuard<'_> {
        let admission = self.enter(direction);
        CrossingGuard {
            controller: self,
            direction,
            admission,
            left: false,
        }
    }

    /// Copy of the current state, taken under the lock
    pub fn snapshot(&self) -> CrossingState {
        self.lock().clone()
    }

    /// Verify the state invariants under the lock
    pub fn check(&self) -> Result<(), InvariantViolation> {
        self.lock().check()
    }

    fn lock(&self) -> MutexGuard<'_, CrossingState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, event: CrossingEvent) {
        tracing::debug!(event = event.name(), fields = ?event.fields(), "crossing");
        if let Some(journal) = &self.journal {
            journal.record(event);
        }
    }
}

/// Occupancy held for the lifetime of the guard
#[derive(Debug)]
pub struct CrossingGuard<'a> {
    controller: &'a CrossingController,
    direction: Direction,
    admission: Admission,
    left: bool,
}

impl CrossingGuard<'_> {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn admission(&self) -> Admission {
        self.admission
    }

    /// Exit now and report the departure
    pub fn leave(mut self) -> Result<Departure, CrossingError> {
        self.left = true;
        self.controller.exit(self.direction)
    }
}

impl Drop for CrossingGuard<'_> {
    fn drop(&mut self) {
        if self.left {
            return;
        }
        if let Err(e) = self.controller.exit(self.direction) {
            tracing::warn!(error = %e, "crossing guard dropped without occupancy");
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
