// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared crossing state
//!
//! The single piece of mutable data the protocol coordinates on. It is only
//! ever mutated by [`CrossingController`](crate::CrossingController) while
//! holding its lock; everything else sees read-only snapshots.

use crate::direction::{Direction, PerDirection};
use crate::error::{CrossingError, InvariantViolation};
use serde::{Deserialize, Serialize};

/// Coarse state of the crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "direction", rename_all = "snake_case")]
pub enum Occupancy {
    Empty,
    Occupied(Direction),
}

/// Cumulative counters, kept for introspection only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingStats {
    /// Agents admitted, including those admitted by a hand-off
    pub admissions: u64,
    /// Suspensions on a direction's wait condition
    pub parks: u64,
    /// Batch releases performed by an emptying exit
    pub batches: u64,
    pub largest_batch: usize,
    pub peak_occupancy: usize,
}

/// The protected coordination data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingState {
    pub(crate) current: Option<Direction>,
    pub(crate) occupants: usize,
    /// Parked agents not yet released by a batch
    pub(crate) waiting: PerDirection<usize>,
    /// Agents released by a batch that have not re-acquired the lock yet
    pub(crate) released: PerDirection<usize>,
    /// Bumped on every batch release; parked agents compare it to tell a
    /// batch wake from a spurious one
    pub(crate) generation: PerDirection<u64>,
    pub(crate) stats: CrossingStats,
}

impl CrossingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_direction(&self) -> Option<Direction> {
        self.current
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants
    }

    /// Agents parked on `direction` and not yet released.
    ///
    /// A batch release moves its agents from here to
    /// [`released`](Self::released), where they stay until each one gets the
    /// lock back; an agent counted in neither has been admitted.
    pub fn waiting(&self, direction: Direction) -> usize {
        self.waiting[direction]
    }

    pub fn released(&self, direction: Direction) -> usize {
        self.released[direction]
    }

    pub fn stats(&self) -> &CrossingStats {
        &self.stats
    }

    pub fn occupancy(&self) -> Occupancy {
        match self.current {
            Some(direction) => Occupancy::Occupied(direction),
            None => Occupancy::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy() == Occupancy::Empty
    }

    /// Whether an agent travelling `direction` may enter right now
    pub fn admits(&self, direction: Direction) -> bool {
        self.current.is_none() || self.current == Some(direction)
    }

    /// Verify the state invariants
    pub fn check(&self) -> Result<(), InvariantViolation> {
        match (self.current, self.occupants) {
            (Some(direction), 0) => {
                return Err(InvariantViolation::DirectionWithoutOccupants { direction })
            }
            (None, count) if count > 0 => {
                return Err(InvariantViolation::OccupantsWithoutDirection { count })
            }
            _ => {}
        }

        // Waiters may only be parked behind the opposite direction; anyone
        // else parked would never be woken.
        for direction in Direction::ALL {
            let waiting = self.waiting[direction];
            if waiting > 0 && self.current != Some(direction.opposite()) {
                return Err(InvariantViolation::StrandedWaiters { direction, waiting });
            }
        }

        Ok(())
    }

    pub(crate) fn admit(&mut self, direction: Direction) {
        if self.current.is_none() {
            self.current = Some(direction);
        }
        self.occupants += 1;
        self.stats.admissions += 1;
        self.stats.peak_occupancy = self.stats.peak_occupancy.max(self.occupants);
    }

    /// Remove one occupant, returning how many remain
    pub(crate) fn depart(&mut self, direction: Direction) -> Result<usize, CrossingError> {
        if self.current != Some(direction) || self.occupants == 0 {
            return Err(CrossingError::NotOccupied {
                direction,
                current: self.current,
            });
        }

        self.occupants -= 1;
        if self.occupants == 0 {
            self.current = None;
        }
        Ok(self.occupants)
    }

    pub(crate) fn park(&mut self, direction: Direction) -> u64 {
        self.waiting[direction] += 1;
        self.stats.parks += 1;
        self.generation[direction]
    }

    /// Release every agent currently parked on `direction` as one batch,
    /// returning the batch size
    pub(crate) fn release_batch(&mut self, direction: Direction) -> usize {
        let batch = std::mem::take(&mut self.waiting[direction]);
        if batch > 0 {
            self.released[direction] += batch;
            self.generation[direction] += 1;
            self.stats.batches += 1;
            self.stats.largest_batch = self.stats.largest_batch.max(batch);
        }
        batch
    }

    /// Account for one released agent re-acquiring the lock
    pub(crate) fn take_release(&mut self, direction: Direction) {
        self.released[direction] -= 1;
    }

    /// Admit a released batch as a whole
    pub(crate) fn hand_off(&mut self, direction: Direction, batch: usize) {
        self.current = Some(direction);
        self.occupants += batch;
        self.stats.admissions += batch as u64;
        self.stats.peak_occupancy = self.stats.peak_occupancy.max(self.occupants);
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
