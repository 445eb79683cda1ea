// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the crossing protocol

use crate::direction::Direction;
use thiserror::Error;

/// Errors returned by [`CrossingController`](crate::CrossingController) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossingError {
    /// `exit` was called for a direction that does not occupy the crossing
    #[error("{direction} is not occupying the crossing (current: {})", describe(.current))]
    NotOccupied {
        direction: Direction,
        current: Option<Direction>,
    },
}

/// A broken invariant of the shared crossing state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("direction {direction} is set but the crossing is empty")]
    DirectionWithoutOccupants { direction: Direction },
    #[error("{count} occupants inside but no direction is set")]
    OccupantsWithoutDirection { count: usize },
    #[error("{waiting} {direction} agents parked while their way is open")]
    StrandedWaiters { direction: Direction, waiting: usize },
    #[error("{entering} admitted while {occupying} occupies the crossing")]
    MixedOccupancy {
        occupying: Direction,
        entering: Direction,
    },
    #[error("{direction} departed from an empty crossing")]
    Underflow { direction: Direction },
    #[error("recorded {recorded} occupants after {event}, expected {expected}")]
    CountMismatch {
        event: &'static str,
        recorded: usize,
        expected: usize,
    },
}

/// Failure to parse one of the crate's named values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

fn describe(direction: &Option<Direction>) -> &'static str {
    direction.map_or("empty", Direction::name)
}
