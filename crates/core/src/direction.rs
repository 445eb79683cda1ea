// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Travel directions across the crossing

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One of the two mutually exclusive travel orientations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::West, Direction::East];

    /// The direction travelling against this one
    pub fn opposite(self) -> Self {
        match self {
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::West => "West",
            Direction::East => "East",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "west" => Ok(Direction::West),
            "e" | "east" => Ok(Direction::East),
            _ => Err(ParseError::new("direction", s)),
        }
    }
}

/// A pair of values, one per direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDirection<T> {
    pub west: T,
    pub east: T,
}

impl<T> PerDirection<T> {
    pub fn new(west: T, east: T) -> Self {
        Self { west, east }
    }
}

impl<T> Index<Direction> for PerDirection<T> {
    type Output = T;

    fn index(&self, direction: Direction) -> &T {
        match direction {
            Direction::West => &self.west,
            Direction::East => &self.east,
        }
    }
}

impl<T> IndexMut<Direction> for PerDirection<T> {
    fn index_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::West => &mut self.west,
            Direction::East => &mut self.east,
        }
    }
}

#[cfg(test)]
#[path = "direction_tests.rs"]
mod tests;
