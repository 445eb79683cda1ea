// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! crossing-core: directional mutual exclusion for a shared crossing
//!
//! This crate provides:
//! - The shared crossing state and its invariants
//! - A controller admitting any number of same-direction agents while
//!   keeping the opposite direction parked, with batch release on empty
//! - An event journal that can be replayed to audit a run
//! - A threaded simulation harness and its TOML configuration

pub mod agent;
pub mod config;
pub mod controller;
pub mod direction;
pub mod error;
pub mod journal;
pub mod simulation;
pub mod state;

#[cfg(test)]
mod test_support;

pub use agent::{Agent, CrossingObserver, CrossingRecord};
pub use config::{ConfigError, Pattern, SimulationConfig};
pub use controller::{Admission, CrossingController, CrossingGuard, Departure, ReleasePolicy};
pub use direction::{Direction, PerDirection};
pub use error::{CrossingError, InvariantViolation, ParseError};
pub use journal::{CrossingEvent, Journal, JournalEntry};
pub use simulation::{Moment, Simulation, SimulationError, SimulationReport, Timeline, TimelineEntry};
pub use state::{CrossingState, CrossingStats, Occupancy};
