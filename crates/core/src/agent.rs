// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agents: one crossing attempt each

use crate::controller::CrossingController;
use crate::direction::Direction;
use crate::error::CrossingError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// A participant that crosses once in a fixed direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub direction: Direction,
}

/// What happened during one crossing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingRecord {
    pub agent: Agent,
    pub waited: bool,
    pub wait_ms: u64,
    pub occupants_on_entry: usize,
    pub occupants_on_exit: usize,
    /// Size of the opposite batch released by this agent's exit
    pub released: usize,
}

/// Hooks called at each step of a crossing
pub trait CrossingObserver: Send + Sync {
    fn arriving(&self, _agent: &Agent) {}
    fn entered(&self, _agent: &Agent, _occupants: usize) {}
    fn left(&self, _agent: &Agent, _occupants: usize) {}
}

/// Observer that ignores everything
impl CrossingObserver for () {}

impl Agent {
    pub fn new(id: u32, direction: Direction) -> Self {
        Self { id, direction }
    }

    /// Enter, stay inside for `dwell`, then leave
    pub fn cross(
        &self,
        controller: &CrossingController,
        dwell: Duration,
    ) -> Result<CrossingRecord, CrossingError> {
        self.cross_observed(controller, dwell, &())
    }

    pub fn cross_observed<O: CrossingObserver + ?Sized>(
        &self,
        controller: &CrossingController,
        dwell: Duration,
        observer: &O,
    ) -> Result<CrossingRecord, CrossingError> {
        let span = tracing::info_span!("agent", id = self.id, direction = %self.direction);
        let _guard = span.enter();

        observer.arriving(self);
        tracing::debug!("trying to enter");

        let start = Instant::now();
        let admission = controller.enter(self.direction);
        let wait = start.elapsed();
        observer.entered(self, admission.occupants);
        tracing::debug!(
            occupants = admission.occupants,
            waited = admission.waited,
            wait_ms = millis(wait),
            "entered"
        );

        if !dwell.is_zero() {
            std::thread::sleep(dwell);
        }

        let departure = controller.exit(self.direction)?;
        observer.left(self, departure.remaining);
        tracing::debug!(occupants = departure.remaining, "left");

        Ok(CrossingRecord {
            agent: *self,
            waited: admission.waited,
            wait_ms: millis(wait),
            occupants_on_entry: admission.occupants,
            occupants_on_exit: departure.remaining,
            released: departure.released,
        })
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent {} ({})", self.id, self.direction)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
