// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated runs: one thread per agent crossing a shared controller

use crate::agent::{millis, Agent, CrossingObserver, CrossingRecord};
use crate::config::{ConfigError, SimulationConfig};
use crate::controller::CrossingController;
use crate::direction::Direction;
use crate::error::{CrossingError, InvariantViolation};
use crate::journal::{Journal, JournalEntry};
use crate::state::CrossingState;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;
use thiserror::Error;

/// Errors that end a simulated run
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn agent {agent}: {source}")]
    Spawn {
        agent: u32,
        source: std::io::Error,
    },
    #[error("agent {agent} panicked")]
    AgentPanicked { agent: u32 },
    #[error("protocol error: {0}")]
    Crossing(#[from] CrossingError),
    #[error("journal audit failed: {0}")]
    Audit(#[from] InvariantViolation),
}

/// Step of an agent's crossing, as seen from the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Moment {
    Arriving,
    Entered { occupants: usize },
    Left { occupants: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Milliseconds since the run started
    pub at_ms: u64,
    pub agent: u32,
    pub direction: Direction,
    #[serde(flatten)]
    pub moment: Moment,
}

impl std::fmt::Display for TimelineEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:>6}ms] agent {} ", self.at_ms, self.agent)?;
        match self.moment {
            Moment::Arriving => write!(f, "is trying to cross ({})", self.direction),
            Moment::Entered { occupants } => {
                write!(f, "entered ({}), occupants: {}", self.direction, occupants)
            }
            Moment::Left { occupants } => {
                write!(f, "left ({}), occupants: {}", self.direction, occupants)
            }
        }
    }
}

/// Agent-side record of a run, in the order agents reported it
#[derive(Debug, Clone)]
pub struct Timeline {
    started: Instant,
    entries: Arc<Mutex<Vec<TimelineEntry>>>,
}

impl Timeline {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn push(&self, agent: &Agent, moment: Moment) {
        let entry = TimelineEntry {
            at_ms: millis(self.started.elapsed()),
            agent: agent.id,
            direction: agent.direction,
            moment,
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }
}

impl CrossingObserver for Timeline {
    fn arriving(&self, agent: &Agent) {
        self.push(agent, Moment::Arriving);
    }

    fn entered(&self, agent: &Agent, occupants: usize) {
        self.push(agent, Moment::Entered { occupants });
    }

    fn left(&self, agent: &Agent, occupants: usize) {
        self.push(agent, Moment::Left { occupants });
    }
}

/// Everything observed during one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    pub elapsed_ms: u64,
    /// Per-agent records, ordered by agent id
    pub records: Vec<CrossingRecord>,
    pub timeline: Vec<TimelineEntry>,
    pub journal: Vec<JournalEntry>,
    pub final_state: CrossingState,
}

impl SimulationReport {
    pub fn waited(&self) -> usize {
        self.records.iter().filter(|r| r.waited).count()
    }
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.timeline {
            writeln!(f, "{entry}")?;
        }
        let stats = self.final_state.stats();
        write!(
            f,
            "{} agents crossed in {}ms ({} waited, {} batches, largest batch {}, peak occupancy {})",
            self.records.len(),
            self.elapsed_ms,
            self.waited(),
            stats.batches,
            stats.largest_batch,
            stats.peak_occupancy,
        )
    }
}

/// Runs a population of agents against a fresh controller
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spawn every agent, wait for all of them, and audit the journal
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        self.config.validate()?;

        let journal = Journal::new();
        let controller = Arc::new(
            CrossingController::new()
                .with_policy(self.config.policy)
                .with_journal(journal.clone()),
        );
        let timeline = Timeline::start();

        tracing::info!(
            agents = self.config.agents,
            policy = %self.config.policy,
            "simulation starting"
        );

        let mut handles = Vec::new();
        let mut spawn_error = None;
        for agent in self.config.population() {
            let controller = Arc::clone(&controller);
            let observer = timeline.clone();
            let dwell = self.config.dwell;

            let spawned = thread::Builder::new()
                .name(format!("agent-{}", agent.id))
                .spawn(move || agent.cross_observed(&controller, dwell, &observer));
            match spawned {
                Ok(handle) => handles.push((agent, handle)),
                Err(source) => {
                    spawn_error = Some(SimulationError::Spawn {
                        agent: agent.id,
                        source,
                    });
                    break;
                }
            }

            if !self.config.stagger.is_zero() {
                thread::sleep(self.config.stagger);
            }
        }

        // Agents already running are joined even when a later spawn failed.
        let mut records = Vec::with_capacity(handles.len());
        let mut failure = spawn_error;
        for (agent, handle) in handles {
            match handle.join() {
                Ok(Ok(record)) => records.push(record),
                Ok(Err(e)) => {
                    failure.get_or_insert(SimulationError::Crossing(e));
                }
                Err(_) => {
                    failure.get_or_insert(SimulationError::AgentPanicked { agent: agent.id });
                }
            }
        }
        if let Some(e) = failure {
            tracing::error!(error = %e, "simulation failed");
            return Err(e);
        }

        journal.audit()?;
        records.sort_by_key(|record| record.agent.id);

        let report = SimulationReport {
            config: self.config.clone(),
            elapsed_ms: millis(timeline.started.elapsed()),
            records,
            timeline: timeline.entries(),
            journal: journal.entries(),
            final_state: controller.snapshot(),
        };
        tracing::info!(
            elapsed_ms = report.elapsed_ms,
            waited = report.waited(),
            batches = report.final_state.stats().batches,
            "simulation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod tests;
