// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `crossing run` - Run a simulation

use anyhow::Result;
use clap::Args;
use crossing_core::{Pattern, ReleasePolicy, Simulation, SimulationConfig};
use std::time::Duration;

use crate::output::{self, OutputFormat};

/// Flags override the matching config file fields
#[derive(Args)]
pub struct RunArgs {
    /// Number of agents
    #[arg(long, short = 'n')]
    pub agents: Option<u32>,

    /// Direction assignment: alternate, grouped, all-west, all-east
    #[arg(long)]
    pub pattern: Option<Pattern>,

    /// Time each agent spends inside (e.g. "1s", "250ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub dwell: Option<Duration>,

    /// Delay between agent arrivals
    #[arg(long, value_parser = humantime::parse_duration)]
    pub stagger: Option<Duration>,

    /// Release policy: batch or hand-off
    #[arg(long)]
    pub policy: Option<ReleasePolicy>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
}

impl RunArgs {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(agents) = self.agents {
            config.agents = agents;
        }
        if let Some(pattern) = self.pattern {
            config.pattern = pattern;
        }
        if let Some(dwell) = self.dwell {
            config.dwell = dwell;
        }
        if let Some(stagger) = self.stagger {
            config.stagger = stagger;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
    }
}

pub fn handle(args: RunArgs, mut config: SimulationConfig) -> Result<()> {
    args.apply(&mut config);
    tracing::debug!(?config, "effective config");

    let report = Simulation::new(config).run()?;
    output::print(&report, args.output)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
