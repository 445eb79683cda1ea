// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation configuration
//!
//! Loaded from TOML; every field is optional and falls back to the
//! reference run (ten agents alternating West/East, one every 100ms, each
//! staying inside for one second).
//!
//! ```toml
//! agents = 6
//! pattern = "grouped"
//! dwell = "250ms"
//! stagger = "10ms"
//! policy = "hand-off"
//! ```

use crate::agent::Agent;
use crate::controller::ReleasePolicy;
use crate::direction::Direction;
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("agents must be at least 1")]
    NoAgents,
}

/// How directions are assigned to the population
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    /// West, East, West, ... by arrival order
    #[default]
    Alternate,
    /// First half West, second half East
    Grouped,
    AllWest,
    AllEast,
}

impl Pattern {
    /// Direction of the agent at `index` (zero-based) out of `total`
    pub fn direction_of(self, index: u32, total: u32) -> Direction {
        match self {
            Pattern::Alternate if index % 2 == 0 => Direction::West,
            Pattern::Alternate => Direction::East,
            Pattern::Grouped if index < total.div_ceil(2) => Direction::West,
            Pattern::Grouped => Direction::East,
            Pattern::AllWest => Direction::West,
            Pattern::AllEast => Direction::East,
        }
    }
}

impl FromStr for Pattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alternate" => Ok(Pattern::Alternate),
            "grouped" => Ok(Pattern::Grouped),
            "all-west" => Ok(Pattern::AllWest),
            "all-east" => Ok(Pattern::AllEast),
            _ => Err(ParseError::new("pattern", s)),
        }
    }
}

/// Parameters of a simulated run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of agents, each crossing once
    pub agents: u32,
    pub pattern: Pattern,
    /// Time each agent spends inside the crossing
    #[serde(with = "humantime_serde")]
    pub dwell: Duration,
    /// Delay between spawning consecutive agents
    #[serde(with = "humantime_serde")]
    pub stagger: Duration,
    pub policy: ReleasePolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            agents: 10,
            pattern: Pattern::Alternate,
            dwell: Duration::from_secs(1),
            stagger: Duration::from_millis(100),
            policy: ReleasePolicy::Batch,
        }
    }
}

impl SimulationConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        Ok(())
    }

    /// The population, ids starting at 1
    pub fn population(&self) -> Vec<Agent> {
        (0..self.agents)
            .map(|index| Agent::new(index + 1, self.pattern.direction_of(index, self.agents)))
            .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
