// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `crossing config` - Print the effective configuration

use anyhow::Result;
use clap::Args;
use crossing_core::SimulationConfig;
use std::path::Path;

use crate::output::OutputFormat;

#[derive(Args)]
pub struct ConfigArgs {
    /// Output format (text prints TOML)
    #[arg(long, short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
}

/// The file's config when one is given, the reference run otherwise
pub fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Ok(SimulationConfig::load(path)?)
        }
        None => Ok(SimulationConfig::default()),
    }
}

pub fn handle(args: ConfigArgs, config: SimulationConfig) -> Result<()> {
    match args.output {
        OutputFormat::Text => print!("{}", config.to_toml()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
