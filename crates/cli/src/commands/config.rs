// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hoist config` - Print the effective protocol configuration

use anyhow::Result;
use clap::Args;
use hoist_core::ProtocolConfig;
use std::path::PathBuf;

/// Protocol settings shared by `run` and `config`
///
/// Flags override values read from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct ProtocolArgs {
    /// TOML file with protocol settings
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Start from the quick timings instead of the defaults
    #[arg(long, conflicts_with = "config")]
    pub fast: bool,

    /// Number of lifts
    #[arg(long)]
    pub lifts: Option<u32>,

    /// Transit capacity in order units
    #[arg(long)]
    pub capacity: Option<u32>,

    /// Orders each purchaser places
    #[arg(long)]
    pub rounds: Option<u32>,
}

impl ProtocolArgs {
    pub fn resolve(&self) -> Result<ProtocolConfig> {
        let mut config = match &self.config {
            Some(path) => ProtocolConfig::load(path)?,
            None if self.fast => ProtocolConfig::fast(),
            None => ProtocolConfig::default(),
        };
        if let Some(lifts) = self.lifts {
            config.lifts = lifts;
        }
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,
}

pub fn config(args: ConfigArgs) -> Result<()> {
    let config = args.protocol.resolve()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
