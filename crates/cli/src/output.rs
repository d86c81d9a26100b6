// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use hoist_core::{Membership, Rank, RunSummary};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Result of `hoist run`
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub mode: RunMode,
    pub seed: u64,
    /// Simulator steps; absent for live runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    #[serde(flatten)]
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Live,
    Simulated,
}

impl fmt::Display for RunOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            RunMode::Live => "live",
            RunMode::Simulated => "simulated",
        };
        let s = &self.summary;
        writeln!(f, "Run complete ({}, seed {})", mode, self.seed)?;
        writeln!(f, "  Purchasers:   {} ({} completed)", s.purchasers, s.completed)?;
        writeln!(f, "  Couriers:     {}", s.couriers)?;
        writeln!(f, "  Elapsed:      {} ms", s.elapsed_ms)?;
        if let Some(steps) = self.steps {
            writeln!(f, "  Steps:        {}", steps)?;
        }
        writeln!(f, "  Messages:     {}", s.messages)?;
        writeln!(f, "  Submissions:  {}", s.submissions)?;
        writeln!(f, "  Deliveries:   {}", s.deliveries)?;
        writeln!(f, "  Shared rides: {}", s.shared_rides)
    }
}

/// Result of `hoist roles`
#[derive(Debug, Serialize)]
pub struct RolesOutput {
    pub seed: u64,
    pub purchasers: Vec<Rank>,
    pub couriers: Vec<Rank>,
}

impl RolesOutput {
    pub fn new(membership: &Membership, seed: u64) -> Self {
        Self {
            seed,
            purchasers: membership.purchasers().to_vec(),
            couriers: membership.couriers().to_vec(),
        }
    }
}

impl fmt::Display for RolesOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |ranks: &[Rank]| {
            ranks
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(f, "{:<12} {}", "purchasers", list(&self.purchasers))?;
        writeln!(f, "{:<12} {}", "couriers", list(&self.couriers))
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
