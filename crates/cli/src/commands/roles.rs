// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hoist roles` - Show how a cluster would be split into roles

use super::seed_or_random;
use crate::output::{print, OutputFormat, RolesOutput};
use anyhow::Result;
use clap::Args;
use hoist_core::{assign_roles, SeededDice};

#[derive(Args)]
pub struct RolesArgs {
    /// Cluster size
    #[arg(long, short = 'n', default_value_t = 5)]
    pub processes: u32,

    /// Seed for the coin flips
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the assignment as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn roles(args: RolesArgs) -> Result<()> {
    let seed = seed_or_random(args.seed);
    let membership = assign_roles(args.processes, &SeededDice::new(seed))?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    print(&RolesOutput::new(&membership, seed), format);
    Ok(())
}
