// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hoist run` - Run the protocol, live or simulated

use super::config::ProtocolArgs;
use super::seed_or_random;
use crate::error::HoistError;
use crate::output::{print, OutputFormat, RunMode, RunOutput};
use anyhow::Result;
use clap::Args;
use hoist_core::{
    assign_roles, Delivery, Membership, ProtocolConfig, SeededDice, SimError, SimSetup,
    Simulation,
};
use hoist_engine::Cluster;
use std::time::Duration;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,

    /// Cluster size, split into roles by coin flip
    #[arg(long, short = 'n', default_value_t = 5)]
    pub processes: u32,

    /// Fixed number of purchasers (ranks 0..P)
    #[arg(long, requires = "couriers", conflicts_with = "processes")]
    pub purchasers: Option<u32>,

    /// Fixed number of couriers (ranks after the purchasers)
    #[arg(long, requires = "purchasers", conflicts_with = "processes")]
    pub couriers: Option<u32>,

    /// Seed for roles, quantities and windows
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run in the deterministic simulator instead of on tokio
    #[arg(long)]
    pub sim: bool,

    /// Let the simulator reorder messages from different senders
    #[arg(long, requires = "sim")]
    pub reorder: bool,

    /// Simulator step limit
    #[arg(long, default_value_t = 1_000_000)]
    pub max_steps: usize,

    /// Give up on a live run after this long
    #[arg(long, value_parser = humantime::parse_duration, default_value = "60s")]
    pub timeout: Duration,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = args.protocol.resolve()?;
    let seed = seed_or_random(args.seed);
    let dice = SeededDice::new(seed);
    let membership = match (args.purchasers, args.couriers) {
        (Some(purchasers), Some(couriers)) => Membership::split(purchasers, couriers)?,
        _ => assign_roles(args.processes, &dice)?,
    };
    tracing::info!(
        seed,
        purchasers = ?membership.purchasers(),
        couriers = ?membership.couriers(),
        sim = args.sim,
        "starting run"
    );

    let output = if args.sim {
        let delivery = if args.reorder {
            Delivery::PerSenderFifo
        } else {
            Delivery::Causal
        };
        simulate(SimSetup::new(membership, config, seed).with_delivery(delivery), args.max_steps)?
    } else {
        live(&membership, &config, dice, seed, args.timeout).await?
    };

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    print(&output, format);
    Ok(())
}

fn simulate(setup: SimSetup, max_steps: usize) -> Result<RunOutput> {
    let seed = setup.seed;
    let report = match Simulation::new(setup)?.run(max_steps) {
        Ok(report) => report,
        Err(SimError::Stalled {
            steps,
            completed,
            expected,
        }) => return Err(HoistError::stalled(completed, expected, steps).into()),
        Err(SimError::StepLimit(limit)) => return Err(HoistError::step_limit(limit).into()),
        Err(e) => return Err(e.into()),
    };
    if let Err(failure) = report.check() {
        return Err(HoistError::check_failed(failure, seed).into());
    }

    Ok(RunOutput {
        mode: RunMode::Simulated,
        seed,
        steps: Some(report.steps),
        summary: report.summary(),
    })
}

async fn live(
    membership: &Membership,
    config: &ProtocolConfig,
    dice: SeededDice,
    seed: u64,
    timeout: Duration,
) -> Result<RunOutput> {
    let report = tokio::time::timeout(timeout, Cluster::launch(membership, config, dice))
        .await
        .map_err(|_| HoistError::timed_out(timeout))??;

    Ok(RunOutput {
        mode: RunMode::Live,
        seed,
        steps: None,
        summary: report.summary(),
    })
}
