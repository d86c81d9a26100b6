// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hoist - distributed lift-sharing protocol

mod commands;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, roles, run};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hoist",
    version,
    about = "Hoist - purchasers and couriers sharing a pool of lifts"
)]
struct Cli {
    /// Log filter, e.g. "info" or "hoist_core=debug" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cluster to completion and print a summary
    Run(run::RunArgs),
    /// Print the effective configuration as TOML
    Config(config::ConfigArgs),
    /// Show a random role assignment
    Roles(roles::RolesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Config(args) => config::config(args),
        Commands::Roles(args) => roles::roles(args),
    }
}
