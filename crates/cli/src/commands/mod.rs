// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod config;
pub mod roles;
pub mod run;

use hoist_core::{Dice, ThreadDice};

/// Use the given seed, or draw one so the run can be replayed later
pub fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| ThreadDice.roll(0..=u64::MAX))
}
