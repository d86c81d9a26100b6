// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Randomness abstractions
//!
//! Order quantities, departure windows and role assignment are random.
//! Production uses the thread RNG; simulations use a seeded RNG so runs
//! replay exactly; tests script the values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

/// Draws integers from inclusive ranges
pub trait Dice: Clone + Send + Sync {
    fn roll(&self, range: RangeInclusive<u64>) -> u64;

    /// Fair coin
    fn flip(&self) -> bool {
        self.roll(0..=1) == 1
    }
}

/// Thread-local RNG for live runs
#[derive(Clone, Debug, Default)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn roll(&self, range: RangeInclusive<u64>) -> u64 {
        if range.is_empty() {
            return *range.start();
        }
        rand::thread_rng().gen_range(range)
    }
}

/// Seeded RNG shared between clones, for reproducible runs
#[derive(Clone, Debug)]
pub struct SeededDice {
    rng: Arc<Mutex<StdRng>>,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&self, range: RangeInclusive<u64>) -> u64 {
        if range.is_empty() {
            return *range.start();
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(range)
    }
}

/// Replays scripted values, clamped into the requested range
///
/// Once the script runs out every roll returns the low end of the range.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    values: Arc<Mutex<VecDeque<u64>>>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: Arc::new(Mutex::new(values.into_iter().collect())),
        }
    }
}

impl Dice for ScriptedDice {
    fn roll(&self, range: RangeInclusive<u64>) -> u64 {
        let next = self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(v) => v.clamp(*range.start(), (*range.end()).max(*range.start())),
            None => *range.start(),
        }
    }
}

#[cfg(test)]
#[path = "dice_tests.rs"]
mod tests;
