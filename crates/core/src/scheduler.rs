// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed one-shot timers

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Pending timers keyed by `K`
///
/// Setting a key that is already armed replaces its deadline.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    timers: HashMap<K, Instant>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash + Ord> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timer(&mut self, key: K, duration: Duration, now: Instant) {
        self.timers.insert(key, now + duration);
    }

    pub fn cancel_timer(&mut self, key: &K) {
        self.timers.remove(key);
    }

    /// Remove and return every timer due at `now`
    ///
    /// Returned in deadline order, ties broken by key, so replays are
    /// deterministic.
    pub fn fired_timers(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(Instant, K)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, key.clone()))
            .collect();
        due.sort();
        for (_, key) in &due {
            self.timers.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().min().copied()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn is_armed(&self, key: &K) -> bool {
        self.timers.contains_key(key)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
