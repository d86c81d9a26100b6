// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use hoist_core::{Envelope, Message, Rank};
use std::collections::HashSet;

/// Counts `Completed` announcements until every purchaser has finished
///
/// Each purchaser announces once; repeats from the same rank are ignored.
#[derive(Clone, Debug)]
pub struct TerminationDetector {
    expected: usize,
    completed: HashSet<Rank>,
}

impl TerminationDetector {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            completed: HashSet::new(),
        }
    }

    /// Record an incoming envelope; returns true if it was a new completion
    pub fn observe(&mut self, envelope: &Envelope) -> bool {
        envelope.message == Message::Completed && self.completed.insert(envelope.from)
    }

    pub fn completed(&self) -> usize {
        self.completed.len()
    }

    pub fn is_done(&self) -> bool {
        self.completed.len() >= self.expected
    }
}

#[cfg(test)]
#[path = "termination_tests.rs"]
mod tests;
