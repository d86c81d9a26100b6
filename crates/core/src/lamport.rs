// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lamport clock and message envelopes
//!
//! Every outbound message carries the sender's clock after incrementing it.
//! On receipt the local clock jumps past the incoming value. The resulting
//! `(clock, rank)` stamp totally orders requests across all replicas.

use crate::id::Rank;
use crate::message::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Lamport timestamp qualified by the stamping process
///
/// Ordered by clock, then rank, so two stamps never compare equal unless
/// they name the same event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Stamp {
    pub clock: u64,
    pub rank: Rank,
}

impl Stamp {
    pub fn new(clock: u64, rank: Rank) -> Self {
        Self { clock, rank }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.clock, self.rank)
    }
}

/// Per-process logical clock
#[derive(Clone, Debug, Default)]
pub struct LamportClock {
    value: u64,
}

impl LamportClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Advance for a local send and return the new value
    pub fn tick(&mut self) -> u64 {
        self.value += 1;
        self.value
    }

    /// Merge an incoming clock: `max(local, incoming) + 1`
    pub fn observe(&mut self, incoming: u64) -> u64 {
        self.value = self.value.max(incoming) + 1;
        self.value
    }
}

/// A message as it travels between processes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub from: Rank,
    pub clock: u64,
    pub message: Message,
}

impl Envelope {
    /// Stamp of the send event that produced this envelope
    pub fn stamp(&self) -> Stamp {
        Stamp::new(self.clock, self.from)
    }
}

#[cfg(test)]
#[path = "lamport_tests.rs"]
mod tests;
