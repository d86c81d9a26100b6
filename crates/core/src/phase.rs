// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lift phase state machine
//!
//! A lift cycles `Ordering -> Pickup -> Delivery -> Ordering`. Each replica
//! keeps an append-only history of `(phase, stamp)` entries; the current
//! phase is the entry with the greatest stamp, so an announcement that
//! arrives late cannot overwrite a causally newer one.

use crate::lamport::Stamp;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Open for purchaser orders
    Ordering,
    /// Open for courier retrieval
    Pickup,
    /// Open for courier drop-off
    Delivery,
}

impl Phase {
    /// The phase that follows this one in the cycle
    pub fn next(self) -> Phase {
        match self {
            Phase::Ordering => Phase::Pickup,
            Phase::Pickup => Phase::Delivery,
            Phase::Delivery => Phase::Ordering,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Ordering => "ordering",
            Phase::Pickup => "pickup",
            Phase::Delivery => "delivery",
        };
        f.write_str(name)
    }
}

/// Append-only phase history of one lift
#[derive(Clone, Debug)]
pub struct PhaseHistory {
    entries: Vec<(Phase, Stamp)>,
}

impl PhaseHistory {
    /// History starting in `Ordering` at the zero stamp
    pub fn new(origin: Stamp) -> Self {
        Self {
            entries: vec![(Phase::Ordering, origin)],
        }
    }

    /// Phase of the entry with the greatest stamp
    pub fn current(&self) -> Phase {
        self.entries
            .iter()
            .max_by_key(|(_, stamp)| *stamp)
            .map(|(phase, _)| *phase)
            .unwrap_or(Phase::Ordering)
    }

    /// Record a transition
    ///
    /// Returns `false` when the entry does not fit between its neighbours
    /// in stamp order. The entry is still kept: a replica may learn of a
    /// transition before the one preceding it, and reads resolve by stamp.
    pub fn record(&mut self, phase: Phase, stamp: Stamp) -> bool {
        let before = self
            .entries
            .iter()
            .filter(|(_, s)| *s < stamp)
            .max_by_key(|(_, s)| *s);
        let after = self
            .entries
            .iter()
            .filter(|(_, s)| *s > stamp)
            .min_by_key(|(_, s)| *s);
        let legal = before.is_none_or(|(p, _)| p.next() == phase)
            && after.is_none_or(|(p, _)| phase.next() == *p);
        self.entries.push((phase, stamp));
        legal
    }

    /// Entries in stamp order
    pub fn entries(&self) -> Vec<(Phase, Stamp)> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|(_, stamp)| *stamp);
        entries
    }

    /// True when every consecutive pair in stamp order follows the cycle
    pub fn is_cyclic(&self) -> bool {
        self.entries()
            .windows(2)
            .all(|pair| pair[0].0.next() == pair[1].0)
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
