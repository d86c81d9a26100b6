// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process and lift identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable rank of a process within the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(pub u32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Key of a lift, `1..=lifts`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiftKey(pub u32);

impl LiftKey {
    /// All lift keys for a pool of `count` lifts
    pub fn all(count: u32) -> impl Iterator<Item = LiftKey> {
        (1..=count).map(LiftKey)
    }
}

impl fmt::Display for LiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lift-{}", self.0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
