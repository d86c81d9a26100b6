// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replicated request queue for one lift
//!
//! Entries are request stamps kept in ascending `(clock, rank)` order, so
//! every replica that has seen the same requests agrees on the head.

use crate::id::Rank;
use crate::lamport::Stamp;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestQueue {
    entries: Vec<Stamp>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a request in stamp order
    ///
    /// A rank holds at most one entry: a newer request from the same rank
    /// replaces its previous one.
    pub fn insert(&mut self, stamp: Stamp) {
        self.remove(stamp.rank);
        let index = self.entries.partition_point(|e| *e < stamp);
        self.entries.insert(index, stamp);
    }

    /// Remove the entry of `rank`; returns whether one was present
    pub fn remove(&mut self, rank: Rank) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.rank != rank);
        before != self.entries.len()
    }

    pub fn head(&self) -> Option<Stamp> {
        self.entries.first().copied()
    }

    pub fn is_head(&self, rank: Rank) -> bool {
        self.head().is_some_and(|s| s.rank == rank)
    }

    pub fn contains(&self, rank: Rank) -> bool {
        self.entries.iter().any(|e| e.rank == rank)
    }

    /// Ranks queued behind or ahead of `rank`, in queue order
    pub fn others(&self, rank: Rank) -> Vec<Rank> {
        self.entries
            .iter()
            .filter(|e| e.rank != rank)
            .map(|e| e.rank)
            .collect()
    }

    pub fn entries(&self) -> &[Stamp] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
