// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Transport, TransportError};
use async_trait::async_trait;
use hoist_core::{Envelope, Rank};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Send { to: Rank, envelope: Envelope },
    Broadcast { envelope: Envelope },
}

/// Records every call; sends to closed ranks fail
#[derive(Clone)]
pub struct FakeTransport {
    rank: Rank,
    size: u32,
    calls: Arc<Mutex<Vec<TransportCall>>>,
    closed: Arc<Mutex<HashSet<Rank>>>,
}

impl FakeTransport {
    /// Transport for `rank` in a cluster of `size`
    pub fn new(rank: Rank, size: u32) -> Self {
        Self {
            rank,
            size,
            calls: Arc::default(),
            closed: Arc::default(),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make sends to `rank` fail as if its mailbox had closed
    pub fn close(&self, rank: Rank) {
        self.closed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(rank);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    async fn send(&self, to: Rank, envelope: Envelope) -> Result<(), TransportError> {
        if to.0 >= self.size {
            return Err(TransportError::UnknownRank(to));
        }
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(TransportCall::Send { to, envelope });
        if self
            .closed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&to)
        {
            return Err(TransportError::Closed(to));
        }
        Ok(())
    }

    async fn broadcast(&self, envelope: Envelope) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(TransportCall::Broadcast { envelope });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
