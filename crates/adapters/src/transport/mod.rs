// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message transport adapters

mod channel;

pub use channel::{ChannelNetwork, ChannelTransport, Mailbox};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, TransportCall};

use async_trait::async_trait;
use hoist_core::{Envelope, Rank};
use thiserror::Error;

/// Errors from transport operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("unknown rank {0}")]
    UnknownRank(Rank),
    #[error("mailbox of {0} is closed")]
    Closed(Rank),
}

/// Carries stamped envelopes between processes
///
/// Implementations must deliver causally: if sending `b` happens after
/// receiving or sending `a`, no process receives `b` before `a`.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Rank of the process this transport belongs to
    fn rank(&self) -> Rank;

    /// Unicast to one process
    async fn send(&self, to: Rank, envelope: Envelope) -> Result<(), TransportError>;

    /// Deliver to every process, sender included
    ///
    /// Mailboxes that are already closed are skipped; the broadcast only
    /// fails when none is reachable.
    async fn broadcast(&self, envelope: Envelope) -> Result<(), TransportError>;
}
