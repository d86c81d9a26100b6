// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use hoist_core::{Envelope, Rank};
use tracing::Instrument;

/// Wrapper that adds tracing to any Transport
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    fn rank(&self) -> Rank {
        self.inner.rank()
    }

    async fn send(&self, to: Rank, envelope: Envelope) -> Result<(), TransportError> {
        let span = tracing::debug_span!(
            "transport.send",
            from = %envelope.from,
            %to,
            message = envelope.message.name(),
            clock = envelope.clock,
        );
        async move {
            // Precondition: a process only sends its own envelopes
            if envelope.from != self.inner.rank() {
                tracing::error!(rank = %self.inner.rank(), "envelope from another rank");
            }

            let result = self.inner.send(to, envelope).await;
            match &result {
                Ok(()) => tracing::trace!("sent"),
                // The peer may already have finished
                Err(TransportError::Closed(_)) => tracing::debug!("peer closed"),
                Err(e) => tracing::error!(error = %e, "send failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn broadcast(&self, envelope: Envelope) -> Result<(), TransportError> {
        let span = tracing::debug_span!(
            "transport.broadcast",
            from = %envelope.from,
            message = envelope.message.name(),
            clock = envelope.clock,
        );
        async move {
            let result = self.inner.broadcast(envelope).await;
            match &result {
                Ok(()) => tracing::trace!("broadcast"),
                Err(e) => tracing::warn!(error = %e, "broadcast failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
