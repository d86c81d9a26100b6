// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process network over tokio channels

use super::{Transport, TransportError};
use async_trait::async_trait;
use hoist_core::{Envelope, Rank};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Shared routing table
///
/// Every enqueue happens under one lock, so a broadcast lands in all
/// mailboxes before any reaction to it can be enqueued anywhere. Together
/// with FIFO mailboxes this makes delivery causal.
struct Router {
    mailboxes: Mutex<Vec<mpsc::UnboundedSender<Envelope>>>,
}

/// Builder for a fully connected in-process network
pub struct ChannelNetwork;

impl ChannelNetwork {
    /// One transport and one mailbox per rank `0..size`
    pub fn new(size: usize) -> Vec<(ChannelTransport, Mailbox)> {
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..size).map(|_| mpsc::unbounded_channel()).unzip();
        let router = Arc::new(Router {
            mailboxes: Mutex::new(senders),
        });
        receivers
            .into_iter()
            .enumerate()
            .map(|(index, inbox)| {
                let rank = Rank(index as u32);
                (
                    ChannelTransport {
                        rank,
                        router: Arc::clone(&router),
                    },
                    Mailbox { rank, inbox },
                )
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct ChannelTransport {
    rank: Rank,
    router: Arc<Router>,
}

#[async_trait]
impl Transport for ChannelTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    async fn send(&self, to: Rank, envelope: Envelope) -> Result<(), TransportError> {
        let mailboxes = self
            .router
            .mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let mailbox = mailboxes
            .get(to.0 as usize)
            .ok_or(TransportError::UnknownRank(to))?;
        mailbox.send(envelope).map_err(|_| TransportError::Closed(to))
    }

    async fn broadcast(&self, envelope: Envelope) -> Result<(), TransportError> {
        let mailboxes = self
            .router
            .mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let mut delivered = 0;
        for (index, mailbox) in mailboxes.iter().enumerate() {
            match mailbox.send(envelope.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => tracing::trace!(to = %Rank(index as u32), "skipping closed mailbox"),
            }
        }
        if delivered == 0 {
            return Err(TransportError::Closed(self.rank));
        }
        Ok(())
    }
}

/// Receiving end of one process
pub struct Mailbox {
    rank: Rank,
    inbox: mpsc::UnboundedReceiver<Envelope>,
}

impl Mailbox {
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Next envelope, or `None` once every transport is gone
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.inbox.recv().await
    }

    /// Next envelope if one is already queued
    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.inbox.try_recv().ok()
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
