// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process cluster of protocol processes over channels

use crate::runtime::{Process, ProcessReport};
use crate::{Executor, RuntimeError};
use hoist_adapters::{ChannelNetwork, TracedTransport};
use hoist_core::{
    Dice, Membership, Node, ProtocolConfig, RoleKind, RunSummary, Scheduler, SystemClock,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Outcome of a live run
#[derive(Clone, Debug)]
pub struct ClusterReport {
    /// Reports in rank order
    pub processes: Vec<ProcessReport>,
    pub elapsed: Duration,
}

impl ClusterReport {
    pub fn summary(&self) -> RunSummary {
        let count = |kind: RoleKind| self.processes.iter().filter(|p| p.role == kind).count();
        let sum = |f: fn(&ProcessReport) -> usize| self.processes.iter().map(f).sum();
        RunSummary {
            purchasers: count(RoleKind::Purchaser),
            couriers: count(RoleKind::Courier),
            completed: self
                .processes
                .iter()
                .filter(|p| p.role == RoleKind::Purchaser)
                .count(),
            elapsed_ms: self.elapsed.as_millis() as u64,
            messages: sum(|p| p.stats.messages),
            submissions: sum(|p| p.stats.submissions),
            deliveries: sum(|p| p.stats.deliveries),
            shared_rides: sum(|p| p.stats.shared_rides),
        }
    }
}

pub struct Cluster;

impl Cluster {
    /// Spawn one task per rank and wait for every one of them to finish
    ///
    /// Ranks must be exactly `0..size`. Each process gets its own clone of
    /// `dice`.
    pub async fn launch<D>(
        membership: &Membership,
        config: &ProtocolConfig,
        dice: D,
    ) -> Result<ClusterReport, RuntimeError>
    where
        D: Dice + 'static,
    {
        config.validate()?;
        let size = membership.size();
        let contiguous = membership
            .ranks()
            .iter()
            .enumerate()
            .all(|(i, rank)| rank.0 as usize == i);
        if !contiguous {
            return Err(RuntimeError::NonContiguous(size.saturating_sub(1)));
        }

        let purchasers = membership.group_size(RoleKind::Purchaser);
        let started = Instant::now();
        let mut tasks = JoinSet::new();

        tracing::info!(
            processes = size,
            purchasers,
            couriers = membership.group_size(RoleKind::Courier),
            lifts = config.lifts,
            "launching cluster"
        );

        for (transport, mailbox) in ChannelNetwork::new(size) {
            let rank = mailbox.rank();
            let Some(kind) = membership.role_of(rank) else {
                return Err(RuntimeError::NonContiguous(size.saturating_sub(1)));
            };
            let node = Node::new(
                rank,
                kind,
                membership.group_size(kind),
                config.clone(),
                SystemClock,
                dice.clone(),
            );
            let executor = Executor::new(
                TracedTransport::new(transport),
                Arc::new(Mutex::new(Scheduler::new())),
                SystemClock,
            );
            let process = Process::new(node, executor, mailbox, purchasers);
            tasks.spawn(process.run());
        }

        let mut processes = Vec::with_capacity(size);
        while let Some(joined) = tasks.join_next().await {
            processes.push(joined??);
        }
        processes.sort_by_key(|p: &ProcessReport| p.rank);

        let report = ClusterReport {
            processes,
            elapsed: started.elapsed(),
        };
        tracing::info!(elapsed_ms = report.elapsed.as_millis() as u64, "cluster finished");
        Ok(report)
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
