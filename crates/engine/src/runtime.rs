// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event loop driving one protocol process

use crate::termination::TerminationDetector;
use crate::{error::RuntimeError, Executor};
use hoist_adapters::{Mailbox, Transport};
use hoist_core::{Clock, Dice, Effect, Input, Message, Node, Rank, Role, RoleKind};
use serde::Serialize;
use std::time::Instant;

/// Per-process traffic counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub messages: usize,
    pub submissions: usize,
    pub deliveries: usize,
    pub shared_rides: usize,
}

impl ProcessStats {
    fn record(&mut self, effect: &Effect) {
        let message = match effect {
            Effect::Send { envelope, .. } | Effect::Broadcast { envelope } => &envelope.message,
            Effect::SetTimer { .. } | Effect::CancelTimer { .. } => return,
        };
        self.messages += 1;
        match message {
            Message::OrdersSubmitted { .. } => self.submissions += 1,
            Message::Delivered { .. } => self.deliveries += 1,
            Message::RideAccepted { .. } => self.shared_rides += 1,
            _ => {}
        }
    }
}

/// What a process did before it stopped
#[derive(Clone, Debug, Serialize)]
pub struct ProcessReport {
    pub rank: Rank,
    pub role: RoleKind,
    /// Final Lamport clock value
    pub lamport: u64,
    pub stats: ProcessStats,
    /// Purchasers: completed rounds. Couriers: packages delivered.
    pub work: usize,
}

/// A protocol node wired to a transport, a mailbox and real timers
pub struct Process<T, C: Clock, D: Dice> {
    node: Node<C, D>,
    executor: Executor<T, C>,
    mailbox: Mailbox,
    termination: TerminationDetector,
    stats: ProcessStats,
}

impl<T, C, D> Process<T, C, D>
where
    T: Transport,
    C: Clock,
    D: Dice,
{
    /// `purchasers` is how many `Completed` announcements end the run
    pub fn new(
        node: Node<C, D>,
        executor: Executor<T, C>,
        mailbox: Mailbox,
        purchasers: usize,
    ) -> Self {
        Self {
            node,
            executor,
            mailbox,
            termination: TerminationDetector::new(purchasers),
            stats: ProcessStats::default(),
        }
    }

    pub fn rank(&self) -> Rank {
        self.node.rank()
    }

    /// Run until every purchaser has announced completion
    pub async fn run(mut self) -> Result<ProcessReport, RuntimeError> {
        let rank = self.rank();
        tracing::info!(%rank, role = %self.node.role().kind(), "process starting");
        self.dispatch(Input::Start).await?;

        while !self.termination.is_done() {
            let deadline = self
                .executor
                .scheduler()
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .next_deadline();

            tokio::select! {
                received = self.mailbox.recv() => {
                    let Some(envelope) = received else {
                        return Err(RuntimeError::MailboxClosed(rank));
                    };
                    if self.termination.observe(&envelope) {
                        tracing::debug!(
                            %rank,
                            from = %envelope.from,
                            completed = self.termination.completed(),
                            "purchaser completed"
                        );
                    }
                    self.dispatch(Input::Deliver(envelope)).await?;
                }
                () = sleep_until(deadline) => {
                    for id in self.executor.fired_timers() {
                        self.dispatch(Input::Timer(id)).await?;
                    }
                }
            }
        }

        let report = self.report();
        tracing::info!(
            %rank,
            lamport = report.lamport,
            messages = report.stats.messages,
            "process finished"
        );
        Ok(report)
    }

    /// Feed one input to the node and carry out its effects
    pub async fn dispatch(&mut self, input: Input) -> Result<(), RuntimeError> {
        let effects = self.node.handle(input);
        for effect in &effects {
            self.stats.record(effect);
        }
        self.executor.execute_all(effects).await?;
        Ok(())
    }

    pub fn node(&self) -> &Node<C, D> {
        &self.node
    }

    fn report(&self) -> ProcessReport {
        let work = match self.node.role() {
            Role::Purchaser(p) => p.rounds_done() as usize,
            Role::Courier(c) => c.delivered(),
        };
        ProcessReport {
            rank: self.rank(),
            role: self.node.role().kind(),
            lamport: self.node.lamport(),
            stats: self.stats.clone(),
            work,
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
