// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quorum-acknowledged queue admission
//!
//! The distributed-mutex primitive shared by both roles:
//!
//! 1. broadcast a request stamped with the Lamport clock
//! 2. every peer of the role group records it and acknowledges
//! 3. once `quorum` acknowledgments arrive the requester starts polling
//! 4. a lift is admissible when the requester heads that lift's queue and
//!    the role's predicate holds
//!
//! Because acks travel after the acknowledging peer's own earlier requests
//! (per-sender FIFO), a requester holding every ack has already queued every
//! request with a smaller stamp. Head-of-queue is then the same on every
//! replica and at most one process acts on a lift.

use crate::clock::Clock;
use crate::dice::Dice;
use crate::id::{LiftKey, Rank};
use crate::lamport::Stamp;
use crate::message::{LiftScope, Message, QueueKind};
use crate::queue::RequestQueue;
use crate::step::Step;
use std::collections::BTreeMap;

/// Progress of this process's own outstanding request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Gathering { stamp: Stamp, acks: usize },
    Polling { stamp: Stamp },
}

#[derive(Clone, Debug)]
pub struct Admission {
    kind: QueueKind,
    quorum: usize,
    queues: BTreeMap<LiftKey, RequestQueue>,
    state: RequestState,
}

impl Admission {
    pub fn new(kind: QueueKind, lifts: u32, quorum: usize) -> Self {
        Self {
            kind,
            quorum: quorum.max(1),
            queues: LiftKey::all(lifts).map(|k| (k, RequestQueue::new())).collect(),
            state: RequestState::Idle,
        }
    }

    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.state, RequestState::Polling { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, RequestState::Idle)
    }

    pub fn queue(&self, lift: LiftKey) -> Option<&RequestQueue> {
        self.queues.get(&lift)
    }

    /// Broadcast a new request and start gathering acknowledgments
    pub fn request<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, scope: LiftScope) -> Stamp {
        let stamp = step.broadcast(Message::Request {
            kind: self.kind,
            scope,
        });
        self.state = RequestState::Gathering { stamp, acks: 0 };
        tracing::debug!(kind = %self.kind, %stamp, "request broadcast");
        stamp
    }

    /// Record a peer's request and acknowledge it
    pub fn on_request<C: Clock, D: Dice>(
        &mut self,
        step: &mut Step<'_, C, D>,
        request: Stamp,
        scope: &LiftScope,
    ) {
        match scope {
            LiftScope::All => self.replicate_everywhere(request),
            LiftScope::Only(lifts) => self.replicate_to(request, lifts),
        }
        step.send(
            request.rank,
            Message::Ack {
                kind: self.kind,
                request,
            },
        );
    }

    /// Generic request: queue the requester at every lift
    fn replicate_everywhere(&mut self, request: Stamp) {
        for queue in self.queues.values_mut() {
            queue.insert(request);
        }
    }

    /// Targeted request: queue the requester only at the listed lifts
    fn replicate_to(&mut self, request: Stamp, lifts: &[LiftKey]) {
        for lift in lifts {
            match self.queues.get_mut(lift) {
                Some(queue) => queue.insert(request),
                None => tracing::warn!(kind = %self.kind, %lift, "request for unknown lift"),
            }
        }
    }

    /// Count an acknowledgment; returns `true` when it completes the quorum
    pub fn on_ack(&mut self, request: Stamp) -> bool {
        match self.state {
            RequestState::Gathering { stamp, acks } if stamp == request => {
                let acks = acks + 1;
                if acks >= self.quorum {
                    self.state = RequestState::Polling { stamp };
                    true
                } else {
                    self.state = RequestState::Gathering { stamp, acks };
                    false
                }
            }
            _ => {
                tracing::debug!(kind = %self.kind, %request, "stale ack ignored");
                false
            }
        }
    }

    /// The outstanding request was used or abandoned
    pub fn finish(&mut self) {
        self.state = RequestState::Idle;
    }

    pub fn is_head(&self, lift: LiftKey, rank: Rank) -> bool {
        self.queues.get(&lift).is_some_and(|q| q.is_head(rank))
    }

    /// First lift, by key, that `rank` heads and that satisfies `eligible`
    ///
    /// Only meaningful while polling; returns `None` otherwise.
    pub fn admissible(&self, rank: Rank, mut eligible: impl FnMut(LiftKey) -> bool) -> Option<LiftKey> {
        if !self.is_polling() {
            return None;
        }
        self.queues
            .iter()
            .filter(|(_, queue)| queue.is_head(rank))
            .map(|(lift, _)| *lift)
            .find(|lift| eligible(*lift))
    }

    /// `rank` committed to `lift`: drop it from every other queue
    pub fn leave_all_but(&mut self, rank: Rank, lift: LiftKey) {
        for (key, queue) in self.queues.iter_mut() {
            if *key != lift {
                queue.remove(rank);
            }
        }
    }

    /// Drop `rank` from the queues named by `scope`
    pub fn leave(&mut self, rank: Rank, scope: &LiftScope) {
        for (key, queue) in self.queues.iter_mut() {
            if scope.contains(*key) {
                queue.remove(rank);
            }
        }
    }

    /// Everyone else queued at `lift`, in queue order
    pub fn peers(&self, lift: LiftKey, rank: Rank) -> Vec<Rank> {
        self.queues
            .get(&lift)
            .map(|q| q.others(rank))
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
