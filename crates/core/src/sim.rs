// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic whole-cluster simulator
//!
//! Every node runs over one shared `FakeClock` and one seeded RNG. By
//! default messages travel through a single global FIFO, which delivers
//! causally: a message sent in reaction to another is always queued after
//! it. `Delivery::PerSenderFifo` instead keeps one FIFO per (sender,
//! receiver) pair and lets a second seeded RNG pick which pair delivers
//! next, so messages from different senders overtake each other. When no
//! message is in flight, fake time jumps to the next timer.

use crate::board::LiftBoard;
use crate::clock::{Clock, FakeClock};
use crate::config::{ConfigError, ProtocolConfig};
use crate::dice::{Dice, SeededDice};
use crate::effect::{Effect, TimerId};
use crate::id::{LiftKey, Rank};
use crate::lamport::{Envelope, Stamp};
use crate::message::Message;
use crate::node::{Input, Node, RoleKind};
use crate::roles::Membership;
use crate::scheduler::Scheduler;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("stalled after {steps} steps: {completed} of {expected} purchasers completed")]
    Stalled {
        steps: usize,
        completed: usize,
        expected: usize,
    },
    #[error("step limit {0} reached before completion")]
    StepLimit(usize),
}

/// A property the journal of a run must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    #[error("{claimant} claimed {lift} while {holder} held it")]
    Overlap {
        lift: LiftKey,
        holder: Rank,
        claimant: Rank,
    },
    #[error("{lift} carried {load} units over capacity {capacity}")]
    OverCapacity {
        lift: LiftKey,
        load: u32,
        capacity: u32,
    },
    #[error("order {0} was never delivered")]
    Lost(Stamp),
    #[error("order {0} was delivered twice")]
    Duplicated(Stamp),
    #[error("order {0} was delivered before it was submitted")]
    Unsubmitted(Stamp),
    #[error("{lift} left its phase cycle")]
    PhaseCycle { lift: LiftKey },
}

/// How the simulator orders messages in flight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// One global FIFO
    #[default]
    Causal,
    /// FIFO per (sender, receiver) pair only
    PerSenderFifo,
}

#[derive(Clone, Debug)]
pub struct SimSetup {
    pub membership: Membership,
    pub config: ProtocolConfig,
    pub seed: u64,
    pub delivery: Delivery,
}

impl SimSetup {
    pub fn new(membership: Membership, config: ProtocolConfig, seed: u64) -> Self {
        Self {
            membership,
            config,
            seed,
            delivery: Delivery::default(),
        }
    }

    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }
}

/// Salt for the RNG that schedules channels, kept apart from the node RNG
const CHANNEL_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Messages sent and not yet handed to their receiver
struct InFlight {
    delivery: Delivery,
    queue: VecDeque<(Rank, Envelope)>,
    /// Non-empty channels keyed by (sender, receiver)
    channels: BTreeMap<(Rank, Rank), VecDeque<Envelope>>,
    dice: SeededDice,
}

impl InFlight {
    fn new(delivery: Delivery, seed: u64) -> Self {
        Self {
            delivery,
            queue: VecDeque::new(),
            channels: BTreeMap::new(),
            dice: SeededDice::new(seed ^ CHANNEL_SALT),
        }
    }

    fn push(&mut self, to: Rank, envelope: Envelope) {
        match self.delivery {
            Delivery::Causal => self.queue.push_back((to, envelope)),
            Delivery::PerSenderFifo => self
                .channels
                .entry((envelope.from, to))
                .or_default()
                .push_back(envelope),
        }
    }

    fn pop(&mut self) -> Option<(Rank, Envelope)> {
        match self.delivery {
            Delivery::Causal => self.queue.pop_front(),
            Delivery::PerSenderFifo => {
                let last = self.channels.len().checked_sub(1)? as u64;
                let pick = self.dice.roll(0..=last) as usize;
                let key = *self.channels.keys().nth(pick)?;
                let channel = self.channels.get_mut(&key)?;
                let envelope = channel.pop_front();
                if channel.is_empty() {
                    self.channels.remove(&key);
                }
                envelope.map(|e| (key.1, e))
            }
        }
    }
}

/// Figures reported after a run, live or simulated
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub purchasers: usize,
    pub couriers: usize,
    pub completed: usize,
    pub elapsed_ms: u64,
    pub messages: usize,
    pub submissions: usize,
    pub deliveries: usize,
    pub shared_rides: usize,
}

pub struct Simulation {
    clock: FakeClock,
    started: Instant,
    nodes: BTreeMap<Rank, Node<FakeClock, SeededDice>>,
    in_flight: InFlight,
    timers: Scheduler<(Rank, TimerId)>,
    journal: Vec<Envelope>,
    completed: usize,
    steps: usize,
    setup: SimSetup,
}

impl Simulation {
    pub fn new(setup: SimSetup) -> Result<Self, SimError> {
        setup.config.validate()?;
        let clock = FakeClock::new();
        let dice = SeededDice::new(setup.seed);
        let membership = &setup.membership;
        let nodes = membership
            .ranks()
            .into_iter()
            .filter_map(|rank| {
                let kind = membership.role_of(rank)?;
                let node = Node::new(
                    rank,
                    kind,
                    membership.group_size(kind),
                    setup.config.clone(),
                    clock.clone(),
                    dice.clone(),
                );
                Some((rank, node))
            })
            .collect();
        Ok(Self {
            started: clock.now(),
            clock,
            nodes,
            in_flight: InFlight::new(setup.delivery, setup.seed),
            timers: Scheduler::new(),
            journal: Vec::new(),
            completed: 0,
            steps: 0,
            setup,
        })
    }

    /// Run until every purchaser has completed
    pub fn run(mut self, step_limit: usize) -> Result<SimReport, SimError> {
        let ranks: Vec<Rank> = self.nodes.keys().copied().collect();
        for rank in &ranks {
            self.feed(*rank, Input::Start);
        }

        let expected = self.setup.membership.purchasers().len();
        loop {
            if self.completed >= expected {
                return Ok(self.into_report());
            }
            if self.steps >= step_limit {
                return Err(SimError::StepLimit(step_limit));
            }
            if let Some((to, envelope)) = self.in_flight.pop() {
                self.feed(to, Input::Deliver(envelope));
                continue;
            }
            let Some(deadline) = self.timers.next_deadline() else {
                return Err(SimError::Stalled {
                    steps: self.steps,
                    completed: self.completed,
                    expected,
                });
            };
            self.clock.advance_to(deadline);
            for (rank, id) in self.timers.fired_timers(self.clock.now()) {
                self.feed(rank, Input::Timer(id));
            }
        }
    }

    fn feed(&mut self, rank: Rank, input: Input) {
        let Some(node) = self.nodes.get_mut(&rank) else {
            return;
        };
        self.steps += 1;
        let effects = node.handle(input);
        for effect in effects {
            self.execute(rank, effect);
        }
    }

    fn execute(&mut self, rank: Rank, effect: Effect) {
        match effect {
            Effect::Send { to, envelope } => {
                self.journal.push(envelope.clone());
                self.in_flight.push(to, envelope);
            }
            Effect::Broadcast { envelope } => {
                if envelope.message == Message::Completed {
                    self.completed += 1;
                }
                self.journal.push(envelope.clone());
                for to in self.nodes.keys() {
                    self.in_flight.push(*to, envelope.clone());
                }
            }
            Effect::SetTimer { id, duration } => {
                self.timers.set_timer((rank, id), duration, self.clock.now());
            }
            Effect::CancelTimer { id } => self.timers.cancel_timer(&(rank, id)),
        }
    }

    fn into_report(self) -> SimReport {
        SimReport {
            steps: self.steps,
            elapsed: self.clock.now().saturating_duration_since(self.started),
            completed: self.completed,
            journal: self.journal,
            membership: self.setup.membership,
            config: self.setup.config,
        }
    }
}

/// Outcome of a completed simulation
#[derive(Clone, Debug)]
pub struct SimReport {
    pub steps: usize,
    /// Fake time elapsed
    pub elapsed: Duration,
    pub completed: usize,
    /// Every envelope sent, in send order; broadcasts appear once
    pub journal: Vec<Envelope>,
    pub membership: Membership,
    pub config: ProtocolConfig,
}

impl SimReport {
    pub fn summary(&self) -> RunSummary {
        let count = |pred: fn(&Message) -> bool| {
            self.journal.iter().filter(|e| pred(&e.message)).count()
        };
        RunSummary {
            purchasers: self.membership.group_size(RoleKind::Purchaser),
            couriers: self.membership.group_size(RoleKind::Courier),
            completed: self.completed,
            elapsed_ms: self.elapsed.as_millis() as u64,
            messages: self.journal.len(),
            submissions: count(|m| matches!(m, Message::OrdersSubmitted { .. })),
            deliveries: count(|m| matches!(m, Message::Delivered { .. })),
            shared_rides: count(|m| matches!(m, Message::RideAccepted { .. })),
        }
    }

    /// Run every property check
    pub fn check(&self) -> Result<(), CheckFailure> {
        self.check_mutual_exclusion()?;
        self.check_capacity()?;
        self.check_no_lost_orders()?;
        self.check_phase_cycles()
    }

    /// No lift is claimed while another process holds it
    pub fn check_mutual_exclusion(&self) -> Result<(), CheckFailure> {
        let mut holders: HashMap<LiftKey, Rank> = HashMap::new();
        for envelope in &self.journal {
            let from = envelope.from;
            match &envelope.message {
                Message::Claim { lift, .. } => match holders.get(lift) {
                    Some(holder) if *holder != from => {
                        return Err(CheckFailure::Overlap {
                            lift: *lift,
                            holder: *holder,
                            claimant: from,
                        });
                    }
                    _ => {
                        holders.insert(*lift, from);
                    }
                },
                Message::OrdersSubmitted { lift, .. }
                | Message::PickedUp { lift, .. }
                | Message::Delivered { lift, .. } => {
                    if holders.get(lift) == Some(&from) {
                        holders.remove(lift);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// No transit carries more than the configured capacity
    pub fn check_capacity(&self) -> Result<(), CheckFailure> {
        let capacity = self.config.capacity;
        for envelope in &self.journal {
            let (lift, load) = match &envelope.message {
                Message::OrdersSubmitted { lift, orders } => {
                    (*lift, orders.iter().map(|o| o.quantity).sum::<u32>())
                }
                Message::Delivered { lift, packages } => {
                    (*lift, packages.iter().map(|p| p.quantity()).sum::<u32>())
                }
                _ => continue,
            };
            if load > capacity {
                return Err(CheckFailure::OverCapacity {
                    lift,
                    load,
                    capacity,
                });
            }
        }
        Ok(())
    }

    /// Every submitted order is delivered exactly once, after its submission
    pub fn check_no_lost_orders(&self) -> Result<(), CheckFailure> {
        let mut deliveries: HashMap<Stamp, usize> = HashMap::new();
        let mut submitted = Vec::new();
        for envelope in &self.journal {
            match &envelope.message {
                Message::OrdersSubmitted { orders, .. } => {
                    submitted.extend(orders.iter().map(|o| o.stamp));
                }
                Message::Delivered { packages, .. } => {
                    for package in packages {
                        let stamp = package.order.stamp;
                        if !submitted.contains(&stamp) {
                            return Err(CheckFailure::Unsubmitted(stamp));
                        }
                        *deliveries.entry(stamp).or_default() += 1;
                    }
                }
                _ => {}
            }
        }
        for stamp in submitted {
            match deliveries.get(&stamp) {
                None => return Err(CheckFailure::Lost(stamp)),
                Some(n) if *n > 1 => return Err(CheckFailure::Duplicated(stamp)),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Replaying the journal moves every lift strictly around its cycle
    pub fn check_phase_cycles(&self) -> Result<(), CheckFailure> {
        let mut board = LiftBoard::new(self.config.lifts);
        for envelope in &self.journal {
            let from = envelope.from;
            let stamp = envelope.stamp();
            // Replays the same replica updates every node applies
            let _ = match &envelope.message {
                Message::Claim { lift, .. } => board.claim(*lift, from).map(|()| None),
                Message::OrdersSubmitted { lift, orders } => {
                    board.submit_orders(*lift, from, orders, stamp)
                }
                Message::PickedUp { lift, order } => board.pick_up(*lift, from, order, stamp),
                Message::Delivered { lift, packages } => board.deliver(*lift, from, packages, stamp),
                _ => continue,
            };
        }
        for lift in LiftKey::all(self.config.lifts) {
            if !board.history(lift).is_some_and(|h| h.is_cyclic()) {
                return Err(CheckFailure::PhaseCycle { lift });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
