// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-process replica of every lift's shared state
//!
//! Each process owns one `LiftBoard` and mutates it only from message
//! content: claims, order submissions, pickups and deliveries. Channels are
//! FIFO per sender only, so a pickup can overtake the submission it refers
//! to. The replica therefore stores facts rather than counters: which ranks
//! hold the lift, which batches were submitted, and which orders were picked
//! up or delivered at which stamp. Phase, waiting orders and the outstanding
//! count are read from those facts, and any arrival order of the same
//! messages yields the same board.

use crate::id::{LiftKey, Rank};
use crate::lamport::Stamp;
use crate::order::{Order, Package};
use crate::phase::{Phase, PhaseHistory};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// A message that contradicts the local replica
///
/// The replica keeps whatever it already knew; callers log these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("unknown lift {0}")]
    UnknownLift(LiftKey),
    #[error("{courier} picked up order {order} on {lift} a second time")]
    PickedTwice {
        lift: LiftKey,
        order: Stamp,
        courier: Rank,
    },
    #[error("{courier} delivered order {order} on {lift} a second time")]
    DeliveredTwice {
        lift: LiftKey,
        order: Stamp,
        courier: Rank,
    },
}

#[derive(Clone, Copy, Debug)]
enum Fact {
    PickedUp,
    Delivered,
}

/// One submission and what has happened to its orders since
#[derive(Clone, Debug)]
struct Batch {
    submitted: Stamp,
    /// Sorted oldest first
    orders: Vec<Order>,
    /// Order stamp to the stamp of the announcing message
    picked: BTreeMap<Stamp, Stamp>,
    delivered: BTreeMap<Stamp, Stamp>,
    emptied: bool,
    finished: bool,
}

impl Batch {
    fn new(submitted: Stamp, orders: &[Order]) -> Self {
        let mut orders = orders.to_vec();
        orders.sort_by_key(|o| o.stamp);
        Self {
            submitted,
            orders,
            picked: BTreeMap::new(),
            delivered: BTreeMap::new(),
            emptied: false,
            finished: false,
        }
    }

    fn contains(&self, order: Stamp) -> bool {
        self.orders.iter().any(|o| o.stamp == order)
    }

    fn waiting(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter().filter(|o| {
            !self.picked.contains_key(&o.stamp) && !self.delivered.contains_key(&o.stamp)
        })
    }

    fn undelivered(&self) -> usize {
        self.orders
            .iter()
            .filter(|o| !self.delivered.contains_key(&o.stamp))
            .count()
    }
}

/// Stamp of the last fact once every order has one
fn last_fact(orders: &[Order], facts: &BTreeMap<Stamp, Stamp>) -> Option<Stamp> {
    orders
        .iter()
        .try_fold(None, |last: Option<Stamp>, o| {
            facts.get(&o.stamp).map(|at| last.max(Some(*at)))
        })
        .flatten()
}

/// Replicated state of one lift
#[derive(Clone, Debug)]
pub struct LiftReplica {
    history: PhaseHistory,
    /// Ranks whose claim arrived and whose release has not
    holders: BTreeSet<Rank>,
    /// Keyed by the stamp of the submission
    batches: BTreeMap<Stamp, Batch>,
    /// Facts about orders whose submission has not arrived yet
    early_picks: BTreeMap<Stamp, Stamp>,
    early_deliveries: BTreeMap<Stamp, Stamp>,
}

impl LiftReplica {
    fn new() -> Self {
        Self {
            history: PhaseHistory::new(Stamp::new(0, Rank(0))),
            holders: BTreeSet::new(),
            batches: BTreeMap::new(),
            early_picks: BTreeMap::new(),
            early_deliveries: BTreeMap::new(),
        }
    }

    /// A newer batch only exists once every older one was delivered, so
    /// waiting and outstanding orders are read from the newest alone
    fn newest(&self) -> Option<&Batch> {
        self.batches.values().next_back()
    }

    fn release(&mut self, lift: LiftKey, rank: Rank) {
        if !self.holders.remove(&rank) {
            tracing::debug!(%lift, releaser = %rank, "release without a claim");
        }
    }

    fn advance(&mut self, lift: LiftKey, phase: Phase, stamp: Stamp) {
        if !self.history.record(phase, stamp) {
            tracing::debug!(%lift, to = %phase, %stamp, "transition recorded out of cycle order");
        }
    }

    /// The current phase if it differs from `before`
    fn changed(&self, before: Phase) -> Option<Phase> {
        let now = self.history.current();
        (now != before).then_some(now)
    }

    /// Record the transitions batch `key` has earned so far
    fn settle(&mut self, lift: LiftKey, key: Stamp) {
        let Some(batch) = self.batches.get_mut(&key) else {
            return;
        };
        let mut transitions = Vec::new();
        if !batch.emptied {
            if let Some(at) = last_fact(&batch.orders, &batch.picked) {
                batch.emptied = true;
                transitions.push((Phase::Delivery, at));
            }
        }
        if !batch.finished {
            if let Some(at) = last_fact(&batch.orders, &batch.delivered) {
                batch.finished = true;
                transitions.push((Phase::Ordering, at));
            }
        }
        for (phase, at) in transitions {
            self.advance(lift, phase, at);
        }
    }

    /// Note that `order` was picked up or delivered at `at`
    ///
    /// Returns `false` when that fact was already known.
    fn note(&mut self, lift: LiftKey, fact: Fact, order: Stamp, at: Stamp) -> bool {
        let batch = self.batches.values_mut().find(|b| b.contains(order));
        let key = batch.as_ref().map(|b| b.submitted);
        let facts = match (batch, fact) {
            (Some(b), Fact::PickedUp) => &mut b.picked,
            (Some(b), Fact::Delivered) => &mut b.delivered,
            (None, Fact::PickedUp) => &mut self.early_picks,
            (None, Fact::Delivered) => &mut self.early_deliveries,
        };
        if facts.contains_key(&order) {
            return false;
        }
        facts.insert(order, at);
        match key {
            Some(key) => self.settle(lift, key),
            None => tracing::debug!(%lift, %order, "fact ahead of its submission"),
        }
        true
    }
}

#[derive(Clone, Debug)]
pub struct LiftBoard {
    lifts: BTreeMap<LiftKey, LiftReplica>,
}

impl LiftBoard {
    pub fn new(lifts: u32) -> Self {
        Self {
            lifts: LiftKey::all(lifts).map(|k| (k, LiftReplica::new())).collect(),
        }
    }

    pub fn lifts(&self) -> impl Iterator<Item = LiftKey> + '_ {
        self.lifts.keys().copied()
    }

    fn get(&self, lift: LiftKey) -> Option<&LiftReplica> {
        self.lifts.get(&lift)
    }

    fn get_mut(&mut self, lift: LiftKey) -> Result<&mut LiftReplica, Violation> {
        self.lifts.get_mut(&lift).ok_or(Violation::UnknownLift(lift))
    }

    pub fn phase(&self, lift: LiftKey) -> Option<Phase> {
        self.get(lift).map(|r| r.history.current())
    }

    /// Ranks this replica believes are inside the critical section of `lift`
    ///
    /// More than one means a claim overtook the previous holder's release.
    pub fn holders(&self, lift: LiftKey) -> impl Iterator<Item = Rank> + '_ {
        self.get(lift)
            .into_iter()
            .flat_map(|r| r.holders.iter().copied())
    }

    /// True when the lift exists and nobody holds its critical section
    pub fn is_free(&self, lift: LiftKey) -> bool {
        self.get(lift).is_some_and(|r| r.holders.is_empty())
    }

    /// Orders waiting for pickup on `lift`, oldest first
    pub fn orders(&self, lift: LiftKey) -> Vec<&Order> {
        self.get(lift)
            .and_then(LiftReplica::newest)
            .map(|b| b.waiting().collect())
            .unwrap_or_default()
    }

    pub fn oldest_order(&self, lift: LiftKey) -> Option<&Order> {
        self.get(lift)
            .and_then(LiftReplica::newest)
            .and_then(|b| b.waiting().next())
    }

    /// True when any lift has orders waiting for pickup
    pub fn has_pending_orders(&self) -> bool {
        self.lifts
            .values()
            .any(|r| r.newest().is_some_and(|b| b.waiting().next().is_some()))
    }

    /// Orders submitted on `lift` and not yet delivered
    pub fn outstanding(&self, lift: LiftKey) -> usize {
        self.get(lift)
            .and_then(LiftReplica::newest)
            .map_or(0, Batch::undelivered)
    }

    pub fn history(&self, lift: LiftKey) -> Option<&PhaseHistory> {
        self.get(lift).map(|r| &r.history)
    }

    /// `rank` enters the critical section of `lift`
    pub fn claim(&mut self, lift: LiftKey, rank: Rank) -> Result<(), Violation> {
        let replica = self.get_mut(lift)?;
        replica.holders.insert(rank);
        if replica.holders.len() > 1 {
            tracing::debug!(%lift, claimant = %rank, holders = ?replica.holders, "claim ahead of a release");
        }
        Ok(())
    }

    /// A purchaser releases `lift` with its batch: `Ordering -> Pickup`
    ///
    /// Pickups and deliveries that arrived ahead of the batch are applied
    /// to it at once, so the lift may move further along its cycle. Returns
    /// the new phase when it changed.
    pub fn submit_orders(
        &mut self,
        lift: LiftKey,
        from: Rank,
        orders: &[Order],
        stamp: Stamp,
    ) -> Result<Option<Phase>, Violation> {
        let replica = self.get_mut(lift)?;
        let before = replica.history.current();
        replica.release(lift, from);

        let mut batch = Batch::new(stamp, orders);
        for order in orders {
            if let Some(at) = replica.early_picks.remove(&order.stamp) {
                batch.picked.insert(order.stamp, at);
            }
            if let Some(at) = replica.early_deliveries.remove(&order.stamp) {
                batch.delivered.insert(order.stamp, at);
            }
        }
        replica.batches.insert(stamp, batch);
        replica.advance(lift, Phase::Pickup, stamp);
        replica.settle(lift, stamp);
        Ok(replica.changed(before))
    }

    /// A courier releases `lift` after taking `order`
    ///
    /// Returns `Some(Phase::Delivery)` when that was the last waiting order.
    pub fn pick_up(
        &mut self,
        lift: LiftKey,
        from: Rank,
        order: &Order,
        stamp: Stamp,
    ) -> Result<Option<Phase>, Violation> {
        let replica = self.get_mut(lift)?;
        let before = replica.history.current();
        replica.release(lift, from);
        if !replica.note(lift, Fact::PickedUp, order.stamp, stamp) {
            return Err(Violation::PickedTwice {
                lift,
                order: order.stamp,
                courier: from,
            });
        }
        Ok(replica.changed(before))
    }

    /// A courier releases `lift` after a transit
    ///
    /// Returns `Some(Phase::Ordering)` once nothing submitted on the lift is
    /// left undelivered.
    pub fn deliver(
        &mut self,
        lift: LiftKey,
        from: Rank,
        packages: &[Package],
        stamp: Stamp,
    ) -> Result<Option<Phase>, Violation> {
        let replica = self.get_mut(lift)?;
        let before = replica.history.current();
        replica.release(lift, from);
        let repeated: Vec<Stamp> = packages
            .iter()
            .map(|p| p.order.stamp)
            .filter(|order| !replica.note(lift, Fact::Delivered, *order, stamp))
            .collect();
        if let Some(order) = repeated.first() {
            return Err(Violation::DeliveredTwice {
                lift,
                order: *order,
                courier: from,
            });
        }
        Ok(replica.changed(before))
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
