// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orders, packages and the courier's prepared batch

use crate::id::{LiftKey, Rank};
use crate::lamport::Stamp;
use serde::{Deserialize, Serialize};

/// One unit of requested work
///
/// The stamp is the purchaser's Lamport stamp at creation and identifies the
/// order everywhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub requester: Rank,
    pub quantity: u32,
    pub lift: LiftKey,
    pub stamp: Stamp,
}

impl Order {
    pub fn new(lift: LiftKey, quantity: u32, stamp: Stamp) -> Self {
        Self {
            requester: stamp.rank,
            quantity,
            lift,
            stamp,
        }
    }

    /// Move a retained order onto another lift
    pub fn retarget(self, lift: LiftKey) -> Self {
        Self { lift, ..self }
    }
}

/// An order on its way back to the purchaser
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub order: Order,
    /// Courier that picked up and prepared the order
    pub courier: Rank,
}

impl Package {
    pub fn new(order: Order, courier: Rank) -> Self {
        Self { order, courier }
    }

    pub fn lift(&self) -> LiftKey {
        self.order.lift
    }

    pub fn requester(&self) -> Rank {
        self.order.requester
    }

    pub fn quantity(&self) -> u32 {
        self.order.quantity
    }
}

/// Orders a courier has retrieved and prepared but not yet delivered
#[derive(Clone, Debug, Default)]
pub struct PreparedBatch {
    orders: Vec<Order>,
}

impl PreparedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Distinct lifts with prepared orders, ascending
    pub fn lifts(&self) -> Vec<LiftKey> {
        let mut lifts: Vec<_> = self.orders.iter().map(|o| o.lift).collect();
        lifts.sort();
        lifts.dedup();
        lifts
    }

    pub fn has_lift(&self, lift: LiftKey) -> bool {
        self.orders.iter().any(|o| o.lift == lift)
    }

    /// Oldest prepared order for `lift`
    pub fn oldest_for(&self, lift: LiftKey) -> Option<&Order> {
        self.orders
            .iter()
            .filter(|o| o.lift == lift)
            .min_by_key(|o| o.stamp)
    }

    pub fn remove(&mut self, stamp: Stamp) -> Option<Order> {
        let index = self.orders.iter().position(|o| o.stamp == stamp)?;
        Some(self.orders.remove(index))
    }

    /// Greedily take orders for `lift`, oldest first, while they fit in `room`
    ///
    /// An order that does not fit is skipped; smaller later orders may still
    /// be taken.
    pub fn pack(&mut self, lift: LiftKey, room: u32) -> Vec<Order> {
        let mut candidates: Vec<_> = self
            .orders
            .iter()
            .filter(|o| o.lift == lift)
            .map(|o| (o.stamp, o.quantity))
            .collect();
        candidates.sort();

        let mut left = room;
        let mut taken = Vec::new();
        for (stamp, quantity) in candidates {
            if quantity <= left {
                left -= quantity;
                if let Some(order) = self.remove(stamp) {
                    taken.push(order);
                }
            }
        }
        taken
    }
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
