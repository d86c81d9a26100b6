// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster membership and random role assignment

use crate::dice::Dice;
use crate::id::Rank;
use crate::node::RoleKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("need at least 2 processes, got {0}")]
    TooFew(u32),
    #[error("the {0} group is empty")]
    EmptyGroup(RoleKind),
    #[error("{0} assigned to both groups")]
    Duplicate(Rank),
}

/// Which ranks are purchasers and which are couriers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    purchasers: Vec<Rank>,
    couriers: Vec<Rank>,
}

impl Membership {
    pub fn new(mut purchasers: Vec<Rank>, mut couriers: Vec<Rank>) -> Result<Self, RoleError> {
        if purchasers.is_empty() {
            return Err(RoleError::EmptyGroup(RoleKind::Purchaser));
        }
        if couriers.is_empty() {
            return Err(RoleError::EmptyGroup(RoleKind::Courier));
        }
        purchasers.sort();
        couriers.sort();
        if let Some(rank) = purchasers.iter().find(|r| couriers.binary_search(r).is_ok()) {
            return Err(RoleError::Duplicate(*rank));
        }
        Ok(Self {
            purchasers,
            couriers,
        })
    }

    /// Ranks `0..purchasers` purchase, the next `couriers` ranks deliver
    pub fn split(purchasers: u32, couriers: u32) -> Result<Self, RoleError> {
        Self::new(
            (0..purchasers).map(Rank).collect(),
            (purchasers..purchasers + couriers).map(Rank).collect(),
        )
    }

    pub fn purchasers(&self) -> &[Rank] {
        &self.purchasers
    }

    pub fn couriers(&self) -> &[Rank] {
        &self.couriers
    }

    pub fn size(&self) -> usize {
        self.purchasers.len() + self.couriers.len()
    }

    /// Every rank, ascending
    pub fn ranks(&self) -> Vec<Rank> {
        let mut ranks: Vec<_> = self.purchasers.iter().chain(&self.couriers).copied().collect();
        ranks.sort();
        ranks
    }

    pub fn role_of(&self, rank: Rank) -> Option<RoleKind> {
        if self.purchasers.binary_search(&rank).is_ok() {
            Some(RoleKind::Purchaser)
        } else if self.couriers.binary_search(&rank).is_ok() {
            Some(RoleKind::Courier)
        } else {
            None
        }
    }

    pub fn group_size(&self, kind: RoleKind) -> usize {
        match kind {
            RoleKind::Purchaser => self.purchasers.len(),
            RoleKind::Courier => self.couriers.len(),
        }
    }
}

/// Assign ranks `0..size` to roles by coin flip
///
/// Equal groups hand one purchaser to the couriers (unless that would empty
/// the purchasers), and an empty group borrows the last rank of the other.
pub fn assign_roles(size: u32, dice: &impl Dice) -> Result<Membership, RoleError> {
    if size < 2 {
        return Err(RoleError::TooFew(size));
    }
    let mut purchasers = Vec::new();
    let mut couriers = Vec::new();
    for rank in (0..size).map(Rank) {
        if dice.flip() {
            purchasers.push(rank);
        } else {
            couriers.push(rank);
        }
    }

    if purchasers.len() == couriers.len() && purchasers.len() > 1 {
        if let Some(rank) = purchasers.pop() {
            couriers.push(rank);
        }
    }
    if purchasers.is_empty() {
        if let Some(rank) = couriers.pop() {
            purchasers.push(rank);
        }
    } else if couriers.is_empty() {
        if let Some(rank) = purchasers.pop() {
            couriers.push(rank);
        }
    }
    tracing::debug!(purchasers = purchasers.len(), couriers = couriers.len(), "roles assigned");
    Membership::new(purchasers, couriers)
}

#[cfg(test)]
#[path = "roles_tests.rs"]
mod tests;
