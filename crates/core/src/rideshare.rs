// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ride-sharing consolidation
//!
//! An admitted process opens a transit on its lift, invites the peers queued
//! behind it and accepts their units while a departure window is open and
//! capacity allows. Purchasers consolidate orders this way; couriers
//! consolidate deliveries.

use crate::clock::{Clock, Countdown};
use crate::dice::Dice;
use crate::id::{LiftKey, Rank};
use crate::message::{Message, QueueKind};
use crate::order::{Order, Package};
use crate::step::Step;
use std::fmt;

/// Why an offered unit was turned away
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decline {
    WindowClosed,
    NoRoom { offered: u32, remaining: u32 },
    WrongLift,
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decline::WindowClosed => f.write_str("window closed"),
            Decline::NoRoom { offered, remaining } => {
                write!(f, "no room for {offered} (remaining {remaining})")
            }
            Decline::WrongLift => f.write_str("wrong lift"),
        }
    }
}

/// A unit aboard a transit and the rank that brought it
#[derive(Clone, Debug, PartialEq, Eq)]
struct Aboard {
    carrier: Rank,
    unit: Order,
}

/// The admitted process's consolidated load for one lift
#[derive(Clone, Debug)]
pub struct Transit {
    kind: QueueKind,
    lift: LiftKey,
    capacity: u32,
    aboard: Vec<Aboard>,
    window: Option<Countdown>,
}

impl Transit {
    /// Open a transit carrying the owner's own units
    pub fn open(
        kind: QueueKind,
        lift: LiftKey,
        capacity: u32,
        owner: Rank,
        units: impl IntoIterator<Item = Order>,
    ) -> Self {
        Self {
            kind,
            lift,
            capacity,
            aboard: units
                .into_iter()
                .map(|unit| Aboard {
                    carrier: owner,
                    unit,
                })
                .collect(),
            window: None,
        }
    }

    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    pub fn lift(&self) -> LiftKey {
        self.lift
    }

    pub fn load(&self) -> u32 {
        self.aboard.iter().map(|a| a.unit.quantity).sum()
    }

    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.load())
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    pub fn window(&self) -> Option<Countdown> {
        self.window
    }

    /// Start the departure window and invite `peers` to share the ride
    pub fn invite<C: Clock, D: Dice>(
        &mut self,
        step: &mut Step<'_, C, D>,
        window: Countdown,
        peers: &[Rank],
    ) {
        self.window = Some(window);
        for peer in peers {
            step.send(
                *peer,
                Message::RideInvite {
                    kind: self.kind,
                    lift: self.lift,
                },
            );
        }
        tracing::debug!(
            kind = %self.kind,
            lift = %self.lift,
            invited = peers.len(),
            window_ms = window.length().as_millis() as u64,
            "ride window open"
        );
    }

    /// Consider `unit` offered by `carrier`
    ///
    /// Accepted only while the window is open and the unit fits.
    pub fn offer(
        &mut self,
        carrier: Rank,
        unit: Order,
        clock: &impl Clock,
    ) -> Result<(), Decline> {
        if unit.lift != self.lift {
            return Err(Decline::WrongLift);
        }
        if !self.window.is_some_and(|w| w.is_open(clock)) {
            return Err(Decline::WindowClosed);
        }
        let remaining = self.remaining();
        if unit.quantity > remaining {
            return Err(Decline::NoRoom {
                offered: unit.quantity,
                remaining,
            });
        }
        self.aboard.push(Aboard { carrier, unit });
        Ok(())
    }

    /// Units aboard, as submitted orders
    pub fn into_orders(self) -> Vec<Order> {
        self.aboard.into_iter().map(|a| a.unit).collect()
    }

    /// Units aboard, as packages credited to the courier that prepared them
    pub fn into_packages(self) -> Vec<Package> {
        self.aboard
            .into_iter()
            .map(|a| Package::new(a.unit, a.carrier))
            .collect()
    }
}

/// An invitation this process answered and awaits a verdict on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invitation {
    pub kind: QueueKind,
    pub lift: LiftKey,
    pub inviter: Rank,
    pub unit: Order,
}

impl Invitation {
    /// Answer the inviter with `unit`
    pub fn answer<C: Clock, D: Dice>(
        step: &mut Step<'_, C, D>,
        kind: QueueKind,
        inviter: Rank,
        unit: Order,
    ) -> Self {
        step.send(
            inviter,
            Message::RideAnswer {
                kind,
                lift: unit.lift,
                unit: unit.clone(),
            },
        );
        Self {
            kind,
            lift: unit.lift,
            inviter,
            unit,
        }
    }

    pub fn matches(&self, kind: QueueKind, lift: LiftKey, from: Rank) -> bool {
        self.kind == kind && self.lift == lift && self.inviter == from
    }
}

/// Reply to a ride answer: accept or decline `carrier`'s unit
pub fn reply<C: Clock, D: Dice>(
    step: &mut Step<'_, C, D>,
    transit: Option<&mut Transit>,
    kind: QueueKind,
    carrier: Rank,
    unit: Order,
) -> bool {
    let lift = unit.lift;
    let verdict = match transit {
        Some(transit) if transit.kind == kind => transit.offer(carrier, unit, step.clock),
        _ => Err(Decline::WindowClosed),
    };
    match verdict {
        Ok(()) => {
            tracing::info!(%kind, %lift, %carrier, "ride shared");
            step.send(carrier, Message::RideAccepted { kind, lift });
            true
        }
        Err(reason) => {
            tracing::debug!(%kind, %lift, %carrier, %reason, "ride declined");
            step.send(carrier, Message::RideDeclined { kind, lift });
            false
        }
    }
}

#[cfg(test)]
#[path = "rideshare_tests.rs"]
mod tests;
