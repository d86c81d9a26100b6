// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire messages exchanged between processes

use crate::id::LiftKey;
use crate::lamport::Stamp;
use crate::order::{Order, Package};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family of request queues a message addresses
///
/// Purchasers keep one ordering queue per lift; couriers keep a pickup queue
/// and a delivery queue per lift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Ordering,
    Pickup,
    Delivery,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueueKind::Ordering => "ordering",
            QueueKind::Pickup => "pickup",
            QueueKind::Delivery => "delivery",
        };
        f.write_str(name)
    }
}

/// Which lifts' queues a request or withdrawal touches
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftScope {
    /// Every lift: the generic request
    All,
    /// Only the listed lifts: the targeted request
    Only(Vec<LiftKey>),
}

impl LiftScope {
    pub fn single(lift: LiftKey) -> Self {
        LiftScope::Only(vec![lift])
    }

    pub fn contains(&self, lift: LiftKey) -> bool {
        match self {
            LiftScope::All => true,
            LiftScope::Only(lifts) => lifts.contains(&lift),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    // Queue admission
    /// Ask to be queued; the envelope stamp orders the request
    Request { kind: QueueKind, scope: LiftScope },
    /// Unicast reply once the request is recorded
    Ack { kind: QueueKind, request: Stamp },
    /// Sender enters the critical section of `lift` and leaves every other
    /// queue of `kind`
    Claim { kind: QueueKind, lift: LiftKey },
    /// Sender leaves the queues of `kind` named by `scope`
    Withdraw { kind: QueueKind, scope: LiftScope },

    // Phase-transition releases
    /// Purchaser releases `lift` with its consolidated batch: `Ordering -> Pickup`
    OrdersSubmitted { lift: LiftKey, orders: Vec<Order> },
    /// Courier releases `lift` after taking `order`; the last one moves the
    /// lift to `Delivery`
    PickedUp { lift: LiftKey, order: Order },
    /// Courier releases `lift` after a transit; the last outstanding package
    /// moves the lift back to `Ordering`
    Delivered {
        lift: LiftKey,
        packages: Vec<Package>,
    },

    // Ride-sharing
    RideInvite { kind: QueueKind, lift: LiftKey },
    RideAnswer {
        kind: QueueKind,
        lift: LiftKey,
        unit: Order,
    },
    RideAccepted { kind: QueueKind, lift: LiftKey },
    RideDeclined { kind: QueueKind, lift: LiftKey },

    /// A purchaser has received its last delivery
    Completed,
}

impl Message {
    /// Message type tag, as used in traces and on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Message::Request { .. } => "request",
            Message::Ack { .. } => "ack",
            Message::Claim { .. } => "claim",
            Message::Withdraw { .. } => "withdraw",
            Message::OrdersSubmitted { .. } => "orders_submitted",
            Message::PickedUp { .. } => "picked_up",
            Message::Delivered { .. } => "delivered",
            Message::RideInvite { .. } => "ride_invite",
            Message::RideAnswer { .. } => "ride_answer",
            Message::RideAccepted { .. } => "ride_accepted",
            Message::RideDeclined { .. } => "ride_declined",
            Message::Completed => "completed",
        }
    }

    /// Queue family the message concerns, if any
    pub fn kind(&self) -> Option<QueueKind> {
        match self {
            Message::Request { kind, .. }
            | Message::Ack { kind, .. }
            | Message::Claim { kind, .. }
            | Message::Withdraw { kind, .. }
            | Message::RideInvite { kind, .. }
            | Message::RideAnswer { kind, .. }
            | Message::RideAccepted { kind, .. }
            | Message::RideDeclined { kind, .. } => Some(*kind),
            Message::OrdersSubmitted { .. } => Some(QueueKind::Ordering),
            Message::PickedUp { .. } => Some(QueueKind::Pickup),
            Message::Delivered { .. } => Some(QueueKind::Delivery),
            Message::Completed => None,
        }
    }

    /// Lift the message concerns, if it names exactly one
    pub fn lift(&self) -> Option<LiftKey> {
        match self {
            Message::Claim { lift, .. }
            | Message::OrdersSubmitted { lift, .. }
            | Message::PickedUp { lift, .. }
            | Message::Delivered { lift, .. }
            | Message::RideInvite { lift, .. }
            | Message::RideAnswer { lift, .. }
            | Message::RideAccepted { lift, .. }
            | Message::RideDeclined { lift, .. } => Some(*lift),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
