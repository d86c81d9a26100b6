// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Purchaser role
//!
//! A purchaser queues for every lift, and once it heads the queue of a free
//! lift in `Ordering` it claims that lift, opens a departure window and
//! invites the purchasers queued behind it to add their orders. At departure
//! it submits the consolidated batch, which moves the lift to `Pickup`.
//! It then waits for its own order to come back in a delivery.

use crate::admission::Admission;
use crate::board::LiftBoard;
use crate::clock::{Clock, Countdown};
use crate::dice::Dice;
use crate::effect::TimerId;
use crate::id::{LiftKey, Rank};
use crate::lamport::{Envelope, Stamp};
use crate::message::{LiftScope, Message, QueueKind};
use crate::order::{Order, Package};
use crate::phase::Phase;
use crate::rideshare::{self, Invitation, Transit};
use crate::step::Step;
use std::time::Duration;

const KIND: QueueKind = QueueKind::Ordering;

#[derive(Clone, Debug)]
pub struct Purchaser {
    ordering: Admission,
    rounds: u32,
    rounds_done: u32,
    /// Order kept after a declined ride, reused on the next admission
    retained: Option<Order>,
    transit: Option<Transit>,
    invitation: Option<Invitation>,
    /// Stamp of our order while it is being fulfilled
    awaiting_delivery: Option<Stamp>,
}

impl Purchaser {
    /// `quorum` is the size of the purchaser group, this process included
    pub fn new(lifts: u32, rounds: u32, quorum: usize) -> Self {
        Self {
            ordering: Admission::new(KIND, lifts, quorum),
            rounds,
            rounds_done: 0,
            retained: None,
            transit: None,
            invitation: None,
            awaiting_delivery: None,
        }
    }

    pub fn admission(&self) -> &Admission {
        &self.ordering
    }

    pub fn rounds_done(&self) -> u32 {
        self.rounds_done
    }

    /// True once every round has been delivered
    pub fn is_finished(&self) -> bool {
        self.rounds_done >= self.rounds
    }

    pub fn awaiting_delivery(&self) -> Option<Stamp> {
        self.awaiting_delivery
    }

    pub fn start<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>) {
        step.set_timer(TimerId::Startup, step.config.startup_delay);
    }

    pub fn on_timer<C: Clock, D: Dice>(
        &mut self,
        step: &mut Step<'_, C, D>,
        board: &LiftBoard,
        id: TimerId,
    ) {
        match id {
            TimerId::Startup => {
                self.ordering.request(step, LiftScope::All);
            }
            TimerId::Poll(QueueKind::Ordering) => {
                self.evaluate(step, board);
                if self.ordering.is_polling() {
                    step.set_timer(id, step.config.purchaser_poll);
                }
            }
            TimerId::Departure(lift) => self.depart(step, lift),
            other => tracing::debug!(rank = %step.rank, timer = %other, "purchaser ignores timer"),
        }
    }

    pub fn on_message<C: Clock, D: Dice>(
        &mut self,
        step: &mut Step<'_, C, D>,
        envelope: &Envelope,
    ) {
        let from = envelope.from;
        match &envelope.message {
            Message::Request { kind: KIND, scope } => {
                self.ordering.on_request(step, envelope.stamp(), scope);
            }
            Message::Ack { kind: KIND, request } => {
                if self.ordering.on_ack(*request) {
                    tracing::debug!(rank = %step.rank, request = %request, "ordering quorum reached");
                    step.set_timer(TimerId::Poll(KIND), step.config.purchaser_poll);
                }
            }
            Message::Claim { kind: KIND, lift } => self.ordering.leave_all_but(from, *lift),
            Message::Withdraw { kind: KIND, scope } => self.ordering.leave(from, scope),
            Message::OrdersSubmitted { lift, .. } => {
                self.ordering.leave(from, &LiftScope::single(*lift));
            }
            Message::RideInvite { kind: KIND, lift } => self.on_invite(step, from, *lift),
            Message::RideAnswer {
                kind: KIND, unit, ..
            } => {
                rideshare::reply(step, self.transit.as_mut(), KIND, from, unit.clone());
            }
            Message::RideAccepted { kind: KIND, lift } => self.on_accepted(step, from, *lift),
            Message::RideDeclined { kind: KIND, lift } => self.on_declined(from, *lift),
            Message::Delivered { packages, .. } => {
                let answered = self.invitation.as_ref().map(|i| i.unit.stamp);
                if carries(packages, step.rank, answered) {
                    // The delivery overtook the inviter's acceptance
                    if let Some(invitation) = self.invitation.take() {
                        self.join(step, invitation);
                    }
                }
                if carries(packages, step.rank, self.awaiting_delivery) {
                    self.on_delivered(step);
                }
            }
            _ => {}
        }
    }

    /// Try to enter the critical section of some lift
    pub fn evaluate<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, board: &LiftBoard) {
        if self.transit.is_some() || self.invitation.is_some() || self.awaiting_delivery.is_some() {
            return;
        }
        let rank = step.rank;
        let admitted = self.ordering.admissible(rank, |lift| {
            board.is_free(lift) && board.phase(lift) == Some(Phase::Ordering)
        });
        if let Some(lift) = admitted {
            self.admit(step, lift);
        }
    }

    fn admit<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, lift: LiftKey) {
        step.broadcast(Message::Claim { kind: KIND, lift });
        step.cancel_timer(TimerId::Poll(KIND));
        self.ordering.finish();

        let order = self.draft(step, lift);
        tracing::info!(rank = %step.rank, %lift, quantity = order.quantity, "purchaser admitted");

        let capacity = step.config.capacity;
        let mut transit = Transit::open(KIND, lift, capacity, step.rank, [order]);
        if transit.is_full() {
            self.transit = Some(transit);
            self.depart(step, lift);
            return;
        }
        let length = Duration::from_millis(step.dice.roll(step.config.purchaser_window.millis()));
        let window = Countdown::start(step.clock, length);
        let peers = self.ordering.peers(lift, step.rank);
        transit.invite(step, window, &peers);
        step.set_timer(TimerId::Departure(lift), length);
        self.transit = Some(transit);
    }

    /// Our order for `lift`: the retained one if a ride was declined, or a
    /// fresh one
    fn draft<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, lift: LiftKey) -> Order {
        match self.retained.take() {
            Some(order) => order.retarget(lift),
            None => {
                let quantity = step.roll_quantity();
                Order::new(lift, quantity, step.local_stamp())
            }
        }
    }

    fn depart<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, lift: LiftKey) {
        let Some(transit) = self.transit.take_if(|t| t.lift() == lift) else {
            tracing::debug!(rank = %step.rank, %lift, "departure without transit");
            return;
        };
        let orders = transit.into_orders();
        self.awaiting_delivery = orders
            .iter()
            .find(|o| o.requester == step.rank)
            .map(|o| o.stamp);
        tracing::info!(rank = %step.rank, %lift, orders = orders.len(), "orders submitted");
        step.broadcast(Message::OrdersSubmitted { lift, orders });
    }

    fn on_invite<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, inviter: Rank, lift: LiftKey) {
        let eligible = self.transit.is_none()
            && self.invitation.is_none()
            && self.awaiting_delivery.is_none()
            && !self.ordering.is_idle()
            && !self.is_finished();
        if !eligible {
            tracing::debug!(rank = %step.rank, %inviter, %lift, "ride invite ignored");
            return;
        }
        let unit = self.draft(step, lift);
        self.invitation = Some(Invitation::answer(step, KIND, inviter, unit));
    }

    fn on_accepted<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, from: Rank, lift: LiftKey) {
        if let Some(invitation) = self.invitation.take_if(|i| i.matches(KIND, lift, from)) {
            self.join(step, invitation);
        }
    }

    fn join<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, invitation: Invitation) {
        tracing::info!(rank = %step.rank, lift = %invitation.lift, inviter = %invitation.inviter, "joined shared ride");
        step.broadcast(Message::Withdraw {
            kind: KIND,
            scope: LiftScope::All,
        });
        step.cancel_timer(TimerId::Poll(KIND));
        self.ordering.finish();
        self.awaiting_delivery = Some(invitation.unit.stamp);
    }

    fn on_declined(&mut self, from: Rank, lift: LiftKey) {
        if let Some(invitation) = self.invitation.take_if(|i| i.matches(KIND, lift, from)) {
            self.retained = Some(invitation.unit);
        }
    }

    fn on_delivered<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>) {
        self.awaiting_delivery = None;
        self.rounds_done += 1;
        tracing::info!(rank = %step.rank, round = self.rounds_done, of = self.rounds, "order delivered");
        if self.is_finished() {
            step.broadcast(Message::Completed);
        } else {
            self.ordering.request(step, LiftScope::All);
        }
    }
}

/// True when `packages` include `order` requested by `rank`
fn carries(packages: &[Package], rank: Rank, order: Option<Stamp>) -> bool {
    order.is_some_and(|order| {
        packages
            .iter()
            .any(|p| p.requester() == rank && p.order.stamp == order)
    })
}

#[cfg(test)]
#[path = "purchaser_tests.rs"]
mod tests;
