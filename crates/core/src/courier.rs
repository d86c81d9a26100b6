// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Courier role
//!
//! A courier alternates between two queue families. In pickup it takes the
//! oldest waiting order from a lift in `Pickup` and spends `prepare_time`
//! preparing it. Once no lift has waiting orders it queues for delivery on
//! the lifts its prepared orders belong to, packs as much as fits and shares
//! the remaining room with couriers queued behind it.

use crate::admission::Admission;
use crate::board::LiftBoard;
use crate::clock::{Clock, Countdown};
use crate::dice::Dice;
use crate::effect::TimerId;
use crate::id::{LiftKey, Rank};
use crate::lamport::Envelope;
use crate::message::{LiftScope, Message, QueueKind};
use crate::order::{Order, PreparedBatch};
use crate::phase::Phase;
use crate::rideshare::{self, Invitation, Transit};
use crate::step::Step;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Courier {
    pickup: Admission,
    delivery: Admission,
    batch: PreparedBatch,
    /// Order picked up and still being prepared
    preparing: Option<Order>,
    transit: Option<Transit>,
    invitation: Option<Invitation>,
    delivered: usize,
}

impl Courier {
    /// `quorum` is the size of the courier group, this process included
    pub fn new(lifts: u32, quorum: usize) -> Self {
        Self {
            pickup: Admission::new(QueueKind::Pickup, lifts, quorum),
            delivery: Admission::new(QueueKind::Delivery, lifts, quorum),
            batch: PreparedBatch::new(),
            preparing: None,
            transit: None,
            invitation: None,
            delivered: 0,
        }
    }

    pub fn pickup(&self) -> &Admission {
        &self.pickup
    }

    pub fn delivery(&self) -> &Admission {
        &self.delivery
    }

    pub fn batch(&self) -> &PreparedBatch {
        &self.batch
    }

    /// Packages this courier has carried to their lift
    pub fn delivered(&self) -> usize {
        self.delivered
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
            TimerId::Startup => self.begin_pickup(step),
            TimerId::Poll(kind @ (QueueKind::Pickup | QueueKind::Delivery)) => {
                self.evaluate(step, board);
                let admission = match kind {
                    QueueKind::Pickup => &self.pickup,
                    _ => &self.delivery,
                };
                if admission.is_polling() {
                    step.set_timer(id, step.config.courier_poll);
                }
            }
            TimerId::Prepare => self.prepared(step, board),
            TimerId::Departure(lift) => self.depart(step, lift),
            other => tracing::debug!(rank = %step.rank, timer = %other, "courier ignores timer"),
        }
    }

    pub fn on_message<C: Clock, D: Dice>(
        &mut self,
        step: &mut Step<'_, C, D>,
        envelope: &Envelope,
    ) {
        let from = envelope.from;
        match &envelope.message {
            Message::Request { kind, scope } => {
                if let Some(admission) = self.admission_mut(*kind) {
                    admission.on_request(step, envelope.stamp(), scope);
                }
            }
            Message::Ack { kind, request } => {
                let reached = self
                    .admission_mut(*kind)
                    .is_some_and(|a| a.on_ack(*request));
                if reached {
                    tracing::debug!(rank = %step.rank, %kind, %request, "courier quorum reached");
                    step.set_timer(TimerId::Poll(*kind), step.config.courier_poll);
                }
            }
            Message::Claim { kind, lift } => {
                if let Some(admission) = self.admission_mut(*kind) {
                    admission.leave_all_but(from, *lift);
                }
            }
            Message::Withdraw { kind, scope } => {
                if let Some(admission) = self.admission_mut(*kind) {
                    admission.leave(from, scope);
                }
            }
            Message::PickedUp { lift, .. } => {
                self.pickup.leave(from, &LiftScope::single(*lift));
            }
            Message::Delivered { lift, .. } => {
                self.delivery.leave(from, &LiftScope::single(*lift));
            }
            Message::RideInvite {
                kind: QueueKind::Delivery,
                lift,
            } => self.on_invite(step, from, *lift),
            Message::RideAnswer {
                kind: QueueKind::Delivery,
                unit,
                ..
            } => {
                rideshare::reply(
                    step,
                    self.transit.as_mut(),
                    QueueKind::Delivery,
                    from,
                    unit.clone(),
                );
            }
            Message::RideAccepted {
                kind: QueueKind::Delivery,
                lift,
            } => self.on_accepted(step, from, *lift),
            Message::RideDeclined {
                kind: QueueKind::Delivery,
                lift,
            } => {
                if self
                    .invitation
                    .as_ref()
                    .is_some_and(|i| i.matches(QueueKind::Delivery, *lift, from))
                {
                    self.invitation = None;
                }
            }
            _ => {}
        }
    }

    fn admission_mut(&mut self, kind: QueueKind) -> Option<&mut Admission> {
        match kind {
            QueueKind::Pickup => Some(&mut self.pickup),
            QueueKind::Delivery => Some(&mut self.delivery),
            QueueKind::Ordering => None,
        }
    }

    /// Re-evaluate whichever family we are polling
    pub fn evaluate<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, board: &LiftBoard) {
        if self.pickup.is_polling() {
            self.try_pickup(step, board);
        }
        if self.delivery.is_polling() {
            self.try_deliver(step, board);
        }
    }

    fn begin_pickup<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>) {
        self.pickup.request(step, LiftScope::All);
    }

    fn begin_delivery<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>) {
        if self.batch.is_empty() {
            self.begin_pickup(step);
            return;
        }
        self.delivery
            .request(step, LiftScope::Only(self.batch.lifts()));
    }

    fn try_pickup<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, board: &LiftBoard) {
        if self.preparing.is_some() {
            return;
        }
        // Nothing left to collect: deliver what we hold
        if !self.batch.is_empty() && !board.has_pending_orders() {
            tracing::debug!(rank = %step.rank, prepared = self.batch.len(), "no pending orders, switching to delivery");
            step.broadcast(Message::Withdraw {
                kind: QueueKind::Pickup,
                scope: LiftScope::All,
            });
            step.cancel_timer(TimerId::Poll(QueueKind::Pickup));
            self.pickup.finish();
            self.begin_delivery(step);
            return;
        }

        let rank = step.rank;
        let admitted = self.pickup.admissible(rank, |lift| {
            board.is_free(lift)
                && board.phase(lift) == Some(Phase::Pickup)
                && board.oldest_order(lift).is_some()
        });
        let Some(lift) = admitted else {
            return;
        };
        let Some(order) = board.oldest_order(lift).cloned() else {
            return;
        };

        step.broadcast(Message::Claim {
            kind: QueueKind::Pickup,
            lift,
        });
        step.cancel_timer(TimerId::Poll(QueueKind::Pickup));
        self.pickup.finish();
        tracing::info!(rank = %rank, %lift, order = %order.stamp, quantity = order.quantity, "order picked up");
        step.broadcast(Message::PickedUp {
            lift,
            order: order.clone(),
        });
        self.preparing = Some(order);
        step.set_timer(TimerId::Prepare, step.config.prepare_time);
    }

    fn prepared<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, board: &LiftBoard) {
        let Some(order) = self.preparing.take() else {
            return;
        };
        tracing::debug!(rank = %step.rank, order = %order.stamp, "order prepared");
        self.batch.push(order);
        if board.has_pending_orders() {
            self.begin_pickup(step);
        } else {
            self.begin_delivery(step);
        }
    }

    fn try_deliver<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, board: &LiftBoard) {
        if self.transit.is_some() || self.invitation.is_some() {
            return;
        }
        let rank = step.rank;
        let batch = &self.batch;
        let admitted = self.delivery.admissible(rank, |lift| {
            board.is_free(lift)
                && board.phase(lift) == Some(Phase::Delivery)
                && batch.has_lift(lift)
        });
        let Some(lift) = admitted else {
            return;
        };

        step.broadcast(Message::Claim {
            kind: QueueKind::Delivery,
            lift,
        });
        step.cancel_timer(TimerId::Poll(QueueKind::Delivery));
        self.delivery.finish();

        let capacity = step.config.capacity;
        let units = self.batch.pack(lift, capacity);
        let mut transit = Transit::open(QueueKind::Delivery, lift, capacity, rank, units);
        tracing::info!(rank = %rank, %lift, load = transit.load(), "courier admitted for delivery");
        if transit.is_full() {
            self.transit = Some(transit);
            self.depart(step, lift);
            return;
        }
        let length = Duration::from_millis(step.dice.roll(step.config.courier_window.millis()));
        let window = Countdown::start(step.clock, length);
        let peers = self.delivery.peers(lift, rank);
        transit.invite(step, window, &peers);
        step.set_timer(TimerId::Departure(lift), length);
        self.transit = Some(transit);
    }

    fn depart<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, lift: LiftKey) {
        let Some(transit) = self.transit.take_if(|t| t.lift() == lift) else {
            tracing::debug!(rank = %step.rank, %lift, "departure without transit");
            return;
        };
        let packages = transit.into_packages();
        self.delivered += packages.len();
        tracing::info!(rank = %step.rank, %lift, packages = packages.len(), "packages delivered");
        step.broadcast(Message::Delivered { lift, packages });
        self.begin_delivery(step);
    }

    fn on_invite<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, inviter: Rank, lift: LiftKey) {
        let unit = match self.batch.oldest_for(lift) {
            Some(unit)
                if self.transit.is_none()
                    && self.invitation.is_none()
                    && self.preparing.is_none()
                    && !self.delivery.is_idle() =>
            {
                unit.clone()
            }
            _ => {
                tracing::debug!(rank = %step.rank, %inviter, %lift, "ride invite ignored");
                return;
            }
        };
        self.invitation = Some(Invitation::answer(step, QueueKind::Delivery, inviter, unit));
    }

    fn on_accepted<C: Clock, D: Dice>(&mut self, step: &mut Step<'_, C, D>, from: Rank, lift: LiftKey) {
        let Some(invitation) = self
            .invitation
            .take_if(|i| i.matches(QueueKind::Delivery, lift, from))
        else {
            return;
        };
        self.batch.remove(invitation.unit.stamp);
        tracing::info!(rank = %step.rank, %lift, carrier = %from, "package handed to shared ride");

        if self.batch.is_empty() {
            step.broadcast(Message::Withdraw {
                kind: QueueKind::Delivery,
                scope: LiftScope::All,
            });
            step.cancel_timer(TimerId::Poll(QueueKind::Delivery));
            self.delivery.finish();
            self.begin_pickup(step);
        } else if !self.batch.has_lift(lift) {
            step.broadcast(Message::Withdraw {
                kind: QueueKind::Delivery,
                scope: LiftScope::single(lift),
            });
        }
    }
}

#[cfg(test)]
#[path = "courier_tests.rs"]
mod tests;
