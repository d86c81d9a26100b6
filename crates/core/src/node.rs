// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A protocol participant as a pure state machine
//!
//! `Node::handle` takes one input (start, a delivered message or a fired
//! timer) and returns the effects to carry out. Transports and timers live
//! outside, in the engine or the simulator.

use crate::board::LiftBoard;
use crate::clock::Clock;
use crate::config::ProtocolConfig;
use crate::courier::Courier;
use crate::dice::Dice;
use crate::effect::{Effect, TimerId};
use crate::id::Rank;
use crate::lamport::{Envelope, LamportClock};
use crate::message::Message;
use crate::purchaser::Purchaser;
use crate::step::Step;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which role group a process belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Purchaser,
    Courier,
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleKind::Purchaser => f.write_str("purchaser"),
            RoleKind::Courier => f.write_str("courier"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Role {
    Purchaser(Purchaser),
    Courier(Courier),
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Purchaser(_) => RoleKind::Purchaser,
            Role::Courier(_) => RoleKind::Courier,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Start,
    Deliver(Envelope),
    Timer(TimerId),
}

pub struct Node<C: Clock, D: Dice> {
    rank: Rank,
    lamport: LamportClock,
    board: LiftBoard,
    role: Role,
    config: ProtocolConfig,
    clock: C,
    dice: D,
}

impl<C: Clock, D: Dice> Node<C, D> {
    /// `group` is the size of this node's role group, itself included
    pub fn new(
        rank: Rank,
        kind: RoleKind,
        group: usize,
        config: ProtocolConfig,
        clock: C,
        dice: D,
    ) -> Self {
        let role = match kind {
            RoleKind::Purchaser => Role::Purchaser(Purchaser::new(config.lifts, config.rounds, group)),
            RoleKind::Courier => Role::Courier(Courier::new(config.lifts, group)),
        };
        Self {
            rank,
            lamport: LamportClock::new(),
            board: LiftBoard::new(config.lifts),
            role,
            config,
            clock,
            dice,
        }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn board(&self) -> &LiftBoard {
        &self.board
    }

    pub fn lamport(&self) -> u64 {
        self.lamport.value()
    }

    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        if let Input::Deliver(envelope) = &input {
            self.lamport.observe(envelope.clock);
            self.apply(envelope);
        }

        let mut step = Step::new(
            self.rank,
            &mut self.lamport,
            &self.clock,
            &self.dice,
            &self.config,
        );
        match (&mut self.role, input) {
            (Role::Purchaser(p), Input::Start) => p.start(&mut step),
            (Role::Courier(c), Input::Start) => c.start(&mut step),
            (Role::Purchaser(p), Input::Timer(id)) => p.on_timer(&mut step, &self.board, id),
            (Role::Courier(c), Input::Timer(id)) => c.on_timer(&mut step, &self.board, id),
            (Role::Purchaser(p), Input::Deliver(envelope)) => {
                p.on_message(&mut step, &envelope);
                p.evaluate(&mut step, &self.board);
            }
            (Role::Courier(c), Input::Deliver(envelope)) => {
                c.on_message(&mut step, &envelope);
                c.evaluate(&mut step, &self.board);
            }
        }
        step.into_effects()
    }

    /// Apply the lift-state content of a message to the local replica
    fn apply(&mut self, envelope: &Envelope) {
        let from = envelope.from;
        let stamp = envelope.stamp();
        let result = match &envelope.message {
            Message::Claim { lift, .. } => self.board.claim(*lift, from).map(|()| None),
            Message::OrdersSubmitted { lift, orders } => {
                self.board.submit_orders(*lift, from, orders, stamp)
            }
            Message::PickedUp { lift, order } => self.board.pick_up(*lift, from, order, stamp),
            Message::Delivered { lift, packages } => {
                self.board.deliver(*lift, from, packages, stamp)
            }
            _ => Ok(None),
        };
        let queue = envelope.message.kind();
        match result {
            Ok(Some(phase)) => {
                if let Some(lift) = envelope.message.lift() {
                    tracing::debug!(rank = %self.rank, %lift, %phase, %stamp, ?queue, "lift phase");
                }
            }
            Ok(None) => {}
            Err(violation) => {
                tracing::warn!(
                    rank = %self.rank,
                    %from,
                    message = envelope.message.name(),
                    ?queue,
                    %violation,
                    "replica rejected message"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
