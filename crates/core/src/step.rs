// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-input context handed to role handlers
//!
//! A `Step` collects the effects produced while handling one input and
//! stamps every outgoing message with the process's Lamport clock.

use crate::clock::Clock;
use crate::config::ProtocolConfig;
use crate::dice::Dice;
use crate::effect::{Effect, TimerId};
use crate::id::Rank;
use crate::lamport::{Envelope, LamportClock, Stamp};
use crate::message::Message;
use std::time::Duration;

pub struct Step<'a, C, D> {
    pub rank: Rank,
    pub clock: &'a C,
    pub dice: &'a D,
    pub config: &'a ProtocolConfig,
    lamport: &'a mut LamportClock,
    effects: Vec<Effect>,
}

impl<'a, C: Clock, D: Dice> Step<'a, C, D> {
    pub fn new(
        rank: Rank,
        lamport: &'a mut LamportClock,
        clock: &'a C,
        dice: &'a D,
        config: &'a ProtocolConfig,
    ) -> Self {
        Self {
            rank,
            clock,
            dice,
            config,
            lamport,
            effects: Vec::new(),
        }
    }

    fn stamp(&mut self, message: Message) -> Envelope {
        Envelope {
            from: self.rank,
            clock: self.lamport.tick(),
            message,
        }
    }

    /// Unicast `message`; returns the send stamp
    pub fn send(&mut self, to: Rank, message: Message) -> Stamp {
        let envelope = self.stamp(message);
        let stamp = envelope.stamp();
        self.effects.push(Effect::Send { to, envelope });
        stamp
    }

    /// Broadcast `message` to every process; returns the send stamp
    pub fn broadcast(&mut self, message: Message) -> Stamp {
        let envelope = self.stamp(message);
        let stamp = envelope.stamp();
        self.effects.push(Effect::Broadcast { envelope });
        stamp
    }

    /// Stamp a local event such as creating an order
    pub fn local_stamp(&mut self) -> Stamp {
        Stamp::new(self.lamport.tick(), self.rank)
    }

    pub fn set_timer(&mut self, id: TimerId, duration: Duration) {
        self.effects.push(Effect::SetTimer { id, duration });
    }

    pub fn cancel_timer(&mut self, id: TimerId) {
        self.effects.push(Effect::CancelTimer { id });
    }

    /// Roll an order quantity in `1..=capacity`
    pub fn roll_quantity(&self) -> u32 {
        let capacity = u64::from(self.config.capacity.max(1));
        self.dice.roll(1..=capacity) as u32
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}
