// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects requested by the protocol state machines
//!
//! Nodes never touch the transport or the timer wheel directly. They return
//! effects and the engine (or the simulator) carries them out.

use crate::id::{LiftKey, Rank};
use crate::lamport::Envelope;
use crate::message::QueueKind;
use crate::traced::TracedEffect;
use std::fmt;
use std::time::Duration;

/// Timers a node can arm
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerId {
    /// Delay before the first request
    Startup,
    /// Re-evaluate admission for a queue family
    Poll(QueueKind),
    /// Close the departure window of a lift
    Departure(LiftKey),
    /// Courier finished preparing the order it picked up
    Prepare,
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerId::Startup => f.write_str("startup"),
            TimerId::Poll(kind) => write!(f, "poll:{}", kind),
            TimerId::Departure(lift) => write!(f, "departure:{}", lift),
            TimerId::Prepare => f.write_str("prepare"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Unicast an already-stamped envelope
    Send { to: Rank, envelope: Envelope },
    /// Deliver an already-stamped envelope to every process, sender included
    Broadcast { envelope: Envelope },
    /// Arm (or re-arm) a timer
    SetTimer { id: TimerId, duration: Duration },
    /// Disarm a timer
    CancelTimer { id: TimerId },
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Send { .. } => "send",
            Effect::Broadcast { .. } => "broadcast",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Send { to, envelope } => vec![
                ("to", to.to_string()),
                ("message", envelope.message.name().to_string()),
                ("clock", envelope.clock.to_string()),
            ],
            Effect::Broadcast { envelope } => vec![
                ("message", envelope.message.name().to_string()),
                ("clock", envelope.clock.to_string()),
            ],
            Effect::SetTimer { id, duration } => vec![
                ("timer", id.to_string()),
                ("duration_ms", duration.as_millis().to_string()),
            ],
            Effect::CancelTimer { id } => vec![("timer", id.to_string())],
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
