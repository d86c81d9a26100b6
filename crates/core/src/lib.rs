// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! hoist-core: the lift-sharing protocol as pure state machines
//!
//! This crate provides:
//! - Lamport clocks, stamped envelopes and wire messages
//! - Replicated lift state and per-lift request queues
//! - Quorum-acknowledged admission and ride-sharing consolidation
//! - Purchaser and courier roles behind an effect-returning `Node`
//! - A deterministic simulator that checks the protocol's safety properties

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod dice;
pub mod id;
pub mod lamport;
pub mod message;
pub mod order;
pub mod phase;
pub mod traced;

// Replicated state (order matters for dependencies)
pub mod board;
pub mod queue;
pub mod scheduler;

// Protocol
pub mod admission;
pub mod courier;
pub mod effect;
pub mod node;
pub mod purchaser;
pub mod rideshare;
pub mod roles;
pub mod sim;
pub mod step;

// Re-exports
pub use board::{LiftBoard, Violation};
pub use clock::{Clock, Countdown, FakeClock, SystemClock};
pub use config::{ConfigError, ProtocolConfig, WindowConfig};
pub use dice::{Dice, ScriptedDice, SeededDice, ThreadDice};
pub use effect::{Effect, TimerId};
pub use id::{LiftKey, Rank};
pub use lamport::{Envelope, LamportClock, Stamp};
pub use message::{LiftScope, Message, QueueKind};
pub use node::{Input, Node, Role, RoleKind};
pub use order::{Order, Package};
pub use phase::Phase;
pub use roles::{assign_roles, Membership, RoleError};
pub use scheduler::Scheduler;
pub use sim::{CheckFailure, Delivery, RunSummary, SimError, SimReport, SimSetup, Simulation};
pub use traced::TracedEffect;
