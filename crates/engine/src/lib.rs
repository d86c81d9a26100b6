// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Hoist execution engine: runs protocol nodes as tokio tasks

mod cluster;
mod error;
mod executor;
mod runtime;
mod termination;

pub use cluster::{Cluster, ClusterReport};
pub use error::RuntimeError;
pub use executor::{ExecuteError, Executor};
pub use runtime::{Process, ProcessReport, ProcessStats};
pub use termination::TerminationDetector;
