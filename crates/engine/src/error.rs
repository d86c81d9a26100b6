// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use crate::ExecuteError;
use hoist_core::{ConfigError, Rank, RoleError};
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("mailbox of {0} closed before the run completed")]
    MailboxClosed(Rank),
    #[error("process task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("invalid membership: {0}")]
    Roles(#[from] RoleError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("ranks must run from 0 to {0} without gaps")]
    NonContiguous(usize),
}
