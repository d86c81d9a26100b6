// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use hoist_adapters::{Transport, TransportError};
use hoist_core::{Clock, Effect, Scheduler, TimerId};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::Instrument;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Executes one process's effects through its transport and timer wheel
pub struct Executor<T, C> {
    transport: T,
    scheduler: Arc<Mutex<Scheduler<TimerId>>>,
    clock: C,
}

impl<T, C> Executor<T, C>
where
    T: Transport,
    C: Clock,
{
    /// Create a new executor
    pub fn new(transport: T, scheduler: Arc<Mutex<Scheduler<TimerId>>>, clock: C) -> Self {
        Self {
            transport,
            scheduler,
            clock,
        }
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Result<(), ExecuteError> {
        use hoist_core::TracedEffect;

        let span = tracing::info_span!(
            "effect",
            rank = %self.transport.rank(),
            effect = effect.name()
        );
        async move {
            tracing::info!(fields = ?effect.fields(), "executing");
            let result = self.execute_inner(effect).await;
            if let Err(e) = &result {
                tracing::debug!(error = %e, "failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Inner execution logic for a single effect
    async fn execute_inner(&self, effect: Effect) -> Result<(), ExecuteError> {
        match effect {
            // TracedTransport handles logging and precondition validation
            Effect::Send { to, envelope } => self.transport.send(to, envelope).await?,
            Effect::Broadcast { envelope } => self.transport.broadcast(envelope).await?,

            Effect::SetTimer { id, duration } => {
                let now = self.clock.now();
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .set_timer(id, duration, now);
            }

            Effect::CancelTimer { id } => {
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .cancel_timer(&id);
            }
        }
        Ok(())
    }

    /// Execute multiple effects in order
    ///
    /// Sends to peers that have already shut down are skipped; any other
    /// failure stops the batch.
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Result<(), ExecuteError> {
        for effect in effects {
            match self.execute(effect).await {
                Ok(()) | Err(ExecuteError::Transport(TransportError::Closed(_))) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Timers due now, in deadline order
    pub fn fired_timers(&self) -> Vec<TimerId> {
        let now = self.clock.now();
        self.scheduler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fired_timers(now)
    }

    /// Get a reference to the scheduler
    pub fn scheduler(&self) -> Arc<Mutex<Scheduler<TimerId>>> {
        Arc::clone(&self.scheduler)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
