// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use std::fmt;
use std::time::Duration;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct HoistError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl HoistError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for HoistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HoistError {}

/// Builders for the ways a run can fail
impl HoistError {
    /// The simulator ran out of messages and timers before every purchaser finished
    pub fn stalled(completed: usize, expected: usize, steps: usize) -> Self {
        HoistError::new("Run stalled before every purchaser completed")
            .with_context(format!(
                "{} of {} purchasers completed after {} steps",
                completed, expected, steps
            ))
            .with_suggestion("Re-run with --log-level debug to see the last admissions")
            .with_suggestion("Try another seed: hoist run --sim --seed <N>")
    }

    pub fn step_limit(limit: usize) -> Self {
        HoistError::new(format!("Simulation exceeded {} steps", limit))
            .with_context("Large clusters with many rounds need more steps")
            .with_suggestion("Raise the limit: hoist run --sim --max-steps <N>")
    }

    pub fn timed_out(timeout: Duration) -> Self {
        HoistError::new(format!(
            "Live run did not complete within {}",
            humantime::format_duration(timeout)
        ))
        .with_context("Default timings are slow; each round takes several seconds")
        .with_suggestion("Raise the limit: hoist run --timeout 5m")
        .with_suggestion("Use the quick timings: hoist run --fast")
    }

    /// A safety property failed on the simulated journal
    pub fn check_failed(failure: impl fmt::Display, seed: u64) -> Self {
        HoistError::new(format!("Safety check failed: {}", failure))
            .with_context(format!("Simulation seed {}", seed))
            .with_suggestion(format!(
                "Reproduce with: hoist run --sim --seed {} --log-level debug",
                seed
            ))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
