// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic time for departure windows, polling and preparation delays
//!
//! Every duration the protocol measures is measured against the local
//! process's own monotonic clock. Nothing compares instants taken on
//! different processes.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that provides the current monotonic time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
}

/// Real system clock
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Fake clock for tests and the deterministic simulator
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }

    /// Move the clock forward to `instant`; earlier instants are ignored
    pub fn advance_to(&self, instant: Instant) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if instant > *current {
            *current = instant;
        }
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A countdown started on the local clock
///
/// Departure windows are countdowns: open for `length` after `started`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    started: Instant,
    length: Duration,
}

impl Countdown {
    pub fn start(clock: &impl Clock, length: Duration) -> Self {
        Self {
            started: clock.now(),
            length,
        }
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self, clock: &impl Clock) -> Duration {
        self.length
            .saturating_sub(clock.now().saturating_duration_since(self.started))
    }

    pub fn is_open(&self, clock: &impl Clock) -> bool {
        !self.remaining(clock).is_zero()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
