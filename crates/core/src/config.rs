// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol configuration
//!
//! Loaded from TOML; every field has a default so a partial file works.
//!
//! ```toml
//! lifts = 4
//! capacity = 5
//! purchaser_poll = "1s"
//!
//! [purchaser_window]
//! min = "3s"
//! max = "6s"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bounds of a randomized departure window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(with = "humantime_serde")]
    pub min: Duration,
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl WindowConfig {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Millisecond bounds for a dice roll
    pub fn millis(&self) -> std::ops::RangeInclusive<u64> {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        min..=max.max(min)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Number of lifts, keyed `1..=lifts`
    pub lifts: u32,
    /// Capacity of one transit, in order quantity units
    pub capacity: u32,
    /// Orders each purchaser places before signalling completion
    pub rounds: u32,
    /// Delay before a process sends its first request
    #[serde(with = "humantime_serde")]
    pub startup_delay: Duration,
    /// Purchaser admission re-evaluation interval
    #[serde(with = "humantime_serde")]
    pub purchaser_poll: Duration,
    /// Courier admission re-evaluation interval
    #[serde(with = "humantime_serde")]
    pub courier_poll: Duration,
    /// Time a courier spends preparing each order it picks up
    #[serde(with = "humantime_serde")]
    pub prepare_time: Duration,
    pub purchaser_window: WindowConfig,
    pub courier_window: WindowConfig,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            lifts: 4,
            capacity: 5,
            rounds: 1,
            startup_delay: Duration::from_secs(1),
            purchaser_poll: Duration::from_secs(1),
            courier_poll: Duration::from_millis(500),
            prepare_time: Duration::from_millis(500),
            purchaser_window: WindowConfig::new(Duration::from_secs(3), Duration::from_secs(6)),
            courier_window: WindowConfig::new(
                Duration::from_millis(300),
                Duration::from_millis(600),
            ),
        }
    }
}

impl ProtocolConfig {
    /// Load from a TOML file and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Timings scaled down for tests and quick demos
    pub fn fast() -> Self {
        Self {
            startup_delay: Duration::from_millis(5),
            purchaser_poll: Duration::from_millis(10),
            courier_poll: Duration::from_millis(5),
            prepare_time: Duration::from_millis(5),
            purchaser_window: WindowConfig::new(
                Duration::from_millis(20),
                Duration::from_millis(40),
            ),
            courier_window: WindowConfig::new(
                Duration::from_millis(10),
                Duration::from_millis(20),
            ),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lifts == 0 {
            return Err(ConfigError::Invalid("lifts must be at least 1".into()));
        }
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.rounds == 0 {
            return Err(ConfigError::Invalid("rounds must be at least 1".into()));
        }
        if self.purchaser_poll.is_zero() || self.courier_poll.is_zero() {
            return Err(ConfigError::Invalid("poll intervals must be non-zero".into()));
        }
        for (name, window) in [
            ("purchaser_window", self.purchaser_window),
            ("courier_window", self.courier_window),
        ] {
            if window.min > window.max {
                return Err(ConfigError::Invalid(format!(
                    "{name}: min {:?} exceeds max {:?}",
                    window.min, window.max
                )));
            }
        }
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
