//! Configuration types for the simulation framework.
//!
//! The simulator itself consumes a step size / horizon pair and numeric
//! device parameters. This module holds the serde-friendly description of
//! those values and the error type raised when they are invalid. Loading
//! them from disk is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use lasersim::config::SimConfigBuilder;
//!
//! let config = SimConfigBuilder::new()
//!     .step_size(1.0e-12)
//!     .horizon(1.0e-9)
//!     .record(true)
//!     .build()
//!     .unwrap();
//!
//! let clock = config.build_clock().unwrap();
//! assert_eq!(clock.step_size(), 1.0e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::clock::Clock;
use crate::types::SimTime;

/// Errors that can occur while configuring a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("step size must be positive and finite, got {0}")]
    NonPositiveStepSize(f64),

    #[error("horizon must be positive and finite, got {0}")]
    NonPositiveHorizon(f64),

    #[error("missing constant: {0}")]
    MissingConstant(String),

    #[error("connection needs at least one downstream component")]
    EmptyDownstream,

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Global run parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed time step in seconds
    #[serde(default = "default_step_size")]
    pub step_size: SimTime,

    /// Final simulation time in seconds
    #[serde(default = "default_horizon")]
    pub horizon: SimTime,

    /// Optional start time (defaults to 0)
    #[serde(default)]
    pub start_time: Option<SimTime>,

    /// Whether the simulator records its time axis
    #[serde(default)]
    pub record: bool,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_step_size() -> SimTime {
    1.0e-12
}

fn default_horizon() -> SimTime {
    1.0e-9
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_size: default_step_size(),
            horizon: default_horizon(),
            start_time: None,
            record: false,
            log_level: default_log_level(),
        }
    }
}

impl SimConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a [`SimConfigBuilder`].
    pub fn builder() -> SimConfigBuilder {
        SimConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(ConfigError::NonPositiveStepSize(self.step_size));
        }
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(ConfigError::NonPositiveHorizon(self.horizon));
        }
        if let Some(start) = self.start_time {
            if !start.is_finite() || start < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "start time must be non-negative, got {start}"
                )));
            }
        }
        Ok(())
    }

    /// Number of ticks a run with this configuration executes.
    pub fn tick_count(&self) -> u64 {
        let span = self.horizon - self.start_time.unwrap_or(0.0);
        if span <= 0.0 {
            return 0;
        }
        (span / self.step_size - 1.0e-9).ceil() as u64
    }

    /// Builds a configured clock from these parameters.
    pub fn build_clock(&self) -> ConfigResult<Clock> {
        self.validate()?;
        let mut clock = Clock::new(self.step_size)?;
        clock.configure(self.horizon, self.start_time)?;
        Ok(clock)
    }
}

/// Builder for creating `SimConfig` programmatically.
#[derive(Default)]
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_size(mut self, step_size: SimTime) -> Self {
        self.config.step_size = step_size;
        self
    }

    pub fn horizon(mut self, horizon: SimTime) -> Self {
        self.config.horizon = horizon;
        self
    }

    pub fn start_time(mut self, start_time: SimTime) -> Self {
        self.config.start_time = Some(start_time);
        self
    }

    pub fn record(mut self, record: bool) -> Self {
        self.config.record = record;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> ConfigResult<SimConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Read-only `key -> f64` lookup for physical constants.
///
/// Populated by whatever loader the caller uses (it deserializes from a
/// plain JSON object); the simulator only reads it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstantTable {
    values: HashMap<String, f64>,
}

impl ConstantTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a constant.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Returns the constant, or `default` when absent.
    pub fn get(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    /// Returns the constant, failing when it is absent.
    pub fn require(&self, key: &str) -> ConfigResult<f64> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| ConfigError::MissingConstant(key.to_string()))
    }

    /// Returns whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for ConstantTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
