//! The simulation clock.
//!
//! A `Clock` owns the current simulation time and advances it in fixed
//! steps until a configured horizon is reached. The simulator's tick loop is
//! the only place that mutates it; connections and devices only read it.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};
use crate::types::SimTime;

/// Relative tolerance (in units of `step_size`) used when comparing the
/// current time against the horizon.
const HORIZON_TOLERANCE: f64 = 1.0e-9;

/// Fixed-step simulation clock.
///
/// Time is computed as `start + ticks * step_size` rather than accumulated,
/// so long runs do not drift. `running` is true while `time < horizon`.
///
/// # Example
///
/// ```rust
/// use lasersim::Clock;
///
/// let mut clock = Clock::new(0.5).unwrap();
/// clock.configure(1.0, None).unwrap();
///
/// clock.advance();
/// assert!(clock.is_running());
/// clock.advance();
/// assert!(!clock.is_running());
/// assert_eq!(clock.time(), 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    step_size: SimTime,
    start: SimTime,
    ticks: u64,
    horizon: SimTime,
    running: bool,
}

impl Clock {
    /// Creates a clock with the given step size, starting at time 0.
    ///
    /// The horizon starts at one step, matching a clock that has not been
    /// configured yet; call [`Clock::configure`] to set the real one.
    pub fn new(step_size: SimTime) -> ConfigResult<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(ConfigError::NonPositiveStepSize(step_size));
        }
        Ok(Self {
            step_size,
            start: 0.0,
            ticks: 0,
            horizon: step_size,
            running: true,
        })
    }

    /// Sets the terminal time and optionally moves the current time.
    pub fn configure(&mut self, horizon: SimTime, start_time: Option<SimTime>) -> ConfigResult<()> {
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(ConfigError::NonPositiveHorizon(horizon));
        }
        self.horizon = horizon;
        if let Some(start) = start_time {
            self.start = start;
            self.ticks = 0;
        }
        self.running = !self.reached_horizon();
        Ok(())
    }

    /// Marks the clock as running again, optionally rewinding to time 0.
    pub fn reset(&mut self, rewind_to_zero: bool) {
        if rewind_to_zero {
            self.start = 0.0;
            self.ticks = 0;
        }
        self.running = true;
    }

    /// Advances the clock by one step.
    ///
    /// Once the horizon is reached the clock stops and further calls leave
    /// the time untouched.
    pub fn advance(&mut self) {
        if self.reached_horizon() {
            self.running = false;
            return;
        }
        self.ticks += 1;
        if self.reached_horizon() {
            self.running = false;
        }
    }

    fn reached_horizon(&self) -> bool {
        self.time() >= self.horizon - self.step_size * HORIZON_TOLERANCE
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> SimTime {
        self.start + self.ticks as f64 * self.step_size
    }

    /// Returns the fixed step size.
    pub fn step_size(&self) -> SimTime {
        self.step_size
    }

    /// Returns the configured horizon.
    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    /// Returns the number of steps taken since the last rewind.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns whether the clock has not yet reached its horizon.
    pub fn is_running(&self) -> bool {
        self.running
    }
}
