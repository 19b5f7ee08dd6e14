//! Fixed optical delay line.
//!
//! A `DelayLine` holds the last `size` field samples in a FIFO. Each push
//! returns the sample that entered `size` pushes earlier, or
//! [`EMPTY_FIELD`] while the line is still filling.

use std::collections::VecDeque;

use crate::config::{ConfigError, ConfigResult};
use crate::types::{Field, SimTime, EMPTY_FIELD};

/// Longest delay a line may hold, in samples.
pub const MAX_DELAY_SAMPLES: usize = 1 << 24;

/// Samples reserved up front; longer lines grow as they fill.
const PREALLOCATED_SAMPLES: usize = 4096;

/// A sample-count delay built from a time delay and the clock step.
///
/// # Example
///
/// ```rust
/// use lasersim::devices::DelayLine;
/// use lasersim::types::EMPTY_FIELD;
/// use num_complex::Complex64;
///
/// // 3 ps of delay at 1 ps per tick holds three samples.
/// let mut line = DelayLine::new(3.0e-12, 1.0e-12).unwrap();
/// assert_eq!(line.size(), 3);
///
/// for k in 0..3 {
///     assert_eq!(line.push(Complex64::new(k as f64, 0.0)), EMPTY_FIELD);
/// }
/// assert_eq!(line.push(Complex64::new(3.0, 0.0)), Complex64::new(0.0, 0.0));
/// assert_eq!(line.push(Complex64::new(4.0, 0.0)), Complex64::new(1.0, 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct DelayLine {
    delay: SimTime,
    size: usize,
    buffer: VecDeque<Field>,
    pushed: u64,
}

impl DelayLine {
    /// Creates a line of `max(1, round(delay / step_size))` samples.
    ///
    /// Fails for a non-positive or non-finite step, a negative or
    /// non-finite delay, or more than [`MAX_DELAY_SAMPLES`] samples.
    pub fn new(delay: SimTime, step_size: SimTime) -> ConfigResult<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(ConfigError::NonPositiveStepSize(step_size));
        }
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "delay must be non-negative and finite, got {delay}"
            )));
        }
        let samples = (delay / step_size).round();
        if samples > MAX_DELAY_SAMPLES as f64 {
            return Err(ConfigError::Validation(format!(
                "delay of {samples} samples exceeds the limit of {MAX_DELAY_SAMPLES}"
            )));
        }
        let size = (samples as usize).max(1);
        Ok(Self {
            delay,
            size,
            buffer: VecDeque::with_capacity(size.min(PREALLOCATED_SAMPLES) + 1),
            pushed: 0,
        })
    }

    /// Configured delay in seconds.
    pub fn delay(&self) -> SimTime {
        self.delay
    }

    /// Delay in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples currently held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the line has filled and now emits real samples.
    pub fn is_primed(&self) -> bool {
        self.buffer.len() >= self.size
    }

    /// Appends `sample` and returns the sample leaving the line.
    pub fn push(&mut self, sample: Field) -> Field {
        self.pushed += 1;
        self.buffer.push_back(sample);
        if self.buffer.len() > self.size {
            self.buffer.pop_front().unwrap_or(EMPTY_FIELD)
        } else {
            EMPTY_FIELD
        }
    }

    /// Empties the line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pushed = 0;
    }

    /// Returns statistics about the line.
    pub fn stats(&self) -> serde_json::Value {
        serde_json::json!({
            "delay": self.delay,
            "size": self.size,
            "held": self.buffer.len(),
            "pushed": self.pushed,
        })
    }
}
