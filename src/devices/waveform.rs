//! Arbitrary waveforms and the generator that holds them.
//!
//! A waveform is a function of time. It can be periodic (time is wrapped
//! into `[0, period)` before evaluation) and carries a center and half-width
//! used by the pulse shapes.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::types::SimTime;

/// Shape of a waveform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Waveform {
    /// Constant level
    Constant(f64),
    /// Rectangular pulse of `amplitude` within `center ± half_width`
    Pulse { amplitude: f64 },
    /// Gaussian pulse at `center` with standard deviation `half_width`
    Gaussian { amplitude: f64 },
    /// `high` for the first `duty` fraction of each period, `low` after
    Square { high: f64, low: f64, duty: f64 },
    /// `bias + amplitude * sin(2π f t)`
    Sine { amplitude: f64, frequency: f64, bias: f64 },
    /// `before` until `center`, `after` from then on
    Step { before: f64, after: f64 },
}

/// A named waveform with optional periodic wrapping.
///
/// # Example
///
/// ```rust
/// use lasersim::devices::{ArbitraryWave, Waveform};
///
/// let clockish = ArbitraryWave::new("gate", Waveform::Square { high: 1.0, low: 0.0, duty: 0.5 })
///     .with_period(1.0e-9);
/// assert_eq!(clockish.value(0.2e-9), 1.0);
/// assert_eq!(clockish.value(1.7e-9), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArbitraryWave {
    pub name: String,
    pub shape: Waveform,
    pub period: Option<SimTime>,
    pub center: SimTime,
    pub half_width: SimTime,
}

impl ArbitraryWave {
    pub fn new(name: impl Into<String>, shape: Waveform) -> Self {
        Self {
            name: name.into(),
            shape,
            period: None,
            center: 0.0,
            half_width: 0.5,
        }
    }

    /// Shorthand for a constant level.
    pub fn constant(name: impl Into<String>, level: f64) -> Self {
        Self::new(name, Waveform::Constant(level))
    }

    /// Wraps time into `[0, period)` before evaluating.
    pub fn with_period(mut self, period: SimTime) -> Self {
        self.period = (period > 0.0).then_some(period);
        self
    }

    /// Sets the pulse center and total spread (the half width is half of it).
    pub fn with_window(mut self, center: SimTime, total_spread: SimTime) -> Self {
        self.center = center;
        self.half_width = 0.5 * total_spread;
        self
    }

    /// Evaluates the waveform at time `t`.
    pub fn value(&self, t: SimTime) -> f64 {
        let t = match self.period {
            Some(period) => t.rem_euclid(period),
            None => t,
        };

        match self.shape {
            Waveform::Constant(level) => level,
            Waveform::Pulse { amplitude } => {
                if (t - self.center).abs() <= self.half_width {
                    amplitude
                } else {
                    0.0
                }
            }
            Waveform::Gaussian { amplitude } => {
                if self.half_width <= 0.0 {
                    return 0.0;
                }
                let z = (t - self.center) / self.half_width;
                amplitude * (-0.5 * z * z).exp()
            }
            Waveform::Square { high, low, duty } => match self.period {
                Some(period) if t >= duty * period => low,
                _ => high,
            },
            Waveform::Sine {
                amplitude,
                frequency,
                bias,
            } => bias + amplitude * (2.0 * PI * frequency * t).sin(),
            Waveform::Step { before, after } => {
                if t < self.center {
                    before
                } else {
                    after
                }
            }
        }
    }
}

/// A bank of named waveforms.
#[derive(Clone, Debug, Default)]
pub struct ArbitraryWaveGenerator {
    waves: Vec<ArbitraryWave>,
}

impl ArbitraryWaveGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds waves, replacing any existing wave with the same name.
    pub fn set(&mut self, waves: impl IntoIterator<Item = ArbitraryWave>) {
        for wave in waves {
            match self.waves.iter_mut().find(|w| w.name == wave.name) {
                Some(existing) => *existing = wave,
                None => self.waves.push(wave),
            }
        }
    }

    /// Removes every wave.
    pub fn clear(&mut self) {
        self.waves.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.waves.iter().any(|w| w.name == name)
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Value of the named wave at `t`, or 0 for an unknown name.
    pub fn sample(&self, name: &str, t: SimTime) -> f64 {
        self.waves
            .iter()
            .find(|w| w.name == name)
            .map_or(0.0, |w| w.value(t))
    }

    /// Sum of every wave at `t`.
    pub fn sum(&self, t: SimTime) -> f64 {
        self.waves.iter().map(|w| w.value(t)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let wave = ArbitraryWave::constant("dc", 0.025);
        assert_eq!(wave.value(0.0), 0.025);
        assert_eq!(wave.value(1.0e-6), 0.025);
    }

    #[test]
    fn test_pulse_window() {
        let wave = ArbitraryWave::new("pulse", Waveform::Pulse { amplitude: 2.0 })
            .with_period(10.0)
            .with_window(5.0, 2.0);

        assert_eq!(wave.value(5.0), 2.0);
        assert_eq!(wave.value(4.0), 2.0);
        assert_eq!(wave.value(3.0), 0.0);
        assert_eq!(wave.value(15.5), 2.0);
    }

    #[test]
    fn test_gaussian_peak() {
        let wave = ArbitraryWave::new("g", Waveform::Gaussian { amplitude: 1.0 }).with_window(1.0, 0.4);
        assert_eq!(wave.value(1.0), 1.0);
        assert!(wave.value(1.2) < 1.0);
        assert!((wave.value(1.2) - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_square_duty() {
        let wave = ArbitraryWave::new("sq", Waveform::Square { high: 1.0, low: -1.0, duty: 0.25 })
            .with_period(4.0);
        assert_eq!(wave.value(0.5), 1.0);
        assert_eq!(wave.value(1.5), -1.0);
        assert_eq!(wave.value(4.5), 1.0);
    }

    #[test]
    fn test_sine() {
        let wave = ArbitraryWave::new(
            "s",
            Waveform::Sine {
                amplitude: 2.0,
                frequency: 1.0,
                bias: 1.0,
            },
        );
        assert!((wave.value(0.25) - 3.0).abs() < 1e-12);
        assert!((wave.value(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_step() {
        let wave = ArbitraryWave::new("turn_on", Waveform::Step { before: 0.0, after: 0.02 })
            .with_window(1.0e-9, 0.0);
        assert_eq!(wave.value(0.5e-9), 0.0);
        assert_eq!(wave.value(1.0e-9), 0.02);
        assert_eq!(wave.value(3.0e-9), 0.02);
    }

    #[test]
    fn test_generator() {
        let mut awg = ArbitraryWaveGenerator::new();
        awg.set([ArbitraryWave::constant("a", 1.0), ArbitraryWave::constant("b", 2.0)]);
        awg.set([ArbitraryWave::constant("a", 3.0)]);

        assert_eq!(awg.len(), 2);
        assert_eq!(awg.sample("a", 0.0), 3.0);
        assert_eq!(awg.sample("b", 0.0), 2.0);
        assert_eq!(awg.sample("missing", 0.0), 0.0);
        assert_eq!(awg.sum(0.0), 5.0);

        awg.clear();
        assert!(awg.is_empty());
    }
}
