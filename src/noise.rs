//! Noise sources injected into the rate equations.
//!
//! A noise source is anything that yields one `f64` per call. The laser
//! draws one sample per equation per tick.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::config::{ConfigError, ConfigResult};

/// A per-equation noise term.
pub trait NoiseSource {
    /// Draws the next noise sample.
    fn sample(&mut self) -> f64;
}

impl<F: FnMut() -> f64> NoiseSource for F {
    fn sample(&mut self) -> f64 {
        self()
    }
}

/// Deterministic zero noise.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn sample(&mut self) -> f64 {
        0.0
    }
}

/// Gaussian Langevin noise with a reproducible seed.
///
/// # Example
///
/// ```rust
/// use lasersim::noise::{LangevinNoise, NoiseSource};
///
/// let mut a = LangevinNoise::new(0.0, 1.0, 7).unwrap();
/// let mut b = LangevinNoise::new(0.0, 1.0, 7).unwrap();
/// assert_eq!(a.sample(), b.sample());
/// ```
#[derive(Clone, Debug)]
pub struct LangevinNoise {
    distribution: Normal<f64>,
    seed: u64,
    rng: StdRng,
}

impl LangevinNoise {
    /// Creates a noise source with the given mean, standard deviation and seed.
    pub fn new(mean: f64, std_dev: f64, seed: u64) -> ConfigResult<Self> {
        let distribution = Normal::new(mean, std_dev)
            .map_err(|e| ConfigError::Distribution(format!("langevin noise: {e}")))?;
        Ok(Self {
            distribution,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn mean(&self) -> f64 {
        self.distribution.mean()
    }

    pub fn std_dev(&self) -> f64 {
        self.distribution.std_dev()
    }

    /// Restarts the sample sequence from the original seed.
    pub fn reseed(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

impl NoiseSource for LangevinNoise {
    fn sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}
