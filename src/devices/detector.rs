//! Single-photon detectors.
//!
//! A detector turns the incident field into an intensity `|E|²` and, when
//! counting is on, into a photon count: the number of incident photons is
//! drawn from a Poisson distribution with the intensity as mean, and each
//! photon is registered with probability `η` (a binomial thinning).
//!
//! Sampling uses a seeded `StdRng` so runs are reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution, Poisson};

use crate::component::{Recordable, Resettable, Steppable};
use crate::config::{ConfigError, ConfigResult};
use crate::constants::LaserConstants;
use crate::port::{Port, PortBundle, PortSet, PortValue};
use crate::record::Recorder;
use crate::types::{Field, EMPTY_FIELD};

/// Default seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Photon counting shared by every detector flavour.
#[derive(Clone, Debug)]
struct PhotonCounter {
    efficiency: f64,
    counting: bool,
    seed: u64,
    rng: StdRng,
}

impl PhotonCounter {
    fn new(efficiency: f64, seed: u64) -> ConfigResult<Self> {
        if !(0.0..=1.0).contains(&efficiency) {
            return Err(ConfigError::Validation(format!(
                "detector efficiency must lie in [0, 1], got {efficiency}"
            )));
        }
        Ok(Self {
            efficiency,
            counting: true,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn reseed(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// Draws a registered photon count for a mean of `intensity` photons.
    fn count(&mut self, intensity: f64) -> u64 {
        if !self.counting || !intensity.is_finite() || intensity <= 0.0 {
            return 0;
        }
        let incident = match Poisson::new(intensity) {
            Ok(poisson) => {
                let drawn: f64 = poisson.sample(&mut self.rng);
                drawn as u64
            }
            Err(e) => {
                tracing::warn!(intensity, error = %e, "poisson sampling failed");
                return 0;
            }
        };
        match Binomial::new(incident, self.efficiency) {
            Ok(binomial) => binomial.sample(&mut self.rng),
            Err(e) => {
                tracing::warn!(incident, error = %e, "binomial sampling failed");
                0
            }
        }
    }
}

/// Detector registering `|E|²`.
///
/// # Example
///
/// ```rust
/// use lasersim::devices::SinglePhotonDetector;
/// use num_complex::Complex64;
///
/// let mut spd = SinglePhotonDetector::new("spd", 0.5, 7, false).unwrap();
/// spd.detect(Complex64::new(3.0, 4.0));
/// assert_eq!(spd.intensity(), 25.0);
/// assert!(spd.photon_count() <= 100);
/// ```
#[derive(Clone, Debug)]
pub struct SinglePhotonDetector {
    name: String,
    counter: PhotonCounter,
    intensity: f64,
    photon_count: u64,
    recorder: Recorder,
}

impl SinglePhotonDetector {
    /// Fails when `efficiency` lies outside `[0, 1]`.
    pub fn new(
        name: impl Into<String>,
        efficiency: f64,
        seed: u64,
        record: bool,
    ) -> ConfigResult<Self> {
        Ok(Self {
            name: name.into(),
            counter: PhotonCounter::new(efficiency, seed)?,
            intensity: 0.0,
            photon_count: 0,
            recorder: Recorder::new(&[("intensity", "W/m^2"), ("photon_count", "counts")], record),
        })
    }

    /// Uses the quantum efficiency `η` of `constants`.
    pub fn from_constants(
        name: impl Into<String>,
        constants: &LaserConstants,
        seed: u64,
        record: bool,
    ) -> ConfigResult<Self> {
        Self::new(name, constants.eta, seed, record)
    }

    /// Turns photon counting on or off. Intensity is always computed.
    pub fn with_counting(mut self, counting: bool) -> Self {
        self.counter.counting = counting;
        self
    }

    pub fn efficiency(&self) -> f64 {
        self.counter.efficiency
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn photon_count(&self) -> u64 {
        self.photon_count
    }

    /// Registers one field sample.
    pub fn detect(&mut self, field: Field) {
        self.register(field.norm_sqr());
    }

    fn register(&mut self, intensity: f64) {
        self.intensity = intensity;
        self.photon_count = self.counter.count(intensity);
        self.recorder
            .store(&[self.intensity, self.photon_count as f64]);
    }

    fn clear(&mut self) {
        self.intensity = 0.0;
        self.photon_count = 0;
        self.counter.reseed();
        self.recorder.clear();
    }

    fn publish_into(&self, bundle: &mut PortBundle) {
        bundle.provide(PortValue::Intensity(self.intensity));
        bundle.provide(PortValue::PhotonCount(self.photon_count));
    }
}

impl Resettable for SinglePhotonDetector {
    fn reset(&mut self) {
        self.clear();
    }
}

impl Steppable for SinglePhotonDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare_inputs(&self) -> PortSet {
        PortSet::from([Port::ElectricField])
    }

    fn advance(&mut self, inputs: &PortBundle) {
        self.detect(inputs.electric_field.unwrap_or(EMPTY_FIELD));
    }

    fn publish(&self, bundle: &mut PortBundle) {
        self.publish_into(bundle);
    }
}

impl Recordable for SinglePhotonDetector {
    fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}

/// Detector that only registers the field component in phase with a
/// target phase: `max(|E|² cos(arg E - target), 0)`.
#[derive(Clone, Debug)]
pub struct PhaseSensitiveSpd {
    inner: SinglePhotonDetector,
    target_phase: f64,
}

impl PhaseSensitiveSpd {
    pub fn new(
        name: impl Into<String>,
        target_phase: f64,
        efficiency: f64,
        seed: u64,
        record: bool,
    ) -> ConfigResult<Self> {
        Ok(Self {
            inner: SinglePhotonDetector::new(name, efficiency, seed, record)?,
            target_phase,
        })
    }

    pub fn with_counting(mut self, counting: bool) -> Self {
        self.inner = self.inner.with_counting(counting);
        self
    }

    pub fn target_phase(&self) -> f64 {
        self.target_phase
    }

    pub fn set_target_phase(&mut self, target_phase: f64) {
        self.target_phase = target_phase;
    }

    pub fn intensity(&self) -> f64 {
        self.inner.intensity()
    }

    pub fn photon_count(&self) -> u64 {
        self.inner.photon_count()
    }

    pub fn detect(&mut self, field: Field) {
        let projected = field.norm_sqr() * (field.arg() - self.target_phase).cos();
        self.inner.register(projected.max(0.0));
    }
}

impl Resettable for PhaseSensitiveSpd {
    fn reset(&mut self) {
        self.inner.clear();
    }
}

impl Steppable for PhaseSensitiveSpd {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn declare_inputs(&self) -> PortSet {
        self.inner.declare_inputs()
    }

    fn advance(&mut self, inputs: &PortBundle) {
        self.detect(inputs.electric_field.unwrap_or(EMPTY_FIELD));
    }

    fn publish(&self, bundle: &mut PortBundle) {
        self.inner.publish_into(bundle);
    }
}

impl Recordable for PhaseSensitiveSpd {
    fn recorder(&self) -> &Recorder {
        self.inner.recorder()
    }
}
