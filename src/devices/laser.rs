//! Semiconductor laser rate-equation model.
//!
//! The laser state is the carrier density `N`, the photon density `S` and
//! the optical phase `Φ`. Each tick the coupled rate equations are
//! integrated with one forward-Euler step:
//!
//! ```text
//! G     = g (N - N0) / (1 + ε S)
//! dN/dt = I / (q V) - N / τN - G S + Fn
//! dS/dt = Γ G S - S / τP + Γ β N / τN + Fs   [+ 2κ √(Sm S) cos(Δφ - Δω t)]
//! dΦ/dt = α/2 (Γ g (N - N0) - 1 / τP) + Fφ   [- κ √(Sm / S) sin(Δφ - Δω t)]
//! ```
//!
//! The bracketed injection terms apply once the laser has been locked to a
//! master with [`Laser::set_master`] and an injection field arrives on its
//! input. `Δφ = Φ - Φm` and `Δω = 2π (f - fm)`. After every step `N` and `S`
//! are clamped to [`FLOOR_EPSILON`].

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::component::{Recordable, Resettable, Steppable};
use crate::constants::{frequency_of, LaserConstants, UniversalConstants};
use crate::noise::{NoNoise, NoiseSource};
use crate::port::{InjectionField, Port, PortBundle, PortSet, PortValue};
use crate::record::Recorder;
use crate::types::{Field, SimTime, FLOOR_EPSILON};

/// Default emission wavelength (m).
pub const DEFAULT_WAVELENGTH: f64 = 1550.0e-9;

/// Carrier density, photon density and phase.
///
/// Also used for their time derivatives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaserState {
    pub carrier: f64,
    pub photon: f64,
    pub phase: f64,
}

impl LaserState {
    /// Complex field `sqrt(S) · exp(iΦ)`.
    pub fn field(&self) -> Field {
        Complex64::from_polar(self.photon.max(0.0).sqrt(), self.phase)
    }
}

/// A single-mode semiconductor laser.
///
/// # Example
///
/// ```rust
/// use lasersim::constants::LaserConstants;
/// use lasersim::devices::Laser;
///
/// let constants = LaserConstants::default();
/// let mut laser = Laser::new("master", constants);
///
/// let i = 1.4 * constants.threshold_current();
/// for tick in 0..1000 {
///     laser.step(i, None, tick as f64 * 1.0e-13, 1.0e-13);
/// }
/// assert!(laser.state().carrier > constants.n_transparent);
/// ```
pub struct Laser {
    name: String,
    constants: LaserConstants,
    frequency: f64,
    initial: LaserState,
    state: LaserState,
    current: f64,
    electric_field: Field,
    carrier_noise: Box<dyn NoiseSource>,
    photon_noise: Box<dyn NoiseSource>,
    phase_noise: Box<dyn NoiseSource>,
    master_detuning: Option<f64>,
    recorder: Recorder,
}

impl Laser {
    /// Creates a noiseless, unlocked laser at the transparency point.
    pub fn new(name: impl Into<String>, constants: LaserConstants) -> Self {
        let initial = LaserState {
            carrier: constants.n_transparent,
            photon: FLOOR_EPSILON,
            phase: FLOOR_EPSILON,
        };
        Self {
            name: name.into(),
            constants,
            frequency: frequency_of(DEFAULT_WAVELENGTH),
            initial,
            state: initial,
            current: 0.0,
            electric_field: initial.field(),
            carrier_noise: Box::new(NoNoise),
            photon_noise: Box::new(NoNoise),
            phase_noise: Box::new(NoNoise),
            master_detuning: None,
            recorder: Recorder::new(
                &[
                    ("current", "A"),
                    ("photon", "m^-3"),
                    ("carrier", "m^-3"),
                    ("phase", "rad"),
                ],
                false,
            ),
        }
    }

    /// Sets the emission wavelength (m).
    pub fn with_wavelength(mut self, wavelength: f64) -> Self {
        self.frequency = frequency_of(wavelength);
        self
    }

    /// Sets the state the laser starts from and returns to on reset.
    ///
    /// Densities are clamped to the positive floor.
    pub fn with_initial_state(mut self, initial: LaserState) -> Self {
        let initial = LaserState {
            carrier: initial.carrier.max(FLOOR_EPSILON),
            photon: initial.photon.max(FLOOR_EPSILON),
            phase: initial.phase,
        };
        self.initial = initial;
        self.state = initial;
        self.electric_field = initial.field();
        self
    }

    pub fn with_recording(mut self, record: bool) -> Self {
        self.recorder.set_enabled(record);
        self
    }

    /// Installs one noise source per rate equation.
    pub fn set_noise(
        &mut self,
        carrier: impl NoiseSource + 'static,
        photon: impl NoiseSource + 'static,
        phase: impl NoiseSource + 'static,
    ) {
        self.carrier_noise = Box::new(carrier);
        self.photon_noise = Box::new(photon);
        self.phase_noise = Box::new(phase);
    }

    /// Locks this laser to `master`, freezing the frequency detuning.
    ///
    /// Only [`Resettable::reset`] undoes the lock.
    pub fn set_master(&mut self, master: &Laser) {
        self.lock_to_frequency(master.frequency);
    }

    /// Locks this laser to a master emitting at `master_frequency` (Hz).
    pub fn lock_to_frequency(&mut self, master_frequency: f64) {
        let detuning = 2.0 * PI * (self.frequency - master_frequency);
        tracing::debug!(laser = %self.name, detuning, "injection locked");
        self.master_detuning = Some(detuning);
    }

    pub fn is_locked(&self) -> bool {
        self.master_detuning.is_some()
    }

    /// Angular frequency detuning from the master (rad/s), when locked.
    pub fn detuning(&self) -> Option<f64> {
        self.master_detuning
    }

    pub fn state(&self) -> LaserState {
        self.state
    }

    pub fn initial_state(&self) -> LaserState {
        self.initial
    }

    pub fn constants(&self) -> &LaserConstants {
        &self.constants
    }

    /// Free-running frequency (Hz).
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn electric_field(&self) -> Field {
        self.electric_field
    }

    /// Emitted optical power (W) for the current photon density.
    pub fn power(&self) -> f64 {
        let c = &self.constants;
        self.state.photon * c.volume * c.eta * UniversalConstants::Planck.value() * self.frequency
            / (2.0 * c.gamma * c.tau_p)
    }

    /// Field description handed to lasers locked to this one.
    pub fn injection_field(&self) -> InjectionField {
        InjectionField {
            photon: self.state.photon,
            phase: self.state.phase,
            electric_field: self.electric_field,
            frequency: self.frequency,
        }
    }

    /// Evaluates the rate equations at the current state.
    ///
    /// Draws one sample from each noise source.
    pub fn derivatives(
        &mut self,
        current: f64,
        injection: Option<&InjectionField>,
        t: SimTime,
    ) -> LaserState {
        let c = &self.constants;
        let LaserState {
            carrier: n,
            photon: s,
            phase,
        } = self.state;
        let charge = UniversalConstants::Charge.value();

        let gain = c.gain * (n - c.n_transparent) / (1.0 + c.epsilon * s);

        let d_carrier =
            current / (charge * c.volume) - n / c.tau_n - gain * s + self.carrier_noise.sample();
        let mut d_photon = c.gamma * gain * s - s / c.tau_p + c.gamma * c.beta * n / c.tau_n
            + self.photon_noise.sample();
        let mut d_phase = c.alpha / 2.0 * (c.gamma * c.gain * (n - c.n_transparent) - 1.0 / c.tau_p)
            + self.phase_noise.sample();

        if let (Some(detuning), Some(master)) = (self.master_detuning, injection) {
            let angle = (phase - master.phase) - detuning * t;
            let master_photon = master.photon.max(0.0);
            d_photon += 2.0 * c.kappa * (master_photon * s).sqrt() * angle.cos();
            d_phase -= c.kappa * (master_photon / s).sqrt() * angle.sin();
        }

        LaserState {
            carrier: d_carrier,
            photon: d_photon,
            phase: d_phase,
        }
    }

    /// Integrates one forward-Euler step of length `dt` at time `t`.
    pub fn step(&mut self, current: f64, injection: Option<&InjectionField>, t: SimTime, dt: SimTime) {
        self.current = current;
        let rates = self.derivatives(current, injection, t);

        self.state.carrier = (self.state.carrier + rates.carrier * dt).max(FLOOR_EPSILON);
        self.state.photon = (self.state.photon + rates.photon * dt).max(FLOOR_EPSILON);
        self.state.phase += rates.phase * dt;

        self.electric_field = self.state.field();

        self.recorder.store(&[
            self.current,
            self.state.photon,
            self.state.carrier,
            self.state.phase,
        ]);
    }
}

impl Resettable for Laser {
    fn reset(&mut self) {
        self.state = self.initial;
        self.current = 0.0;
        self.electric_field = self.initial.field();
        self.master_detuning = None;
        self.recorder.clear();
    }
}

impl Steppable for Laser {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare_inputs(&self) -> PortSet {
        PortSet::from([Port::Clock, Port::Current, Port::InjectionField])
    }

    fn advance(&mut self, inputs: &PortBundle) {
        let Some(clock) = inputs.clock else {
            tracing::warn!(laser = %self.name, "no clock delivered, skipping tick");
            return;
        };
        let current = inputs.current.unwrap_or(0.0);
        self.step(
            current,
            inputs.injection_field.as_ref(),
            clock.time(),
            clock.step_size(),
        );
    }

    fn publish(&self, bundle: &mut PortBundle) {
        bundle.provide(PortValue::ElectricField(self.electric_field));
        bundle.provide(PortValue::InjectionField(self.injection_field()));
        bundle.provide(PortValue::Intensity(self.power()));
    }
}

impl Recordable for Laser {
    fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}
