//! Passive optical elements acting on complex fields.
//!
//! `PhaseSample`, `Mirror` and `BeamSplitter` are plain helpers used inside
//! composite devices. `VariableOpticalAttenuator` is a full component that
//! can sit in a wiring between a source and a detector.

use num_complex::Complex64;
use std::f64::consts::TAU;

use crate::component::{Recordable, Resettable, Steppable};
use crate::config::{ConfigError, ConfigResult};
use crate::port::{Port, PortBundle, PortSet, PortValue};
use crate::record::Recorder;
use crate::types::{Field, EMPTY_FIELD};

/// A fixed phase shift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSample {
    phase: f64,
}

impl PhaseSample {
    /// Creates a shift of `phase` radians, wrapped into `[0, 2π)`.
    pub fn new(phase: f64) -> Self {
        Self {
            phase: phase.rem_euclid(TAU),
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn set_phase(&mut self, phase: f64) {
        self.phase = phase.rem_euclid(TAU);
    }

    pub fn apply(&self, field: Field) -> Field {
        field * Complex64::from_polar(1.0, self.phase)
    }
}

/// A partially reflecting mirror.
///
/// Reflection flips the sign of the field and scales its amplitude by `√R`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mirror {
    reflectivity: f64,
}

impl Mirror {
    /// Creates a mirror with reflectivity clamped into `[0, 1]`.
    pub fn new(reflectivity: f64) -> Self {
        Self {
            reflectivity: reflectivity.clamp(0.0, 1.0),
        }
    }

    pub fn reflectivity(&self) -> f64 {
        self.reflectivity
    }

    pub fn apply(&self, field: Field) -> Field {
        field * -self.reflectivity.sqrt()
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Lossless 2×2 coupler.
///
/// Transfer matrix `[[√t, i√(1-t)], [i√(1-t), √t]]` where `t` is the power
/// transmission, so total output power always equals total input power.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamSplitter {
    transmission: f64,
}

impl BeamSplitter {
    /// Creates a coupler with power transmission clamped into `[0, 1]`.
    pub fn new(transmission: f64) -> Self {
        Self {
            transmission: transmission.clamp(0.0, 1.0),
        }
    }

    /// A 50:50 coupler.
    pub fn balanced() -> Self {
        Self::new(0.5)
    }

    pub fn transmission(&self) -> f64 {
        self.transmission
    }

    fn coefficients(&self) -> (Complex64, Complex64) {
        let through = Complex64::new(self.transmission.sqrt(), 0.0);
        let cross = Complex64::new(0.0, (1.0 - self.transmission).sqrt());
        (through, cross)
    }

    /// Splits one field into the through and cross outputs.
    pub fn split(&self, field: Field) -> (Field, Field) {
        self.join(field, EMPTY_FIELD)
    }

    /// Combines two fields into the two coupler outputs.
    pub fn join(&self, first: Field, second: Field) -> (Field, Field) {
        let (through, cross) = self.coefficients();
        (
            through * first + cross * second,
            cross * first + through * second,
        )
    }
}

impl Default for BeamSplitter {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Attenuates the field amplitude by a configurable number of decibels.
#[derive(Debug)]
pub struct VariableOpticalAttenuator {
    name: String,
    attenuation_db: f64,
    output: Field,
    recorder: Recorder,
}

impl VariableOpticalAttenuator {
    /// Fails for a negative or non-finite attenuation.
    pub fn new(name: impl Into<String>, attenuation_db: f64, record: bool) -> ConfigResult<Self> {
        let mut voa = Self {
            name: name.into(),
            attenuation_db: 0.0,
            output: EMPTY_FIELD,
            recorder: Recorder::new(&[("power", "a.u.")], record),
        };
        voa.set_attenuation(attenuation_db)?;
        Ok(voa)
    }

    pub fn set_attenuation(&mut self, attenuation_db: f64) -> ConfigResult<()> {
        if !attenuation_db.is_finite() || attenuation_db < 0.0 {
            return Err(ConfigError::Validation(format!(
                "attenuation must be a non-negative number of dB, got {attenuation_db}"
            )));
        }
        self.attenuation_db = attenuation_db;
        Ok(())
    }

    pub fn attenuation_db(&self) -> f64 {
        self.attenuation_db
    }

    /// Amplitude scale factor `10^(-dB/20)`.
    pub fn amplitude_factor(&self) -> f64 {
        10f64.powf(-self.attenuation_db / 20.0)
    }

    pub fn apply(&self, field: Field) -> Field {
        field * self.amplitude_factor()
    }

    pub fn output(&self) -> Field {
        self.output
    }
}

impl Resettable for VariableOpticalAttenuator {
    fn reset(&mut self) {
        self.output = EMPTY_FIELD;
        self.recorder.clear();
    }
}

impl Steppable for VariableOpticalAttenuator {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare_inputs(&self) -> PortSet {
        PortSet::from([Port::ElectricField])
    }

    fn advance(&mut self, inputs: &PortBundle) {
        self.output = self.apply(inputs.electric_field.unwrap_or(EMPTY_FIELD));
        self.recorder.store(&[self.output.norm_sqr()]);
    }

    fn publish(&self, bundle: &mut PortBundle) {
        bundle.provide(PortValue::ElectricField(self.output));
    }
}

impl Recordable for VariableOpticalAttenuator {
    fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}
