//! Physical constants used by the device models.
//!
//! Universal constants are fixed. Device constants live in an immutable
//! [`LaserConstants`] value handed to each model at construction time.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigResult, ConstantTable};

/// Fixed physical constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniversalConstants {
    /// Elementary charge (C)
    Charge,
    /// Planck's constant (J·s)
    Planck,
    /// Speed of light in vacuum (m/s)
    SpeedOfLight,
}

impl UniversalConstants {
    pub const fn value(self) -> f64 {
        match self {
            UniversalConstants::Charge => 1.602e-19,
            UniversalConstants::Planck => 6.626e-34,
            UniversalConstants::SpeedOfLight => 2.997e8,
        }
    }
}

/// Semiconductor laser parameters.
///
/// Keys accepted by [`LaserConstants::from_table`] are the field names in
/// the `#[serde(rename)]` attributes below.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaserConstants {
    /// Carrier lifetime (s)
    #[serde(rename = "Tau_N")]
    pub tau_n: f64,
    /// Photon lifetime (s)
    #[serde(rename = "Tau_P")]
    pub tau_p: f64,
    /// Differential gain coefficient (m^3/s)
    #[serde(rename = "g")]
    pub gain: f64,
    /// Gain compression factor (m^3)
    #[serde(rename = "Epsilon")]
    pub epsilon: f64,
    /// Carrier density at transparency (m^-3)
    #[serde(rename = "N_transparent")]
    pub n_transparent: f64,
    /// Spontaneous emission factor
    #[serde(rename = "Beta")]
    pub beta: f64,
    /// Linewidth enhancement factor
    #[serde(rename = "Alpha")]
    pub alpha: f64,
    /// Differential quantum efficiency
    #[serde(rename = "Eta")]
    pub eta: f64,
    /// Active layer volume (m^3)
    #[serde(rename = "Laser_Vol")]
    pub volume: f64,
    /// Mode confinement factor
    #[serde(rename = "Gamma_cap")]
    pub gamma: f64,
    /// Injection locking coupling rate (1/s)
    #[serde(rename = "Kappa")]
    pub kappa: f64,
}

impl Default for LaserConstants {
    fn default() -> Self {
        Self {
            tau_n: 0.74e-9,
            tau_p: 0.74e-12,
            gain: 1.27e-12,
            epsilon: 1.18e-23,
            n_transparent: 0.85e24,
            beta: 0.5e-5,
            alpha: 2.7,
            eta: 0.2,
            volume: 1.72e-17,
            gamma: 0.27,
            kappa: 1.13e11,
        }
    }
}

impl LaserConstants {
    /// Reads every parameter from a constant table.
    ///
    /// Fails on the first missing key rather than substituting a default.
    pub fn from_table(table: &ConstantTable) -> ConfigResult<Self> {
        Ok(Self {
            tau_n: table.require("Tau_N")?,
            tau_p: table.require("Tau_P")?,
            gain: table.require("g")?,
            epsilon: table.require("Epsilon")?,
            n_transparent: table.require("N_transparent")?,
            beta: table.require("Beta")?,
            alpha: table.require("Alpha")?,
            eta: table.require("Eta")?,
            volume: table.require("Laser_Vol")?,
            gamma: table.require("Gamma_cap")?,
            kappa: table.require("Kappa")?,
        })
    }

    /// Threshold current for lasing (A).
    pub fn threshold_current(&self) -> f64 {
        UniversalConstants::Charge.value() * self.volume / self.tau_n
            * (self.n_transparent + 1.0 / (self.gain * self.gamma * self.tau_p))
    }
}

/// Free-running optical frequency (Hz) of a laser emitting at `wavelength` (m).
pub fn frequency_of(wavelength: f64) -> f64 {
    UniversalConstants::SpeedOfLight.value() / wavelength
}
