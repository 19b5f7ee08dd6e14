//! Built-in physical components.
//!
//! # Available Devices
//!
//! ## Sources
//! - [`CurrentDriver`] - Drive current built from [`ArbitraryWave`]s
//! - [`Laser`] - Semiconductor laser rate equations with injection locking
//!
//! ## Optics
//! - [`PhaseSample`], [`Mirror`], [`BeamSplitter`] - Field helpers
//! - [`VariableOpticalAttenuator`] - Attenuation in dB
//! - [`DelayLine`] - Fixed sample delay
//! - [`AsymmetricMachZehnderInterferometer`] - Unequal-arm interferometer
//!
//! ## Detection
//! - [`SinglePhotonDetector`] - Intensity and photon counts
//! - [`PhaseSensitiveSpd`] - Projects onto a target phase first
//!
//! ## Utilities
//! - [`TimeProbe`] - Records the clock time or an upstream signal

pub mod delay;
pub mod detector;
pub mod driver;
pub mod interferometer;
pub mod laser;
pub mod optics;
pub mod probe;
pub mod waveform;

pub use delay::{DelayLine, MAX_DELAY_SAMPLES};
pub use detector::{PhaseSensitiveSpd, SinglePhotonDetector};
pub use driver::CurrentDriver;
pub use interferometer::AsymmetricMachZehnderInterferometer;
pub use laser::{Laser, LaserState};
pub use optics::{BeamSplitter, Mirror, PhaseSample, VariableOpticalAttenuator};
pub use probe::TimeProbe;
pub use waveform::{ArbitraryWave, ArbitraryWaveGenerator, Waveform};
