//! Core type definitions for the simulation framework.
//!
//! This module defines the fundamental types shared by the clock, the port
//! protocol and every device model.

use num_complex::Complex64;

/// Simulation time in seconds.
///
/// The clock, the connections and every device read the same `SimTime`,
/// so the whole graph shares a single timeline.
pub type SimTime = f64;

/// Complex optical field amplitude.
pub type Field = Complex64;

/// The "no light" sentinel emitted by devices that have nothing to output
/// yet (for example a delay line that has not filled up).
pub const EMPTY_FIELD: Field = Complex64::new(0.0, 0.0);

/// Lower bound for carrier and photon densities after every update.
pub const FLOOR_EPSILON: f64 = 1.0e-12;
