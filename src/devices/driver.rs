//! Current driver for laser diodes.
//!
//! A `CurrentDriver` sums a set of waveforms into a drive current each tick.
//! An optional gate waveform switches between an "on" set and an "off" set,
//! which is how digital modulation is expressed.

use crate::component::{Recordable, Resettable, Steppable};
use crate::devices::waveform::{ArbitraryWave, ArbitraryWaveGenerator};
use crate::port::{Port, PortBundle, PortSet, PortValue};
use crate::record::Recorder;

/// Drives a current built from arbitrary waveforms.
///
/// # Example
///
/// ```rust
/// use lasersim::devices::CurrentDriver;
///
/// let driver = CurrentDriver::constant("bias", 0.025, false);
/// assert_eq!(driver.current_at(0.0), 0.025);
/// ```
#[derive(Debug)]
pub struct CurrentDriver {
    name: String,
    off_waves: ArbitraryWaveGenerator,
    on_waves: ArbitraryWaveGenerator,
    gate: Option<ArbitraryWave>,
    current: f64,
    recorder: Recorder,
}

impl CurrentDriver {
    pub fn new(name: impl Into<String>, record: bool) -> Self {
        Self {
            name: name.into(),
            off_waves: ArbitraryWaveGenerator::new(),
            on_waves: ArbitraryWaveGenerator::new(),
            gate: None,
            current: 0.0,
            recorder: Recorder::new(&[("current", "A")], record),
        }
    }

    /// A driver that always outputs `amps`.
    pub fn constant(name: impl Into<String>, amps: f64, record: bool) -> Self {
        let mut driver = Self::new(name, record);
        driver.set_modulation(vec![ArbitraryWave::constant("dc", amps)], Vec::new(), None);
        driver
    }

    /// Replaces the modulation scheme.
    ///
    /// `off` waves are summed while the gate is absent or non-positive, `on`
    /// waves while the gate is positive. The two sets are independent, so
    /// the same name may appear in both. Within one set a later wave
    /// replaces an earlier one of the same name.
    pub fn set_modulation(
        &mut self,
        off: Vec<ArbitraryWave>,
        on: Vec<ArbitraryWave>,
        gate: Option<ArbitraryWave>,
    ) {
        self.off_waves.clear();
        self.off_waves.set(off);
        self.on_waves.clear();
        self.on_waves.set(on);
        self.gate = gate;
    }

    /// Current the driver outputs at time `t`.
    pub fn current_at(&self, t: f64) -> f64 {
        let gate_open = self.gate.as_ref().is_some_and(|g| g.value(t) > 0.0);
        if gate_open {
            self.on_waves.sum(t)
        } else {
            self.off_waves.sum(t)
        }
    }

    /// Current output on the last tick.
    pub fn current(&self) -> f64 {
        self.current
    }
}

impl Resettable for CurrentDriver {
    fn reset(&mut self) {
        self.current = 0.0;
        self.recorder.clear();
    }
}

impl Steppable for CurrentDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare_inputs(&self) -> PortSet {
        PortSet::from([Port::Clock])
    }

    fn advance(&mut self, inputs: &PortBundle) {
        self.current = self.current_at(inputs.time().unwrap_or(0.0));
        self.recorder.store(&[self.current]);
    }

    fn publish(&self, bundle: &mut PortBundle) {
        bundle.provide(PortValue::Current(self.current));
    }
}

impl Recordable for CurrentDriver {
    fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}
