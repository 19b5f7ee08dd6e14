//! Asymmetric Mach-Zehnder interferometer.
//!
//! The input field is split in two. The short arm reflects off the common
//! mirror and picks up its phase; the long arm picks up its phase, reflects
//! and then waits in a delay line. The arms recombine on the output coupler
//! and each output port feeds an internal single-photon detector.

use crate::component::{Recordable, Resettable, Steppable};
use crate::config::{ConfigError, ConfigResult};
use crate::constants::LaserConstants;
use crate::devices::delay::DelayLine;
use crate::devices::detector::{SinglePhotonDetector, DEFAULT_SEED};
use crate::devices::optics::{BeamSplitter, Mirror, PhaseSample};
use crate::port::{Port, PortBundle, PortSet, PortValue};
use crate::record::Recorder;
use crate::types::{Field, SimTime, EMPTY_FIELD};

/// Interferometer with unequal arm lengths.
///
/// # Example
///
/// ```rust
/// use lasersim::devices::AsymmetricMachZehnderInterferometer;
/// use num_complex::Complex64;
///
/// let mut amzi =
///     AsymmetricMachZehnderInterferometer::new("amzi", 2.0e-12, 1.0e-12, 0.5, 0.5, false).unwrap();
/// assert_eq!(amzi.delay_samples(), 2);
///
/// let (a, b) = amzi.propagate(Complex64::new(1.0, 0.0));
/// // Only the short arm has arrived so far.
/// assert!((a.norm_sqr() + b.norm_sqr() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct AsymmetricMachZehnderInterferometer {
    name: String,
    input_splitter: BeamSplitter,
    output_joiner: BeamSplitter,
    mirror: Mirror,
    short_arm: PhaseSample,
    long_arm: PhaseSample,
    delay: DelayLine,
    spd_port1: SinglePhotonDetector,
    spd_port2: SinglePhotonDetector,
    electric_field: Field,
    electric_field_port2: Field,
    recorder: Recorder,
}

fn check_ratio(ratio: f64) -> ConfigResult<f64> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(ConfigError::Validation(format!(
            "splitting ratio must lie in [0, 1], got {ratio}"
        )))
    }
}

impl AsymmetricMachZehnderInterferometer {
    /// Builds an interferometer whose long arm lags by `time_delay`.
    ///
    /// `splitting_in` and `splitting_out` are the power transmissions of
    /// the input and output couplers. The internal detectors use the
    /// default quantum efficiency.
    pub fn new(
        name: impl Into<String>,
        time_delay: SimTime,
        step_size: SimTime,
        splitting_in: f64,
        splitting_out: f64,
        record: bool,
    ) -> ConfigResult<Self> {
        Self::from_constants(
            name,
            &LaserConstants::default(),
            time_delay,
            step_size,
            splitting_in,
            splitting_out,
            record,
        )
    }

    /// Like [`new`](Self::new), with detector efficiency taken from `constants`.
    pub fn from_constants(
        name: impl Into<String>,
        constants: &LaserConstants,
        time_delay: SimTime,
        step_size: SimTime,
        splitting_in: f64,
        splitting_out: f64,
        record: bool,
    ) -> ConfigResult<Self> {
        let name = name.into();
        let spd_port1 = SinglePhotonDetector::from_constants(
            format!("{name}_spd_0"),
            constants,
            DEFAULT_SEED,
            record,
        )?;
        let spd_port2 = SinglePhotonDetector::from_constants(
            format!("{name}_spd_1"),
            constants,
            DEFAULT_SEED + 1,
            record,
        )?;

        Ok(Self {
            input_splitter: BeamSplitter::new(check_ratio(splitting_in)?),
            output_joiner: BeamSplitter::new(check_ratio(splitting_out)?),
            mirror: Mirror::default(),
            short_arm: PhaseSample::new(0.0),
            long_arm: PhaseSample::new(0.0),
            delay: DelayLine::new(time_delay, step_size)?,
            spd_port1,
            spd_port2,
            electric_field: EMPTY_FIELD,
            electric_field_port2: EMPTY_FIELD,
            recorder: Recorder::new(&[("intensity", "W/m^2"), ("intensity_port2", "W/m^2")], record),
            name,
        })
    }

    /// Replaces the internal detectors, e.g. to change efficiency or seed.
    pub fn with_detectors(
        mut self,
        port1: SinglePhotonDetector,
        port2: SinglePhotonDetector,
    ) -> Self {
        self.spd_port1 = port1;
        self.spd_port2 = port2;
        self
    }

    /// Reconfigures delay and couplers, emptying the delay line.
    ///
    /// Leaves the interferometer untouched on error.
    pub fn set(
        &mut self,
        time_delay: SimTime,
        step_size: SimTime,
        splitting_in: f64,
        splitting_out: f64,
    ) -> ConfigResult<()> {
        let input_splitter = BeamSplitter::new(check_ratio(splitting_in)?);
        let output_joiner = BeamSplitter::new(check_ratio(splitting_out)?);
        let delay = DelayLine::new(time_delay, step_size)?;
        self.input_splitter = input_splitter;
        self.output_joiner = output_joiner;
        self.delay = delay;
        Ok(())
    }

    /// Sets the phase picked up in each arm.
    pub fn set_phases(&mut self, short_arm_phase: f64, long_arm_phase: f64) {
        self.short_arm.set_phase(short_arm_phase);
        self.long_arm.set_phase(long_arm_phase);
    }

    pub fn phases(&self) -> (f64, f64) {
        (self.short_arm.phase(), self.long_arm.phase())
    }

    /// Delay of the long arm in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay.size()
    }

    /// Output fields of the last tick.
    pub fn outputs(&self) -> (Field, Field) {
        (self.electric_field, self.electric_field_port2)
    }

    pub fn detectors(&self) -> (&SinglePhotonDetector, &SinglePhotonDetector) {
        (&self.spd_port1, &self.spd_port2)
    }

    /// Recorded detector data keyed by detector name.
    pub fn get_spd_data(&self) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        for spd in [&self.spd_port1, &self.spd_port2] {
            data.insert(spd.name().to_string(), spd.get_data());
        }
        serde_json::Value::Object(data)
    }

    /// Pushes one input sample through both arms and the detectors.
    pub fn propagate(&mut self, input: Field) -> (Field, Field) {
        let (short, long) = self.input_splitter.split(input);

        let long = self.mirror.apply(self.long_arm.apply(long));
        let long = self.delay.push(long);

        let short = self.short_arm.apply(self.mirror.apply(short));

        let (first, second) = self.output_joiner.join(short, long);
        self.electric_field = first;
        self.electric_field_port2 = second;

        self.spd_port1.detect(first);
        self.spd_port2.detect(second);
        self.recorder
            .store(&[first.norm_sqr(), second.norm_sqr()]);

        (first, second)
    }
}

impl Resettable for AsymmetricMachZehnderInterferometer {
    fn reset(&mut self) {
        self.delay.reset();
        self.electric_field = EMPTY_FIELD;
        self.electric_field_port2 = EMPTY_FIELD;
        self.spd_port1.reset();
        self.spd_port2.reset();
        self.recorder.clear();
    }
}

impl Steppable for AsymmetricMachZehnderInterferometer {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare_inputs(&self) -> PortSet {
        PortSet::from([Port::ElectricField])
    }

    fn advance(&mut self, inputs: &PortBundle) {
        self.propagate(inputs.electric_field.unwrap_or(EMPTY_FIELD));
    }

    fn publish(&self, bundle: &mut PortBundle) {
        bundle.provide(PortValue::ElectricField(self.electric_field));
        bundle.provide(PortValue::ElectricFieldPort2(self.electric_field_port2));
    }
}

impl Recordable for AsymmetricMachZehnderInterferometer {
    fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}
