//! Generic time probe.
//!
//! The `TimeProbe` is the simplest physical component: it follows the
//! scalar signal of whatever feeds it, falls back to the clock time when
//! nothing does, records the value and republishes it. It is useful for
//! checking how values propagate through a wiring.

use crate::component::{Recordable, Resettable, Steppable};
use crate::port::{Port, PortBundle, PortSet, PortValue};
use crate::record::Recorder;

/// Records one scalar per tick and forwards it as a `Signal`.
#[derive(Debug)]
pub struct TimeProbe {
    name: String,
    value: f64,
    recorder: Recorder,
}

impl TimeProbe {
    /// Creates a probe; `record` turns on its recorder.
    pub fn new(name: impl Into<String>, record: bool) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            recorder: Recorder::new(&[("signal", "s")], record),
        }
    }

    /// The value seen on the last tick.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Resettable for TimeProbe {
    fn reset(&mut self) {
        self.value = 0.0;
        self.recorder.clear();
    }
}

impl Steppable for TimeProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare_inputs(&self) -> PortSet {
        PortSet::from([Port::Clock, Port::Signal])
    }

    fn advance(&mut self, inputs: &PortBundle) {
        self.value = inputs.signal.or_else(|| inputs.time()).unwrap_or(0.0);
        self.recorder.store(&[self.value]);
    }

    fn publish(&self, bundle: &mut PortBundle) {
        bundle.provide(PortValue::Signal(self.value));
    }
}

impl Recordable for TimeProbe {
    fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}
