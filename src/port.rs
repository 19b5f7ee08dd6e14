//! Typed ports exchanged between components during a tick.
//!
//! Every value a component can consume or produce has a [`Port`] name and a
//! typed payload ([`PortValue`]). A downstream component declares the ports
//! it wants as a [`PortSet`]; the connection turns that into a fresh
//! [`PortBundle`], lets upstream components fill it, and hands it over.
//! A bundle only ever accepts values for ports it was requested with, so
//! publishing is purely additive.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::Clock;
use crate::types::{Field, SimTime};

/// Name of a value exchanged between components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Port {
    /// The shared simulation clock
    Clock,
    /// Drive current (A)
    Current,
    /// Complex optical field
    ElectricField,
    /// Complex optical field on a secondary output
    ElectricFieldPort2,
    /// Field description used for injection locking
    InjectionField,
    /// Optical intensity or power
    Intensity,
    /// Detected photon count
    PhotonCount,
    /// Generic scalar signal
    Signal,
}

impl Port {
    /// All ports in declaration order.
    pub const ALL: [Port; 8] = [
        Port::Clock,
        Port::Current,
        Port::ElectricField,
        Port::ElectricFieldPort2,
        Port::InjectionField,
        Port::Intensity,
        Port::PhotonCount,
        Port::Signal,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Port name as used in recorded data and logs.
    pub fn name(self) -> &'static str {
        match self {
            Port::Clock => "clock",
            Port::Current => "current",
            Port::ElectricField => "electric_field",
            Port::ElectricFieldPort2 => "electric_field_port2",
            Port::InjectionField => "injection_field",
            Port::Intensity => "intensity",
            Port::PhotonCount => "photon_count",
            Port::Signal => "signal",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of ports, iterated in [`Port::ALL`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PortSet(u16);

impl PortSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a copy of the set with `port` added.
    pub fn with(self, port: Port) -> Self {
        Self(self.0 | port.bit())
    }

    pub fn insert(&mut self, port: Port) {
        self.0 |= port.bit();
    }

    pub fn contains(self, port: Port) -> bool {
        self.0 & port.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Port> {
        Port::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Port> for PortSet {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        iter.into_iter().fold(PortSet::empty(), PortSet::with)
    }
}

impl<const N: usize> From<[Port; N]> for PortSet {
    fn from(ports: [Port; N]) -> Self {
        ports.into_iter().collect()
    }
}

/// Optical field handed from a master laser to a locked slave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InjectionField {
    /// Master photon density
    pub photon: f64,
    /// Master optical phase (rad)
    pub phase: f64,
    /// Master complex field
    pub electric_field: Field,
    /// Master free-running frequency (Hz)
    pub frequency: f64,
}

/// A value together with the port it travels on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PortValue {
    Clock(Clock),
    Current(f64),
    ElectricField(Field),
    ElectricFieldPort2(Field),
    InjectionField(InjectionField),
    Intensity(f64),
    PhotonCount(u64),
    Signal(f64),
}

impl PortValue {
    /// The port this value belongs to.
    pub fn port(&self) -> Port {
        match self {
            PortValue::Clock(_) => Port::Clock,
            PortValue::Current(_) => Port::Current,
            PortValue::ElectricField(_) => Port::ElectricField,
            PortValue::ElectricFieldPort2(_) => Port::ElectricFieldPort2,
            PortValue::InjectionField(_) => Port::InjectionField,
            PortValue::Intensity(_) => Port::Intensity,
            PortValue::PhotonCount(_) => Port::PhotonCount,
            PortValue::Signal(_) => Port::Signal,
        }
    }
}

/// Input bundle for one downstream component for one tick.
///
/// Fields are `None` until some upstream component provides them; a port
/// nobody provides simply stays `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PortBundle {
    requested: PortSet,
    pub clock: Option<Clock>,
    pub current: Option<f64>,
    pub electric_field: Option<Field>,
    pub electric_field_port2: Option<Field>,
    pub injection_field: Option<InjectionField>,
    pub intensity: Option<f64>,
    pub photon_count: Option<u64>,
    pub signal: Option<f64>,
}

impl PortBundle {
    /// Creates an empty bundle accepting exactly `ports`.
    pub fn request(ports: PortSet) -> Self {
        Self {
            requested: ports,
            ..Self::default()
        }
    }

    /// The ports this bundle accepts.
    pub fn requested(&self) -> PortSet {
        self.requested
    }

    pub fn wants(&self, port: Port) -> bool {
        self.requested.contains(port)
    }

    /// Stores `value` if its port was requested, replacing any earlier
    /// value. Returns whether the value was taken.
    pub fn provide(&mut self, value: PortValue) -> bool {
        if !self.wants(value.port()) {
            return false;
        }
        match value {
            PortValue::Clock(v) => self.clock = Some(v),
            PortValue::Current(v) => self.current = Some(v),
            PortValue::ElectricField(v) => self.electric_field = Some(v),
            PortValue::ElectricFieldPort2(v) => self.electric_field_port2 = Some(v),
            PortValue::InjectionField(v) => self.injection_field = Some(v),
            PortValue::Intensity(v) => self.intensity = Some(v),
            PortValue::PhotonCount(v) => self.photon_count = Some(v),
            PortValue::Signal(v) => self.signal = Some(v),
        }
        true
    }

    /// Returns whether a value is present for `port`.
    pub fn is_provided(&self, port: Port) -> bool {
        match port {
            Port::Clock => self.clock.is_some(),
            Port::Current => self.current.is_some(),
            Port::ElectricField => self.electric_field.is_some(),
            Port::ElectricFieldPort2 => self.electric_field_port2.is_some(),
            Port::InjectionField => self.injection_field.is_some(),
            Port::Intensity => self.intensity.is_some(),
            Port::PhotonCount => self.photon_count.is_some(),
            Port::Signal => self.signal.is_some(),
        }
    }

    /// Current time from the bundled clock, if one was delivered.
    pub fn time(&self) -> Option<SimTime> {
        self.clock.map(|c| c.time())
    }

    /// Step size from the bundled clock, if one was delivered.
    pub fn step_size(&self) -> Option<SimTime> {
        self.clock.map(|c| c.step_size())
    }
}
