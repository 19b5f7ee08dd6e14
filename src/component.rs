//! Component capability traits.
//!
//! Components are the units of computation in the simulation graph. Each one
//! is a local state machine that reads a typed [`PortBundle`] once per tick
//! and exposes its outputs to whichever connection asks for them.
//!
//! Capabilities are split so a device only implements what it needs:
//! - [`Resettable`]: return to initial state
//! - [`Steppable`]: the per-tick port protocol
//! - [`Recordable`]: expose recorded time series

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::port::{PortBundle, PortSet};
use crate::record::Recorder;

/// Restores mutable state to its initial values. Configuration is kept.
pub trait Resettable {
    fn reset(&mut self);
}

/// The per-tick port protocol.
pub trait Steppable {
    /// Human-readable name; not required to be unique.
    fn name(&self) -> &str;

    /// Ports this component needs each tick.
    fn declare_inputs(&self) -> PortSet;

    /// Performs one update from `inputs` and the component's own prior state.
    fn advance(&mut self, inputs: &PortBundle);

    /// Offers this component's current outputs to `bundle`.
    ///
    /// The bundle keeps only the ports it was requested with.
    fn publish(&self, _bundle: &mut PortBundle) {}
}

/// Components that keep a time series history.
pub trait Recordable {
    fn recorder(&self) -> &Recorder;

    /// Field name to recorded samples.
    fn get_recorded(&self) -> BTreeMap<String, Vec<f64>> {
        self.recorder().recorded()
    }

    /// Field name to display unit.
    fn get_units(&self) -> BTreeMap<String, String> {
        self.recorder().units()
    }

    /// Recorded data as JSON.
    fn get_data(&self) -> serde_json::Value {
        serde_json::to_value(self.recorder().all_series()).unwrap_or_default()
    }
}

/// Anything that can sit in a connection.
pub trait Component: Resettable + Steppable {}

impl<T: Resettable + Steppable> Component for T {}

/// Shared handle to a component wired into one or more connections.
pub type SharedComponent = Rc<RefCell<dyn Component>>;

/// Wraps a component so it can be wired into connections while the caller
/// keeps typed access to it.
///
/// # Example
///
/// ```rust
/// use lasersim::component::{shared, SharedComponent, Steppable};
/// use lasersim::devices::TimeProbe;
///
/// let probe = shared(TimeProbe::new("probe", true));
/// let handle: SharedComponent = probe.clone();
/// assert_eq!(handle.borrow().name(), "probe");
/// ```
pub fn shared<T: Component + 'static>(component: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(component))
}
