//! Static wiring between components.
//!
//! A [`Connection`] routes the outputs of an ordered set of upstream
//! components into the inputs of an ordered set of downstream components,
//! once per tick. Ordering is part of the contract: bundles are filled in
//! upstream order (later upstream components win on a port collision) and
//! downstream components advance in downstream order.

use std::fmt;

use crate::clock::Clock;
use crate::component::SharedComponent;
use crate::config::{ConfigError, ConfigResult};
use crate::port::{Port, PortBundle, PortValue};

/// A routing rule from upstream outputs to downstream inputs.
///
/// # Example
///
/// ```rust
/// use lasersim::{Clock, Connection};
/// use lasersim::component::shared;
/// use lasersim::devices::TimeProbe;
///
/// let first = shared(TimeProbe::new("first", true));
/// let second = shared(TimeProbe::new("second", true));
///
/// let drive = Connection::source(vec![first.clone()]).unwrap();
/// let chain = Connection::new(vec![first.clone()], vec![second.clone()]).unwrap();
///
/// let mut clock = Clock::new(0.5).unwrap();
/// clock.configure(1.0, None).unwrap();
/// clock.advance();
///
/// drive.simulate(&clock);
/// chain.simulate(&clock);
/// assert_eq!(second.borrow().value(), 0.5);
/// ```
#[derive(Clone)]
pub struct Connection {
    upstream: Vec<SharedComponent>,
    downstream: Vec<SharedComponent>,
}

impl Connection {
    /// Creates a connection. `downstream` must not be empty.
    pub fn new(
        upstream: Vec<SharedComponent>,
        downstream: Vec<SharedComponent>,
    ) -> ConfigResult<Self> {
        if downstream.is_empty() {
            return Err(ConfigError::EmptyDownstream);
        }
        Ok(Self {
            upstream,
            downstream,
        })
    }

    /// Creates a connection with no upstream, driven only by the clock.
    pub fn source(downstream: Vec<SharedComponent>) -> ConfigResult<Self> {
        Self::new(Vec::new(), downstream)
    }

    pub fn upstream(&self) -> &[SharedComponent] {
        &self.upstream
    }

    pub fn downstream(&self) -> &[SharedComponent] {
        &self.downstream
    }

    /// Builds the input bundle of every downstream component for this tick.
    ///
    /// Each bundle starts from the component's declared ports, gets the
    /// clock if it asked for one, then passes through every upstream
    /// component in order.
    pub fn collect_inputs(&self, clock: &Clock) -> Vec<PortBundle> {
        let mut bundles: Vec<PortBundle> = self
            .downstream
            .iter()
            .map(|component| {
                let mut bundle = PortBundle::request(component.borrow().declare_inputs());
                if bundle.wants(Port::Clock) {
                    bundle.provide(PortValue::Clock(*clock));
                }
                bundle
            })
            .collect();

        for upstream in &self.upstream {
            let upstream = upstream.borrow();
            for bundle in &mut bundles {
                upstream.publish(bundle);
            }
        }

        bundles
    }

    /// Runs one tick of this connection.
    ///
    /// Returns the number of downstream components advanced.
    pub fn simulate(&self, clock: &Clock) -> usize {
        let bundles = self.collect_inputs(clock);
        for (component, bundle) in self.downstream.iter().zip(&bundles) {
            component.borrow_mut().advance(bundle);
        }
        bundles.len()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |components: &[SharedComponent]| -> Vec<String> {
            components
                .iter()
                .map(|c| c.borrow().name().to_string())
                .collect()
        };
        f.debug_struct("Connection")
            .field("upstream", &names(&self.upstream))
            .field("downstream", &names(&self.downstream))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{shared, Resettable, Steppable};
    use crate::port::PortSet;

    /// Publishes a fixed signal and remembers the last bundle it received.
    struct Fixed {
        name: String,
        value: f64,
        inputs: PortSet,
        last: Option<PortBundle>,
        advances: u64,
    }

    impl Fixed {
        fn new(name: &str, value: f64, inputs: PortSet) -> Self {
            Self {
                name: name.to_string(),
                value,
                inputs,
                last: None,
                advances: 0,
            }
        }
    }

    impl Resettable for Fixed {
        fn reset(&mut self) {
            self.last = None;
            self.advances = 0;
        }
    }

    impl Steppable for Fixed {
        fn name(&self) -> &str {
            &self.name
        }

        fn declare_inputs(&self) -> PortSet {
            self.inputs
        }

        fn advance(&mut self, inputs: &PortBundle) {
            self.last = Some(*inputs);
            self.advances += 1;
        }

        fn publish(&self, bundle: &mut PortBundle) {
            bundle.provide(PortValue::Signal(self.value));
        }
    }

    fn clock() -> Clock {
        let mut clock = Clock::new(0.1).unwrap();
        clock.configure(1.0, None).unwrap();
        clock
    }

    #[test]
    fn test_empty_downstream_rejected() {
        let up = shared(Fixed::new("up", 1.0, PortSet::empty()));
        let result = Connection::new(vec![up], Vec::new());
        assert!(matches!(result, Err(ConfigError::EmptyDownstream)));
    }

    #[test]
    fn test_clock_only_when_requested() {
        let with_clock = shared(Fixed::new("a", 0.0, PortSet::from([Port::Clock])));
        let without = shared(Fixed::new("b", 0.0, PortSet::from([Port::Signal])));
        let conn = Connection::source(vec![with_clock.clone(), without.clone()]).unwrap();

        conn.simulate(&clock());

        assert!(with_clock.borrow().last.unwrap().clock.is_some());
        let b = without.borrow().last.unwrap();
        assert!(b.clock.is_none());
        assert!(b.signal.is_none());
    }

    #[test]
    fn test_later_upstream_wins() {
        let first = shared(Fixed::new("first", 1.0, PortSet::empty()));
        let second = shared(Fixed::new("second", 2.0, PortSet::empty()));
        let sink = shared(Fixed::new("sink", 0.0, PortSet::from([Port::Signal])));

        let conn = Connection::new(vec![first, second], vec![sink.clone()]).unwrap();
        conn.simulate(&clock());

        assert_eq!(sink.borrow().last.unwrap().signal, Some(2.0));
    }

    #[test]
    fn test_fan_out_to_every_downstream() {
        let source = shared(Fixed::new("source", 4.0, PortSet::empty()));
        let a = shared(Fixed::new("a", 0.0, PortSet::from([Port::Signal])));
        let b = shared(Fixed::new("b", 0.0, PortSet::from([Port::Signal, Port::Clock])));

        let conn = Connection::new(vec![source], vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(conn.simulate(&clock()), 2);

        assert_eq!(a.borrow().last.unwrap().signal, Some(4.0));
        assert_eq!(b.borrow().last.unwrap().signal, Some(4.0));
        assert_eq!(a.borrow().advances, 1);
    }

    #[test]
    fn test_bundles_are_deterministic() {
        let source = shared(Fixed::new("source", 3.5, PortSet::empty()));
        let sink = shared(Fixed::new("sink", 0.0, PortSet::from([Port::Signal, Port::Clock])));
        let conn = Connection::new(vec![source], vec![sink]).unwrap();

        let clock = clock();
        let first = conn.collect_inputs(&clock);
        let second = conn.collect_inputs(&clock);
        assert_eq!(first, second);
    }

    #[test]
    fn test_debug_lists_names() {
        let up = shared(Fixed::new("up", 1.0, PortSet::empty()));
        let down = shared(Fixed::new("down", 1.0, PortSet::empty()));
        let conn = Connection::new(vec![up], vec![down]).unwrap();
        let text = format!("{conn:?}");
        assert!(text.contains("up"));
        assert!(text.contains("down"));
    }
}
