//! Global tick scheduler.
//!
//! The `Simulator` owns the clock and an ordered list of connections. Each
//! tick it runs every connection once, in registration order, optionally
//! records the tick time, then advances the clock. A later connection sees
//! whatever an earlier connection's targets produced in the same tick.

use std::collections::HashSet;
use std::rc::Rc;

use crate::clock::Clock;
use crate::component::SharedComponent;
use crate::connection::Connection;
use crate::types::SimTime;

/// Statistics collected by the simulator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulatorStats {
    /// Total number of ticks executed
    pub ticks_executed: u64,
    /// Total number of connection executions
    pub connection_runs: u64,
    /// Total number of component advances
    pub component_advances: u64,
}

/// Drives a wired graph of components to completion.
///
/// # Example
///
/// ```rust
/// use lasersim::{Clock, Connection, Simulator};
/// use lasersim::component::shared;
/// use lasersim::devices::TimeProbe;
///
/// let mut clock = Clock::new(0.025).unwrap();
/// clock.configure(2.0, None).unwrap();
///
/// let probe = shared(TimeProbe::new("probe", true));
/// let mut simulator = Simulator::new(clock).with_recording(true);
/// simulator.set(vec![Connection::source(vec![probe.clone()]).unwrap()]);
///
/// assert_eq!(simulator.simulate(), 80);
/// assert_eq!(simulator.get_data().len(), 80);
/// ```
pub struct Simulator {
    clock: Clock,
    connections: Vec<Connection>,
    record: bool,
    time_data: Vec<SimTime>,
    stats: SimulatorStats,
}

impl Simulator {
    /// Creates a simulator driving `clock`.
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            connections: Vec::new(),
            record: false,
            time_data: Vec::new(),
            stats: SimulatorStats::default(),
        }
    }

    /// Enables or disables recording of the time axis.
    pub fn with_recording(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    /// Replaces the connection list.
    pub fn set(&mut self, connections: Vec<Connection>) {
        self.connections = connections;
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Executes a single tick: every connection in order.
    fn step_tick(&mut self) {
        for connection in &self.connections {
            let advanced = connection.simulate(&self.clock);
            self.stats.connection_runs += 1;
            self.stats.component_advances += advanced as u64;
        }
        if self.record {
            self.time_data.push(self.clock.time());
        }
        self.stats.ticks_executed += 1;
    }

    /// Runs ticks until the clock stops.
    ///
    /// Returns the number of ticks executed by this call.
    pub fn simulate(&mut self) -> u64 {
        tracing::debug!(
            connections = self.connections.len(),
            start = self.clock.time(),
            horizon = self.clock.horizon(),
            step_size = self.clock.step_size(),
            "starting simulation"
        );

        let mut ticks = 0;
        while self.clock.is_running() {
            self.step_tick();
            self.clock.advance();
            ticks += 1;
        }

        tracing::info!(ticks, final_time = self.clock.time(), "simulation complete");
        ticks
    }

    /// The recorded time axis, one entry per tick (empty when recording is
    /// disabled).
    pub fn get_data(&self) -> &[SimTime] {
        if !self.record {
            tracing::warn!("time data requested but recording is disabled");
        }
        &self.time_data
    }

    /// Every distinct component wired into any connection, in first-seen order.
    pub fn components(&self) -> Vec<SharedComponent> {
        let mut seen = HashSet::new();
        let mut components = Vec::new();
        for connection in &self.connections {
            for component in connection.upstream().iter().chain(connection.downstream()) {
                let key = Rc::as_ptr(component) as *const () as usize;
                if seen.insert(key) {
                    components.push(Rc::clone(component));
                }
            }
        }
        components
    }

    /// Resets the clock, the recorded time axis and every wired component.
    pub fn reset(&mut self, rewind_to_zero: bool) {
        self.clock.reset(rewind_to_zero);
        self.time_data.clear();
        self.stats = SimulatorStats::default();
        for component in self.components() {
            component.borrow_mut().reset();
        }
    }

    /// Rewinds the clock to zero with a new horizon, leaving components and
    /// recorded data alone.
    pub fn reset_time_only(&mut self, horizon: SimTime) -> crate::ConfigResult<()> {
        self.clock.reset(true);
        self.clock.configure(horizon, None)
    }

    pub fn stats(&self) -> &SimulatorStats {
        &self.stats
    }

    /// Exports statistics as JSON.
    pub fn export_stats(&self) -> serde_json::Value {
        serde_json::json!({
            "current_time": self.clock.time(),
            "step_size": self.clock.step_size(),
            "horizon": self.clock.horizon(),
            "connections": self.connections.len(),
            "ticks_executed": self.stats.ticks_executed,
            "connection_runs": self.stats.connection_runs,
            "component_advances": self.stats.component_advances,
            "recorded_samples": self.time_data.len(),
        })
    }
}
