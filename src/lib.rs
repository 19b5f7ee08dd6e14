//! # lasersim
//!
//! A discrete-time dataflow simulator for optical networks built around
//! semiconductor lasers.
//!
//! ## Design Principles
//!
//! - **One Clock**: A single [`Clock`] advances in fixed steps from a start
//!   time up to a horizon. Every component sees the same tick.
//! - **Ordered Connections**: A [`Connection`] links upstream components to
//!   downstream components. Each tick the [`Simulator`] runs its
//!   connections in registration order, so a later connection sees what an
//!   earlier one produced in the same tick.
//! - **Typed Ports**: Components declare the [`Port`]s they consume and
//!   publish values into a [`PortBundle`] that only accepts those ports.
//! - **Capabilities**: Resetting, stepping and recording are separate
//!   traits in [`component`]; anything resettable and steppable can be
//!   wired.
//!
//! ## Quick Start
//!
//! ```rust
//! use lasersim::component::shared;
//! use lasersim::constants::LaserConstants;
//! use lasersim::devices::{CurrentDriver, Laser};
//! use lasersim::{Connection, SimConfig, Simulator};
//!
//! let config = SimConfig::builder()
//!     .step_size(1.0e-13)
//!     .horizon(1.0e-10)
//!     .record(true)
//!     .build()
//!     .unwrap();
//!
//! let constants = LaserConstants::default();
//! let driver = shared(CurrentDriver::constant("driver", 1.5 * constants.threshold_current(), true));
//! let laser = shared(Laser::new("laser", constants).with_recording(true));
//!
//! let mut simulator = Simulator::new(config.build_clock().unwrap()).with_recording(config.record);
//! simulator.set(vec![
//!     Connection::source(vec![driver.clone()]).unwrap(),
//!     Connection::new(vec![driver.clone()], vec![laser.clone()]).unwrap(),
//! ]);
//!
//! let ticks = simulator.simulate();
//! assert_eq!(ticks, config.tick_count());
//! assert_eq!(simulator.get_data().len() as u64, ticks);
//! ```
//!
//! ## Configuration
//!
//! Physical constants come from [`constants::LaserConstants`], which can be
//! filled from a [`ConstantTable`]. Run settings live in [`SimConfig`].

pub mod types;
pub mod clock;
pub mod port;
pub mod component;
pub mod record;
pub mod connection;
pub mod simulator;
pub mod config;
pub mod constants;
pub mod noise;
pub mod devices;

// Re-export commonly used types
pub use types::{Field, SimTime, EMPTY_FIELD, FLOOR_EPSILON};
pub use clock::Clock;
pub use port::{InjectionField, Port, PortBundle, PortSet, PortValue};
pub use component::{shared, Component, Recordable, Resettable, SharedComponent, Steppable};
pub use record::{Recorder, TimeSeries};
pub use connection::Connection;
pub use simulator::{Simulator, SimulatorStats};
pub use config::{ConfigError, ConfigResult, ConstantTable, SimConfig, SimConfigBuilder};

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
///
/// # Example
///
/// ```rust,ignore
/// lasersim::init_logging("info");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
