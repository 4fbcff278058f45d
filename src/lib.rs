//! Six-degree-of-freedom flight dynamics simulator for a blown-wing STOL
//! light aircraft.
//!
//! The crate is organized as a pipeline: `aircraft` holds the static
//! vehicle description, `physics::aero` turns a state and control input
//! into body-frame forces and moments, `dynamics` composes those with the
//! rigid-body equations of motion, and `sim` integrates the result with an
//! adaptive Dormand-Prince 5(4) scheme and samples it on a fixed grid.
//! `io` writes flight logs and streams them as visualizer telemetry.

pub mod aircraft;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;

pub use aircraft::{AircraftBuilder, AircraftConfig};
pub use dynamics::state::{Controls, Deriv, State, G, RHO_SL};
pub use error::{ConfigError, SimError};
pub use sim::dopri::DopriOptions;
pub use sim::runner::{simulate, simulate_with, ConstantControls, ControlLaw, Scenario};
