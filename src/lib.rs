//! Rigid-body dynamics of a laser-propelled spherical-cap light-sail.
//!
//! The sail is pushed by a collimated beam. Radiation pressure on the curved
//! cap couples the sail's in-plane displacement to its tilt; [`sim::step`]
//! advances that coupled system by one fixed timestep and
//! [`sim::Simulation`] owns one sail's parameters, state and diagnostic trace.

pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod sail;
pub mod sim;

pub use error::{SailError, SailResult};

pub mod types {
    pub use crate::dynamics::state::{Accel, State, SPEED_OF_LIGHT};
    pub use crate::sail::{DerivedParams, ParamName, SailConfig};
    pub use crate::sim::perturb::{PerturbationAxis, TraceRecord};
}
