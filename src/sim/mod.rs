pub mod integrator;
pub mod perturb;
pub mod runner;

pub use integrator::step;
pub use perturb::{Perturbation, PerturbationAxis, Trace, TraceEvent, TraceRecord, TRACE_LENGTH};
pub use runner::{initialize, simulate, RunOutput, Simulation};
