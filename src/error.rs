//! Error types for lightsail-sim.
//!
//! Every fallible operation returns [`SailResult`]. Mutating operations are
//! all or nothing: when one of these errors comes back, the configuration and
//! the dynamical state are exactly what they were before the call.

use thiserror::Error;

/// Result type alias for lightsail-sim operations.
pub type SailResult<T> = Result<T, SailError>;

#[derive(Debug, Error)]
pub enum SailError {
    // ===== Configuration =====
    /// A configuration value failed validation.
    #[error("invalid configuration: {name} = {value} ({reason})")]
    InvalidConfiguration {
        name: String,
        value: f64,
        reason: &'static str,
    },

    /// `set_parameter` was called with a name that is not a configuration field.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    // ===== Stepping =====
    /// The step would divide by zero or produce a non-finite value.
    #[error("degenerate step at t={time:.4}s: {reason}")]
    DegenerateStep { time: f64, reason: &'static str },

    // ===== Perturbation =====
    #[error("unknown perturbation axis '{0}' (expected axial-pos, lateral-pos, yaw or pitch)")]
    UnknownPerturbationAxis(String),

    // ===== I/O =====
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SailError {
    pub(crate) fn invalid(name: &str, value: f64, reason: &'static str) -> Self {
        SailError::InvalidConfiguration {
            name: name.to_string(),
            value,
            reason,
        }
    }

    /// True for errors the driving loop can simply report and carry on from.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SailError::Io(_))
    }
}
