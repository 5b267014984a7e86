//! Scenario files.
//!
//! A scenario is a sail configuration, a run length and a list of scheduled
//! perturbations, loaded from YAML:
//!
//! ```yaml
//! sail:
//!   solid_angle_fraction: 0.5
//!   center_of_mass_offset: 2.5
//!   total_mass: 1.0e-3
//!   timestep: 1.0e-3
//!
//! run:
//!   steps: 2000
//!
//! perturbations:
//!   - at_step: 100
//!     axis: lateral-pos
//!     delta: 0.01
//! ```
//!
//! Omitted `sail` fields take their defaults; unknown fields are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SailError, SailResult};
use crate::sail::SailConfig;
use crate::sim::perturb::PerturbationAxis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { steps: 2_000 } // 2 s at the default timestep
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduledPerturbation {
    /// Applied just before this step (0 = before the first step).
    pub at_step: usize,
    pub axis: PerturbationAxis,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub sail: SailConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub perturbations: Vec<ScheduledPerturbation>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> SailResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a scenario from YAML text.
    pub fn from_yaml(yaml: &str) -> SailResult<Self> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml(&self) -> SailResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> SailResult<()> {
        self.sail.validate()?;
        for p in &self.perturbations {
            if !p.delta.is_finite() {
                return Err(SailError::invalid(p.axis.as_str(), p.delta, "perturbation must be finite"));
            }
        }
        Ok(())
    }
}
