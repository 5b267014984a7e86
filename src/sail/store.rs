use log::debug;

use super::params::{DerivedParams, ParamName, SailConfig};
use crate::error::SailResult;

// ---------------------------------------------------------------------------
// Parameter store: configuration plus its derived snapshot
// ---------------------------------------------------------------------------

/// Holds a validated `SailConfig` and the `DerivedParams` computed from it.
/// The two are only ever replaced together.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    config: SailConfig,
    derived: DerivedParams,
}

impl ParameterStore {
    pub fn new(config: SailConfig) -> SailResult<Self> {
        config.validate()?;
        let derived = DerivedParams::derive(&config);
        Ok(Self { config, derived })
    }

    pub fn config(&self) -> &SailConfig {
        &self.config
    }

    pub fn derived(&self) -> DerivedParams {
        self.derived
    }

    /// Set a parameter by its UI or config-file name.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> SailResult<()> {
        let name: ParamName = name.parse()?;
        self.set(name, value)
    }

    /// Validate, store and re-derive. On error nothing changes.
    pub fn set(&mut self, name: ParamName, value: f64) -> SailResult<()> {
        name.check(value)?;
        let config = self.config.with(name, value);
        DerivedParams::derive(&config).check(&config)?;
        self.derived = DerivedParams::derive(&config);
        self.config = config;
        debug!(
            "{} = {} (scale {:.4}, F_rad {:.4e} N)",
            name, value, self.derived.radius_scale_factor, self.derived.radiation_force
        );
        Ok(())
    }

    /// Replace the whole configuration at once.
    pub fn replace(&mut self, config: SailConfig) -> SailResult<()> {
        *self = ParameterStore::new(config)?;
        Ok(())
    }
}
