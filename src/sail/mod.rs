pub mod params;
pub mod store;

pub use params::{presets, DerivedParams, ParamName, SailConfig, SailConfigBuilder};
pub use store::ParameterStore;
