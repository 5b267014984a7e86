pub mod radiation;
pub mod state;

pub use radiation::accelerations;
pub use state::{Accel, State};
