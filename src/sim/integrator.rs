use crate::dynamics;
use crate::dynamics::state::State;
use crate::error::{SailError, SailResult};
use crate::sail::{DerivedParams, SailConfig};

// ---------------------------------------------------------------------------
// Semi-implicit (symplectic) Euler
// ---------------------------------------------------------------------------

/// Advance `state` by one `config.timestep`.
///
/// Rates are kicked first with the accelerations at the current state, then
/// positions and angles drift with the updated rates. Keep this order: it is
/// what keeps the sail's oscillations bounded over long runs.
///
/// Pure: the input state is never touched, and an error means no step was
/// taken.
pub fn step(state: &State, config: &SailConfig, derived: &DerivedParams) -> SailResult<State> {
    let dt = config.timestep;
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(SailError::DegenerateStep {
            time: state.time,
            reason: "timestep is not positive",
        });
    }

    let a = dynamics::accelerations(state, config, derived)?;

    let omega = state.omega + a.domega * dt;
    let vel = state.vel + a.dvel * dt;

    let next = State {
        time: state.time + dt,
        pos: state.pos + vel * dt,
        vel,
        angle: state.angle + omega * dt,
        omega,
    };

    if !next.is_finite() {
        return Err(SailError::DegenerateStep {
            time: state.time,
            reason: "step produced a non-finite state",
        });
    }
    Ok(next)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
