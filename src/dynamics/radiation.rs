use nalgebra::Vector2;

use crate::dynamics::state::{Accel, State};
use crate::error::{SailError, SailResult};
use crate::sail::{DerivedParams, SailConfig};

// Sign of the gyroscopic term per plane: [yaw, pitch].
const GYRO_SIGN: [f64; 2] = [-1.0, 1.0];

// ---------------------------------------------------------------------------
// Radiation-pressure equations of motion
// ---------------------------------------------------------------------------

/// Compute translational and angular accelerations of the sail.
///
/// Both planes are handled by the same expressions with roles swapped. For
/// plane k with displacement x, tilt theta and lever x + L_c * theta:
///   1. Gyroscopic coupling with the imposed spin: (I3 - I) * omega_other * omega_z
///   2. Radiation torque about the lever:          F/2 * lever
///   3. Curvature correction:                      -F/2 * (L_c / R) * lever
///   4. Translation: (F * theta - F / (2R) * lever) / m
pub fn accelerations(state: &State, config: &SailConfig, derived: &DerivedParams) -> SailResult<Accel> {
    let m = config.total_mass;
    let r = derived.effective_radius;
    if !(m > 0.0) {
        return Err(degenerate(state, "total mass is not positive"));
    }
    if !(r > 0.0) {
        return Err(degenerate(state, "effective radius is not positive"));
    }

    let l_c = config.center_of_mass_offset;
    let f = derived.radiation_force;
    let i = derived.inertia_transverse;
    let i3 = derived.inertia_axial;
    let spin = config.spin_rate;

    let mut accel = Accel::zeros();
    for k in 0..2 {
        let other = 1 - k;
        let lever = state.pos[k] + l_c * state.angle[k];

        let gyro = GYRO_SIGN[k] * (i3 - i) * state.omega[other] * spin;
        let restoring = 0.5 * f * lever;
        let correction = -0.5 * f * (l_c / r) * lever;
        let torque = gyro + restoring + correction;

        accel.domega[k] = if i > 0.0 {
            torque / i
        } else if torque == 0.0 {
            // Massless lever and nothing to turn it.
            0.0
        } else {
            return Err(degenerate(state, "torque on a zero transverse inertia"));
        };

        accel.dvel[k] = (f * state.angle[k] - 0.5 * f / r * lever) / m;
    }

    if !finite(&accel.dvel) || !finite(&accel.domega) {
        return Err(degenerate(state, "non-finite acceleration"));
    }
    Ok(accel)
}

fn finite(v: &Vector2<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

fn degenerate(state: &State, reason: &'static str) -> SailError {
    SailError::DegenerateStep { time: state.time, reason }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
