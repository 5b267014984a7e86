use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const SPEED_OF_LIGHT: f64 = 3.0e8; // m/s

// Component indices shared by `pos`, `vel`, `angle` and `omega`. Plane 0 is
// the axial displacement with its yaw tilt, plane 1 the lateral displacement
// with its pitch tilt.
pub const AXIAL: usize = 0;
pub const LATERAL: usize = 1;
pub const YAW: usize = 0;
pub const PITCH: usize = 1;

// ---------------------------------------------------------------------------
// Sail state: in-plane position, velocity, tilt, tilt rate
// ---------------------------------------------------------------------------

/// Dynamical state of the sail at a single point in time.
///
/// Spin about the symmetry axis is an imposed input (see `SailConfig`), so it
/// does not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub time: f64,             // s
    pub pos: Vector2<f64>,     // m     [axial, lateral]
    pub vel: Vector2<f64>,     // m/s   [axial, lateral]
    pub angle: Vector2<f64>,   // rad   [yaw, pitch]
    pub omega: Vector2<f64>,   // rad/s [yaw rate, pitch rate]
}

impl Default for State {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl State {
    pub fn zeroed() -> Self {
        State {
            time: 0.0,
            pos: Vector2::zeros(),
            vel: Vector2::zeros(),
            angle: Vector2::zeros(),
            omega: Vector2::zeros(),
        }
    }

    pub fn axial(&self) -> f64 {
        self.pos[AXIAL]
    }

    pub fn lateral(&self) -> f64 {
        self.pos[LATERAL]
    }

    pub fn yaw(&self) -> f64 {
        self.angle[YAW]
    }

    pub fn pitch(&self) -> f64 {
        self.angle[PITCH]
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.pos.iter().all(|v| v.is_finite())
            && self.vel.iter().all(|v| v.is_finite())
            && self.angle.iter().all(|v| v.is_finite())
            && self.omega.iter().all(|v| v.is_finite())
    }

    /// Sail position in the render frame `[beam, lateral, axial]`.
    pub fn render_position(&self) -> Vector3<f64> {
        Vector3::new(0.0, self.lateral(), self.axial())
    }

    /// Unit normal of the sail's cutoff plane in the render frame.
    pub fn sail_normal(&self) -> Vector3<f64> {
        let (p, y) = (self.pitch(), self.yaw());
        Vector3::new(p.cos() * y.cos(), p.sin() * y.cos(), y.sin())
    }

    /// Cutoff plane as `(normal, constant)` with `normal · x + constant = 0`.
    pub fn cutoff_plane(&self) -> (Vector3<f64>, f64) {
        let n = self.sail_normal();
        let d = n.dot(&self.render_position());
        (n, -d)
    }
}

// ---------------------------------------------------------------------------
// Instantaneous accelerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accel {
    pub dvel: Vector2<f64>,   // m/s^2   [axial, lateral]
    pub domega: Vector2<f64>, // rad/s^2 [yaw, pitch]
}

impl Accel {
    pub fn zeros() -> Self {
        Accel {
            dvel: Vector2::zeros(),
            domega: Vector2::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_is_default_and_finite() {
        let s = State::zeroed();
        assert_eq!(s, State::default());
        assert!(s.is_finite());
    }

    #[test]
    fn nan_anywhere_is_not_finite() {
        let mut s = State::zeroed();
        s.omega[PITCH] = f64::NAN;
        assert!(!s.is_finite());
    }

    #[test]
    fn untilted_sail_faces_the_beam() {
        let mut s = State::zeroed();
        s.pos[LATERAL] = 0.3;
        let (n, d) = s.cutoff_plane();
        assert!((n - Vector3::x()).norm() < 1e-12);
        // Normal is along the beam, lateral offset does not move the plane.
        assert!(d.abs() < 1e-12);
    }

    #[test]
    fn yaw_tilts_normal_toward_axial() {
        let mut s = State::zeroed();
        s.angle[YAW] = 0.1;
        s.pos[AXIAL] = 2.0;
        let (n, d) = s.cutoff_plane();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.z - 0.1_f64.sin()).abs() < 1e-12);
        assert!((d + 2.0 * 0.1_f64.sin()).abs() < 1e-12);
    }
}
