use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dynamics::state::SPEED_OF_LIGHT;
use crate::error::{SailError, SailResult};

// ---------------------------------------------------------------------------
// Sail configuration
// ---------------------------------------------------------------------------

/// Base sphere radius whose hemisphere has exactly the default sail area.
pub fn default_radius0() -> f64 {
    (20.0 / (4.0 * PI)).sqrt()
}

/// User-adjustable sail and laser configuration. SI units throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SailConfig {
    pub solid_angle_fraction: f64,  // cap angle as a fraction of pi, (0, 1]
    pub sail_radius0: f64,          // m, radius of the undeformed sphere
    pub center_of_mass_offset: f64, // m, L_c
    pub total_mass: f64,            // kg
    pub spin_rate: f64,             // rad/s about the symmetry axis (imposed)
    pub timestep: f64,              // s
    pub laser_power: f64,           // W
    pub sail_area: f64,             // m^2, held constant across geometry changes
}

impl Default for SailConfig {
    fn default() -> Self {
        Self {
            solid_angle_fraction: 1.0,
            sail_radius0: default_radius0(),
            center_of_mass_offset: 2.0,
            total_mass: 1.0e-3, // one gram
            spin_rate: 0.0,
            timestep: 1.0e-3,
            laser_power: 50.0e9,
            sail_area: 10.0,
        }
    }
}

impl SailConfig {
    pub fn get(&self, name: ParamName) -> f64 {
        match name {
            ParamName::SolidAngleFraction => self.solid_angle_fraction,
            ParamName::SailRadius0 => self.sail_radius0,
            ParamName::CenterOfMassOffset => self.center_of_mass_offset,
            ParamName::TotalMass => self.total_mass,
            ParamName::SpinRate => self.spin_rate,
            ParamName::Timestep => self.timestep,
            ParamName::LaserPower => self.laser_power,
            ParamName::SailArea => self.sail_area,
        }
    }

    fn slot(&mut self, name: ParamName) -> &mut f64 {
        match name {
            ParamName::SolidAngleFraction => &mut self.solid_angle_fraction,
            ParamName::SailRadius0 => &mut self.sail_radius0,
            ParamName::CenterOfMassOffset => &mut self.center_of_mass_offset,
            ParamName::TotalMass => &mut self.total_mass,
            ParamName::SpinRate => &mut self.spin_rate,
            ParamName::Timestep => &mut self.timestep,
            ParamName::LaserPower => &mut self.laser_power,
            ParamName::SailArea => &mut self.sail_area,
        }
    }

    /// Copy of `self` with one field replaced. The result is not validated.
    pub fn with(&self, name: ParamName, value: f64) -> SailConfig {
        let mut next = self.clone();
        *next.slot(name) = value;
        next
    }

    /// Check every field against its invariant, then check that the
    /// geometry it describes is a usable cap.
    pub fn validate(&self) -> SailResult<()> {
        for name in ParamName::ALL {
            name.check(self.get(name))?;
        }
        DerivedParams::derive(self).check(self)
    }
}

// ---------------------------------------------------------------------------
// Parameter names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamName {
    SolidAngleFraction,
    SailRadius0,
    CenterOfMassOffset,
    TotalMass,
    SpinRate,
    Timestep,
    LaserPower,
    SailArea,
}

impl ParamName {
    pub const ALL: [ParamName; 8] = [
        ParamName::SolidAngleFraction,
        ParamName::SailRadius0,
        ParamName::CenterOfMassOffset,
        ParamName::TotalMass,
        ParamName::SpinRate,
        ParamName::Timestep,
        ParamName::LaserPower,
        ParamName::SailArea,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::SolidAngleFraction => "solid_angle_fraction",
            ParamName::SailRadius0 => "sail_radius0",
            ParamName::CenterOfMassOffset => "center_of_mass_offset",
            ParamName::TotalMass => "total_mass",
            ParamName::SpinRate => "spin_rate",
            ParamName::Timestep => "timestep",
            ParamName::LaserPower => "laser_power",
            ParamName::SailArea => "sail_area",
        }
    }

    /// Validate a raw value for this parameter.
    pub fn check(self, value: f64) -> SailResult<()> {
        let name = self.as_str();
        if !value.is_finite() {
            return Err(SailError::invalid(name, value, "must be finite"));
        }
        match self {
            ParamName::SolidAngleFraction if !(value > 0.0 && value <= 1.0) => {
                Err(SailError::invalid(name, value, "must lie in (0, 1]"))
            }
            ParamName::SailRadius0
            | ParamName::TotalMass
            | ParamName::Timestep
            | ParamName::SailArea
                if value <= 0.0 =>
            {
                Err(SailError::invalid(name, value, "must be positive"))
            }
            ParamName::LaserPower if value < 0.0 => {
                Err(SailError::invalid(name, value, "must not be negative"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = SailError;

    /// Accepts snake_case and the camelCase names used by UI controls.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let name = match key.as_str() {
            "solidanglefraction" | "solidangle" => ParamName::SolidAngleFraction,
            "sailradius0" | "radius0" => ParamName::SailRadius0,
            "centerofmassoffset" | "com" => ParamName::CenterOfMassOffset,
            "totalmass" | "mass" => ParamName::TotalMass,
            "spinrate" | "omegax" => ParamName::SpinRate,
            "timestep" | "dt" => ParamName::Timestep,
            "laserpower" => ParamName::LaserPower,
            "sailarea" => ParamName::SailArea,
            _ => return Err(SailError::UnknownParameter(s.to_string())),
        };
        Ok(name)
    }
}

// ---------------------------------------------------------------------------
// Derived quantities
// ---------------------------------------------------------------------------

/// Quantities that follow from a `SailConfig`. Never integrated; rebuilt from
/// scratch after every configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedParams {
    pub half_angle: f64,          // rad
    pub cutoff_distance: f64,     // m, signed offset of the cutting plane from the sphere center
    pub cap_area: f64,            // m^2, cap area on the unscaled sphere
    pub radius_scale_factor: f64,
    pub effective_radius: f64,    // m, R
    pub rim_radius: f64,          // m, a
    pub pressure_flux: f64,       // N/m^2, w0
    pub radiation_force: f64,     // N, F_rad
    pub inertia_transverse: f64,  // kg m^2, I
    pub inertia_axial: f64,       // kg m^2, I3
}

impl DerivedParams {
    /// Derive from a configuration. The configuration is assumed valid.
    pub fn derive(config: &SailConfig) -> DerivedParams {
        let r0 = config.sail_radius0;
        let half_angle = config.solid_angle_fraction * PI / 2.0;
        let cutoff_distance = -r0 * half_angle.cos();
        let cap_area = spherical_cap_area(r0, half_angle);
        let radius_scale_factor = (config.sail_area / cap_area).sqrt();

        let rim_radius = radius_scale_factor * half_angle.sin() * r0;
        let pressure_flux = config.laser_power / config.sail_area / SPEED_OF_LIGHT;
        let radiation_force = 2.0 * pressure_flux * PI * rim_radius * rim_radius;

        let l = 2.0 * config.center_of_mass_offset;
        let m = config.total_mass;

        DerivedParams {
            half_angle,
            cutoff_distance,
            cap_area,
            radius_scale_factor,
            effective_radius: r0 * radius_scale_factor,
            rim_radius,
            pressure_flux,
            radiation_force,
            inertia_transverse: m * l * l / 4.0,
            inertia_axial: m * rim_radius * rim_radius / 2.0,
        }
    }

    /// Reject snapshots that cannot drive a step: an empty cap, or any
    /// quantity that overflowed.
    pub fn check(&self, config: &SailConfig) -> SailResult<()> {
        if !(self.cap_area > 0.0) {
            return Err(SailError::invalid(
                ParamName::SolidAngleFraction.as_str(),
                config.solid_angle_fraction,
                "cap has no area",
            ));
        }
        let finite = [
            self.half_angle,
            self.cutoff_distance,
            self.cap_area,
            self.radius_scale_factor,
            self.effective_radius,
            self.rim_radius,
            self.pressure_flux,
            self.radiation_force,
            self.inertia_transverse,
            self.inertia_axial,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(SailError::invalid(
                ParamName::SolidAngleFraction.as_str(),
                config.solid_angle_fraction,
                "derived geometry is not finite",
            ));
        }
        Ok(())
    }

    /// Area of the scaled cap; equals the configured sail area.
    pub fn sail_area(&self) -> f64 {
        self.radius_scale_factor * self.radius_scale_factor * self.cap_area
    }

    /// Offset of the sail mesh along the beam in the render frame.
    pub fn mesh_offset(&self) -> f64 {
        self.cutoff_distance * self.radius_scale_factor
    }
}

/// Surface area of the cap of half-angle `half_angle` on a sphere of radius
/// `r`. Equal to `2 pi r (r + cutoff)`, written so small caps keep their area
/// instead of cancelling to zero.
pub fn spherical_cap_area(r: f64, half_angle: f64) -> f64 {
    let s = (half_angle / 2.0).sin();
    4.0 * PI * r * r * s * s
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct SailConfigBuilder {
    config: SailConfig,
}

impl SailConfigBuilder {
    pub fn new() -> Self {
        Self { config: SailConfig::default() }
    }

    pub fn solid_angle_fraction(mut self, v: f64) -> Self { self.config.solid_angle_fraction = v; self }
    pub fn sail_radius0(mut self, v: f64) -> Self { self.config.sail_radius0 = v; self }
    pub fn center_of_mass_offset(mut self, v: f64) -> Self { self.config.center_of_mass_offset = v; self }
    pub fn total_mass(mut self, v: f64) -> Self { self.config.total_mass = v; self }
    pub fn spin_rate(mut self, v: f64) -> Self { self.config.spin_rate = v; self }
    pub fn timestep(mut self, v: f64) -> Self { self.config.timestep = v; self }
    pub fn laser_power(mut self, v: f64) -> Self { self.config.laser_power = v; self }
    pub fn sail_area(mut self, v: f64) -> Self { self.config.sail_area = v; self }

    pub fn build(self) -> SailResult<SailConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SailConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Preset sails
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Gram-scale hemispherical sail on a 50 GW beam.
    pub fn starchip() -> SailConfig {
        SailConfig::default()
    }

    /// Shallow cap. The flatter sphere has a larger radius, so the center of
    /// mass sits further back to stay behind the center of curvature.
    pub fn shallow_cap() -> SailConfig {
        SailConfig {
            solid_angle_fraction: 0.4,
            center_of_mass_offset: 3.0,
            ..SailConfig::default()
        }
    }

    /// Laser off: no radiation force, only gyroscopic coupling remains.
    pub fn dark() -> SailConfig {
        SailConfig {
            laser_power: 0.0,
            ..SailConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hemisphere_has_unit_scale() {
        let d = DerivedParams::derive(&SailConfig::default());
        assert!((d.half_angle - PI / 2.0).abs() < 1e-12);
        assert!(d.cutoff_distance.abs() < 1e-12);
        assert!((d.radius_scale_factor - 1.0).abs() < 1e-12);
        assert!((d.rim_radius - default_radius0()).abs() < 1e-12);
    }

    #[test]
    fn projected_area_survives_geometry_change() {
        for fraction in [0.05, 0.2, 0.5, 0.77, 1.0] {
            let config = SailConfig {
                solid_angle_fraction: fraction,
                ..SailConfig::default()
            };
            let d = DerivedParams::derive(&config);
            assert!(
                (d.sail_area() - config.sail_area).abs() < 1e-9,
                "fraction {} gave area {}",
                fraction,
                d.sail_area()
            );
        }
    }

    #[test]
    fn shallower_cap_is_scaled_up() {
        let flat = DerivedParams::derive(&presets::shallow_cap());
        assert!(flat.radius_scale_factor > 1.0);
        assert!(flat.cutoff_distance < 0.0);
    }

    #[test]
    fn radiation_force_matches_closed_form() {
        let c = SailConfig::default();
        let d = DerivedParams::derive(&c);
        // Hemisphere of area 10 m^2: a^2 = 10 / (2 pi), w0 = 50e9 / 10 / 3e8.
        let w0 = 50.0e9 / 10.0 / 3.0e8;
        let expected = 2.0 * w0 * PI * (10.0 / (2.0 * PI));
        assert!((d.pressure_flux - w0).abs() < 1e-12);
        assert!((d.radiation_force - expected).abs() < 1e-9);
    }

    #[test]
    fn inertia_from_mass_and_lever() {
        let c = SailConfig {
            total_mass: 2.0,
            center_of_mass_offset: 0.5,
            ..SailConfig::default()
        };
        let d = DerivedParams::derive(&c);
        // L = 1, I = m L^2 / 4
        assert!((d.inertia_transverse - 0.5).abs() < 1e-12);
        assert!((d.inertia_axial - 2.0 * d.rim_radius.powi(2) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn dark_sail_has_no_force() {
        let d = DerivedParams::derive(&presets::dark());
        assert_eq!(d.radiation_force, 0.0);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let base = SailConfig::default();
        assert!(base.validate().is_ok());
        assert!(base.with(ParamName::SolidAngleFraction, 0.0).validate().is_err());
        assert!(base.with(ParamName::SolidAngleFraction, 1.5).validate().is_err());
        assert!(base.with(ParamName::TotalMass, 0.0).validate().is_err());
        assert!(base.with(ParamName::SailRadius0, -1.0).validate().is_err());
        assert!(base.with(ParamName::Timestep, 0.0).validate().is_err());
        assert!(base.with(ParamName::LaserPower, -1.0).validate().is_err());
        assert!(base.with(ParamName::SpinRate, f64::NAN).validate().is_err());
        // Zero laser power and zero lever are legal.
        assert!(base.with(ParamName::LaserPower, 0.0).validate().is_ok());
        assert!(base.with(ParamName::CenterOfMassOffset, 0.0).validate().is_ok());
    }

    #[test]
    fn names_parse_in_both_cases() {
        assert_eq!("solidAngleFraction".parse::<ParamName>().unwrap(), ParamName::SolidAngleFraction);
        assert_eq!("solid_angle_fraction".parse::<ParamName>().unwrap(), ParamName::SolidAngleFraction);
        assert_eq!("centerOfMassOffset".parse::<ParamName>().unwrap(), ParamName::CenterOfMassOffset);
        assert_eq!("spinRate".parse::<ParamName>().unwrap(), ParamName::SpinRate);
        assert!(matches!(
            "wingspan".parse::<ParamName>(),
            Err(SailError::UnknownParameter(_))
        ));
        for name in ParamName::ALL {
            assert_eq!(name.as_str().parse::<ParamName>().unwrap(), name);
        }
    }

    #[test]
    fn tiny_caps_keep_their_area() {
        for fraction in [1e-4, 1e-6, 1e-9, 1e-12] {
            let config = SailConfig {
                solid_angle_fraction: fraction,
                ..SailConfig::default()
            };
            assert!(config.validate().is_ok(), "fraction {}", fraction);
            let d = DerivedParams::derive(&config);
            assert!(d.cap_area > 0.0);
            assert!(d.radius_scale_factor.is_finite());
            assert!(d.radiation_force.is_finite());
            let rel = (d.sail_area() - config.sail_area).abs() / config.sail_area;
            assert!(rel < 1e-9, "fraction {} gave area {}", fraction, d.sail_area());
        }
    }

    #[test]
    fn cap_area_matches_cutoff_form() {
        let r = default_radius0();
        for fraction in [0.1, 0.5, 1.0] {
            let half = fraction * PI / 2.0;
            let cutoff = -r * half.cos();
            let direct = 2.0 * PI * r * (r + cutoff);
            assert!((spherical_cap_area(r, half) - direct).abs() < 1e-12);
        }
    }

    #[test]
    fn vanishing_cap_is_invalid() {
        let base = SailConfig::default();
        // sin^2 underflows to zero: no cap at all.
        let empty = base.with(ParamName::SolidAngleFraction, 1e-200);
        assert_eq!(DerivedParams::derive(&empty).cap_area, 0.0);
        assert!(matches!(
            empty.validate(),
            Err(SailError::InvalidConfiguration { .. })
        ));
        // A subnormal cap area overflows the scale factor.
        let subnormal = base.with(ParamName::SolidAngleFraction, 1e-160);
        assert!(!DerivedParams::derive(&subnormal).radius_scale_factor.is_finite());
        assert!(subnormal.validate().is_err());
    }

    #[test]
    fn builder_validates() {
        assert!(SailConfigBuilder::new().total_mass(0.0).build().is_err());
        let c = SailConfigBuilder::new().spin_rate(3.0).timestep(0.01).build().unwrap();
        assert_eq!(c.spin_rate, 3.0);
        assert_eq!(c.timestep, 0.01);
    }
}
