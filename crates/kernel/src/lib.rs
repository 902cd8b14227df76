pub mod error;
pub mod fitting;
pub mod geometry;

pub use error::GeometryError;
pub use fitting::{FitConfig, PlaneFitConfig, SphereFit, fit_sphere};
pub use geometry::SurfaceEval;
pub use geometry::circle::Circle;
pub use geometry::plane::Plane;
pub use geometry::point::Point3d;
pub use geometry::sphere::Sphere;
pub use geometry::transform::{BoundingBox, Transform};
pub use geometry::vector::Vec3;

/// Sentinel stored in coordinates and scalars that have not been set.
///
/// Kept finite so that unset values survive serialization and compare equal.
pub const UNSET_VALUE: f64 = -1.234_321_012_343_21e308;

/// `sqrt(f64::EPSILON)`, the noise floor used by iterative fits.
pub const SQRT_EPSILON: f64 = 1.490_116_119_384_765_6e-8;

/// True when `x` is finite and not [`UNSET_VALUE`].
pub fn is_valid_double(x: f64) -> bool {
    x.is_finite() && x != UNSET_VALUE
}

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
    /// Lengths below this are treated as exactly zero (frame validation, axis checks).
    pub zero: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            angular: 1e-10,
            zero: 1e-12,
        }
    }
}

impl Tolerance {
    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.zero
    }

    pub fn is_zero_angle(&self, angle: f64) -> bool {
        angle.abs() < self.angular
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_epsilon_matches_machine_epsilon() {
        assert!((SQRT_EPSILON - f64::EPSILON.sqrt()).abs() < 1e-22);
    }

    #[test]
    fn test_unset_is_not_valid_double() {
        assert!(!is_valid_double(UNSET_VALUE));
        assert!(!is_valid_double(f64::NAN));
        assert!(!is_valid_double(f64::INFINITY));
        assert!(is_valid_double(0.0));
        assert!(is_valid_double(-1e300));
    }

    #[test]
    fn test_tolerance_thresholds() {
        let tol = default_tolerance();
        assert!(tol.is_zero_angle(1e-11));
        assert!(tol.is_zero_angle(-1e-11));
        assert!(!tol.is_zero_angle(1e-6));
        assert!(tol.is_zero_length(1e-13));
        assert!(!tol.is_zero_length(1e-6));
    }
}
