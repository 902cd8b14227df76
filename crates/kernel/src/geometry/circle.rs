use serde::{Deserialize, Serialize};
use tracing::debug;

use super::plane::Plane;
use super::point::Point3d;
use super::transform::Transform;
use super::vector::Vec3;
use crate::error::GeometryError;
use crate::{default_tolerance, is_valid_double};

/// A circle lying in `plane`, centered on the plane origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub plane: Plane,
    pub radius: f64,
}

impl Circle {
    pub fn new(plane: Plane, radius: f64) -> Self {
        Self { plane, radius }
    }

    /// The unique circle through three points.
    ///
    /// The plane x-axis points from the center toward `p0`. Returns `None`
    /// when the points are coincident or collinear.
    pub fn from_three_points(p0: Point3d, p1: Point3d, p2: Point3d) -> Option<Self> {
        let tol = default_tolerance();
        let a = p1 - p0;
        let b = p2 - p0;
        if [a, b, p2 - p1].iter().any(|side| tol.is_zero_length(side.length())) {
            return None;
        }
        let n = a.cross(&b);
        let n2 = n.length_squared();
        // |n| = |a||b| sin(angle); a vanishing angle means collinear input.
        if !n2.is_finite() || tol.is_zero_angle(n.length() / (a.length() * b.length())) {
            return None;
        }
        // Circumcenter relative to p0.
        let offset =
            (b.cross(&n) * a.length_squared() + n.cross(&a) * b.length_squared()) / (2.0 * n2);
        let center = p0 + offset;
        let plane = Plane::from_frame(center, -offset, n.cross(&-offset))?;
        Some(Self {
            plane,
            radius: offset.length(),
        })
    }

    pub fn center(&self) -> Point3d {
        self.plane.origin
    }

    pub fn normal(&self) -> Vec3 {
        self.plane.z_axis
    }

    pub fn is_valid(&self) -> bool {
        is_valid_double(self.radius) && self.radius > 0.0 && self.plane.is_valid()
    }

    /// Evaluate at angle `t` (radians) measured from the plane x-axis.
    pub fn point_at(&self, t: f64) -> Point3d {
        self.plane.origin
            + self.plane.x_axis * (self.radius * t.cos())
            + self.plane.y_axis * (self.radius * t.sin())
    }

    pub fn circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius.abs()
    }

    /// Apply a similarity transform; the radius scales by the uniform factor.
    ///
    /// Non-uniform scale, shear or projective maps are rejected since the
    /// image would not be a circle. Leaves `self` untouched on failure.
    pub fn transform(&mut self, xform: &Transform) -> Result<(), GeometryError> {
        let Some(scale) = xform.similarity_scale() else {
            debug!("rejecting non-similarity transform of circle");
            return Err(GeometryError::NotSimilarity { scale: None });
        };
        let mut plane = self.plane;
        plane.transform(xform)?;
        self.plane = plane;
        self.radius *= scale;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_three_point_circle() {
        let c = Circle::from_three_points(
            Point3d::new(1.0, 0.0, 2.0),
            Point3d::new(0.0, 1.0, 2.0),
            Point3d::new(-1.0, 0.0, 2.0),
        )
        .unwrap();
        assert!(c.is_valid());
        assert_abs_diff_eq!(c.center(), Point3d::new(0.0, 0.0, 2.0), epsilon = 1e-12);
        assert!((c.radius - 1.0).abs() < 1e-12);
        assert_abs_diff_eq!(c.normal(), Vec3::Z, epsilon = 1e-12);
        assert_abs_diff_eq!(c.point_at(0.0), Point3d::new(1.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_three_point_circle_passes_through_inputs() {
        let pts = [
            Point3d::new(3.0, -1.0, 0.5),
            Point3d::new(-2.0, 4.0, 1.0),
            Point3d::new(0.5, 0.5, -3.0),
        ];
        let c = Circle::from_three_points(pts[0], pts[1], pts[2]).unwrap();
        for p in pts {
            assert!((p.distance_to(&c.center()) - c.radius).abs() < 1e-9);
            assert!(c.plane.distance_to(&p).abs() < 1e-9);
        }
    }

    #[test]
    fn test_collinear_points_have_no_circle() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 1.0, 1.0);
        let c = Point3d::new(3.0, 3.0, 3.0);
        assert!(Circle::from_three_points(a, b, c).is_none());
        assert!(Circle::from_three_points(a, a, a).is_none());
    }

    #[test]
    fn test_transform_scales_radius() {
        let mut c = Circle::new(Plane::world_xy(), 2.0);
        let xform = Transform::uniform_scaling(3.0).then(&Transform::translation(0.0, 0.0, 1.0));
        c.transform(&xform).unwrap();
        assert!((c.radius - 6.0).abs() < 1e-12);
        assert_abs_diff_eq!(c.center(), Point3d::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert!((c.circumference() - 12.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_transform_rejects_non_uniform_scale() {
        let mut c = Circle::new(Plane::world_xy(), 2.0);
        let before = c;
        let err = c.transform(&Transform::scaling(1.0, 2.0, 1.0)).unwrap_err();
        assert!(matches!(err, GeometryError::NotSimilarity { .. }));
        assert_eq!(c, before);
    }
}
