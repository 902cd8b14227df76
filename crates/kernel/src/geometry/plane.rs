use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SurfaceEval;
use super::point::Point3d;
use super::transform::Transform;
use super::vector::Vec3;
use crate::error::GeometryError;
use crate::{SQRT_EPSILON, UNSET_VALUE};

const UNSET_VEC: Vec3 = Vec3 {
    x: UNSET_VALUE,
    y: UNSET_VALUE,
    z: UNSET_VALUE,
};

/// An oriented coordinate frame: origin plus a right-handed orthonormal
/// basis. The z-axis is the plane normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
}

impl Plane {
    /// A plane with every member unset.
    pub const UNSET: Self = Self {
        origin: Point3d::UNSET,
        x_axis: UNSET_VEC,
        y_axis: UNSET_VEC,
        z_axis: UNSET_VEC,
    };

    pub fn world_xy() -> Self {
        Self {
            origin: Point3d::ORIGIN,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            z_axis: Vec3::Z,
        }
    }

    /// Build a frame from an x direction and a second in-plane direction.
    ///
    /// `y_dir` only needs to be non-parallel to `x_dir`; it is made
    /// orthogonal to the x-axis. Returns `None` for degenerate input.
    pub fn from_frame(origin: Point3d, x_dir: Vec3, y_dir: Vec3) -> Option<Self> {
        let x_axis = x_dir.normalized()?;
        let y_axis = (y_dir - x_axis * y_dir.dot(&x_axis)).normalized()?;
        let z_axis = x_axis.cross(&y_axis).normalized()?;
        Some(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
        })
    }

    /// A plane through `origin` with the given normal and an arbitrary
    /// in-plane x-axis.
    pub fn from_normal(origin: Point3d, normal: Vec3) -> Option<Self> {
        let z_axis = normal.normalized()?;
        let x_axis = z_axis.perpendicular()?;
        let y_axis = z_axis.cross(&x_axis);
        Some(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
        })
    }

    /// Origin is set and the axes form a right-handed orthonormal frame.
    pub fn is_valid(&self) -> bool {
        if !self.origin.is_valid()
            || !self.x_axis.is_valid()
            || !self.y_axis.is_valid()
            || !self.z_axis.is_valid()
        {
            return false;
        }
        let unit = |v: &Vec3| (v.length() - 1.0).abs() <= SQRT_EPSILON;
        if !unit(&self.x_axis) || !unit(&self.y_axis) || !unit(&self.z_axis) {
            return false;
        }
        let orthogonal = self.x_axis.dot(&self.y_axis).abs() <= SQRT_EPSILON
            && self.y_axis.dot(&self.z_axis).abs() <= SQRT_EPSILON
            && self.z_axis.dot(&self.x_axis).abs() <= SQRT_EPSILON;
        orthogonal && self.x_axis.cross(&self.y_axis).dot(&self.z_axis) > 0.0
    }

    pub fn normal(&self) -> Vec3 {
        self.z_axis
    }

    pub fn point_at(&self, u: f64, v: f64) -> Point3d {
        self.origin + self.x_axis * u + self.y_axis * v
    }

    /// In-plane `(u, v)` coordinates of the projection of `p`.
    pub fn closest_parameter(&self, p: &Point3d) -> Option<(f64, f64)> {
        if !p.is_valid() {
            return None;
        }
        let v = *p - self.origin;
        Some((v.dot(&self.x_axis), v.dot(&self.y_axis)))
    }

    pub fn closest_point(&self, p: &Point3d) -> Point3d {
        *p - self.z_axis * self.distance_to(p)
    }

    /// Signed distance from the plane; positive on the z-axis side.
    pub fn distance_to(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.z_axis)
    }

    /// Rotate the frame about `axis` through `center`.
    pub fn rotate(
        &mut self,
        sin_angle: f64,
        cos_angle: f64,
        axis: Vec3,
        center: Point3d,
    ) -> Result<(), GeometryError> {
        let xform = Transform::rotation(sin_angle, cos_angle, axis, center).ok_or_else(|| {
            debug!(?axis, "rejecting rotation about zero-length axis");
            GeometryError::DegenerateAxis
        })?;
        self.origin = xform.transform_point(&self.origin);
        self.x_axis = xform.transform_vector(&self.x_axis);
        self.y_axis = xform.transform_vector(&self.y_axis);
        self.z_axis = xform.transform_vector(&self.z_axis);
        Ok(())
    }

    pub fn translate(&mut self, delta: Vec3) -> Result<(), GeometryError> {
        if !delta.is_valid() {
            return Err(GeometryError::invalid_argument("translation vector is not finite"));
        }
        self.origin = self.origin + delta;
        Ok(())
    }

    /// Apply an affine transform, re-orthonormalizing the mapped axes.
    ///
    /// The z-axis is rebuilt as `x cross y`, so mirror transforms keep the
    /// frame right-handed. Leaves `self` untouched on failure.
    pub fn transform(&mut self, xform: &Transform) -> Result<(), GeometryError> {
        let origin = xform.transform_point(&self.origin);
        let x_dir = xform.transform_vector(&self.x_axis);
        let y_dir = xform.transform_vector(&self.y_axis);
        let moved = Plane::from_frame(origin, x_dir, y_dir)
            .filter(Plane::is_valid)
            .ok_or(GeometryError::InvalidPlane)?;
        *self = moved;
        Ok(())
    }
}

impl SurfaceEval for Plane {
    fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.point_at(u, v)
    }

    fn normal_at(&self, _u: f64, _v: f64) -> Vec3 {
        self.z_axis
    }
}
