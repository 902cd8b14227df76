//! Analytic sphere described by an equatorial plane and a radius.
//!
//! Parameters are `(longitude, latitude)` in radians: longitude is measured
//! around the plane z-axis starting at the x-axis, latitude from the
//! equator toward the poles. Canonical ranges are `[0, 2PI]` and
//! `[-PI/2, PI/2]`, but every evaluator accepts any finite input.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::SurfaceEval;
use super::circle::Circle;
use super::plane::Plane;
use super::point::Point3d;
use super::transform::{BoundingBox, Transform};
use super::vector::Vec3;
use crate::error::GeometryError;
use crate::fitting::{FitConfig, fit_sphere};
use crate::{UNSET_VALUE, is_valid_double};

/// In-plane coordinates and plane distances below this are exactly zero.
const ZERO_DISTANCE: f64 = 1e-64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    plane: Plane,
    radius: f64,
}

impl Sphere {
    /// The invalid sphere. Compares equal to itself.
    pub const UNSET: Self = Self {
        plane: Plane {
            origin: Point3d::UNSET,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            z_axis: Vec3::Z,
        },
        radius: UNSET_VALUE,
    };

    /// A world-aligned sphere around `center`.
    pub fn new(center: Point3d, radius: f64) -> Self {
        let mut plane = Plane::world_xy();
        plane.origin = center;
        Self { plane, radius }
    }

    /// A sphere oriented by `equatorial_plane`, centered on its origin.
    pub fn from_plane(equatorial_plane: Plane, radius: f64) -> Self {
        Self {
            plane: equatorial_plane,
            radius,
        }
    }

    /// Best-fit sphere through `points`, or [`Sphere::UNSET`] when no fit is
    /// possible. Use [`fit_sphere`] to find out why a fit failed.
    pub fn fit_to_points(points: impl IntoIterator<Item = Point3d>) -> Self {
        let points: Vec<Point3d> = points.into_iter().collect();
        fit_sphere(&points, &FitConfig::default())
            .map(|fit| fit.sphere)
            .unwrap_or(Self::UNSET)
    }

    /// Radius is a finite positive number and the plane is a valid frame.
    pub fn is_valid(&self) -> bool {
        is_valid_double(self.radius) && self.radius > 0.0 && self.plane.is_valid()
    }

    /// World-aligned box around the sphere, empty when the center or radius
    /// is unusable.
    pub fn bounding_box(&self) -> BoundingBox {
        if !self.plane.is_valid() || !is_valid_double(self.radius) {
            return BoundingBox::empty();
        }
        let r = self.radius.abs();
        let extent = Vec3::new(r, r, r);
        BoundingBox::new(self.plane.origin - extent, self.plane.origin + extent)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn set_diameter(&mut self, diameter: f64) {
        self.radius = 0.5 * diameter;
    }

    pub fn equatorial_plane(&self) -> Plane {
        self.plane
    }

    pub fn set_equatorial_plane(&mut self, plane: Plane) {
        self.plane = plane;
    }

    pub fn center(&self) -> Point3d {
        self.plane.origin
    }

    pub fn set_center(&mut self, center: Point3d) {
        self.plane.origin = center;
    }

    pub fn north_pole(&self) -> Point3d {
        self.point_at(0.0, FRAC_PI_2)
    }

    pub fn south_pole(&self) -> Point3d {
        self.point_at(0.0, -FRAC_PI_2)
    }

    pub fn point_at(&self, longitude: f64, latitude: f64) -> Point3d {
        self.plane.origin + self.normal_at(longitude, latitude) * self.radius
    }

    /// Outward unit normal. Independent of the radius.
    pub fn normal_at(&self, longitude: f64, latitude: f64) -> Vec3 {
        let equatorial = self.plane.x_axis * longitude.cos() + self.plane.y_axis * longitude.sin();
        equatorial * latitude.cos() + self.plane.z_axis * latitude.sin()
    }

    /// Circle of constant latitude, `None` at the poles where it collapses.
    pub fn latitude_radians(&self, latitude: f64) -> Option<Circle> {
        Circle::from_three_points(
            self.point_at(0.0, latitude),
            self.point_at(FRAC_PI_2, latitude),
            self.point_at(PI, latitude),
        )
    }

    pub fn latitude_degrees(&self, degrees: f64) -> Option<Circle> {
        self.latitude_radians(degrees.to_radians())
    }

    /// Great circle through both poles at the given longitude.
    pub fn longitude_radians(&self, longitude: f64) -> Option<Circle> {
        Circle::from_three_points(
            self.point_at(longitude, 0.0),
            self.north_pole(),
            self.point_at(longitude + PI, 0.0),
        )
    }

    pub fn longitude_degrees(&self, degrees: f64) -> Option<Circle> {
        self.longitude_radians(degrees.to_radians())
    }

    /// Point on the sphere nearest to `test`.
    ///
    /// Every surface point is equally close to the center, so `test == center`
    /// returns the north pole. Meaningless on an invalid sphere.
    pub fn closest_point(&self, test: &Point3d) -> Point3d {
        match (*test - self.plane.origin).normalized() {
            Some(dir) => self.plane.origin + dir * self.radius,
            None => self.north_pole(),
        }
    }

    /// `(longitude, latitude)` of the surface point nearest to `test`.
    ///
    /// Longitude lands in `[0, 2PI)`. Points on the polar axis report
    /// longitude 0 and latitude `+-PI/2` by the side of the equator they are
    /// on; points on the equatorial plane report latitude 0.
    pub fn closest_parameter(&self, test: &Point3d) -> Result<(f64, f64), GeometryError> {
        if !test.is_valid() {
            return Err(GeometryError::invalid_argument("test point is not valid"));
        }
        if !self.is_valid() {
            return Err(GeometryError::InvalidSphere);
        }
        if *test == self.plane.origin {
            return Err(GeometryError::PointAtCenter);
        }

        let (u, v) = self
            .plane
            .closest_parameter(test)
            .ok_or(GeometryError::InvalidPlane)?;
        let dist = self.plane.distance_to(test);

        if u.abs() < ZERO_DISTANCE && v.abs() < ZERO_DISTANCE {
            let latitude = if dist >= 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
            return Ok((0.0, latitude));
        }

        let mut longitude = v.atan2(u);
        if longitude < 0.0 {
            longitude += TAU;
            // -tiny + TAU can round up to TAU itself.
            if longitude >= TAU {
                longitude = 0.0;
            }
        }

        let radial = *test - self.plane.origin;
        let latitude = if dist > ZERO_DISTANCE {
            FRAC_PI_2 - self.plane.z_axis.angle_to(&radial)
        } else if dist < -ZERO_DISTANCE {
            -FRAC_PI_2 + (-self.plane.z_axis).angle_to(&radial)
        } else {
            0.0
        };
        Ok((longitude, latitude))
    }

    /// Rotate about `axis` through the sphere's own center.
    pub fn rotate_sin_cos(
        &mut self,
        sin_angle: f64,
        cos_angle: f64,
        axis: Vec3,
    ) -> Result<(), GeometryError> {
        let center = self.plane.origin;
        self.rotate_about_sin_cos(sin_angle, cos_angle, axis, center)
    }

    pub fn rotate(&mut self, angle: f64, axis: Vec3) -> Result<(), GeometryError> {
        self.rotate_sin_cos(angle.sin(), angle.cos(), axis)
    }

    /// Rotate about `axis` through `center`; the sphere orbits `center` when
    /// it is not the sphere's own center.
    pub fn rotate_about_sin_cos(
        &mut self,
        sin_angle: f64,
        cos_angle: f64,
        axis: Vec3,
        center: Point3d,
    ) -> Result<(), GeometryError> {
        self.plane.rotate(sin_angle, cos_angle, axis, center)
    }

    pub fn rotate_about(
        &mut self,
        angle: f64,
        axis: Vec3,
        center: Point3d,
    ) -> Result<(), GeometryError> {
        self.rotate_about_sin_cos(angle.sin(), angle.cos(), axis, center)
    }

    pub fn translate(&mut self, delta: Vec3) -> Result<(), GeometryError> {
        self.plane.translate(delta)
    }

    pub fn translated(&self, delta: Vec3) -> Result<Self, GeometryError> {
        let mut moved = *self;
        moved.translate(delta)?;
        Ok(moved)
    }

    /// Apply a similarity transform by mapping the equatorial great circle.
    ///
    /// Non-uniform scale or shear would produce an ellipsoid and fails with
    /// [`GeometryError::NotSimilarity`]; the sphere is unchanged on failure.
    pub fn transform(&mut self, xform: &Transform) -> Result<(), GeometryError> {
        let mut equator = Circle::new(self.plane, self.radius);
        equator.transform(xform)?;
        self.plane = equator.plane;
        self.radius = equator.radius;
        Ok(())
    }

    pub fn transformed(&self, xform: &Transform) -> Result<Self, GeometryError> {
        let mut moved = *self;
        moved.transform(xform)?;
        Ok(moved)
    }
}

impl SurfaceEval for Sphere {
    fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.point_at(u, v)
    }

    fn normal_at(&self, u: f64, v: f64) -> Vec3 {
        Sphere::normal_at(self, u, v)
    }
}
