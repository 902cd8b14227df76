use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// Relative tolerance used when deciding whether a linear map is a similarity.
const SIMILARITY_TOLERANCE: f64 = 1e-9;

/// A 4x4 affine transformation matrix stored in column-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Column-major 4x4 matrix entries.
    pub m: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::scaling(1.0, 1.0, 1.0)
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut t = Self::identity();
        t.m[12] = dx;
        t.m[13] = dy;
        t.m[14] = dz;
        t
    }

    pub fn from_translation_vec(v: Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        #[rustfmt::skip]
        let m = [
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    pub fn uniform_scaling(s: f64) -> Self {
        Self::scaling(s, s, s)
    }

    /// Rotation by the angle whose sine and cosine are given, about `axis`
    /// through `center` (Rodrigues' formula).
    ///
    /// Passing sin/cos directly keeps composed rotations such as quarter
    /// turns exact. Returns `None` when `axis` has zero length.
    pub fn rotation(sin_angle: f64, cos_angle: f64, axis: Vec3, center: Point3d) -> Option<Self> {
        let axis = axis.normalized()?;
        let (s, c) = (sin_angle, cos_angle);
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);

        #[rustfmt::skip]
        let mut m = [
            t*x*x + c,     t*x*y + s*z,   t*x*z - s*y,   0.0,
            t*x*y - s*z,   t*y*y + c,     t*y*z + s*x,   0.0,
            t*x*z + s*y,   t*y*z - s*x,   t*z*z + c,     0.0,
            0.0,           0.0,           0.0,           1.0,
        ];

        // Fix the center: translation = center - R * center.
        let rotation = Self { m };
        let moved = rotation.transform_vector(&center.to_vec3());
        m[12] = center.x - moved.x;
        m[13] = center.y - moved.y;
        m[14] = center.z - moved.z;
        Some(Self { m })
    }

    /// Rotation by `angle` radians about `axis` through `center`.
    pub fn rotation_axis_angle(angle: f64, axis: Vec3, center: Point3d) -> Option<Self> {
        Self::rotation(angle.sin(), angle.cos(), axis, center)
    }

    /// Matrix element access (row, col), 0-indexed.
    fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    /// Transform a point (applies translation).
    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let x = self.at(0, 0) * p.x + self.at(0, 1) * p.y + self.at(0, 2) * p.z + self.at(0, 3);
        let y = self.at(1, 0) * p.x + self.at(1, 1) * p.y + self.at(1, 2) * p.z + self.at(1, 3);
        let z = self.at(2, 0) * p.x + self.at(2, 1) * p.y + self.at(2, 2) * p.z + self.at(2, 3);
        Point3d::new(x, y, z)
    }

    /// Transform a vector (no translation).
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let x = self.at(0, 0) * v.x + self.at(0, 1) * v.y + self.at(0, 2) * v.z;
        let y = self.at(1, 0) * v.x + self.at(1, 1) * v.y + self.at(1, 2) * v.z;
        let z = self.at(2, 0) * v.x + self.at(2, 1) * v.y + self.at(2, 2) * v.z;
        Vec3::new(x, y, z)
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        let mut result = [0.0f64; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += next.at(row, k) * self.at(k, col);
                }
                result[col * 4 + row] = sum;
            }
        }
        Transform { m: result }
    }

    /// The bottom row is `(0, 0, 0, 1)`: no projective component.
    pub fn is_affine(&self) -> bool {
        self.at(3, 0) == 0.0 && self.at(3, 1) == 0.0 && self.at(3, 2) == 0.0 && self.at(3, 3) == 1.0
    }

    /// Uniform scale factor when the transform is a similarity.
    ///
    /// A similarity is affine and its linear part is an orthogonal matrix
    /// (rotation or reflection) times a non-zero uniform scale. Anything else
    /// would turn circles into ellipses and spheres into ellipsoids.
    pub fn similarity_scale(&self) -> Option<f64> {
        if !self.is_affine() {
            return None;
        }
        let cols = [
            self.transform_vector(&Vec3::X),
            self.transform_vector(&Vec3::Y),
            self.transform_vector(&Vec3::Z),
        ];
        let s2 = cols[0].length_squared();
        if !s2.is_finite() || s2 <= 0.0 {
            return None;
        }
        let tol = SIMILARITY_TOLERANCE * s2;
        let uniform = cols
            .iter()
            .all(|c| (c.length_squared() - s2).abs() <= tol);
        let orthogonal = cols[0].dot(&cols[1]).abs() <= tol
            && cols[1].dot(&cols[2]).abs() <= tol
            && cols[0].dot(&cols[2]).abs() <= tol;
        (uniform && orthogonal).then(|| s2.sqrt())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// A box that contains nothing; `is_valid` reports false.
    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn contains_point(&self, p: &Point3d) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Point3d {
        Point3d::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
            0.5 * (self.min.z + self.max.z),
        )
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}
