pub mod circle;
pub mod plane;
pub mod point;
pub mod sphere;
pub mod transform;
pub mod vector;

use point::Point3d;
use vector::Vec3;

/// Parametric surface evaluation shared by the analytic surfaces.
pub trait SurfaceEval {
    /// Evaluate the surface at parameters `(u, v)`.
    fn evaluate(&self, u: f64, v: f64) -> Point3d;

    /// Unit normal at `(u, v)`.
    fn normal_at(&self, u: f64, v: f64) -> Vec3;

    /// Whether `point` lies within `tolerance` of the surface at `(u, v)`.
    fn point_on_surface(&self, point: &Point3d, u: f64, v: f64, tolerance: f64) -> bool {
        point.distance_to(&self.evaluate(u, v)) < tolerance
    }
}
