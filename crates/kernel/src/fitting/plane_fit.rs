use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use tracing::{debug, instrument};

use super::config::PlaneFitConfig;
use crate::error::GeometryError;
use crate::geometry::plane::Plane;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;

/// Fewest points [`fit_plane`] accepts.
pub const MIN_PLANE_POINTS: usize = 2;

/// Least-squares plane through `points`.
///
/// The origin is the centroid, the z-axis is the direction of least spread
/// and the x-axis the direction of greatest spread (principal axes of the
/// covariance matrix). Fails when fewer than two points are given, or when
/// the points coincide or are collinear, since the normal is then not
/// unique.
#[instrument(skip_all, fields(count = points.len()))]
pub fn fit_plane(points: &[Point3d], config: &PlaneFitConfig) -> Result<Plane, GeometryError> {
    if points.len() < MIN_PLANE_POINTS {
        debug!("plane fit rejected: not enough points");
        return Err(GeometryError::InsufficientData {
            required: MIN_PLANE_POINTS,
            found: points.len(),
        });
    }
    let centroid = Point3d::centroid(points).ok_or(GeometryError::InsufficientData {
        required: MIN_PLANE_POINTS,
        found: 0,
    })?;

    let mut covariance = Matrix3::<f64>::zeros();
    for p in points {
        let d = *p - centroid;
        let d = Vector3::new(d.x, d.y, d.z);
        covariance += d * d.transpose();
    }

    let eigen = SymmetricEigen::new(covariance);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let [least, middle, greatest] = order.map(|i| eigen.eigenvalues[i]);

    // Spread is measured against the magnitude of the coordinates, so a
    // small cloud far from the origin is only rejected at rounding level.
    let rms_spread = ((least + middle + greatest).max(0.0) / points.len() as f64).sqrt();
    let scale = centroid.to_vec3().length().max(1.0);
    if !rms_spread.is_finite() || rms_spread <= config.coincidence_ratio * scale {
        debug!(rms_spread, scale, "plane fit rejected: coincident points");
        return Err(GeometryError::CoincidentPoints);
    }
    if middle <= config.collinear_ratio * greatest {
        debug!(middle, greatest, "plane fit rejected: collinear points");
        return Err(GeometryError::CollinearPoints);
    }

    let axis = |i: usize| {
        let c = eigen.eigenvectors.column(i);
        Vec3::new(c[0], c[1], c[2])
    };
    let normal = axis(order[0]);
    let x_dir = axis(order[2]);
    let plane = Plane::from_frame(centroid, x_dir, normal.cross(&x_dir))
        .ok_or(GeometryError::CollinearPoints)?;
    debug!(least, middle, greatest, "plane fit complete");
    Ok(plane)
}
