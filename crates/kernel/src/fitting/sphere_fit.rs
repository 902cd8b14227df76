use tracing::{debug, instrument};

use super::config::FitConfig;
use super::plane_fit::fit_plane;
use crate::error::GeometryError;
use crate::geometry::point::Point3d;
use crate::geometry::sphere::Sphere;
use crate::geometry::vector::Vec3;

/// Fewest points [`fit_sphere`] accepts.
pub const MIN_SPHERE_POINTS: usize = 2;

/// Outcome of a sphere fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereFit {
    /// Fitted sphere, oriented by the best-fit plane of the input.
    pub sphere: Sphere,
    /// Refinement passes actually run.
    pub iterations: usize,
    /// False when the iteration cap was hit before the center settled.
    pub converged: bool,
    /// RMS of the signed point-to-surface distances.
    pub rms_deviation: f64,
}

/// Fit a sphere to an unordered point cloud.
///
/// Starting from the centroid, each pass moves the center to
/// `mean + mean_length * mean_inward_direction`, where the means run over
/// every point farther than `config.convergence` from the current center.
/// The true center of points lying exactly on a sphere is a fixed point of
/// this update. Stops once the center moves less than `config.convergence`
/// or after `config.max_iterations` passes; hitting the cap still returns
/// the latest estimate with `converged == false`.
///
/// The equatorial plane takes its orientation from the best-fit plane of
/// the points, so fitting fails on collinear or coincident input.
#[instrument(skip_all, fields(count = points.len()))]
pub fn fit_sphere(points: &[Point3d], config: &FitConfig) -> Result<SphereFit, GeometryError> {
    if config.max_iterations == 0 {
        return Err(GeometryError::invalid_argument("max_iterations must be at least 1"));
    }
    if let Some(index) = points.iter().position(|p| !p.is_valid()) {
        return Err(GeometryError::invalid_argument(format!("point {index} is not valid")));
    }
    if points.len() < MIN_SPHERE_POINTS {
        debug!("sphere fit rejected: not enough points");
        return Err(GeometryError::InsufficientData {
            required: MIN_SPHERE_POINTS,
            found: points.len(),
        });
    }

    let mut plane = fit_plane(points, &config.plane)?;
    let mean = Point3d::centroid(points).ok_or(GeometryError::InsufficientData {
        required: MIN_SPHERE_POINTS,
        found: 0,
    })?;

    let mut center = mean;
    let mut radius = 0.0;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;
        let previous = center;

        let mut length_sum = 0.0;
        let mut inward_sum = Vec3::ZERO;
        let mut kept = 0usize;
        for p in points {
            let diff = *p - center;
            let length = diff.length();
            if length > config.convergence {
                length_sum += length;
                inward_sum = inward_sum - diff / length;
                kept += 1;
            }
        }
        if kept == 0 {
            return Err(GeometryError::CoincidentPoints);
        }

        let mean_length = length_sum / kept as f64;
        let mean_inward = inward_sum / kept as f64;
        center = mean + mean_inward * mean_length;
        radius = mean_length;

        if center.distance_to(&previous) < config.convergence {
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(iterations, "sphere fit hit the iteration cap");
    }

    plane.origin = center;
    let sphere = Sphere::from_plane(plane, radius);
    if !sphere.is_valid() {
        debug!(radius, "sphere fit produced an invalid sphere");
        return Err(GeometryError::InvalidSphere);
    }

    let rms_deviation = (points
        .iter()
        .map(|p| (p.distance_to(&center) - radius).powi(2))
        .sum::<f64>()
        / points.len() as f64)
        .sqrt();

    debug!(iterations, converged, radius, rms_deviation, "sphere fit complete");
    Ok(SphereFit {
        sphere,
        iterations,
        converged,
        rms_deviation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plane::Plane;
    use approx::assert_abs_diff_eq;

    fn axis_points(center: Point3d, r: f64) -> Vec<Point3d> {
        [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z]
            .iter()
            .map(|d| center + *d * r)
            .collect()
    }

    /// Points scattered over one cap of a sphere, away from its center.
    fn cap_points(center: Point3d, r: f64) -> Vec<Point3d> {
        let mut pts = Vec::new();
        for i in 0..6 {
            for j in 1..4 {
                let lon = std::f64::consts::TAU * i as f64 / 6.0;
                let lat = 0.35 * j as f64;
                let s = Sphere::from_plane(Plane::world_xy(), r);
                pts.push(s.point_at(lon, lat) + center.to_vec3());
            }
        }
        pts
    }

    #[test]
    fn test_axis_samples_converge_immediately() {
        let fit = fit_sphere(&axis_points(Point3d::ORIGIN, 5.0), &FitConfig::default()).unwrap();
        assert!(fit.converged);
        assert_eq!(fit.iterations, 1);
        assert_abs_diff_eq!(fit.sphere.center(), Point3d::ORIGIN, epsilon = 1e-12);
        assert!((fit.sphere.radius() - 5.0).abs() < 1e-12);
        assert!(fit.rms_deviation < 1e-12);
    }

    #[test]
    fn test_cap_samples_recover_offset_sphere() {
        let center = Point3d::new(2.0, -3.0, 1.0);
        let fit = fit_sphere(&cap_points(center, 4.0), &FitConfig::default()).unwrap();
        assert!(fit.converged);
        assert!(fit.iterations > 1);
        assert!(fit.sphere.center().distance_to(&center) < 1e-5);
        assert!((fit.sphere.radius() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_iteration_cap_returns_estimate() {
        let config = FitConfig {
            max_iterations: 1,
            ..FitConfig::default()
        };
        let fit = fit_sphere(&cap_points(Point3d::ORIGIN, 4.0), &config).unwrap();
        assert!(!fit.converged);
        assert_eq!(fit.iterations, 1);
        assert!(fit.sphere.is_valid());
    }

    #[test]
    fn test_plane_orientation_carried_to_sphere() {
        let fit = fit_sphere(&cap_points(Point3d::ORIGIN, 4.0), &FitConfig::default()).unwrap();
        let plane = fit.sphere.equatorial_plane();
        assert!(plane.is_valid());
        // The cap is rotationally symmetric about z, so the least spread is along z.
        assert!(plane.z_axis.cross(&Vec3::Z).length() < 1e-9);
        assert_eq!(plane.origin, fit.sphere.center());
    }

    #[test]
    fn test_insufficient_points() {
        let config = FitConfig::default();
        assert_eq!(
            fit_sphere(&[], &config),
            Err(GeometryError::InsufficientData { required: 2, found: 0 })
        );
        assert_eq!(
            fit_sphere(&[Point3d::ORIGIN], &config),
            Err(GeometryError::InsufficientData { required: 2, found: 1 })
        );
    }

    #[test]
    fn test_degenerate_inputs() {
        let config = FitConfig::default();
        let line: Vec<Point3d> = (0..6).map(|i| Point3d::new(i as f64, 0.0, 0.0)).collect();
        assert_eq!(fit_sphere(&line, &config), Err(GeometryError::CollinearPoints));

        let p = Point3d::new(1.0, 1.0, 1.0);
        assert_eq!(fit_sphere(&[p, p, p, p], &config), Err(GeometryError::CoincidentPoints));
    }

    #[test]
    fn test_small_sphere_is_not_coincident() {
        let center = Point3d::new(1.0, 1.0, 1.0);
        let r = 5e-8;
        let fit = fit_sphere(&axis_points(center, r), &FitConfig::default()).unwrap();
        assert!(fit.converged);
        assert!(fit.sphere.center().distance_to(&center) < 1e-12);
        assert!((fit.sphere.radius() - r).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut pts = axis_points(Point3d::ORIGIN, 1.0);
        pts.push(Point3d::UNSET);
        assert!(matches!(
            fit_sphere(&pts, &FitConfig::default()),
            Err(GeometryError::InvalidArgument { .. })
        ));

        let config = FitConfig {
            max_iterations: 0,
            ..FitConfig::default()
        };
        assert!(matches!(
            fit_sphere(&axis_points(Point3d::ORIGIN, 1.0), &config),
            Err(GeometryError::InvalidArgument { .. })
        ));
    }
}
