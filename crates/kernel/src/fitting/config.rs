//! Tuning knobs for the fitting routines.

use crate::SQRT_EPSILON;

/// Thresholds for deciding whether a point set spans a unique plane.
#[derive(Debug, Clone, Copy)]
pub struct PlaneFitConfig {
    /// RMS spread, relative to the centroid's distance from the origin
    /// (floored at 1), below which all points are treated as one point.
    pub coincidence_ratio: f64,
    /// Ratio of the middle to the largest covariance eigenvalue below which
    /// the points are treated as collinear.
    pub collinear_ratio: f64,
}

impl Default for PlaneFitConfig {
    fn default() -> Self {
        Self {
            coincidence_ratio: crate::default_tolerance().zero,
            collinear_ratio: 1e-12,
        }
    }
}

/// Configuration for the iterative sphere fit.
#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    /// Hard cap on refinement passes; the best estimate is returned when hit.
    pub max_iterations: usize,
    /// Points closer than this to the running center are skipped, and the
    /// fit stops once the center moves less than this in one pass.
    pub convergence: f64,
    /// Settings for the initial best-fit plane.
    pub plane: PlaneFitConfig,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2048,
            convergence: SQRT_EPSILON,
            plane: PlaneFitConfig::default(),
        }
    }
}
