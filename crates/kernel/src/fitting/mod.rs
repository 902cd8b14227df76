//! Least-squares fitting of analytic primitives to point clouds.

pub mod config;
pub mod plane_fit;
pub mod sphere_fit;

pub use config::{FitConfig, PlaneFitConfig};
pub use plane_fit::{MIN_PLANE_POINTS, fit_plane};
pub use sphere_fit::{MIN_SPHERE_POINTS, SphereFit, fit_sphere};
