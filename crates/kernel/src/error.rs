use thiserror::Error;

/// Failures raised by geometric constructions, transforms and fits.
///
/// Routine degeneracies (collinear input, zero-length axes, non-similarity
/// transforms) are reported through this type instead of panicking so that
/// batch pipelines can branch on them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Not enough data: {required} points required, {found} given")]
    InsufficientData { required: usize, found: usize },

    #[error("Rotation axis has zero length")]
    DegenerateAxis,

    #[error("Points are collinear, no unique plane exists")]
    CollinearPoints,

    #[error("Points are coincident")]
    CoincidentPoints,

    #[error("Transform is not a similarity (scale factor {scale:?})")]
    NotSimilarity { scale: Option<f64> },

    #[error("Sphere is not valid")]
    InvalidSphere,

    #[error("Plane is not valid")]
    InvalidPlane,

    #[error("Point coincides with the sphere center")]
    PointAtCenter,
}

impl GeometryError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
