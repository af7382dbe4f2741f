//! Core point/vector aliases and the geometry error type.

/// Position in sensor space (millimeters for the reference depth sensor).
pub type Point3 = nalgebra::Point3<f64>;

/// Displacement or direction in sensor space.
pub type Vector3 = nalgebra::Vector3<f64>;

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors raised by the geometry primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A vector that must be normalized has (near) zero length.
    ZeroNorm,
    /// The two points defining a line coincide.
    DegenerateLine,
    /// Too few points for the requested fit.
    TooFewPoints {
        /// Required minimum number of points.
        needed: usize,
        /// Provided number of points.
        got: usize,
    },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroNorm => write!(f, "vector norm is zero"),
            Self::DegenerateLine => write!(f, "line points coincide"),
            Self::TooFewPoints { needed, got } => {
                write!(f, "too few points: need {}, got {}", needed, got)
            }
        }
    }
}

impl std::error::Error for GeometryError {}
