//! Crate-level error type.

use crate::geometry::GeometryError;
use crate::skeleton::JointPair;

/// Errors returned by model construction, configuration and loading helpers.
///
/// Per-frame and per-pass failures (no feasible assignment, no passes, no
/// strikes) are not errors; they are recorded in the result instead.
#[derive(Debug)]
pub enum GaitError {
    /// Not enough valid input to estimate something.
    InsufficientData {
        /// What was being estimated, e.g. `"link hip-knee"`.
        what: String,
        /// Required minimum count.
        needed: usize,
        /// Available count.
        found: usize,
    },
    /// A configuration value is out of range or inconsistent.
    InvalidConfig(String),
    /// A link required by the selector is absent from the length model.
    MissingLink(JointPair),
    /// Degenerate geometry in a step that cannot recover locally.
    Geometry(GeometryError),
    /// File could not be read.
    Io(std::io::Error),
    /// File content is not valid JSON for the expected type.
    Json(serde_json::Error),
}

impl std::fmt::Display for GaitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientData {
                what,
                needed,
                found,
            } => write!(
                f,
                "insufficient data for {}: need {} valid frames, found {}",
                what, needed, found
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::MissingLink(pair) => write!(f, "link {} is missing from the length model", pair),
            Self::Geometry(e) => write!(f, "geometry error: {}", e),
            Self::Io(e) => write!(f, "i/o error: {}", e),
            Self::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for GaitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for GaitError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<std::io::Error> for GaitError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for GaitError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
