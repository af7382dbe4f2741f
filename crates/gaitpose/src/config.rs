//! Top-level analysis configuration.

use std::path::Path;

use crate::error::GaitError;
use crate::gait::GaitEventConfig;
use crate::geometry::{self, Vector3};
use crate::lengths::LengthConfig;
use crate::passes::PassConfig;
use crate::pose::SelectorConfig;

/// Everything the pipeline needs besides the length model and the frames.
///
/// Partial JSON files are accepted; missing fields take their defaults.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GaitConfig {
    /// Video frame rate (frames per second).
    pub frame_rate: f64,
    /// Multiplier from sensor units to output length units.
    pub unit_scale: f64,
    /// Up direction in sensor space; the floor plane is orthogonal to it.
    pub up: [f64; 3],
    /// Link-length estimation.
    pub lengths: LengthConfig,
    /// Candidate selection, outlier rejection and side tracking.
    pub selector: SelectorConfig,
    /// Walking-pass segmentation.
    pub passes: PassConfig,
    /// Foot-strike detection.
    pub events: GaitEventConfig,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            unit_scale: 1.0,
            up: [0.0, 1.0, 0.0],
            lengths: LengthConfig::default(),
            selector: SelectorConfig::default(),
            passes: PassConfig::default(),
            events: GaitEventConfig::default(),
        }
    }
}

impl GaitConfig {
    /// Load from a JSON file and validate.
    pub fn from_json_file(path: &Path) -> Result<Self, GaitError> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GaitError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(GaitError::InvalidConfig(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(GaitError::InvalidConfig(format!(
                "unit_scale must be positive, got {}",
                self.unit_scale
            )));
        }
        self.up_vector()?;
        self.lengths.validate()?;
        self.selector.validate()?;
        self.passes.validate()?;
        self.events.validate()
    }

    /// Normalized `up`.
    pub fn up_vector(&self) -> Result<Vector3, GaitError> {
        Ok(geometry::unit(&Vector3::from(self.up))?)
    }
}
