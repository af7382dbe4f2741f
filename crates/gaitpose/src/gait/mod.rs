//! Foot-strike detection, stance phases and stride metrics per walking pass.

mod events;
mod metrics;
mod phases;

pub use events::{detect_foot_strikes, detect_peaks, FootStrike};
pub use metrics::{stride_records, GaitRecord};
pub use phases::{detect_stance, detect_stance_phases, StancePhase};

use crate::error::GaitError;
use crate::passes::WalkingPass;
use crate::pose::Trajectory;

/// Gait event detection parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GaitEventConfig {
    /// Gaussian sigma (frames) grouping above-RMS samples into one peak.
    pub peak_bandwidth: f64,
    /// Minimum frame distance between two peaks of the same foot.
    pub min_peak_separation: usize,
    /// Half width (frames) of the variance window used for stance detection.
    pub phase_half_window: usize,
    /// Shorter stance runs (samples) are treated as swing.
    pub min_stance_frames: usize,
}

impl Default for GaitEventConfig {
    fn default() -> Self {
        Self {
            peak_bandwidth: 5.0,
            min_peak_separation: 8,
            phase_half_window: 5,
            min_stance_frames: 10,
        }
    }
}

impl GaitEventConfig {
    pub fn validate(&self) -> Result<(), GaitError> {
        if !self.peak_bandwidth.is_finite() || self.peak_bandwidth <= 0.0 {
            return Err(GaitError::InvalidConfig(
                "peak_bandwidth must be positive".into(),
            ));
        }
        if self.phase_half_window == 0 {
            return Err(GaitError::InvalidConfig(
                "phase_half_window must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Strikes and stance phases detected in one pass.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PassGait {
    pub pass_index: usize,
    pub strikes: Vec<FootStrike>,
    pub stances: Vec<StancePhase>,
}

/// Detect strikes and stance phases of one pass and derive its stride
/// records.
pub fn extract_pass_gait(
    trajectory: &Trajectory,
    pass: &WalkingPass,
    config: &GaitEventConfig,
    frame_rate: f64,
    unit_scale: f64,
) -> (PassGait, Vec<GaitRecord>) {
    let strikes = detect_foot_strikes(trajectory, pass, config);
    let stances = detect_stance_phases(trajectory, pass, config);
    let records = stride_records(pass.index, &strikes, &stances, frame_rate, unit_scale);
    if records.is_empty() {
        tracing::warn!(
            "pass {}: {} strikes, no complete stride",
            pass.index,
            strikes.len()
        );
    } else {
        tracing::debug!(
            pass = pass.index,
            strikes = strikes.len(),
            stances = stances.len(),
            records = records.len(),
            "pass gait"
        );
    }
    (
        PassGait {
            pass_index: pass.index,
            strikes,
            stances,
        },
        records,
    )
}
