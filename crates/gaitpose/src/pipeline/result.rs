use crate::gait::{GaitRecord, PassGait};
use crate::passes::WalkingPass;
use crate::pose::Trajectory;

/// Why a trial produced no gait records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoAssignedFrames,
    NoPasses,
    NoStrides,
}

/// Full analysis result for one trial.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrialResult {
    pub trajectory: Trajectory,
    pub passes: Vec<WalkingPass>,
    pub pass_gait: Vec<PassGait>,
    /// Stride records of every pass, in pass order.
    pub records: Vec<GaitRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<EmptyReason>,
}

/// Trial-level means of the stride records.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GaitSummary {
    pub n_records: usize,
    pub stride_length: f64,
    pub stride_time: f64,
    pub stride_velocity: f64,
    pub cadence: f64,
    /// Means over the records that carry step metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stride_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stance_percentage: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl TrialResult {
    pub(crate) fn empty(trajectory: Trajectory, reason: EmptyReason) -> Self {
        Self {
            trajectory,
            passes: Vec::new(),
            pass_gait: Vec::new(),
            records: Vec::new(),
            empty_reason: Some(reason),
        }
    }

    /// Mean gait parameters, `None` without records.
    pub fn summary(&self) -> Option<GaitSummary> {
        let r = &self.records;
        Some(GaitSummary {
            n_records: r.len(),
            stride_length: mean(r.iter().map(|x| x.stride_length))?,
            stride_time: mean(r.iter().map(|x| x.stride_time))?,
            stride_velocity: mean(r.iter().map(|x| x.stride_velocity))?,
            cadence: mean(r.iter().map(|x| x.cadence))?,
            step_length: mean(r.iter().filter_map(|x| x.step_length)),
            step_time: mean(r.iter().filter_map(|x| x.step_time)),
            stride_width: mean(r.iter().filter_map(|x| x.stride_width)),
            stance_percentage: mean(r.iter().filter_map(|x| x.stance_percentage)),
        })
    }
}
