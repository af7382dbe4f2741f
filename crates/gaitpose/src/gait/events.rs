use nalgebra::Vector1;

use crate::clustering::{mean_shift, Kernel, MeanShiftConfig};
use crate::geometry::Point3;
use crate::passes::WalkingPass;
use crate::pose::{JointAssignment, Trajectory};
use crate::skeleton::Side;
use crate::stats;

use super::GaitEventConfig;

/// Heel-strike estimate: the frame where a foot is farthest ahead of the
/// other one along the walking direction.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FootStrike {
    pub frame: usize,
    pub side: Side,
    /// Foot position at the strike (sensor units).
    pub position: Point3,
    /// Head position at the strike frame.
    pub head: Point3,
}

/// Peak frames of a sampled signal.
///
/// Samples above the signal RMS are grouped by 1-D Gaussian mean shift over
/// their frame indices; each group contributes its maximum. Peaks closer than
/// `min_peak_separation` to a stronger peak are dropped. Output is sorted by
/// frame.
pub fn detect_peaks(samples: &[(usize, f64)], config: &GaitEventConfig) -> Vec<usize> {
    let values: Vec<f64> = samples.iter().map(|s| s.1).collect();
    let Some(rms) = stats::root_mean_square(&values) else {
        return Vec::new();
    };
    let strong: Vec<(usize, f64)> = samples
        .iter()
        .copied()
        .filter(|(_, v)| v.is_finite() && *v > rms)
        .collect();
    if strong.is_empty() {
        return Vec::new();
    }

    let feats: Vec<Vector1<f64>> = strong.iter().map(|(f, _)| Vector1::new(*f as f64)).collect();
    let ms_config = MeanShiftConfig::new(Kernel::Gaussian {
        sigma: config.peak_bandwidth,
    });
    let clusters = mean_shift(&feats, &ms_config);

    let mut best: Vec<Option<(usize, f64)>> = vec![None; clusters.n_clusters()];
    for (&(frame, value), &label) in strong.iter().zip(&clusters.labels) {
        if best[label].map_or(true, |(_, v)| value > v) {
            best[label] = Some((frame, value));
        }
    }

    let mut candidates: Vec<(usize, f64)> = best.into_iter().flatten().collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut peaks: Vec<usize> = Vec::with_capacity(candidates.len());
    for (frame, _) in candidates {
        if peaks
            .iter()
            .all(|&p| frame.abs_diff(p) >= config.min_peak_separation)
        {
            peaks.push(frame);
        }
    }
    peaks.sort_unstable();
    peaks
}

/// Foot strikes of both feet within one pass, sorted by frame.
///
/// The left signal is `(L - R) · direction`, the right one its negation.
/// Side labels honor the pass orientation.
pub fn detect_foot_strikes(
    trajectory: &Trajectory,
    pass: &WalkingPass,
    config: &GaitEventConfig,
) -> Vec<FootStrike> {
    let joints: Vec<(usize, JointAssignment)> = trajectory
        .assigned()
        .filter(|(f, _)| pass.contains(*f))
        .map(|(f, a)| (f, if pass.sides_swapped { a.swapped() } else { *a }))
        .collect();

    let left_signal: Vec<(usize, f64)> = joints
        .iter()
        .map(|(f, a)| (*f, (a.foot_left - a.foot_right).dot(&pass.direction)))
        .collect();
    let right_signal: Vec<(usize, f64)> = left_signal.iter().map(|(f, v)| (*f, -v)).collect();

    let mut strikes = Vec::new();
    for (side, signal) in [(Side::Left, &left_signal), (Side::Right, &right_signal)] {
        for frame in detect_peaks(signal, config) {
            if let Some((_, a)) = joints.iter().find(|(f, _)| *f == frame) {
                strikes.push(FootStrike {
                    frame,
                    side,
                    position: a.foot(side),
                    head: a.head,
                });
            }
        }
    }
    strikes.sort_by_key(|s| (s.frame, s.side == Side::Right));
    strikes
}
