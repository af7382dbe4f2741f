//! Walking-pass segmentation.
//!
//! Each assigned frame gets a horizontal walking direction from the head
//! displacement around it. Directions are clustered with mean shift; runs of
//! frames sharing a cluster become passes. Frames where the subject stands
//! or turns have no stable direction and fall outside every pass.

mod direction;

pub use direction::frame_directions;

use crate::clustering::{mean_shift, MeanShiftConfig};
use crate::error::GaitError;
use crate::geometry::{self, Point3, Vector3};
use crate::pose::Trajectory;
use crate::stats;

/// Pass segmentation parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Neighbour frames on each side used for the head displacement.
    pub direction_half_window: usize,
    /// Frames slower than this (mm/frame, horizontal) have no direction.
    pub min_speed: f64,
    /// Clustering of unit directions.
    pub mean_shift: MeanShiftConfig,
    /// Largest frame gap allowed inside one pass.
    pub max_frame_gap: usize,
    /// Shorter segments (in frames) are discarded.
    pub min_pass_frames: usize,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            direction_half_window: 5,
            min_speed: 5.0,
            mean_shift: MeanShiftConfig::default(),
            max_frame_gap: 5,
            min_pass_frames: 20,
        }
    }
}

impl PassConfig {
    pub fn validate(&self) -> Result<(), GaitError> {
        if self.direction_half_window == 0 {
            return Err(GaitError::InvalidConfig(
                "direction_half_window must be >= 1".into(),
            ));
        }
        if !self.min_speed.is_finite() || self.min_speed < 0.0 {
            return Err(GaitError::InvalidConfig("min_speed must be >= 0".into()));
        }
        if self.max_frame_gap == 0 {
            return Err(GaitError::InvalidConfig("max_frame_gap must be >= 1".into()));
        }
        if self.min_pass_frames < 2 {
            return Err(GaitError::InvalidConfig(
                "min_pass_frames must be >= 2".into(),
            ));
        }
        self.mean_shift.validate()
    }
}

/// A contiguous stretch of straight walking.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WalkingPass {
    /// Position in the trial's pass list.
    pub index: usize,
    pub start_frame: usize,
    /// Inclusive.
    pub end_frame: usize,
    /// Assigned frames belonging to the pass, ascending.
    pub frames: Vec<usize>,
    /// Unit walking direction on the floor plane.
    pub direction: Vector3,
    /// Tracked left/right labels are anatomically reversed in this pass.
    pub sides_swapped: bool,
}

impl WalkingPass {
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.frames.binary_search(&frame).is_ok()
    }
}

/// Segment `trajectory` into walking passes. `up` must be a unit vector.
///
/// Returns passes sorted by start frame; they never overlap. An empty result
/// is valid (nobody walked straight long enough).
pub fn label_passes(
    trajectory: &Trajectory,
    up: &Vector3,
    config: &PassConfig,
) -> Vec<WalkingPass> {
    let directions = frame_directions(trajectory, up, config);
    let moving: Vec<(usize, Vector3)> = directions
        .iter()
        .filter_map(|&(frame, dir)| dir.map(|d| (frame, d)))
        .collect();
    if moving.is_empty() {
        tracing::info!("no moving frames, 0 passes");
        return Vec::new();
    }

    let feats: Vec<Vector3> = moving.iter().map(|(_, d)| *d).collect();
    let clusters = mean_shift(&feats, &config.mean_shift);
    tracing::debug!(
        moving = moving.len(),
        clusters = clusters.n_clusters(),
        "direction clusters"
    );

    let mut segments: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_label = usize::MAX;
    for (&(frame, _), &label) in moving.iter().zip(&clusters.labels) {
        let continues = current
            .last()
            .is_some_and(|&prev| label == current_label && frame - prev <= config.max_frame_gap);
        if !continues && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        current.push(frame);
        current_label = label;
    }
    if !current.is_empty() {
        segments.push(current);
    }

    let heads: std::collections::HashMap<usize, Point3> =
        trajectory.assigned().map(|(f, a)| (f, a.head)).collect();

    let mut passes = Vec::new();
    for frames in segments {
        if frames.len() < config.min_pass_frames {
            tracing::debug!(
                start = frames[0],
                n_frames = frames.len(),
                "segment too short, dropped"
            );
            continue;
        }
        let floor_heads: Vec<Point3> = frames
            .iter()
            .filter_map(|f| heads.get(f))
            .filter_map(|p| geometry::project_point_plane(p, &Point3::origin(), up).ok())
            .collect();
        let direction = match geometry::best_fit_line(&floor_heads) {
            Ok((_, d)) => d,
            Err(e) => {
                tracing::warn!(start = frames[0], "pass direction fit failed: {}", e);
                continue;
            }
        };
        let index = passes.len();
        let pass = WalkingPass {
            index,
            start_frame: frames[0],
            end_frame: frames[frames.len() - 1],
            sides_swapped: sides_swapped(trajectory, &frames, &direction, up),
            frames,
            direction,
        };
        tracing::debug!(
            index,
            start = pass.start_frame,
            end = pass.end_frame,
            sides_swapped = pass.sides_swapped,
            "walking pass"
        );
        passes.push(pass);
    }

    tracing::info!("{} walking passes found", passes.len());
    passes
}

/// True when the tracked left foot sits on the walker's right for most of
/// the pass.
fn sides_swapped(
    trajectory: &Trajectory,
    frames: &[usize],
    direction: &Vector3,
    up: &Vector3,
) -> bool {
    let values: Vec<f64> = trajectory
        .assigned()
        .filter(|(f, _)| frames.binary_search(f).is_ok())
        .filter_map(|(_, a)| {
            let mid = Point3::from((a.foot_left.coords + a.foot_right.coords) * 0.5);
            geometry::target_side_value(direction, up, &(a.foot_left - mid)).ok()
        })
        .collect();
    stats::median(&values).is_some_and(|m| m > 0.0)
}
