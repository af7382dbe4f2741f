//! Joint candidates → per-frame head/foot assignment.
//!
//! Stage order per trial:
//! 1. [`FrameSelector::select`] picks head, hip and an unlabeled foot pair per
//!    frame from the link-length model.
//! 2. Frames whose foot height is a MAD outlier are dropped.
//! 3. Left/right labels are propagated frame to frame.

mod filter;
mod proposal;
mod score;
mod select;
mod sides;

pub use proposal::{FrameCandidates, Proposal};
pub use score::length_ratio;
pub use select::{FrameSelector, Selection, SelectorConfig};

use crate::geometry::{Point3, Vector3};
use crate::skeleton::Side;
use crate::stats;
use sides::SideTracker;

/// Chosen joints of one frame.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JointAssignment {
    pub head: Point3,
    pub foot_left: Point3,
    pub foot_right: Point3,
    /// Mean link cost of the selection (0 is a perfect fit).
    pub score: f64,
}

impl JointAssignment {
    pub fn foot(&self, side: Side) -> Point3 {
        match side {
            Side::Left => self.foot_left,
            Side::Right => self.foot_right,
        }
    }

    /// Copy with left and right exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            foot_left: self.foot_right,
            foot_right: self.foot_left,
            ..*self
        }
    }
}

/// Why a frame has no assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    /// Head, hip or foot has no candidate at all.
    NoCandidates,
    /// Candidates exist but no combination keeps every link in tolerance.
    NoFeasibleAssignment,
    /// Rejected by the foot-height outlier test.
    Outlier,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrameState {
    Assigned {
        assignment: JointAssignment,
        /// Left/right labels were re-initialized on this frame.
        side_reset: bool,
    },
    Missing {
        reason: MissingReason,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameAssignment {
    pub frame: usize,
    #[serde(flatten)]
    pub state: FrameState,
}

impl FrameAssignment {
    pub fn assignment(&self) -> Option<&JointAssignment> {
        match &self.state {
            FrameState::Assigned { assignment, .. } => Some(assignment),
            FrameState::Missing { .. } => None,
        }
    }
}

/// Per-frame assignments sorted by frame index.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trajectory {
    pub frames: Vec<FrameAssignment>,
}

impl Trajectory {
    /// Assigned frames in order, as `(frame, assignment)`.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, &JointAssignment)> + '_ {
        self.frames
            .iter()
            .filter_map(|f| f.assignment().map(|a| (f.frame, a)))
    }

    pub fn n_assigned(&self) -> usize {
        self.assigned().count()
    }

    pub fn count_missing(&self, reason: MissingReason) -> usize {
        self.frames
            .iter()
            .filter(|f| f.state == FrameState::Missing { reason })
            .count()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Assign joints to every frame.
///
/// Input frames may arrive in any order; the trajectory is sorted by frame
/// index and later duplicates of a frame index are ignored. `up` must be a
/// unit vector.
pub fn build_trajectory(
    frames: &[FrameCandidates],
    selector: &FrameSelector,
    up: &Vector3,
) -> Trajectory {
    let mut order: Vec<&FrameCandidates> = frames.iter().collect();
    order.sort_by_key(|f| f.frame);
    let before = order.len();
    order.dedup_by_key(|f| f.frame);
    if order.len() < before {
        tracing::warn!("{} duplicate frame indices ignored", before - order.len());
    }

    let mut selections: Vec<(usize, Result<Selection, MissingReason>)> = order
        .iter()
        .map(|f| (f.frame, selector.select(f)))
        .collect();

    let config = selector.config();
    if let Some(c) = config.height_outlier_mad_factor {
        reject_height_outliers(&mut selections, up, c, config.height_outlier_floor);
    }

    let mut tracker = SideTracker::new(config.side_lookback_frames);
    let frames: Vec<FrameAssignment> = selections
        .into_iter()
        .map(|(frame, sel)| {
            let state = match sel {
                Ok(s) => {
                    let (foot_left, foot_right, side_reset) = tracker.assign(frame, s.feet);
                    FrameState::Assigned {
                        assignment: JointAssignment {
                            head: s.head,
                            foot_left,
                            foot_right,
                            score: s.score,
                        },
                        side_reset,
                    }
                }
                Err(reason) => FrameState::Missing { reason },
            };
            FrameAssignment { frame, state }
        })
        .collect();

    let trajectory = Trajectory { frames };
    tracing::info!(
        "{} of {} frames assigned",
        trajectory.n_assigned(),
        trajectory.len()
    );
    tracing::debug!(
        no_candidates = trajectory.count_missing(MissingReason::NoCandidates),
        no_feasible = trajectory.count_missing(MissingReason::NoFeasibleAssignment),
        outliers = trajectory.count_missing(MissingReason::Outlier),
        "missing frames"
    );
    trajectory
}

/// Mark frames whose foot height deviates from the pooled foot heights.
fn reject_height_outliers(
    selections: &mut [(usize, Result<Selection, MissingReason>)],
    up: &Vector3,
    mad_factor: f64,
    floor: f64,
) {
    let heights: Vec<f64> = selections
        .iter()
        .filter_map(|(_, s)| s.as_ref().ok())
        .flat_map(|s| s.feet.map(|p| p.coords.dot(up)))
        .collect();
    let mask = stats::mad_inliers(&heights, mad_factor, floor);

    let mut inliers = mask.chunks(2).map(|pair| pair.iter().all(|&k| k));
    let mut rejected = 0usize;
    for (_, sel) in selections.iter_mut() {
        if sel.is_ok() && !inliers.next().unwrap_or(true) {
            *sel = Err(MissingReason::Outlier);
            rejected += 1;
        }
    }
    if rejected > 0 {
        tracing::debug!(rejected, "foot height outliers");
    }
}
