//! gaitpose: spatiotemporal gait parameters from noisy 3D joint proposals.
//!
//! Input is, per video frame, a set of candidate 3D positions for body joints
//! from a side-view depth sensor. The pipeline stages are:
//!
//! 1. **Lengths** – subject link-length model from calibration frames
//!    (per-frame quantile, MAD-filtered median across frames).
//! 2. **Pose** – per-frame head/foot assignment by scoring candidate
//!    combinations against the length model; foot-height outlier rejection;
//!    left/right tracking.
//! 3. **Passes** – walking-direction clustering with mean shift, segmentation
//!    into straight walking passes, per-pass side orientation.
//! 4. **Gait** – foot-strike and stance-phase detection, stride/step metrics.
//!
//! # Public API
//! - [`GaitAnalyzer`] as the primary entry point
//! - [`GaitConfig`] and its stage configs for tuning
//! - input types ([`FrameCandidates`], [`TrialData`]) and result types
//!   ([`TrialResult`], [`GaitRecord`])
//!
//! Geometry, statistics and clustering primitives are public for reuse.

mod api;
pub mod clustering;
mod config;
mod error;
pub mod gait;
pub mod geometry;
pub mod lengths;
pub mod passes;
mod pipeline;
pub mod pose;
pub mod skeleton;
pub mod stats;
mod trial;

#[cfg(test)]
mod test_utils;

pub use api::GaitAnalyzer;
pub use clustering::{Kernel, MeanShiftConfig};
pub use config::GaitConfig;
pub use error::GaitError;
pub use gait::{FootStrike, GaitEventConfig, GaitRecord, PassGait, StancePhase};
pub use geometry::{Point3, Vector3};
pub use lengths::{estimate_link_lengths, LengthConfig, LinkLengthModel, LinkSpec};
pub use passes::{PassConfig, WalkingPass};
pub use pipeline::{EmptyReason, GaitSummary, TrialResult};
pub use pose::{
    FrameAssignment, FrameCandidates, FrameState, JointAssignment, MissingReason, Proposal,
    SelectorConfig, Trajectory,
};
pub use skeleton::{BodyPart, JointPair, Side};
pub use trial::TrialData;
