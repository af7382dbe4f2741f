//! Trial orchestration: frames → trajectory → passes → strikes → records.

use super::result::{EmptyReason, TrialResult};
use crate::config::GaitConfig;
use crate::error::GaitError;
use crate::gait::extract_pass_gait;
use crate::lengths::LinkLengthModel;
use crate::passes::label_passes;
use crate::pose::{build_trajectory, FrameCandidates, FrameSelector, Trajectory};

/// Per-frame assignment stage only.
pub(crate) fn select_frames(
    frames: &[FrameCandidates],
    model: &LinkLengthModel,
    config: &GaitConfig,
) -> Result<Trajectory, GaitError> {
    config.validate()?;
    let selector = FrameSelector::new(model, &config.selector)?;
    Ok(build_trajectory(frames, &selector, &config.up_vector()?))
}

/// Run the full pipeline on one trial.
///
/// Configuration problems are errors; empty outcomes are reported through
/// [`TrialResult::empty_reason`].
pub(crate) fn analyze_trial(
    frames: &[FrameCandidates],
    model: &LinkLengthModel,
    config: &GaitConfig,
) -> Result<TrialResult, GaitError> {
    tracing::info!("analyzing {} frames", frames.len());
    let trajectory = select_frames(frames, model, config)?;
    if trajectory.n_assigned() == 0 {
        tracing::warn!("no frame could be assigned");
        return Ok(TrialResult::empty(trajectory, EmptyReason::NoAssignedFrames));
    }

    let up = config.up_vector()?;
    let passes = label_passes(&trajectory, &up, &config.passes);
    if passes.is_empty() {
        tracing::warn!("no walking pass found");
        return Ok(TrialResult::empty(trajectory, EmptyReason::NoPasses));
    }

    let mut pass_gait = Vec::with_capacity(passes.len());
    let mut records = Vec::new();
    for pass in &passes {
        let (gait, recs) = extract_pass_gait(
            &trajectory,
            pass,
            &config.events,
            config.frame_rate,
            config.unit_scale,
        );
        pass_gait.push(gait);
        records.extend(recs);
    }

    let empty_reason = records.is_empty().then_some(EmptyReason::NoStrides);
    tracing::info!(
        "{} gait records from {} passes",
        records.len(),
        passes.len()
    );

    Ok(TrialResult {
        trajectory,
        passes,
        pass_gait,
        records,
        empty_reason,
    })
}
