//! High-level analysis API.
//!
//! [`GaitAnalyzer`] pairs a subject's [`LinkLengthModel`] with a
//! [`GaitConfig`]. Build it once per subject, then analyze any number of
//! trials. It holds no mutable state and is `Send + Sync`.

use crate::config::GaitConfig;
use crate::error::GaitError;
use crate::lengths::{estimate_link_lengths, LinkLengthModel};
use crate::pipeline::{self, TrialResult};
use crate::pose::{FrameCandidates, FrameSelector, Trajectory};
use crate::trial::TrialData;

/// Primary analysis interface.
///
/// # Examples
///
/// ```no_run
/// use gaitpose::{GaitAnalyzer, GaitConfig, TrialData};
/// use std::path::Path;
///
/// let trial = TrialData::from_json_file(Path::new("trial.json")).unwrap();
/// let analyzer = GaitAnalyzer::calibrate(GaitConfig::default(), &trial.frames).unwrap();
/// let result = analyzer.analyze_trial(&trial).unwrap();
/// println!("{} strides", result.records.len());
/// ```
#[derive(Debug, Clone)]
pub struct GaitAnalyzer {
    config: GaitConfig,
    model: LinkLengthModel,
}

impl GaitAnalyzer {
    /// Create with an existing length model.
    ///
    /// Fails when the config is invalid or the model lacks a chain link.
    pub fn new(config: GaitConfig, model: LinkLengthModel) -> Result<Self, GaitError> {
        config.validate()?;
        FrameSelector::new(&model, &config.selector)?;
        Ok(Self { config, model })
    }

    /// Estimate the length model from calibration frames, then create.
    pub fn calibrate(
        config: GaitConfig,
        calibration: &[FrameCandidates],
    ) -> Result<Self, GaitError> {
        config.validate()?;
        let model = estimate_link_lengths(calibration, &config.lengths)?;
        Self::new(config, model)
    }

    pub fn config(&self) -> &GaitConfig {
        &self.config
    }

    /// Mutable access for post-construction tuning; checked again on every
    /// analysis call.
    pub fn config_mut(&mut self) -> &mut GaitConfig {
        &mut self.config
    }

    pub fn model(&self) -> &LinkLengthModel {
        &self.model
    }

    /// Per-frame joint assignment without pass or gait analysis.
    pub fn select_frames(&self, frames: &[FrameCandidates]) -> Result<Trajectory, GaitError> {
        pipeline::select_frames(frames, &self.model, &self.config)
    }

    /// Full analysis of a sequence of frames.
    pub fn analyze(&self, frames: &[FrameCandidates]) -> Result<TrialResult, GaitError> {
        pipeline::analyze_trial(frames, &self.model, &self.config)
    }

    /// Full analysis honoring the trial's own frame rate when it has one.
    pub fn analyze_trial(&self, trial: &TrialData) -> Result<TrialResult, GaitError> {
        match trial.frame_rate {
            Some(rate) => {
                let mut config = self.config.clone();
                config.frame_rate = rate;
                pipeline::analyze_trial(&trial.frames, &self.model, &config)
            }
            None => self.analyze(&trial.frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::EmptyReason;
    use crate::skeleton::{BodyPart, Side};
    use crate::test_utils::{add_noise, test_model, walker_frame, walker_frames};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn analyzer() -> GaitAnalyzer {
        GaitAnalyzer::new(GaitConfig::default(), test_model()).unwrap()
    }

    #[test]
    fn analyzer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GaitAnalyzer>();
    }

    #[test]
    fn synthetic_walk_end_to_end() {
        let frames = walker_frames(100, true);
        let result = analyzer().analyze(&frames).unwrap();

        assert_eq!(result.empty_reason, None);
        assert_eq!(result.trajectory.n_assigned(), 100);
        assert_eq!(result.passes.len(), 1);
        assert_eq!(
            (result.passes[0].start_frame, result.passes[0].end_frame),
            (0, 99)
        );

        let strikes: Vec<(usize, Side)> = result.pass_gait[0]
            .strikes
            .iter()
            .map(|s| (s.frame, s.side))
            .collect();
        assert_eq!(
            strikes,
            vec![
                (0, Side::Left),
                (15, Side::Right),
                (30, Side::Left),
                (45, Side::Right),
                (60, Side::Left),
                (75, Side::Right),
                (90, Side::Left),
            ]
        );

        assert_eq!(result.records.len(), 5);
        for r in &result.records {
            assert_relative_eq!(r.stride_length, 1200.0, epsilon = 1e-6);
            assert_relative_eq!(r.stride_time, 1.0, epsilon = 1e-12);
            assert_relative_eq!(r.cadence, 120.0, epsilon = 1e-9);
            assert_relative_eq!(r.step_time.unwrap(), 0.5, epsilon = 1e-12);
            assert_relative_eq!(r.step_length.unwrap(), 600.0, epsilon = 1e-6);
            assert_relative_eq!(r.stride_width.unwrap(), 200.0, epsilon = 1e-6);
            assert_relative_eq!(r.head_stride_velocity, 1200.0, epsilon = 1e-6);
        }

        let summary = result.summary().unwrap();
        assert_eq!(summary.n_records, 5);
        assert_relative_eq!(summary.stride_velocity, 1200.0, epsilon = 1e-6);
    }

    #[test]
    fn noisy_walk_stays_close() {
        let mut rng = StdRng::seed_from_u64(42);
        let frames: Vec<FrameCandidates> = (0..100)
            .map(|f| add_noise(&walker_frame(f, false), 3.0, &mut rng))
            .collect();
        let result = analyzer().analyze(&frames).unwrap();
        assert_eq!(result.passes.len(), 1);
        assert!(!result.records.is_empty());
        let summary = result.summary().unwrap();
        assert!(
            (summary.stride_length - 1200.0).abs() < 30.0,
            "stride length {}",
            summary.stride_length
        );
    }

    #[test]
    fn calibrated_analyzer_matches_reference() {
        let frames = walker_frames(100, false);
        let analyzer = GaitAnalyzer::calibrate(GaitConfig::default(), &frames).unwrap();
        let head_hip = analyzer
            .model()
            .expected(BodyPart::Head, BodyPart::Hip)
            .unwrap();
        assert_relative_eq!(head_hip, 700.0, epsilon = 1e-9);
        let result = analyzer.analyze(&frames).unwrap();
        assert_eq!(result.records.len(), 5);
    }

    #[test]
    fn empty_outcomes_are_reported() {
        let a = analyzer();

        let result = a.analyze(&[]).unwrap();
        assert_eq!(result.empty_reason, Some(EmptyReason::NoAssignedFrames));

        let standing: Vec<FrameCandidates> = (0..40)
            .map(|f| {
                let mut frame = walker_frame(0, false);
                frame.frame = f;
                frame
            })
            .collect();
        let result = a.analyze(&standing).unwrap();
        assert_eq!(result.empty_reason, Some(EmptyReason::NoPasses));
        assert!(result.records.is_empty());
        assert!(result.summary().is_none());
    }

    #[test]
    fn trial_frame_rate_overrides_config() {
        let trial = TrialData {
            frame_rate: Some(60.0),
            frames: walker_frames(100, false),
        };
        let result = analyzer().analyze_trial(&trial).unwrap();
        assert_eq!(result.records.len(), 5);
        for r in &result.records {
            assert_relative_eq!(r.stride_time, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn invalid_config_is_rejected_at_analysis() {
        let mut a = analyzer();
        a.config_mut().frame_rate = -1.0;
        assert!(matches!(
            a.analyze(&walker_frames(10, false)),
            Err(GaitError::InvalidConfig(_))
        ));
    }
}
