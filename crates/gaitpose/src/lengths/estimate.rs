use crate::error::GaitError;
use crate::pose::FrameCandidates;
use crate::stats;

use super::{LengthConfig, LinkLengthModel, LinkSpec};

/// Per-frame estimate for one link: the configured quantile of all
/// cross-distances between candidates of the two parts.
fn frame_estimate(frame: &FrameCandidates, spec: &LinkSpec) -> Option<f64> {
    let [a, b] = spec.pair.parts();
    let pa = frame.positions_of(a);
    let pb = frame.positions_of(b);
    if pa.is_empty() || pb.is_empty() {
        return None;
    }
    let dists: Vec<f64> = pa
        .iter()
        .flat_map(|u| pb.iter().map(move |v| (u - v).norm()))
        .collect();
    stats::quantile(&dists, spec.frame_quantile).filter(|d| *d > 0.0)
}

/// Estimate a link-length model from raw calibration frames.
///
/// For every configured link, per-frame estimates are pooled across the
/// frames where both parts have candidates, MAD outliers are dropped and the
/// median of the rest becomes the link length.
pub fn estimate_link_lengths(
    frames: &[FrameCandidates],
    config: &LengthConfig,
) -> Result<LinkLengthModel, GaitError> {
    config.validate()?;

    let mut lengths = Vec::with_capacity(config.links.len());
    for spec in &config.links {
        let per_frame: Vec<f64> = frames
            .iter()
            .filter_map(|f| frame_estimate(f, spec))
            .collect();

        if per_frame.len() < config.min_frames {
            return Err(GaitError::InsufficientData {
                what: format!("link {}", spec.pair),
                needed: config.min_frames,
                found: per_frame.len(),
            });
        }

        let mask = stats::mad_inliers(&per_frame, config.outlier_mad_factor, 0.0);
        let inliers: Vec<f64> = per_frame
            .iter()
            .zip(&mask)
            .filter_map(|(v, keep)| keep.then_some(*v))
            .collect();
        let length = stats::median(&inliers).ok_or_else(|| GaitError::InsufficientData {
            what: format!("link {}", spec.pair),
            needed: 1,
            found: 0,
        })?;

        tracing::debug!(
            link = %spec.pair,
            frames = per_frame.len(),
            inliers = inliers.len(),
            length,
            "link length estimated"
        );
        lengths.push((spec.pair, length));
    }

    let model = LinkLengthModel::from_lengths(lengths)?;
    tracing::info!(
        "{} link lengths estimated from {} frames",
        model.links().len(),
        frames.len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Proposal;
    use crate::skeleton::{BodyPart, JointPair};
    use crate::test_utils::{add_noise, walker_frame};
    use rand::{rngs::StdRng, SeedableRng};

    fn noisy_estimate(n_frames: usize, seed: u64) -> LinkLengthModel {
        let mut rng = StdRng::seed_from_u64(seed);
        let frames: Vec<FrameCandidates> = (0..n_frames)
            .map(|f| add_noise(&walker_frame(f, false), 5.0, &mut rng))
            .collect();
        estimate_link_lengths(&frames, &LengthConfig::default()).unwrap()
    }

    #[test]
    fn converges_under_noise() {
        let head_hip = JointPair::new(BodyPart::Head, BodyPart::Hip).unwrap();
        let calf_foot = JointPair::new(BodyPart::Calf, BodyPart::Foot).unwrap();
        let thigh_knee = JointPair::new(BodyPart::Thigh, BodyPart::Knee).unwrap();

        // The head-hip distance carries ~7 mm of noise per frame, so the
        // median across n frames has a spread near 9 / sqrt(n).
        for n in [30, 120, 480] {
            let model = noisy_estimate(n, 7);
            let err = (model.get(head_hip).unwrap() - 700.0).abs();
            let bound = 45.0 / (n as f64).sqrt();
            assert!(err < bound, "n={} head-hip error {} >= {}", n, err, bound);

            // Leg links scale with the straight-leg length, 905..954 mm
            // against the nominal 930, so allow a few percent.
            let cf = model.get(calf_foot).unwrap();
            assert!((cf - 330.0).abs() < 20.0, "n={} calf-foot {}", n, cf);
            let tk = model.get(thigh_knee).unwrap();
            assert!((tk - 350.0).abs() < 20.0, "n={} thigh-knee {}", n, tk);
        }
    }

    #[test]
    fn reports_insufficient_frames() {
        let frames: Vec<FrameCandidates> = (0..10).map(|f| walker_frame(f, false)).collect();
        match estimate_link_lengths(&frames, &LengthConfig::default()) {
            Err(GaitError::InsufficientData { needed, found, .. }) => {
                assert_eq!(needed, 30);
                assert_eq!(found, 10);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn frames_without_both_parts_are_skipped() {
        let head_only = FrameCandidates::new(
            0,
            vec![Proposal::new(
                BodyPart::Head,
                crate::geometry::Point3::new(0.0, 1600.0, 0.0),
            )],
        );
        let spec = LinkSpec::new(BodyPart::Head, BodyPart::Hip, 0.5).unwrap();
        assert_eq!(frame_estimate(&head_only, &spec), None);
    }
}
