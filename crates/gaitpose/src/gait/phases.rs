use crate::passes::WalkingPass;
use crate::pose::Trajectory;
use crate::skeleton::Side;

use super::GaitEventConfig;

/// A run of consecutive stance samples of one foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StancePhase {
    pub side: Side,
    /// First frame of the run.
    pub frame_i: usize,
    /// Last frame of the run.
    pub frame_f: usize,
}

/// Population variance of the samples within `half_window` frames of each
/// sample. `samples` must be sorted by frame.
fn windowed_variance(samples: &[(usize, f64)], half_window: usize) -> Vec<f64> {
    let mut start = 0;
    samples
        .iter()
        .map(|&(frame, _)| {
            while samples[start].0 + half_window < frame {
                start += 1;
            }
            let window: Vec<f64> = samples[start..]
                .iter()
                .take_while(|(f, _)| *f <= frame + half_window)
                .map(|s| s.1)
                .collect();
            let n = window.len() as f64;
            let mean = window.iter().sum::<f64>() / n;
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
        })
        .collect()
}

/// Split `values` into a low and a high group by 1-D two-means seeded at the
/// extremes. `true` marks the low group. `None` when all values are equal.
fn two_means(values: &[f64]) -> Option<Vec<bool>> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) || max - min <= f64::EPSILON * max.abs() {
        return None;
    }

    let (mut lo, mut hi) = (min, max);
    let mut low: Vec<bool> = values.iter().map(|v| (v - lo).abs() <= (v - hi).abs()).collect();
    for _ in 0..100 {
        let mean_of = |want: bool| {
            let (sum, n) = values
                .iter()
                .zip(&low)
                .filter(|&(_, &l)| l == want)
                .fold((0.0, 0usize), |(s, n), (v, _)| (s + v, n + 1));
            (n > 0).then(|| sum / n as f64)
        };
        lo = mean_of(true)?;
        hi = mean_of(false)?;
        let next: Vec<bool> = values.iter().map(|v| (v - lo).abs() <= (v - hi).abs()).collect();
        if next == low {
            break;
        }
        low = next;
    }
    Some(low)
}

/// Clear runs of `true` shorter than `min_len`.
fn drop_short_runs(mask: &mut [bool], min_len: usize) {
    let mut i = 0;
    while i < mask.len() {
        if !mask[i] {
            i += 1;
            continue;
        }
        let end = mask[i..].iter().position(|m| !m).map_or(mask.len(), |n| i + n);
        if end - i < min_len {
            mask[i..end].iter_mut().for_each(|m| *m = false);
        }
        i = end;
    }
}

/// Stance mask of a foot signal sampled at increasing frames.
///
/// The windowed variance of the signal is split into a low (stance) and a
/// high (swing) group; stance runs shorter than `min_stance_frames` samples
/// are turned into swing. A signal without any variance contrast has no
/// stance.
pub fn detect_stance(samples: &[(usize, f64)], config: &GaitEventConfig) -> Vec<bool> {
    if samples.is_empty() {
        return Vec::new();
    }
    let variance = windowed_variance(samples, config.phase_half_window);
    let Some(mut stance) = two_means(&variance) else {
        return vec![false; samples.len()];
    };
    drop_short_runs(&mut stance, config.min_stance_frames);
    stance
}

/// Stance phases of both feet within one pass, sorted by first frame.
///
/// Each foot is tracked by its coordinate along the pass direction.
pub fn detect_stance_phases(
    trajectory: &Trajectory,
    pass: &WalkingPass,
    config: &GaitEventConfig,
) -> Vec<StancePhase> {
    let mut phases = Vec::new();
    for side in [Side::Left, Side::Right] {
        let signal: Vec<(usize, f64)> = trajectory
            .assigned()
            .filter(|(f, _)| pass.contains(*f))
            .map(|(f, a)| {
                let a = if pass.sides_swapped { a.swapped() } else { *a };
                (f, a.foot(side).coords.dot(&pass.direction))
            })
            .collect();
        let stance = detect_stance(&signal, config);

        let mut run: Option<(usize, usize)> = None;
        for (&(frame, _), &is_stance) in signal.iter().zip(&stance) {
            match (is_stance, run) {
                (true, Some((first, _))) => run = Some((first, frame)),
                (true, None) => run = Some((frame, frame)),
                (false, Some((frame_i, frame_f))) => {
                    phases.push(StancePhase { side, frame_i, frame_f });
                    run = None;
                }
                (false, None) => {}
            }
        }
        if let Some((frame_i, frame_f)) = run {
            phases.push(StancePhase { side, frame_i, frame_f });
        }
    }
    phases.sort_by_key(|p| (p.frame_i, p.side == Side::Right));
    phases
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Foot standing for 40 frames, then swinging 1200 mm in 20 frames.
    fn stance_swing_signal(n_cycles: usize) -> Vec<(usize, f64)> {
        (0..60 * n_cycles)
            .map(|f| {
                let (cycle, t) = (f / 60, f % 60);
                let base = 1200.0 * cycle as f64;
                let pos = if t < 40 {
                    base
                } else {
                    base + 60.0 * (t - 39) as f64
                };
                (f, pos)
            })
            .collect()
    }

    #[test]
    fn stance_runs_cover_standing_frames() {
        let samples = stance_swing_signal(3);
        let stance = detect_stance(&samples, &GaitEventConfig::default());
        assert_eq!(stance.len(), samples.len());

        let mut runs = Vec::new();
        let mut f = 0;
        while f < stance.len() {
            if stance[f] {
                let end = stance[f..].iter().position(|s| !s).map_or(stance.len(), |n| f + n);
                runs.push((f, end - 1));
                f = end;
            } else {
                f += 1;
            }
        }
        assert_eq!(runs.len(), 3, "runs {:?}", runs);
        for (k, &(first, last)) in runs.iter().enumerate() {
            let (start, end) = (60 * k, 60 * k + 39);
            assert!(first <= start + 5, "run {:?} starts late", (first, last));
            assert!(last + 5 >= end, "run {:?} ends early", (first, last));
            assert!(last < end + 6, "run {:?} reaches into swing", (first, last));
        }
        // Mid-swing frames are never stance.
        for k in 0..3 {
            assert!(!stance[60 * k + 50]);
        }
    }

    #[test]
    fn motionless_signal_has_no_stance_contrast() {
        let still: Vec<(usize, f64)> = (0..30).map(|f| (f, 500.0)).collect();
        assert!(detect_stance(&still, &GaitEventConfig::default())
            .iter()
            .all(|s| !s));
        assert!(detect_stance(&[], &GaitEventConfig::default()).is_empty());
    }

    #[test]
    fn short_runs_are_dropped() {
        let mut mask = vec![
            true, true, false, true, true, true, true, false, true, true, true,
        ];
        drop_short_runs(&mut mask, 3);
        assert_eq!(
            mask,
            vec![false, false, false, true, true, true, true, false, true, true, true]
        );
    }

    #[test]
    fn two_means_splits_at_the_gap() {
        let values = [0.0, 1.0, 0.5, 100.0, 90.0, 2.0];
        assert_eq!(
            two_means(&values),
            Some(vec![true, true, true, false, false, true])
        );
        assert_eq!(two_means(&[3.0, 3.0]), None);
    }

    #[test]
    fn variance_window_respects_frame_gaps() {
        let samples = [(0, 0.0), (1, 2.0), (10, 100.0)];
        let var = windowed_variance(&samples, 1);
        assert_eq!(var, vec![1.0, 1.0, 0.0]);
    }
}
