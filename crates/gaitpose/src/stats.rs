//! Robust 1-D statistics used by the length estimator and outlier filters.
//!
//! All functions ignore non-finite samples and return `None` on empty input.

/// Consistency constant turning the raw MAD into a normal-sigma estimate.
pub const MAD_SCALE: f64 = 1.4826;

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let t = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * t)
}

/// Quantile `q ∈ [0, 1]` with linear interpolation between order statistics.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted_finite(values), q)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Median absolute deviation, scaled by [`MAD_SCALE`].
pub fn mad(values: &[f64]) -> Option<f64> {
    let med = median(values)?;
    let dev: Vec<f64> = values
        .iter()
        .filter(|x| x.is_finite())
        .map(|x| (x - med).abs())
        .collect();
    median(&dev).map(|m| m * MAD_SCALE)
}

/// Inlier mask: `|x - median| <= c * max(mad, min_deviation)`.
///
/// Non-finite samples are always outliers. `min_deviation` keeps a perfectly
/// constant signal from rejecting every sample that differs by a hair.
pub fn mad_inliers(values: &[f64], c: f64, min_deviation: f64) -> Vec<bool> {
    let (Some(med), Some(spread)) = (median(values), mad(values)) else {
        return vec![false; values.len()];
    };
    let limit = c * spread.max(min_deviation);
    values
        .iter()
        .map(|x| x.is_finite() && (x - med).abs() <= limit)
        .collect()
}

pub fn root_mean_square(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let ms = finite.iter().map(|x| x * x).sum::<f64>() / finite.len() as f64;
    Some(ms.sqrt())
}
