//! Per-frame candidate pruning: grouping, proximity dedup, radius gating and
//! capping. Each step preserves the input order of the surviving candidates.

use crate::geometry::Point3;
use crate::skeleton::{BodyPart, CHAIN};

use super::proposal::FrameCandidates;
use super::score::length_ratio;

/// Candidate positions of one frame, indexed by [`BodyPart::chain_index`].
pub(crate) type PartGroups = [Vec<Point3>; CHAIN.len()];

pub(crate) fn group_by_part(frame: &FrameCandidates) -> PartGroups {
    let mut groups: PartGroups = Default::default();
    for p in &frame.proposals {
        groups[p.part.chain_index()].push(p.position);
    }
    groups
}

/// Collapse points closer than `radius` onto the first (lowest index) one.
pub(crate) fn dedup_by_proximity(points: Vec<Point3>, radius: f64) -> Vec<Point3> {
    let mut keep = vec![true; points.len()];
    let r2 = radius * radius;

    for i in 0..points.len() {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..points.len() {
            if keep[j] && (points[i] - points[j]).norm_squared() < r2 {
                keep[j] = false;
            }
        }
    }

    points
        .into_iter()
        .enumerate()
        .filter_map(|(index, p)| keep[index].then_some(p))
        .collect()
}

/// Component-wise median of `points`.
pub(crate) fn reference_point(points: &[Point3]) -> Option<Point3> {
    let axis = |k: usize| {
        let v: Vec<f64> = points.iter().map(|p| p[k]).collect();
        crate::stats::median(&v)
    };
    Some(Point3::new(axis(0)?, axis(1)?, axis(2)?))
}

/// Keep points within `radius` of `reference`.
pub(crate) fn inside_radii(points: Vec<Point3>, reference: &Point3, radius: f64) -> Vec<Point3> {
    points
        .into_iter()
        .filter(|p| (p - reference).norm() <= radius)
        .collect()
}

/// Keep at most `max` points, preferring those whose distance from
/// `reference` best matches `expected`. Without an expected distance the
/// nearest points are kept.
pub(crate) fn cap_best_fit(
    points: Vec<Point3>,
    reference: &Point3,
    expected: Option<f64>,
    max: usize,
) -> Vec<Point3> {
    if points.len() <= max {
        return points;
    }
    let rank_key = |p: &Point3| {
        let d = (p - reference).norm();
        match expected {
            Some(e) => length_ratio(d, e).unwrap_or(f64::INFINITY),
            None => d,
        }
    };
    let keys: Vec<f64> = points.iter().map(rank_key).collect();
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]).then(a.cmp(&b)));
    let mut keep = vec![false; points.len()];
    for &i in order.iter().take(max) {
        keep[i] = true;
    }
    points
        .into_iter()
        .enumerate()
        .filter_map(|(index, p)| keep[index].then_some(p))
        .collect()
}

pub(crate) fn group<'a>(groups: &'a PartGroups, part: BodyPart) -> &'a [Point3] {
    &groups[part.chain_index()]
}
