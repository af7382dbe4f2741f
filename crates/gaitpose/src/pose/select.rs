//! Per-frame joint assignment from ambiguous candidates.
//!
//! Candidates are pruned (dedup, radius gate, cap), then every feasible
//! combination of head, hip and two leg paths ending in distinct feet is
//! scored against the link-length model. The leg path runs through whichever
//! intermediate parts (thigh, knee, calf) have candidates in this frame;
//! absent parts are bridged with the summed chain length.

use crate::error::GaitError;
use crate::geometry::Point3;
use crate::lengths::LinkLengthModel;
use crate::skeleton::{BodyPart, JointPair, CHAIN};

use super::filter::{self, PartGroups};
use super::proposal::FrameCandidates;
use super::score::inside_spheres;
use super::MissingReason;

/// Candidate selection and side tracking parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Largest accepted `max(d/e, e/d)` for any scored link.
    pub max_link_ratio: f64,
    /// Candidates of part `p` farther than `expected(hip, p) * radius_slack`
    /// from the median hip are dropped.
    pub radius_slack: f64,
    /// Same-part candidates closer than this (mm) are merged.
    pub merge_radius: f64,
    /// Cap per part after gating. Candidates whose distance from the median
    /// hip best fits the expected hip-to-part length are kept.
    pub max_candidates_per_part: usize,
    /// Previous assignment older than this (frames) resets left/right.
    pub side_lookback_frames: usize,
    /// MAD factor for foot-height outlier rejection; `None` disables it.
    pub height_outlier_mad_factor: Option<f64>,
    /// Lower bound (mm) on the spread used by the height outlier test.
    pub height_outlier_floor: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_link_ratio: 1.6,
            radius_slack: 1.5,
            merge_radius: 20.0,
            max_candidates_per_part: 5,
            side_lookback_frames: 10,
            height_outlier_mad_factor: Some(2.0),
            height_outlier_floor: 150.0,
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<(), GaitError> {
        if !self.max_link_ratio.is_finite() || self.max_link_ratio < 1.0 {
            return Err(GaitError::InvalidConfig(
                "max_link_ratio must be a finite value >= 1".into(),
            ));
        }
        if !self.radius_slack.is_finite() || self.radius_slack <= 0.0 {
            return Err(GaitError::InvalidConfig(
                "radius_slack must be positive".into(),
            ));
        }
        if !self.merge_radius.is_finite() || self.merge_radius < 0.0 {
            return Err(GaitError::InvalidConfig(
                "merge_radius must be >= 0".into(),
            ));
        }
        if self.max_candidates_per_part < 2 {
            return Err(GaitError::InvalidConfig(
                "max_candidates_per_part must be >= 2".into(),
            ));
        }
        if let Some(c) = self.height_outlier_mad_factor {
            if !c.is_finite() || c <= 0.0 {
                return Err(GaitError::InvalidConfig(
                    "height_outlier_mad_factor must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Best joint combination of one frame; feet are not yet side-labeled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub head: Point3,
    pub hip: Point3,
    pub feet: [Point3; 2],
    /// Mean `ratio - 1` over all scored links (0 is a perfect fit).
    pub score: f64,
}

#[derive(Debug, Clone, Copy)]
struct LegCost {
    cost: f64,
    links: usize,
}

type PartTable<T> = [[T; CHAIN.len()]; CHAIN.len()];

/// Scores and picks joint combinations against a fixed length model.
#[derive(Debug, Clone)]
pub struct FrameSelector {
    config: SelectorConfig,
    /// Expected distance per part pair (direct or bridged along the chain).
    expected: PartTable<Option<f64>>,
    /// Pairs the model lists explicitly; these are scored whenever both
    /// ends lie on a chosen path.
    modeled: PartTable<bool>,
}

impl FrameSelector {
    /// Requires every consecutive chain link in `model`.
    pub fn new(model: &LinkLengthModel, config: &SelectorConfig) -> Result<Self, GaitError> {
        config.validate()?;
        if let Some(link) = model.missing_chain_link() {
            return Err(GaitError::MissingLink(link));
        }

        let mut expected: PartTable<Option<f64>> = [[None; CHAIN.len()]; CHAIN.len()];
        let mut modeled: PartTable<bool> = [[false; CHAIN.len()]; CHAIN.len()];
        for &a in &CHAIN {
            for &b in &CHAIN {
                expected[a.chain_index()][b.chain_index()] = model.expected(a, b);
                modeled[a.chain_index()][b.chain_index()] =
                    JointPair::new(a, b).is_some_and(|p| model.contains(p));
            }
        }

        Ok(Self {
            config: config.clone(),
            expected,
            modeled,
        })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    fn expected(&self, a: BodyPart, b: BodyPart) -> Option<f64> {
        self.expected[a.chain_index()][b.chain_index()]
    }

    fn is_modeled(&self, a: BodyPart, b: BodyPart) -> bool {
        self.modeled[a.chain_index()][b.chain_index()]
    }

    fn cost(&self, a: (BodyPart, &Point3), b: (BodyPart, &Point3)) -> Option<f64> {
        let expected = self.expected(a.0, b.0)?;
        inside_spheres(a.1, b.1, expected, self.config.max_link_ratio)
    }

    /// Prune candidates of one frame.
    fn candidate_groups(&self, frame: &FrameCandidates) -> Result<PartGroups, MissingReason> {
        let mut groups = filter::group_by_part(frame);
        if [BodyPart::Head, BodyPart::Hip, BodyPart::Foot]
            .iter()
            .any(|&p| filter::group(&groups, p).is_empty())
        {
            return Err(MissingReason::NoCandidates);
        }

        for g in groups.iter_mut() {
            *g = filter::dedup_by_proximity(std::mem::take(g), self.config.merge_radius);
        }

        let reference = filter::reference_point(filter::group(&groups, BodyPart::Hip))
            .ok_or(MissingReason::NoCandidates)?;

        for &part in CHAIN.iter().filter(|&&p| p != BodyPart::Hip) {
            let Some(expected) = self.expected(BodyPart::Hip, part) else {
                continue;
            };
            let g = &mut groups[part.chain_index()];
            *g = filter::inside_radii(
                std::mem::take(g),
                &reference,
                expected * self.config.radius_slack,
            );
        }
        for &part in &CHAIN {
            let expected = self.expected(BodyPart::Hip, part);
            let g = &mut groups[part.chain_index()];
            *g = filter::cap_best_fit(
                std::mem::take(g),
                &reference,
                expected,
                self.config.max_candidates_per_part,
            );
        }
        Ok(groups)
    }

    /// Pick the best head, hip and foot pair of one frame.
    pub fn select(&self, frame: &FrameCandidates) -> Result<Selection, MissingReason> {
        let groups = self.candidate_groups(frame)?;
        let heads = filter::group(&groups, BodyPart::Head);
        let hips = filter::group(&groups, BodyPart::Hip);
        let feet = filter::group(&groups, BodyPart::Foot);
        if heads.is_empty() || hips.is_empty() || feet.len() < 2 {
            return Err(MissingReason::NoFeasibleAssignment);
        }

        let intermediates: Vec<BodyPart> = CHAIN
            .iter()
            .copied()
            .filter(|p| p.is_optional() && !filter::group(&groups, *p).is_empty())
            .collect();

        let mut best: Option<Selection> = None;
        for head in heads {
            for hip in hips {
                let Some(head_hip) = self.cost((BodyPart::Head, head), (BodyPart::Hip, hip))
                else {
                    continue;
                };
                let legs: Vec<Option<LegCost>> = feet
                    .iter()
                    .map(|foot| self.best_leg(&groups, &intermediates, head, hip, foot))
                    .collect();

                for a in 0..feet.len() {
                    let Some(leg_a) = legs[a] else { continue };
                    for b in (a + 1)..feet.len() {
                        let Some(leg_b) = legs[b] else { continue };
                        let links = 1 + leg_a.links + leg_b.links;
                        let score = (head_hip + leg_a.cost + leg_b.cost) / links as f64;
                        if best.map_or(true, |s| score < s.score) {
                            best = Some(Selection {
                                head: *head,
                                hip: *hip,
                                feet: [feet[a], feet[b]],
                                score,
                            });
                        }
                    }
                }
            }
        }

        best.ok_or(MissingReason::NoFeasibleAssignment)
    }

    /// Cheapest feasible leg from `hip` to `foot`.
    fn best_leg(
        &self,
        groups: &PartGroups,
        intermediates: &[BodyPart],
        head: &Point3,
        hip: &Point3,
        foot: &Point3,
    ) -> Option<LegCost> {
        let mut path = vec![(BodyPart::Hip, *hip)];
        let mut best = None;
        self.extend_leg(
            groups,
            intermediates,
            head,
            foot,
            &mut path,
            LegCost {
                cost: 0.0,
                links: 0,
            },
            &mut best,
        );
        best
    }

    /// Depth-first walk over the intermediate layers, pruning at the first
    /// infeasible link.
    #[allow(clippy::too_many_arguments)]
    fn extend_leg(
        &self,
        groups: &PartGroups,
        intermediates: &[BodyPart],
        head: &Point3,
        foot: &Point3,
        path: &mut Vec<(BodyPart, Point3)>,
        acc: LegCost,
        best: &mut Option<LegCost>,
    ) {
        let Some((&part, rest)) = intermediates.split_first() else {
            if let Some(done) = self.add_node(path, head, BodyPart::Foot, foot, acc) {
                if best.map_or(true, |b| done.cost < b.cost) {
                    *best = Some(done);
                }
            }
            return;
        };

        for candidate in filter::group(groups, part) {
            let Some(next) = self.add_node(path, head, part, candidate, acc) else {
                continue;
            };
            path.push((part, *candidate));
            self.extend_leg(groups, rest, head, foot, path, next, best);
            path.pop();
        }
    }

    /// Cost of appending `(part, pos)` to `path`: the edge from the last node
    /// plus every modeled link to earlier nodes and to the head.
    fn add_node(
        &self,
        path: &[(BodyPart, Point3)],
        head: &Point3,
        part: BodyPart,
        pos: &Point3,
        acc: LegCost,
    ) -> Option<LegCost> {
        let (&(last_part, last_pos), earlier) = path.split_last()?;
        let mut out = acc;
        out.cost += self.cost((last_part, &last_pos), (part, pos))?;
        out.links += 1;

        for (p, q) in earlier {
            if self.is_modeled(*p, part) {
                out.cost += self.cost((*p, q), (part, pos))?;
                out.links += 1;
            }
        }
        if self.is_modeled(BodyPart::Head, part) {
            out.cost += self.cost((BodyPart::Head, head), (part, pos))?;
            out.links += 1;
        }
        Some(out)
    }
}
