//! Synthetic walking trials shared by unit tests.
//!
//! The reference walker moves along +x at 40 mm/frame with a 30-frame gait
//! cycle. Hip at 900 mm, head 700 mm above it, feet on the floor at
//! `z = ∓100` swinging ±300 mm around the hip. Thigh, knee and calf sit on
//! the straight hip→foot segment at the nominal link fractions.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::geometry::Point3;
use crate::lengths::LinkLengthModel;
use crate::pose::{FrameCandidates, Proposal};
use crate::skeleton::{BodyPart, JointPair};

const HIP_HEIGHT: f64 = 900.0;
const HEAD_ABOVE_HIP: f64 = 700.0;
const LEG_LINKS: [(BodyPart, BodyPart, f64); 4] = [
    (BodyPart::Hip, BodyPart::Thigh, 100.0),
    (BodyPart::Thigh, BodyPart::Knee, 350.0),
    (BodyPart::Knee, BodyPart::Calf, 150.0),
    (BodyPart::Calf, BodyPart::Foot, 330.0),
];

/// Exact model of the synthetic body.
pub(crate) fn test_model() -> LinkLengthModel {
    let mut lengths = vec![(
        JointPair::new(BodyPart::Head, BodyPart::Hip).unwrap(),
        HEAD_ABOVE_HIP,
    )];
    lengths.extend(
        LEG_LINKS
            .iter()
            .map(|&(a, b, l)| (JointPair::new(a, b).unwrap(), l)),
    );
    LinkLengthModel::from_lengths(lengths).unwrap()
}

/// Proposals of a body with the hip at `(x, 900, z)` and the given feet.
pub(crate) fn body(frame: usize, x: f64, z: f64, feet: [Point3; 2]) -> FrameCandidates {
    let hip = Point3::new(x, HIP_HEIGHT, z);
    let head = Point3::new(x, HIP_HEIGHT + HEAD_ABOVE_HIP, z);
    let leg_total: f64 = LEG_LINKS.iter().map(|l| l.2).sum();

    let mut proposals = vec![
        Proposal::new(BodyPart::Head, head),
        Proposal::new(BodyPart::Hip, hip),
    ];
    for foot in &feet {
        let mut along = 0.0;
        for &(_, part, len) in &LEG_LINKS[..3] {
            along += len;
            proposals.push(Proposal::new(part, hip + (foot - hip) * (along / leg_total)));
        }
    }
    for foot in feet {
        proposals.push(Proposal::new(BodyPart::Foot, foot));
    }
    FrameCandidates::new(frame, proposals)
}

/// Reference walker at `frame`, optionally with distractor proposals: a
/// spurious head, a floating foot blob and a near-duplicate of the left foot.
pub(crate) fn walker_frame(frame: usize, distractors: bool) -> FrameCandidates {
    let x = 40.0 * frame as f64;
    let swing = 300.0 * (2.0 * PI * frame as f64 / 30.0).cos();
    let left = Point3::new(x + swing, 0.0, -100.0);
    let right = Point3::new(x - swing, 0.0, 100.0);
    let mut f = body(frame, x, 0.0, [left, right]);
    if distractors {
        f.proposals
            .push(Proposal::new(BodyPart::Head, Point3::new(x + 400.0, 1700.0, 0.0)));
        f.proposals
            .push(Proposal::new(BodyPart::Foot, Point3::new(x, 300.0, 800.0)));
        f.proposals.push(Proposal::new(
            BodyPart::Foot,
            left + crate::geometry::Vector3::new(5.0, 0.0, 0.0),
        ));
    }
    f
}

pub(crate) fn walker_frames(n: usize, distractors: bool) -> Vec<FrameCandidates> {
    (0..n).map(|f| walker_frame(f, distractors)).collect()
}

/// Walk +x for 45 frames, stand for 10, walk back along -x for 45.
pub(crate) fn shuttle_frames() -> Vec<FrameCandidates> {
    (0..100)
        .map(|f| {
            let (x, heading) = match f {
                0..=44 => (40.0 * f as f64, 1.0),
                45..=54 => (1760.0, 0.0),
                _ => (1760.0 - 40.0 * (f - 54) as f64, -1.0),
            };
            let swing = heading * 300.0 * (2.0 * PI * f as f64 / 30.0).cos();
            let side_z = if heading < 0.0 { 100.0 } else { -100.0 };
            let left = Point3::new(x + swing, 0.0, side_z);
            let right = Point3::new(x - swing, 0.0, -side_z);
            body(f, x, 0.0, [left, right])
        })
        .collect()
}

/// Subject turning slowly on the spot: the hip circles with a 50 mm radius.
pub(crate) fn turning_frames(n: usize) -> Vec<FrameCandidates> {
    (0..n)
        .map(|f| {
            let a = 2.0 * PI * f as f64 / 80.0;
            let (x, z) = (50.0 * a.cos(), 50.0 * a.sin());
            let feet = [Point3::new(x, 0.0, z - 100.0), Point3::new(x, 0.0, z + 100.0)];
            body(f, x, z, feet)
        })
        .collect()
}

/// Add isotropic Gaussian noise of `sigma` to every proposal.
pub(crate) fn add_noise(frame: &FrameCandidates, sigma: f64, rng: &mut StdRng) -> FrameCandidates {
    let normal = Normal::new(0.0, sigma).unwrap();
    let mut out = frame.clone();
    for p in out.proposals.iter_mut() {
        p.position.x += normal.sample(rng);
        p.position.y += normal.sample(rng);
        p.position.z += normal.sample(rng);
    }
    out
}
