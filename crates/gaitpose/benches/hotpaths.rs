use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gaitpose::clustering::mean_shift;
use gaitpose::pose::{build_trajectory, FrameSelector};
use gaitpose::{
    BodyPart, FrameCandidates, GaitAnalyzer, GaitConfig, JointPair, Kernel, LinkLengthModel,
    MeanShiftConfig, Point3, Proposal, SelectorConfig, Vector3,
};
use nalgebra::Vector1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LEG: [(BodyPart, f64); 3] = [
    (BodyPart::Thigh, 100.0),
    (BodyPart::Knee, 450.0),
    (BodyPart::Calf, 600.0),
];

fn model() -> LinkLengthModel {
    let p = |a, b| JointPair::new(a, b).unwrap();
    LinkLengthModel::from_lengths([
        (p(BodyPart::Head, BodyPart::Hip), 700.0),
        (p(BodyPart::Hip, BodyPart::Thigh), 100.0),
        (p(BodyPart::Thigh, BodyPart::Knee), 350.0),
        (p(BodyPart::Knee, BodyPart::Calf), 150.0),
        (p(BodyPart::Calf, BodyPart::Foot), 330.0),
    ])
    .unwrap()
}

/// Walker with `clutter` random extra proposals per part.
fn frames(n: usize, clutter: usize, rng: &mut StdRng) -> Vec<FrameCandidates> {
    (0..n)
        .map(|f| {
            let x = 40.0 * f as f64;
            let swing = 300.0 * (2.0 * PI * f as f64 / 30.0).cos();
            let hip = Point3::new(x, 900.0, 0.0);
            let feet = [
                Point3::new(x + swing, 0.0, -100.0),
                Point3::new(x - swing, 0.0, 100.0),
            ];
            let mut proposals = vec![
                Proposal::new(BodyPart::Head, Point3::new(x, 1600.0, 0.0)),
                Proposal::new(BodyPart::Hip, hip),
            ];
            for foot in &feet {
                for &(part, along) in &LEG {
                    proposals.push(Proposal::new(part, hip + (foot - hip) * (along / 930.0)));
                }
                proposals.push(Proposal::new(BodyPart::Foot, *foot));
            }
            for part in [BodyPart::Head, BodyPart::Knee, BodyPart::Calf, BodyPart::Foot] {
                for _ in 0..clutter {
                    let jitter = Vector3::new(
                        rng.gen_range(-400.0..400.0),
                        rng.gen_range(-900.0..700.0),
                        rng.gen_range(-400.0..400.0),
                    );
                    proposals.push(Proposal::new(part, hip + jitter));
                }
            }
            FrameCandidates::new(f, proposals)
        })
        .collect()
}

fn bench_select_frames(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let model = model();
    let selector = FrameSelector::new(&model, &SelectorConfig::default()).unwrap();
    let clean = frames(100, 0, &mut rng);
    let cluttered = frames(100, 2, &mut rng);

    c.bench_function("select_frames_100_clean", |b| {
        b.iter(|| build_trajectory(black_box(&clean), &selector, &Vector3::y()))
    });
    c.bench_function("select_frames_100_clutter2", |b| {
        b.iter(|| build_trajectory(black_box(&cluttered), &selector, &Vector3::y()))
    });
}

fn bench_mean_shift(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let dirs: Vec<Vector3> = (0..600)
        .map(|i| {
            let heading = if i % 2 == 0 { 1.0 } else { -1.0 };
            Vector3::new(heading, 0.0, rng.gen_range(-0.2..0.2)).normalize()
        })
        .collect();
    let peaks: Vec<Vector1<f64>> = (0..300)
        .map(|i| Vector1::new((i / 7 * 30 + i % 7) as f64))
        .collect();

    let flat = MeanShiftConfig::default();
    c.bench_function("mean_shift_dirs_600", |b| {
        b.iter(|| mean_shift(black_box(&dirs), &flat))
    });
    let gauss = MeanShiftConfig::new(Kernel::Gaussian { sigma: 5.0 });
    c.bench_function("mean_shift_peaks_300", |b| {
        b.iter(|| mean_shift(black_box(&peaks), &gauss))
    });
}

fn bench_analyze(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let trial = frames(300, 1, &mut rng);
    let analyzer = GaitAnalyzer::new(GaitConfig::default(), model()).unwrap();
    c.bench_function("analyze_300_frames", |b| {
        b.iter(|| analyzer.analyze(black_box(&trial)))
    });
}

criterion_group!(benches, bench_select_frames, bench_mean_shift, bench_analyze);
criterion_main!(benches);
