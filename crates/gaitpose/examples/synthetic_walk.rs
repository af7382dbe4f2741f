use gaitpose::{BodyPart, FrameCandidates, GaitAnalyzer, GaitConfig, Point3, Proposal, TrialData};
use std::error::Error;
use std::f64::consts::PI;

/// Straight walk along +x: 40 mm/frame, 30-frame gait cycle, 1.2 m strides.
fn synthetic_trial(n_frames: usize) -> TrialData {
    let frames = (0..n_frames)
        .map(|f| {
            let x = 40.0 * f as f64;
            let swing = 300.0 * (2.0 * PI * f as f64 / 30.0).cos();
            let hip = Point3::new(x, 900.0, 0.0);
            let mut proposals = vec![
                Proposal::new(BodyPart::Head, Point3::new(x, 1600.0, 0.0)),
                Proposal::new(BodyPart::Hip, hip),
            ];
            for foot in [
                Point3::new(x + swing, 0.0, -100.0),
                Point3::new(x - swing, 0.0, 100.0),
            ] {
                for (part, along) in [
                    (BodyPart::Thigh, 100.0),
                    (BodyPart::Knee, 450.0),
                    (BodyPart::Calf, 600.0),
                ] {
                    proposals.push(Proposal::new(part, hip + (foot - hip) * (along / 930.0)));
                }
                proposals.push(Proposal::new(BodyPart::Foot, foot));
            }
            FrameCandidates::new(f, proposals)
        })
        .collect();
    TrialData {
        frame_rate: Some(30.0),
        frames,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let trial = synthetic_trial(150);

    let analyzer = GaitAnalyzer::calibrate(GaitConfig::default(), &trial.frames)?;
    let result = analyzer.analyze_trial(&trial)?;

    println!(
        "{} passes, {} strides",
        result.passes.len(),
        result.records.len()
    );
    if let Some(summary) = result.summary() {
        println!(
            "stride length {:.0} mm, stride time {:.2} s, cadence {:.0} steps/min",
            summary.stride_length, summary.stride_time, summary.cadence
        );
    }

    if let Some(out_path) = args.get(1) {
        std::fs::write(out_path, serde_json::to_string_pretty(&trial)?)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
