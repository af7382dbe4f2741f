use std::path::Path;

use crate::error::GaitError;
use crate::pose::FrameCandidates;

/// A recorded trial as written by the proposal generator.
///
/// `frame_rate`, when present, overrides the configured one.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TrialData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    pub frames: Vec<FrameCandidates>,
}

impl TrialData {
    pub fn from_json_file(path: &Path) -> Result<Self, GaitError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn n_proposals(&self) -> usize {
        self.frames.iter().map(|f| f.proposals.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::BodyPart;

    #[test]
    fn parses_trial_json() {
        let json = r#"{
            "frame_rate": 25.0,
            "frames": [
                {"frame": 0, "proposals": [
                    {"part": "head", "position": [0.0, 1600.0, 0.0]},
                    {"part": "foot", "position": [100.0, 0.0, -90.0]}
                ]},
                {"frame": 1}
            ]
        }"#;
        let trial: TrialData = serde_json::from_str(json).unwrap();
        assert_eq!(trial.frame_rate, Some(25.0));
        assert_eq!(trial.frames.len(), 2);
        assert_eq!(trial.n_proposals(), 2);
        assert_eq!(trial.frames[0].proposals[1].part, BodyPart::Foot);
        assert!(trial.frames[1].proposals.is_empty());
    }
}
