use crate::geometry::Point3;
use crate::skeleton::BodyPart;

/// One candidate 3D position emitted by the proposal generator.
///
/// The part hint says which joint type the generator thinks this is. It does
/// not say which side the joint belongs to nor whether it is the right one.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Proposal {
    pub part: BodyPart,
    /// Sensor-space position (mm).
    pub position: Point3,
}

impl Proposal {
    pub fn new(part: BodyPart, position: Point3) -> Self {
        Self { part, position }
    }
}

/// All proposals of one video frame.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameCandidates {
    pub frame: usize,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
}

impl FrameCandidates {
    pub fn new(frame: usize, proposals: Vec<Proposal>) -> Self {
        Self { frame, proposals }
    }

    /// Positions of every proposal of `part`, in input order.
    pub fn positions_of(&self, part: BodyPart) -> Vec<Point3> {
        self.proposals
            .iter()
            .filter(|p| p.part == part)
            .map(|p| p.position)
            .collect()
    }
}
