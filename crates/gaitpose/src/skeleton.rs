//! Body parts, joint pairs and body sides.

use std::fmt;

/// Joint type carried by every proposal, ordered top-down along the chain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Hip,
    Thigh,
    Knee,
    Calf,
    Foot,
}

/// Kinematic chain from head to foot.
pub const CHAIN: [BodyPart; 6] = [
    BodyPart::Head,
    BodyPart::Hip,
    BodyPart::Thigh,
    BodyPart::Knee,
    BodyPart::Calf,
    BodyPart::Foot,
];

impl BodyPart {
    /// Position in [`CHAIN`].
    pub fn chain_index(self) -> usize {
        self as usize
    }

    /// Intermediate leg parts; a frame may lack them entirely.
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Thigh | Self::Knee | Self::Calf)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Hip => "hip",
            Self::Thigh => "thigh",
            Self::Knee => "knee",
            Self::Calf => "calf",
            Self::Foot => "foot",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unordered pair of distinct body parts, stored upper part first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "[BodyPart; 2]", into = "[BodyPart; 2]")]
pub struct JointPair {
    upper: BodyPart,
    lower: BodyPart,
}

impl JointPair {
    /// Canonical pair, or `None` when both parts are the same.
    pub fn new(a: BodyPart, b: BodyPart) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { upper: a, lower: b }),
            std::cmp::Ordering::Greater => Some(Self { upper: b, lower: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn upper(&self) -> BodyPart {
        self.upper
    }

    pub fn lower(&self) -> BodyPart {
        self.lower
    }

    pub fn parts(&self) -> [BodyPart; 2] {
        [self.upper, self.lower]
    }

    pub fn contains(&self, part: BodyPart) -> bool {
        self.upper == part || self.lower == part
    }

    /// True when the parts are neighbours in [`CHAIN`].
    pub fn is_adjacent(&self) -> bool {
        self.lower.chain_index() == self.upper.chain_index() + 1
    }

    /// Consecutive chain links spanning this pair, top-down.
    pub fn chain_links(&self) -> Vec<JointPair> {
        CHAIN[self.upper.chain_index()..=self.lower.chain_index()]
            .windows(2)
            .map(|w| JointPair {
                upper: w[0],
                lower: w[1],
            })
            .collect()
    }
}

impl fmt::Display for JointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.upper, self.lower)
    }
}

impl TryFrom<[BodyPart; 2]> for JointPair {
    type Error = String;

    fn try_from(parts: [BodyPart; 2]) -> Result<Self, Self::Error> {
        Self::new(parts[0], parts[1])
            .ok_or_else(|| format!("joint pair needs two distinct parts, got {}", parts[0]))
    }
}

impl From<JointPair> for [BodyPart; 2] {
    fn from(pair: JointPair) -> Self {
        pair.parts()
    }
}

/// Anatomical side of a foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_canonical() {
        let a = JointPair::new(BodyPart::Foot, BodyPart::Knee).unwrap();
        let b = JointPair::new(BodyPart::Knee, BodyPart::Foot).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.upper(), BodyPart::Knee);
        assert_eq!(a.to_string(), "knee-foot");
        assert!(JointPair::new(BodyPart::Hip, BodyPart::Hip).is_none());
    }

    #[test]
    fn chain_links_span_pair() {
        let pair = JointPair::new(BodyPart::Hip, BodyPart::Knee).unwrap();
        assert!(!pair.is_adjacent());
        let links: Vec<String> = pair.chain_links().iter().map(|l| l.to_string()).collect();
        assert_eq!(links, vec!["hip-thigh", "thigh-knee"]);
        assert!(links_are_adjacent(&pair.chain_links()));
    }

    fn links_are_adjacent(links: &[JointPair]) -> bool {
        links.iter().all(JointPair::is_adjacent)
    }

    #[test]
    fn pair_json_form() {
        let pair = JointPair::new(BodyPart::Calf, BodyPart::Thigh).unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"["thigh","calf"]"#);
        let back: JointPair = serde_json::from_str(r#"["calf","thigh"]"#).unwrap();
        assert_eq!(back, pair);
        assert!(serde_json::from_str::<JointPair>(r#"["head","head"]"#).is_err());
    }
}
