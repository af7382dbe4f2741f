//! Subject-specific link-length model.
//!
//! The model maps joint pairs to expected distances (mm). It is estimated once
//! per subject from calibration frames ([`estimate_link_lengths`]) and is
//! read-only afterwards; it can be saved as JSON and reloaded.

mod estimate;

pub use estimate::estimate_link_lengths;

use std::path::Path;

use crate::error::GaitError;
use crate::skeleton::{BodyPart, JointPair, CHAIN};

/// One modeled link.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkLength {
    pub pair: JointPair,
    /// Expected distance between the two joints (mm), strictly positive.
    pub length: f64,
}

/// Expected distances between joint pairs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LinkLengthFile", into = "LinkLengthFile")]
pub struct LinkLengthModel {
    links: Vec<LinkLength>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct LinkLengthFile {
    links: Vec<LinkLength>,
}

impl TryFrom<LinkLengthFile> for LinkLengthModel {
    type Error = GaitError;

    fn try_from(file: LinkLengthFile) -> Result<Self, Self::Error> {
        Self::from_lengths(file.links.into_iter().map(|l| (l.pair, l.length)))
    }
}

impl From<LinkLengthModel> for LinkLengthFile {
    fn from(model: LinkLengthModel) -> Self {
        Self { links: model.links }
    }
}

impl LinkLengthModel {
    /// Build a model from explicit lengths.
    ///
    /// Rejects non-positive or non-finite lengths and duplicate pairs.
    pub fn from_lengths(
        lengths: impl IntoIterator<Item = (JointPair, f64)>,
    ) -> Result<Self, GaitError> {
        let mut links: Vec<LinkLength> = Vec::new();
        for (pair, length) in lengths {
            if !length.is_finite() || length <= 0.0 {
                return Err(GaitError::InvalidConfig(format!(
                    "link {} has non-positive length {}",
                    pair, length
                )));
            }
            if links.iter().any(|l| l.pair == pair) {
                return Err(GaitError::InvalidConfig(format!(
                    "link {} given more than once",
                    pair
                )));
            }
            links.push(LinkLength { pair, length });
        }
        links.sort_by_key(|l| l.pair);
        Ok(Self { links })
    }

    pub fn links(&self) -> &[LinkLength] {
        &self.links
    }

    /// Directly modeled length of `pair`.
    pub fn get(&self, pair: JointPair) -> Option<f64> {
        self.links
            .iter()
            .find(|l| l.pair == pair)
            .map(|l| l.length)
    }

    pub fn contains(&self, pair: JointPair) -> bool {
        self.get(pair).is_some()
    }

    /// Expected distance between two parts.
    ///
    /// The direct link when modeled, otherwise the sum of the consecutive
    /// chain links between them. `None` for identical parts or when a chain
    /// link is missing.
    pub fn expected(&self, a: BodyPart, b: BodyPart) -> Option<f64> {
        let pair = JointPair::new(a, b)?;
        if let Some(length) = self.get(pair) {
            return Some(length);
        }
        pair.chain_links()
            .into_iter()
            .map(|link| self.get(link))
            .sum::<Option<f64>>()
    }

    /// First consecutive chain link absent from the model, if any.
    pub fn missing_chain_link(&self) -> Option<JointPair> {
        CHAIN
            .windows(2)
            .filter_map(|w| JointPair::new(w[0], w[1]))
            .find(|pair| !self.contains(*pair))
    }

    /// Load a model saved as JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, GaitError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// One link to estimate and the per-frame quantile used for it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkSpec {
    pub pair: JointPair,
    /// Quantile of the per-frame cross-distances, in `[0, 1]`.
    pub frame_quantile: f64,
}

impl LinkSpec {
    pub fn new(a: BodyPart, b: BodyPart, frame_quantile: f64) -> Option<Self> {
        JointPair::new(a, b).map(|pair| Self {
            pair,
            frame_quantile,
        })
    }
}

/// Link-length estimation parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LengthConfig {
    /// Links to estimate.
    pub links: Vec<LinkSpec>,
    /// Minimum number of valid frames per link.
    pub min_frames: usize,
    /// Cross-frame MAD rejection factor.
    pub outlier_mad_factor: f64,
}

impl Default for LengthConfig {
    fn default() -> Self {
        use BodyPart::*;
        let specs = [
            (Head, Hip, 0.5),
            (Hip, Thigh, 0.25),
            (Thigh, Knee, 0.25),
            (Knee, Calf, 0.25),
            (Calf, Foot, 0.25),
            (Hip, Knee, 0.25),
            (Knee, Foot, 0.25),
        ];
        Self {
            links: specs
                .iter()
                .filter_map(|&(a, b, q)| LinkSpec::new(a, b, q))
                .collect(),
            min_frames: 30,
            outlier_mad_factor: 3.0,
        }
    }
}

impl LengthConfig {
    pub fn validate(&self) -> Result<(), GaitError> {
        if self.links.is_empty() {
            return Err(GaitError::InvalidConfig("no links to estimate".into()));
        }
        if let Some(bad) = self
            .links
            .iter()
            .find(|l| !(0.0..=1.0).contains(&l.frame_quantile))
        {
            return Err(GaitError::InvalidConfig(format!(
                "frame quantile {} for link {} is outside [0, 1]",
                bad.frame_quantile, bad.pair
            )));
        }
        if self.min_frames == 0 {
            return Err(GaitError::InvalidConfig("min_frames must be >= 1".into()));
        }
        if !self.outlier_mad_factor.is_finite() || self.outlier_mad_factor <= 0.0 {
            return Err(GaitError::InvalidConfig(
                "outlier_mad_factor must be positive".into(),
            ));
        }
        Ok(())
    }
}
