//! Mean-shift clustering on fixed-size feature vectors.
//!
//! Used twice: on unit walking directions to find passes, and on 1-D frame
//! indices to group gait-signal peaks. The cluster count is never given.

mod mean_shift;

pub use mean_shift::{mean_shift, MeanShiftResult};

use crate::error::GaitError;

/// Kernel profile and its bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    /// Uniform weight within `radius`, zero outside.
    Flat { radius: f64 },
    /// `exp(-d² / 2σ²)`.
    Gaussian { sigma: f64 },
}

impl Kernel {
    pub fn bandwidth(&self) -> f64 {
        match *self {
            Self::Flat { radius } => radius,
            Self::Gaussian { sigma } => sigma,
        }
    }

    #[inline]
    pub(crate) fn weight(&self, dist_sq: f64) -> f64 {
        match *self {
            Self::Flat { radius } => {
                if dist_sq <= radius * radius {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Gaussian { sigma } => (-dist_sq / (2.0 * sigma * sigma)).exp(),
        }
    }
}

/// Mean-shift parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeanShiftConfig {
    pub kernel: Kernel,
    /// Converged positions closer than this end up in the same cluster.
    pub merge_tolerance: f64,
    /// A point stops once its shift is shorter than this.
    pub epsilon: f64,
    /// Iteration cap per point; reaching it flags the point unconverged.
    pub max_iters: usize,
}

impl MeanShiftConfig {
    /// Tolerances scaled to the kernel bandwidth.
    pub fn new(kernel: Kernel) -> Self {
        let bw = kernel.bandwidth();
        Self {
            kernel,
            merge_tolerance: 0.25 * bw,
            epsilon: 1e-3 * bw,
            max_iters: 300,
        }
    }

    pub fn validate(&self) -> Result<(), GaitError> {
        let bw = self.kernel.bandwidth();
        if !bw.is_finite() || bw <= 0.0 {
            return Err(GaitError::InvalidConfig(
                "mean-shift bandwidth must be positive".into(),
            ));
        }
        if !self.merge_tolerance.is_finite() || self.merge_tolerance < 0.0 {
            return Err(GaitError::InvalidConfig(
                "mean-shift merge_tolerance must be >= 0".into(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(GaitError::InvalidConfig(
                "mean-shift epsilon must be positive".into(),
            ));
        }
        if self.max_iters == 0 {
            return Err(GaitError::InvalidConfig(
                "mean-shift max_iters must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MeanShiftConfig {
    fn default() -> Self {
        Self::new(Kernel::Flat { radius: 0.5 })
    }
}
