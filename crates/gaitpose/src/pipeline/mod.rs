//! Trial analysis pipeline.
//!
//! Glue between the stages; the algorithms live in `crate::pose`,
//! `crate::passes` and `crate::gait`. This layer owns stage order, early
//! exits with an [`EmptyReason`] and the stage-level logs.

mod result;
mod run;

pub use result::{EmptyReason, GaitSummary, TrialResult};

pub(crate) use run::{analyze_trial, select_frames};
