//! Voice-conversion inference pipeline.
//!
//! # Architecture
//!
//! One [`Pipeline::run`] invocation drives a full waveform through:
//!
//! ```text
//! downmix -> prefilter -> pad+plan -> per-segment (pitch + convert)
//!         -> concatenate -> loudness-match -> resample -> normalize
//! ```
//!
//! - [`SegmentPlanner`] finds low-energy cut points so arbitrarily long
//!   input is processed in bounded-length segments
//! - [`SegmentConverter`] converts one segment: encoder features, optional
//!   timbre blending against a speaker index, pitch conditioning, opaque
//!   synthesis
//! - The neural models stay behind the [`FeatureEncoder`] and
//!   [`VoiceSynthesizer`] capability traits; anything implementing them is
//!   substitutable
//!
//! Execution is single-threaded and synchronous: segments are converted
//! strictly in sequence to bound peak memory, and the only long-running
//! call is the synthesizer inference itself. Optional enhancements (speaker
//! index, external F0 override) degrade gracefully with a logged warning;
//! failures on the mandatory path abort the invocation with a descriptive
//! error.

mod config;
mod convert;
mod error;
mod model;
mod pipeline;
mod planner;
mod timing;

pub use config::PipelineConfig;
pub use convert::SegmentConverter;
pub use error::PipelineError;
pub use model::{FeatureEncoder, ModelError, ModelVersion, VoiceSynthesizer};
pub use pipeline::{Pipeline, PitchMode, RunOptions};
pub use planner::SegmentPlanner;
pub use timing::TimingAccumulator;
