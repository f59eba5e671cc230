//! Fundamental-frequency extraction and conditioning.
//!
//! # Architecture
//!
//! 1. [`F0Estimator::estimate`]: waveform -> raw per-frame Hz track
//!    (0 on unvoiced frames); any estimator implementing the trait plugs in
//! 2. [`track`] conditioning: median smoothing, voiced-gap interpolation,
//!    resizing to the model's frame grid, semitone shift, mel-bin
//!    quantization
//! 3. [`PitchExtractor::calculate`]: drives the steps above and merges an
//!    optional externally supplied F0 track, producing a [`PitchTrack`]
//!    aligned to the feature-frame resolution
//!
//! Voiced frames carry `pitchf > 0` and a quantized bin in `[1, 255]`;
//! unvoiced frames are exactly 0 in both sequences.

mod error;
mod estimator;
mod extractor;
mod f0file;
pub mod track;
mod yin;

pub use error::PitchError;
pub use estimator::{F0Estimator, F0Params};
pub use extractor::{PitchConfig, PitchExtractor};
pub use f0file::{parse_f0_file, parse_f0_text, OverrideTrack};
pub use track::PitchTrack;
pub use yin::Yin;
