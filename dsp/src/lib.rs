//! Signal-processing primitives for the revoice conversion pipeline.
//!
//! This crate provides the numeric building blocks the pipeline crates
//! compose:
//!
//! - `filter`: fixed 5th-order Butterworth high-pass with zero-phase
//!   (forward-backward) application, for DC/rumble removal before analysis
//! - `interp`: linear interpolation and resizing helpers
//! - `rms`: short-time RMS envelopes and loudness matching
//! - `resample`: one-shot sample-rate conversion built on rubato
//! - `wave`: reflect padding, stereo downmix, peak normalization
//!
//! All functions take f32 sample buffers and return new vectors; nothing
//! mutates its input in place except where documented.

pub mod error;
pub mod filter;
pub mod interp;
pub mod rms;
pub mod resample;
pub mod wave;

pub use error::DspError;
pub use filter::zero_phase_highpass;
pub use interp::{interp, linear_resize};
pub use resample::resample;
pub use rms::{loudness_match, rms_envelope};
pub use wave::{downmix_stereo, reflect_pad, scale_to_pcm16};
