use thiserror::Error;

use revoice_dsp::DspError;
use revoice_index::IndexError;
use revoice_pitch::PitchError;

use crate::model::ModelError;

/// Errors that abort a pipeline invocation.
///
/// Recoverable conditions (missing/corrupt index file, malformed F0
/// override, resample target below 16 kHz) are handled inside the pipeline
/// with a logged warning and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Nearest-neighbor query failed once the index was in use
    /// (dimension/type mismatch). Fatal to the invocation.
    #[error("pipeline: index mismatch: {0}")]
    IndexMismatch(#[source] IndexError),

    #[error("pipeline: feature encoder: {0}")]
    Encoder(#[source] ModelError),

    #[error("pipeline: synthesizer: {0}")]
    Synth(#[source] ModelError),

    #[error("pipeline: pitch: {0}")]
    Pitch(#[from] PitchError),

    #[error("pipeline: dsp: {0}")]
    Dsp(#[from] DspError),

    /// Resampling below 16 kHz is not supported. `Pipeline::run` reports
    /// the condition with a warning and keeps the native rate; this variant
    /// exists for callers who validate options up front.
    #[error("pipeline: unsupported resample target {requested} Hz (minimum 16000)")]
    UnsupportedResample { requested: u32 },

    #[error("pipeline: empty input waveform")]
    EmptyInput,
}
