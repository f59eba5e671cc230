use thiserror::Error;

/// Errors returned by DSP operations.
#[derive(Debug, Error)]
pub enum DspError {
    #[error("dsp: input too short: need more than {min} samples, got {got}")]
    InputTooShort { min: usize, got: usize },

    #[error("dsp: resample: {0}")]
    Resample(String),

    #[error("dsp: unsupported rate pair: {from} -> {to}")]
    UnsupportedRate { from: u32, to: u32 },
}

impl From<rubato::ResamplerConstructionError> for DspError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        DspError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for DspError {
    fn from(e: rubato::ResampleError) -> Self {
        DspError::Resample(e.to_string())
    }
}
