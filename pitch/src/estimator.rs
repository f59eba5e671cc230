use crate::PitchError;

/// Parameters handed to an F0 estimator.
#[derive(Debug, Clone)]
pub struct F0Params {
    /// Sample rate of the waveform in Hz.
    pub sample_rate: u32,
    /// Samples per analysis frame (one F0 value per hop).
    pub hop: usize,
    /// Lowest F0 considered voiced, in Hz.
    pub f0_min: f32,
    /// Highest F0 considered voiced, in Hz.
    pub f0_max: f32,
}

impl Default for F0Params {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            hop: 160,
            f0_min: 50.0,
            f0_max: 1100.0,
        }
    }
}

/// Estimates fundamental frequency from a raw waveform.
///
/// Returns one Hz value per analysis frame (`len / hop + 1` frames, frame k
/// centered at sample `k * hop`); unvoiced frames are exactly 0. Which
/// algorithm runs behind this trait is the caller's choice; the extraction
/// pipeline only relies on the voiced/unvoiced-as-zero convention.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
pub trait F0Estimator: Send + Sync {
    /// Computes the raw F0 track for the waveform.
    fn estimate(&self, wav: &[f32], params: &F0Params) -> Result<Vec<f32>, PitchError>;
}
