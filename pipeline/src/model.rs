use thiserror::Error;

/// Error from an opaque model call. Carries the backend's message so
/// failures surface with a cause rather than a generic string.
#[derive(Debug, Error)]
#[error("model: {0}")]
pub struct ModelError(pub String);

/// Conversion model family; selects which encoder output the pipeline
/// consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVersion {
    /// First-generation models: encoder layer 9 through the final
    /// projection.
    V1,
    /// Second-generation models: encoder layer 12, no projection.
    V2,
}

impl ModelVersion {
    /// Encoder output layer consumed for this version.
    pub fn output_layer(self) -> usize {
        match self {
            ModelVersion::V1 => 9,
            ModelVersion::V2 => 12,
        }
    }
}

/// Speaker-independent feature extraction from raw audio.
///
/// The input is mono f32 at 16 kHz. The output is a `[frames][dim]` matrix
/// at the encoder's native frame rate (the pipeline upsamples it ×2 to the
/// synthesis frame grid). Implementations select their output layer from
/// the version and are free to ignore it when they only support one family.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
pub trait FeatureEncoder: Send + Sync {
    /// Computes encoder features for an audio segment.
    fn extract(&self, audio: &[f32], version: ModelVersion) -> Result<Vec<Vec<f32>>, ModelError>;

    /// Dimensionality of the feature vectors (e.g. 256 for V1, 768 for V2).
    fn dimension(&self) -> usize;
}

/// Opaque generator/vocoder producing converted audio from features.
///
/// `pitch`/`pitchf` are both present for pitch-conditioned models and both
/// absent for pitch-independent ones; the pipeline never sends one without
/// the other. The output is mono f32 at [`VoiceSynthesizer::sample_rate`].
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
pub trait VoiceSynthesizer: Send + Sync {
    /// Runs inference for one segment.
    fn infer(
        &self,
        features: &[Vec<f32>],
        frame_len: usize,
        speaker_id: u32,
        pitch: Option<&[i64]>,
        pitchf: Option<&[f32]>,
    ) -> Result<Vec<f32>, ModelError>;

    /// Native output sample rate, Hz.
    fn sample_rate(&self) -> u32;

    /// Releases transient accelerator memory held by the backend.
    ///
    /// Called after every segment and again when the pipeline finishes,
    /// including error exits. Backends without scratch state keep the
    /// default no-op.
    fn release_transient(&self) {}
}

/// Calls [`VoiceSynthesizer::release_transient`] on drop, so scratch memory
/// is returned on every exit path of the scope that owns the guard.
pub(crate) struct ReleaseGuard<'a>(pub &'a dyn VoiceSynthesizer);

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.0.release_transient();
    }
}
