use thiserror::Error;

/// Errors returned by pitch operations.
#[derive(Debug, Error)]
pub enum PitchError {
    #[error("pitch: f0 override file: {0}")]
    F0File(String),

    #[error("pitch: estimator: {0}")]
    Estimator(String),

    #[error("pitch: empty waveform")]
    EmptyWaveform,
}
