use thiserror::Error;

/// Errors returned by speaker-index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index: dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    #[error("index: id {id} out of bounds ({len} vectors)")]
    IdOutOfBounds { id: u32, len: usize },

    #[error("index: empty index")]
    Empty,

    #[error("index: {0}")]
    Io(String),

    #[error("index: invalid format: {0}")]
    InvalidFormat(String),
}
