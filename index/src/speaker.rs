use crate::error::IndexError;

/// A single result from a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the matched vector in the index.
    pub id: u32,
    /// Squared L2 distance between query and match.
    /// Lower values indicate higher similarity.
    pub distance: f32,
}

/// Read-only retrieval over a target speaker's stored feature vectors.
///
/// Implementations must expose both the search surface (nearest IDs with
/// distances) and reconstruction of the raw stored vectors, since blending
/// combines neighbors by their original values rather than by ID alone.
///
/// All implementations must be safe for concurrent read use (Send + Sync);
/// the pipeline never writes to an index.
pub trait SpeakerIndex: Send + Sync {
    /// Returns the `k` nearest vectors to the query, ordered by ascending
    /// distance (closest first). Fewer than `k` results are returned when
    /// the index is smaller than `k`.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError>;

    /// Returns the raw stored vector for an ID from a previous search.
    fn reconstruct(&self, id: u32) -> Result<&[f32], IndexError>;

    /// Dimensionality of the stored vectors.
    fn dimension(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Returns true if the index contains no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
