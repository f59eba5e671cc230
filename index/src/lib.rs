//! Nearest-neighbor speaker index and timbre feature blending.
//!
//! A speaker index stores the target speaker's encoder feature vectors.
//! During conversion each frame of source features is retargeted toward the
//! index contents: the frame's `k = 8` nearest neighbors are retrieved,
//! combined with inverse-square-distance weights, and mixed with the
//! original frame by a blend ratio.
//!
//! [`SpeakerIndex`] is the retrieval capability (search + reconstruct);
//! [`FlatIndex`] is the bundled exact implementation with a little-endian
//! binary file format. Any external ANN index can substitute by
//! implementing the trait.

mod blend;
mod error;
mod flat;
mod speaker;

pub use blend::{blend, BLEND_NEIGHBORS};
pub use error::IndexError;
pub use flat::FlatIndex;
pub use speaker::{Neighbor, SpeakerIndex};
