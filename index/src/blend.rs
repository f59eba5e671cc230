//! Distance-weighted timbre retargeting.

use crate::error::IndexError;
use crate::speaker::SpeakerIndex;

/// Neighbors retrieved per frame.
pub const BLEND_NEIGHBORS: usize = 8;

/// Distances at or below this are treated as exact matches.
const ZERO_DISTANCE: f32 = 1e-12;

/// Retargets encoder features toward the index contents.
///
/// For each frame, the `k = 8` nearest stored vectors are combined with
/// weights proportional to `1 / distance²` (normalized to sum to 1), and
/// the result is mixed with the original frame:
/// `blend_ratio * retargeted + (1 - blend_ratio) * original`.
///
/// A neighbor at distance zero saturates the weighting: exact matches split
/// the weight uniformly among themselves and all other neighbors get zero
/// (rather than dividing by zero).
///
/// `blend_ratio == 0` returns the features unchanged. A query/index
/// dimension mismatch is fatal to the whole conversion and propagates as
/// [`IndexError::DimensionMismatch`].
pub fn blend(
    features: &[Vec<f32>],
    index: &dyn SpeakerIndex,
    blend_ratio: f32,
) -> Result<Vec<Vec<f32>>, IndexError> {
    if blend_ratio == 0.0 {
        return Ok(features.to_vec());
    }

    let dim = index.dimension();
    let mut out = Vec::with_capacity(features.len());
    for frame in features {
        let neighbors = index.search(frame, BLEND_NEIGHBORS)?;

        // Inverse-square-distance weights with zero-distance saturation.
        let exact = neighbors
            .iter()
            .filter(|n| n.distance <= ZERO_DISTANCE)
            .count();
        let weights: Vec<f32> = if exact > 0 {
            neighbors
                .iter()
                .map(|n| {
                    if n.distance <= ZERO_DISTANCE {
                        1.0 / exact as f32
                    } else {
                        0.0
                    }
                })
                .collect()
        } else {
            let raw: Vec<f32> = neighbors
                .iter()
                .map(|n| 1.0 / (n.distance * n.distance))
                .collect();
            let sum: f32 = raw.iter().sum();
            if sum > 0.0 {
                raw.into_iter().map(|w| w / sum).collect()
            } else {
                // All inverse-square weights underflowed; every neighbor is
                // equally (im)plausible.
                vec![1.0 / neighbors.len() as f32; neighbors.len()]
            }
        };

        let mut retargeted = vec![0.0f32; dim];
        for (n, &w) in neighbors.iter().zip(weights.iter()) {
            if w == 0.0 {
                continue;
            }
            let stored = index.reconstruct(n.id)?;
            for (acc, &v) in retargeted.iter_mut().zip(stored.iter()) {
                *acc += w * v;
            }
        }

        out.push(
            frame
                .iter()
                .zip(retargeted.iter())
                .map(|(&orig, &ret)| blend_ratio * ret + (1.0 - blend_ratio) * orig)
                .collect(),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::FlatIndex;

    fn index_with(vectors: &[&[f32]]) -> FlatIndex {
        let mut idx = FlatIndex::new(vectors[0].len());
        for v in vectors {
            idx.add(v).unwrap();
        }
        idx
    }

    #[test]
    fn zero_ratio_is_identity() {
        let idx = index_with(&[&[9.0, 9.0], &[8.0, 8.0]]);
        let feats = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let out = blend(&feats, &idx, 0.0).unwrap();
        assert_eq!(out, feats);
    }

    #[test]
    fn full_ratio_with_exact_match_returns_stored_vector() {
        let idx = index_with(&[&[1.0, 2.0], &[5.0, 5.0], &[-3.0, 0.5]]);
        let feats = vec![vec![1.0, 2.0]];
        let out = blend(&feats, &idx, 1.0).unwrap();
        // Distance-zero saturation: exactly the stored vector, no NaN.
        assert_eq!(out[0], vec![1.0, 2.0]);
        assert!(out[0].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn duplicate_exact_matches_share_weight() {
        let idx = index_with(&[&[1.0, 2.0], &[1.0, 2.0], &[7.0, 7.0]]);
        let out = blend(&[vec![1.0, 2.0]].to_vec(), &idx, 1.0).unwrap();
        assert_eq!(out[0], vec![1.0, 2.0]);
    }

    #[test]
    fn partial_ratio_mixes_original_and_retargeted() {
        let idx = index_with(&[&[2.0, 2.0]]);
        let feats = vec![vec![0.0, 0.0]];
        let out = blend(&feats, &idx, 0.5).unwrap();
        // Single neighbor: retargeted = [2, 2]; half mix = [1, 1].
        assert_eq!(out[0], vec![1.0, 1.0]);
    }

    #[test]
    fn closer_neighbors_dominate() {
        let idx = index_with(&[&[1.0, 0.0], &[10.0, 0.0]]);
        let feats = vec![vec![0.0, 0.0]];
        let out = blend(&feats, &idx, 1.0).unwrap();
        // Weight of [1, 0] is (1/1)² vs (1/100)² for [10, 0].
        assert!(out[0][0] < 1.1, "got {}", out[0][0]);
        assert!(out[0][0] > 0.9, "got {}", out[0][0]);
    }

    #[test]
    fn far_neighbors_fall_back_to_uniform_weights() {
        // Squared-L2 distance 1e24: its inverse square underflows to zero,
        // so the weights must come from the uniform fallback, not 0/0.
        let idx = index_with(&[&[1e12f32]]);
        let out = blend(&[vec![0.0]].to_vec(), &idx, 1.0).unwrap();
        assert!(out[0][0].is_finite());
        assert_eq!(out[0], vec![1e12]);
    }

    #[test]
    fn dimension_mismatch_is_fatal() {
        let idx = index_with(&[&[1.0, 2.0, 3.0]]);
        let feats = vec![vec![1.0, 2.0]];
        assert!(matches!(
            blend(&feats, &idx, 0.5),
            Err(IndexError::DimensionMismatch { .. })
        ));
    }
}
