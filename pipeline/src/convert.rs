//! Single-segment conversion: features, blending, pitch conditioning,
//! synthesis.

use std::time::Instant;

use revoice_index::{SpeakerIndex, blend};

use crate::error::PipelineError;
use crate::model::{FeatureEncoder, ModelVersion, ReleaseGuard, VoiceSynthesizer};
use crate::timing::TimingAccumulator;

/// Converts one padded audio segment into converted audio at the
/// synthesizer's native rate.
///
/// Borrowed by [`crate::Pipeline::run`] for the duration of one invocation;
/// all fields are shared across segments.
pub struct SegmentConverter<'a> {
    pub encoder: &'a dyn FeatureEncoder,
    pub synth: &'a dyn VoiceSynthesizer,
    /// Target-speaker feature index, when timbre blending is enabled.
    pub index: Option<&'a dyn SpeakerIndex>,
    /// Mix of retrieved features vs. encoder features, in `[0, 1]`.
    pub blend_ratio: f32,
    /// Consonant protection: below 0.5, unvoiced frames keep a share of the
    /// unblended features. At 0.5 and above the mix step is skipped.
    pub protect: f32,
    pub version: ModelVersion,
    pub speaker_id: u32,
    /// Samples per synthesis frame at 16 kHz.
    pub window: usize,
}

impl SegmentConverter<'_> {
    /// Runs the conversion chain for one segment.
    ///
    /// `pitch` carries the segment's slice of the conditioning track for
    /// pitch-guided models, `None` otherwise. Timing for the feature and
    /// inference stages is added to `timing`.
    pub fn convert(
        &self,
        segment: &[f32],
        pitch: Option<(&[i64], &[f32])>,
        timing: &mut TimingAccumulator,
    ) -> Result<Vec<f32>, PipelineError> {
        let _guard = ReleaseGuard(self.synth);

        let t0 = Instant::now();
        let mut feats = self
            .encoder
            .extract(segment, self.version)
            .map_err(PipelineError::Encoder)?;

        // Unblended copy, kept only when the protect mix will need it.
        let mut feats0 = if self.protect < 0.5 && pitch.is_some() {
            Some(feats.clone())
        } else {
            None
        };

        if let Some(index) = self.index {
            if self.blend_ratio > 0.0 {
                feats = blend(&feats, index, self.blend_ratio)
                    .map_err(PipelineError::IndexMismatch)?;
            }
        }

        // Encoder frames are 20 ms; the synthesizer consumes 10 ms frames.
        feats = upsample2_linear(&feats);
        if let Some(f0) = feats0.take() {
            feats0 = Some(upsample2_linear(&f0));
        }
        timing.feature_secs += t0.elapsed().as_secs_f64();

        let p_len = (segment.len() / self.window).min(feats.len());
        feats.truncate(p_len);
        if let Some(f0) = &mut feats0 {
            f0.truncate(p_len);
        }

        let (pitch, pitchf) = match pitch {
            Some((p, pf)) => {
                let p = &p[..p_len.min(p.len())];
                let pf = &pf[..p_len.min(pf.len())];
                if let Some(f0) = &feats0 {
                    protect_mix(&mut feats, f0, pf, self.protect);
                }
                (Some(p), Some(pf))
            }
            None => (None, None),
        };

        let t1 = Instant::now();
        let audio = self
            .synth
            .infer(&feats, p_len, self.speaker_id, pitch, pitchf)
            .map_err(PipelineError::Synth)?;
        timing.infer_secs += t1.elapsed().as_secs_f64();

        Ok(audio)
    }
}

/// Doubles the frame count by linear interpolation along the time axis
/// (half-open pixel convention, so frame centers stay aligned).
fn upsample2_linear(feats: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let n = feats.len();
    if n == 0 {
        return Vec::new();
    }
    let dim = feats[0].len();
    let mut out = Vec::with_capacity(2 * n);
    for j in 0..2 * n {
        // Source position of output frame center j.
        let pos = (j as f32 + 0.5) / 2.0 - 0.5;
        if pos <= 0.0 {
            out.push(feats[0].clone());
            continue;
        }
        let lo = pos.floor() as usize;
        if lo + 1 >= n {
            out.push(feats[n - 1].clone());
            continue;
        }
        let frac = pos - lo as f32;
        let mut row = Vec::with_capacity(dim);
        for d in 0..dim {
            row.push(feats[lo][d] * (1.0 - frac) + feats[lo + 1][d] * frac);
        }
        out.push(row);
    }
    out
}

/// Blends each unvoiced frame back toward the unblended features. Voiced
/// frames (`pitchf > 0`) keep the blended value untouched.
fn protect_mix(feats: &mut [Vec<f32>], feats0: &[Vec<f32>], pitchf: &[f32], protect: f32) {
    for (i, row) in feats.iter_mut().enumerate() {
        let factor = if i < pitchf.len() && pitchf[i] > 0.0 {
            1.0
        } else {
            protect
        };
        if factor >= 1.0 || i >= feats0.len() {
            continue;
        }
        for (v, &v0) in row.iter_mut().zip(&feats0[i]) {
            *v = *v * factor + v0 * (1.0 - factor);
        }
    }
}
