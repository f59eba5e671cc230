//! Pitch extraction driver.

use crate::estimator::{F0Estimator, F0Params};
use crate::f0file::OverrideTrack;
use crate::track::{self, PitchTrack};
use crate::PitchError;

/// Configuration for [`PitchExtractor`].
///
/// These mirror the pipeline's analysis geometry; the extractor needs them
/// to convert between seconds, samples, and frames (no process-global state
/// is consulted).
#[derive(Debug, Clone)]
pub struct PitchConfig {
    /// Analysis sample rate, Hz.
    pub sample_rate: u32,
    /// Samples per analysis frame.
    pub window: usize,
    /// Reflect padding applied by the pipeline, in seconds. Override tracks
    /// are written starting at this frame offset so their time zero aligns
    /// with the unpadded waveform.
    pub pad_secs: usize,
    /// F0 search band.
    pub f0_min: f32,
    pub f0_max: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            window: 160,
            pad_secs: 1,
            f0_min: track::F0_MIN,
            f0_max: track::F0_MAX,
        }
    }
}

/// Turns a padded waveform into a [`PitchTrack`] aligned to the feature
/// frame grid.
pub struct PitchExtractor {
    cfg: PitchConfig,
}

impl PitchExtractor {
    pub fn new(cfg: PitchConfig) -> Self {
        Self { cfg }
    }

    /// Frames per second of the analysis grid.
    fn frames_per_sec(&self) -> f32 {
        self.cfg.sample_rate as f32 / self.cfg.window as f32
    }

    /// Computes the pitch track for a padded waveform.
    ///
    /// Steps: estimate raw F0 with `estimator`; median-smooth when
    /// `filter_radius >= 2`; interpolate unvoiced gaps; resize to `p_len`
    /// frames; shift by `shift_semitones`; substitute `override_track`
    /// values over the overlapping frame range (starting at the pad
    /// offset); quantize.
    ///
    /// The returned track satisfies `pitch.len() == pitchf.len() == p_len`
    /// and `pitchf[i] >= 0` for all frames.
    pub fn calculate(
        &self,
        padded_wav: &[f32],
        p_len: usize,
        shift_semitones: f32,
        estimator: &dyn F0Estimator,
        filter_radius: u32,
        override_track: Option<&OverrideTrack>,
    ) -> Result<PitchTrack, PitchError> {
        let params = F0Params {
            sample_rate: self.cfg.sample_rate,
            hop: self.cfg.window,
            f0_min: self.cfg.f0_min,
            f0_max: self.cfg.f0_max,
        };

        let mut f0 = estimator.estimate(padded_wav, &params)?;
        if filter_radius >= 2 {
            f0 = track::median_smooth3(&f0);
        }
        let f0 = track::interpolate_gaps(&f0);
        let mut f0 = track::resize_f0(&f0, p_len);
        track::shift_semitones(&mut f0, shift_semitones);

        if let Some(ovr) = override_track {
            let replace = ovr.to_frame_grid(self.frames_per_sec());
            let offset = self.cfg.pad_secs * self.frames_per_sec() as usize;
            let end = (offset + replace.len()).min(f0.len());
            if offset < end {
                f0[offset..end].copy_from_slice(&replace[..end - offset]);
            }
        }

        Ok(PitchTrack::from_hz(f0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Estimator returning a fixed Hz value on every frame.
    struct Constant(f32);

    impl F0Estimator for Constant {
        fn estimate(&self, wav: &[f32], params: &F0Params) -> Result<Vec<f32>, PitchError> {
            Ok(vec![self.0; wav.len() / params.hop + 1])
        }
    }

    /// Estimator alternating voiced and unvoiced frames.
    struct Gappy;

    impl F0Estimator for Gappy {
        fn estimate(&self, wav: &[f32], params: &F0Params) -> Result<Vec<f32>, PitchError> {
            Ok((0..wav.len() / params.hop + 1)
                .map(|i| if i % 2 == 0 { 200.0 } else { 0.0 })
                .collect())
        }
    }

    fn extractor() -> PitchExtractor {
        PitchExtractor::new(PitchConfig::default())
    }

    #[test]
    fn constant_pitch_fills_every_frame() {
        let wav = vec![0.1f32; 64000];
        let track = extractor()
            .calculate(&wav, 400, 0.0, &Constant(220.0), 3, None)
            .unwrap();
        assert_eq!(track.pitch.len(), 400);
        assert_eq!(track.pitchf.len(), 400);
        assert!(track.pitchf.iter().all(|&v| (v - 220.0).abs() < 1e-3));
        assert!(track.pitch.iter().all(|&b| b > 0 && b < 256));
    }

    #[test]
    fn gaps_are_interpolated_before_resize() {
        let wav = vec![0.1f32; 64000];
        let track = extractor()
            .calculate(&wav, 400, 0.0, &Gappy, 0, None)
            .unwrap();
        // Gap interpolation between equal voiced neighbors gives 200 Hz
        // everywhere, so no unvoiced frame survives.
        assert!(track.pitchf.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn semitone_shift_applies_before_quantization() {
        let wav = vec![0.1f32; 64000];
        let up = extractor()
            .calculate(&wav, 100, 12.0, &Constant(220.0), 0, None)
            .unwrap();
        assert!(up.pitchf.iter().all(|&v| (v - 440.0).abs() < 1e-2));
        let flat = extractor()
            .calculate(&wav, 100, 0.0, &Constant(440.0), 0, None)
            .unwrap();
        assert_eq!(up.pitch, flat.pitch);
    }

    #[test]
    fn override_substitutes_after_pad_offset() {
        let wav = vec![0.1f32; 64000];
        let ovr = OverrideTrack::PerFrame(vec![330.0; 50]);
        let track = extractor()
            .calculate(&wav, 400, 0.0, &Constant(220.0), 0, Some(&ovr))
            .unwrap();
        // Pad offset is pad_secs * 100 = 100 frames.
        assert!((track.pitchf[99] - 220.0).abs() < 1e-3);
        assert!((track.pitchf[100] - 330.0).abs() < 1e-3);
        assert!((track.pitchf[149] - 330.0).abs() < 1e-3);
        assert!((track.pitchf[150] - 220.0).abs() < 1e-3);
    }

    #[test]
    fn override_is_not_pitch_shifted() {
        let wav = vec![0.1f32; 64000];
        let ovr = OverrideTrack::PerFrame(vec![330.0; 50]);
        let track = extractor()
            .calculate(&wav, 400, 12.0, &Constant(220.0), 0, Some(&ovr))
            .unwrap();
        assert!((track.pitchf[100] - 330.0).abs() < 1e-3);
        assert!((track.pitchf[99] - 440.0).abs() < 1e-3);
    }

    #[test]
    fn override_clipped_to_track_length() {
        let wav = vec![0.1f32; 64000];
        let ovr = OverrideTrack::PerFrame(vec![330.0; 1000]);
        let track = extractor()
            .calculate(&wav, 200, 0.0, &Constant(220.0), 0, Some(&ovr))
            .unwrap();
        assert_eq!(track.len(), 200);
        assert!((track.pitchf[199] - 330.0).abs() < 1e-3);
    }
}
