//! End-to-end conversion orchestration.

use std::path::Path;
use std::time::Instant;

use revoice_dsp::{
    downmix_stereo, loudness_match, reflect_pad, resample, scale_to_pcm16, zero_phase_highpass,
};
use revoice_index::{FlatIndex, SpeakerIndex};
use revoice_pitch::{F0Estimator, PitchConfig, PitchExtractor, PitchTrack, parse_f0_file};

use crate::config::PipelineConfig;
use crate::convert::SegmentConverter;
use crate::error::PipelineError;
use crate::model::{FeatureEncoder, ModelVersion, ReleaseGuard, VoiceSynthesizer};
use crate::planner::SegmentPlanner;
use crate::timing::TimingAccumulator;

/// Analysis sample rate; all model input runs at 16 kHz.
const ANALYSIS_SR: u32 = 16000;
/// Samples per synthesis frame at the analysis rate.
const WINDOW: usize = 160;

/// How the pitch conditioning track is obtained.
#[derive(Debug, Clone)]
pub enum PitchMode {
    /// Pitch-independent model; no conditioning track is built.
    Unpitched,
    /// Estimate F0 from the input waveform.
    Estimate,
    /// Caller supplies a ready track on the padded frame grid. Truncated to
    /// the frame count of the padded input.
    Precomputed(PitchTrack),
}

/// Per-invocation options for [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct RunOptions<'a> {
    pub speaker_id: u32,
    /// Transposition applied to the estimated pitch, in semitones.
    pub pitch_shift: f32,
    pub pitch: PitchMode,
    /// Median smoothing of the raw F0 when `>= 2`.
    pub filter_radius: u32,
    /// Speaker feature index on disk. Load failures log a warning and
    /// disable blending for the invocation.
    pub index_path: Option<&'a Path>,
    /// Mix of retrieved vs. encoder features, `[0, 1]`. Zero disables the
    /// index lookup entirely.
    pub blend_ratio: f32,
    /// Consonant protection for pitch-guided models, `[0, 0.5)` active.
    pub protect: f32,
    /// Loudness-matching exponent. `1.0` keeps the synthesizer's envelope
    /// untouched; `0.0` fully imposes the input envelope.
    pub rms_mix_rate: f32,
    /// Output rate override, Hz. `0` keeps the synthesizer's native rate;
    /// values below 16000 are rejected with a warning and the native rate
    /// is kept.
    pub resample_sr: u32,
    pub version: ModelVersion,
    /// External F0 contour substituted over the estimate. Parse failures log
    /// a warning and keep the estimate.
    pub f0_override_path: Option<&'a Path>,
}

impl Default for RunOptions<'_> {
    fn default() -> Self {
        Self {
            speaker_id: 0,
            pitch_shift: 0.0,
            pitch: PitchMode::Estimate,
            filter_radius: 3,
            index_path: None,
            blend_ratio: 0.75,
            protect: 0.33,
            rms_mix_rate: 1.0,
            resample_sr: 0,
            version: ModelVersion::V2,
            f0_override_path: None,
        }
    }
}

/// Drives a full waveform through segmentation, per-segment conversion, and
/// stitching. Holds only geometry; models and estimators are passed per
/// invocation so one pipeline serves many model combinations.
pub struct Pipeline {
    t_pad: usize,
    t_pad2: usize,
    pad_secs: usize,
    planner: SegmentPlanner,
}

impl Pipeline {
    pub fn new(cfg: PipelineConfig) -> Self {
        let sr = ANALYSIS_SR as usize;
        let t_pad = sr * cfg.x_pad;
        Self {
            t_pad,
            t_pad2: t_pad * 2,
            pad_secs: cfg.x_pad,
            planner: SegmentPlanner::new(
                WINDOW,
                sr * cfg.x_query,
                sr * cfg.x_center,
                sr * cfg.x_max,
            ),
        }
    }

    /// Converts one waveform.
    ///
    /// `input` is f32 samples at 16 kHz, interleaved when `channels == 2`.
    /// The output is mono at the synthesizer's native rate (or
    /// `resample_sr`), scaled to the PCM16 range.
    pub fn run(
        &self,
        encoder: &dyn FeatureEncoder,
        synth: &dyn VoiceSynthesizer,
        estimator: &dyn F0Estimator,
        input: &[f32],
        channels: usize,
        opts: &RunOptions,
        timing: &mut TimingAccumulator,
    ) -> Result<Vec<f32>, PipelineError> {
        let _guard = ReleaseGuard(synth);

        let audio = if channels == 2 {
            downmix_stereo(input)
        } else {
            input.to_vec()
        };
        if audio.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let audio = zero_phase_highpass(&audio)?;

        let index = self.load_index(opts);
        let cuts = self.planner.plan(&audio);
        let padded = reflect_pad(&audio, self.t_pad, self.t_pad);
        let p_len = padded.len() / WINDOW;

        let track = self.pitch_track(&padded, p_len, estimator, opts, timing)?;

        let tgt_sr = synth.sample_rate();
        let t_pad_tgt = tgt_sr as usize * self.pad_secs;
        let converter = SegmentConverter {
            encoder,
            synth,
            index: index.as_ref().map(|i| i as &dyn SpeakerIndex),
            blend_ratio: opts.blend_ratio,
            protect: opts.protect,
            version: opts.version,
            speaker_id: opts.speaker_id,
            window: WINDOW,
        };

        let mut out: Vec<f32> = Vec::new();
        let mut s = 0usize;
        for &cut in &cuts {
            // Snap down to a frame boundary so pitch and feature slices
            // stay aligned.
            let t = cut / WINDOW * WINDOW;
            let end = (t + self.t_pad2 + WINDOW).min(padded.len());
            let slice = track
                .as_ref()
                .map(|tr| tr.slice(s / WINDOW, (t + self.t_pad2) / WINDOW));
            let converted = converter.convert(&padded[s..end], slice, timing)?;
            out.extend(trim_padding(&converted, t_pad_tgt));
            s = t;
        }
        let slice = track.as_ref().map(|tr| tr.slice(s / WINDOW, tr.len()));
        let converted = converter.convert(&padded[s..], slice, timing)?;
        out.extend(trim_padding(&converted, t_pad_tgt));

        if opts.rms_mix_rate != 1.0 {
            out = loudness_match(&audio, ANALYSIS_SR, &out, tgt_sr, opts.rms_mix_rate);
        }

        let mut out = self.maybe_resample(out, tgt_sr, opts.resample_sr)?;
        scale_to_pcm16(&mut out);

        tracing::debug!(
            feature_secs = timing.feature_secs,
            pitch_secs = timing.pitch_secs,
            infer_secs = timing.infer_secs,
            segments = cuts.len() + 1,
            samples = out.len(),
            "conversion finished"
        );
        Ok(out)
    }

    fn load_index(&self, opts: &RunOptions) -> Option<FlatIndex> {
        let path = opts.index_path?;
        if opts.blend_ratio <= 0.0 {
            return None;
        }
        match FlatIndex::load_path(path) {
            Ok(index) => Some(index),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "speaker index unavailable, blending disabled");
                None
            }
        }
    }

    fn pitch_track(
        &self,
        padded: &[f32],
        p_len: usize,
        estimator: &dyn F0Estimator,
        opts: &RunOptions,
        timing: &mut TimingAccumulator,
    ) -> Result<Option<PitchTrack>, PipelineError> {
        match &opts.pitch {
            PitchMode::Unpitched => Ok(None),
            PitchMode::Precomputed(track) => {
                let mut track = track.clone();
                track.truncate(p_len);
                Ok(Some(track))
            }
            PitchMode::Estimate => {
                let t0 = Instant::now();
                let override_track = opts.f0_override_path.and_then(|path| {
                    match parse_f0_file(path) {
                        Ok(t) => Some(t),
                        Err(err) => {
                            tracing::warn!(path = %path.display(), %err, "f0 override unusable, keeping estimate");
                            None
                        }
                    }
                });
                let extractor = PitchExtractor::new(PitchConfig {
                    sample_rate: ANALYSIS_SR,
                    window: WINDOW,
                    pad_secs: self.pad_secs,
                    ..PitchConfig::default()
                });
                let track = extractor.calculate(
                    padded,
                    p_len,
                    opts.pitch_shift,
                    estimator,
                    opts.filter_radius,
                    override_track.as_ref(),
                )?;
                timing.pitch_secs += t0.elapsed().as_secs_f64();
                Ok(Some(track))
            }
        }
    }

    fn maybe_resample(
        &self,
        out: Vec<f32>,
        tgt_sr: u32,
        resample_sr: u32,
    ) -> Result<Vec<f32>, PipelineError> {
        if resample_sr == 0 || resample_sr == tgt_sr {
            return Ok(out);
        }
        if resample_sr < ANALYSIS_SR {
            tracing::warn!(
                requested = resample_sr,
                native = tgt_sr,
                "resample target below 16 kHz, keeping native rate"
            );
            return Ok(out);
        }
        Ok(resample(&out, tgt_sr, resample_sr)?)
    }
}

/// Drops the synthesized padding from both ends of a converted segment.
fn trim_padding(audio: &[f32], t_pad_tgt: usize) -> &[f32] {
    if audio.len() <= 2 * t_pad_tgt {
        return &[];
    }
    &audio[t_pad_tgt..audio.len() - t_pad_tgt]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_drops_both_pads() {
        let audio: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(trim_padding(&audio, 3), &[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(trim_padding(&audio, 5), &[] as &[f32]);
        assert_eq!(trim_padding(&audio, 0).len(), 10);
    }

    #[test]
    fn geometry_scales_with_config() {
        let p = Pipeline::new(PipelineConfig {
            x_pad: 2,
            x_query: 6,
            x_center: 30,
            x_max: 32,
        });
        assert_eq!(p.t_pad, 32000);
        assert_eq!(p.t_pad2, 64000);
        assert_eq!(p.planner.t_center, 480000);
    }

    #[test]
    fn default_options_estimate_pitch() {
        let opts = RunOptions::default();
        assert!(matches!(opts.pitch, PitchMode::Estimate));
        assert_eq!(opts.rms_mix_rate, 1.0);
        assert_eq!(opts.resample_sr, 0);
    }
}
