//! YIN pitch estimator.
//!
//! Reference: A. de Cheveigne and H. Kawahara, "YIN, a fundamental frequency
//! estimator for speech and music", 2002. Compact implementation: difference
//! function, cumulative mean normalized difference, absolute threshold with
//! parabolic refinement.

use crate::estimator::{F0Estimator, F0Params};
use crate::PitchError;

/// YIN estimator with a fixed analysis frame per hop.
#[derive(Debug, Clone)]
pub struct Yin {
    /// Samples per analysis frame. Must cover at least two periods of
    /// `f0_min` for reliable detection (1024 at 16 kHz covers 50 Hz poorly
    /// voiced edges but is the usual latency/accuracy trade-off).
    pub frame_size: usize,
    /// CMND threshold below which a lag is accepted as periodic.
    pub threshold: f32,
}

impl Default for Yin {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            threshold: 0.1,
        }
    }
}

impl Yin {
    fn pitch_of_frame(&self, frame: &[f32], params: &F0Params) -> Option<f32> {
        let n = frame.len();
        let sr = params.sample_rate as f32;
        let min_tau = (sr / params.f0_max) as usize;
        let max_tau = ((sr / params.f0_min) as usize).min(n / 2);
        if min_tau == 0 || min_tau >= max_tau {
            return None;
        }

        // Difference function.
        let mut diff = vec![0.0f32; max_tau + 1];
        for (tau, d) in diff.iter_mut().enumerate().take(max_tau + 1).skip(min_tau) {
            let mut s = 0.0f32;
            for i in 0..(n - tau) {
                let x = frame[i] - frame[i + tau];
                s += x * x;
            }
            *d = s;
        }

        // Cumulative mean normalized difference.
        let mut cmnd = vec![1.0f32; diff.len()];
        let mut running = 0.0f32;
        for tau in 1..=max_tau {
            running += diff[tau];
            cmnd[tau] = diff[tau] * (tau as f32 / running.max(1e-8));
        }

        // Absolute threshold with parabolic refinement around the lag.
        for tau in min_tau..=max_tau {
            if cmnd[tau] < self.threshold {
                let t = tau as f32;
                let a = cmnd[tau - 1];
                let b = cmnd[tau];
                let c = cmnd.get(tau + 1).copied().unwrap_or(b);
                let denom = a - 2.0 * b + c;
                let better = if denom.abs() < 1e-8 {
                    t
                } else {
                    t + (a - c) / (2.0 * denom)
                };
                return Some(sr / better);
            }
        }
        None
    }
}

impl F0Estimator for Yin {
    fn estimate(&self, wav: &[f32], params: &F0Params) -> Result<Vec<f32>, PitchError> {
        if wav.is_empty() {
            return Err(PitchError::EmptyWaveform);
        }

        let n_frames = wav.len() / params.hop + 1;
        let half = self.frame_size / 2;
        let mut f0 = Vec::with_capacity(n_frames);
        let mut frame = vec![0.0f32; self.frame_size];
        for k in 0..n_frames {
            let center = k * params.hop;
            let start = center.saturating_sub(half);
            let end = (start + self.frame_size).min(wav.len());
            frame.fill(0.0);
            frame[..end - start].copy_from_slice(&wav[start..end]);
            let hz = self.pitch_of_frame(&frame, params).unwrap_or(0.0);
            // Reject estimates outside the voiced band.
            if hz >= params.f0_min && hz <= params.f0_max {
                f0.push(hz);
            } else {
                f0.push(0.0);
            }
        }
        Ok(f0)
    }
}
