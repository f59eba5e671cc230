//! Silence-aware segmentation planning.

use revoice_dsp::reflect_pad;

/// Finds low-energy cut points that split long audio into bounded-length
/// segments.
///
/// Short clips (at most `t_max` samples after window padding) produce an
/// empty plan and are processed as a single segment. For longer input, a
/// candidate is placed every `t_center` samples and the actual cut lands on
/// the quietest sample within `t_query` samples of the candidate, measured
/// by a short-time energy envelope. Cutting at local energy minima keeps
/// segment boundaries out of voiced regions where stitching artifacts would
/// be audible.
#[derive(Debug, Clone)]
pub struct SegmentPlanner {
    /// Samples per analysis frame; also the energy summation window.
    pub window: usize,
    /// Half-width of the search window around each candidate, samples.
    pub t_query: usize,
    /// Candidate spacing, samples.
    pub t_center: usize,
    /// Maximum untiled duration, samples.
    pub t_max: usize,
}

impl SegmentPlanner {
    pub fn new(window: usize, t_query: usize, t_center: usize, t_max: usize) -> Self {
        Self {
            window,
            t_query,
            t_center,
            t_max,
        }
    }

    /// Returns cut-point sample offsets, ascending. Offsets index into the
    /// unpadded waveform; the orchestrator snaps them down to frame-window
    /// multiples before slicing.
    pub fn plan(&self, audio: &[f32]) -> Vec<usize> {
        if audio.len() + self.window <= self.t_max {
            return Vec::new();
        }

        let env = self.energy_envelope(audio);

        let mut cuts = Vec::new();
        let mut t = self.t_center;
        while t < audio.len() {
            let lo = t.saturating_sub(self.t_query);
            let hi = (t + self.t_query).min(env.len());
            let mut best = lo;
            for i in lo..hi {
                if env[i] < env[best] {
                    best = i;
                }
            }
            cuts.push(best);
            t += self.t_center;
        }
        cuts
    }

    /// Short-time energy: `env[j] = Σ |padded[j + i]|` over one window,
    /// where `padded` is the signal reflect-padded by half a window on each
    /// side. Same length as the input.
    fn energy_envelope(&self, audio: &[f32]) -> Vec<f32> {
        let padded = reflect_pad(audio, self.window / 2, self.window / 2);
        let mut env = Vec::with_capacity(audio.len());
        // Sliding sum in f64 to avoid drift over long signals.
        let mut acc: f64 = padded[..self.window].iter().map(|&v| v.abs() as f64).sum();
        env.push(acc as f32);
        for j in 1..audio.len() {
            acc += padded[j + self.window - 1].abs() as f64;
            acc -= padded[j - 1].abs() as f64;
            env.push(acc as f32);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn planner() -> SegmentPlanner {
        // Compact geometry for tests: 10-sample frames, candidates every
        // 1000 samples, search ±200, segment anything above 2000 samples.
        SegmentPlanner::new(10, 200, 1000, 2000)
    }

    #[test]
    fn short_input_has_empty_plan() {
        let audio = vec![1.0f32; 1500];
        assert!(planner().plan(&audio).is_empty());
    }

    #[test]
    fn threshold_counts_window_padding() {
        let p = planner();
        // len + window == t_max: still a single segment.
        assert!(p.plan(&vec![1.0f32; 1990]).is_empty());
        assert!(!p.plan(&vec![1.0f32; 1991]).is_empty());
    }

    #[test]
    fn cut_lands_on_quiet_gap() {
        // Loud tone with a silent gap near the first candidate.
        let mut audio: Vec<f32> = (0..3000)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        for v in &mut audio[900..960] {
            *v = 0.0;
        }
        let cuts = planner().plan(&audio);
        assert!(!cuts.is_empty());
        let c = cuts[0];
        assert!((900..960).contains(&c), "cut at {c}, expected in gap");
    }

    #[test]
    fn cuts_are_spaced_by_center_interval() {
        let audio = vec![0.5f32; 5500];
        let cuts = planner().plan(&audio);
        // Candidates at 1000..5000 step 1000.
        assert_eq!(cuts.len(), 5);
        for (i, &c) in cuts.iter().enumerate() {
            let center = (i + 1) * 1000;
            assert!(c.abs_diff(center) <= 200, "cut {c} vs candidate {center}");
        }
    }

    #[test]
    fn cut_is_local_energy_minimum() {
        let mut audio = vec![0.8f32; 3000];
        // Two dips; the deeper one wins.
        for v in &mut audio[850..870] {
            *v = 0.3;
        }
        for v in &mut audio[1100..1120] {
            *v = 0.0;
        }
        let cuts = planner().plan(&audio);
        assert!((1090..1130).contains(&cuts[0]), "cut at {}", cuts[0]);
    }
}
