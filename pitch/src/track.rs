//! Pitch-track conditioning: interpolation, resizing, quantization.

/// Lowest voiced frequency, Hz.
pub const F0_MIN: f32 = 50.0;
/// Highest voiced frequency, Hz.
pub const F0_MAX: f32 = 1100.0;

/// Number of quantization bins; bin 0 is reserved for unvoiced frames.
pub const F0_BINS: i64 = 256;

/// A pitch track aligned to the model's feature-frame grid.
///
/// Invariant: `pitch.len() == pitchf.len()`. Voiced frames have
/// `pitchf > 0` and `pitch` in `[1, 255]`; unvoiced frames are 0 in both.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTrack {
    /// Quantized mel-scale bin per frame.
    pub pitch: Vec<i64>,
    /// Continuous F0 in Hz per frame.
    pub pitchf: Vec<f32>,
}

impl PitchTrack {
    /// Builds a track from a conditioned Hz sequence, quantizing each frame.
    pub fn from_hz(pitchf: Vec<f32>) -> Self {
        let pitch = quantize(&pitchf);
        Self { pitch, pitchf }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.pitchf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitchf.is_empty()
    }

    /// Truncates both sequences to at most `len` frames.
    pub fn truncate(&mut self, len: usize) {
        self.pitch.truncate(len);
        self.pitchf.truncate(len);
    }

    /// Returns the sub-track covering `[start, end)` frames, clamped to the
    /// track length.
    pub fn slice(&self, start: usize, end: usize) -> (&[i64], &[f32]) {
        let end = end.min(self.len());
        let start = start.min(end);
        (&self.pitch[start..end], &self.pitchf[start..end])
    }
}

/// Fills unvoiced gaps by linear interpolation between the bracketing
/// voiced frames.
///
/// Leading unvoiced frames take the first voiced value once one is seen
/// from the left of a gap; a gap running to the end of the track holds the
/// last voiced value, since there is no bracketing sample to interpolate
/// toward. An all-unvoiced track stays all zero.
pub fn interpolate_gaps(f0: &[f32]) -> Vec<f32> {
    let n = f0.len();
    let mut out = f0.to_vec();
    let mut last_value = 0.0f32;

    let mut i = 0;
    while i < n {
        if f0[i] > 0.0 {
            last_value = f0[i];
            i += 1;
            continue;
        }
        // Find the next voiced frame.
        let mut j = i;
        while j < n && f0[j] <= 0.0 {
            j += 1;
        }
        if j < n {
            if last_value > 0.0 {
                // Interior gap: ramp from the left neighbor, reaching the
                // right neighbor's value on the gap's final frame.
                let step = (f0[j] - last_value) / (j - i) as f32;
                for (k, v) in out.iter_mut().enumerate().take(j).skip(i) {
                    *v = last_value + step * (k - i + 1) as f32;
                }
            } else {
                // Leading gap: hold the first voiced value backward.
                for v in out.iter_mut().take(j).skip(i) {
                    *v = f0[j];
                }
            }
        } else {
            // Trailing gap: hold the last voiced value.
            for v in out.iter_mut().take(n).skip(i) {
                *v = last_value;
            }
        }
        i = j;
    }
    out
}

/// Resizes an F0 track to `target_len` frames by linear interpolation.
///
/// Unvoiced frames (below 1 mHz) are excluded from interpolation: any
/// target frame whose interpolation window touches an unvoiced source frame
/// comes out exactly 0, so voiced/unvoiced boundaries never smear into
/// fractional pitch values.
pub fn resize_f0(f0: &[f32], target_len: usize) -> Vec<f32> {
    if target_len == 0 {
        return Vec::new();
    }
    if f0.is_empty() {
        return vec![0.0; target_len];
    }
    let src_len = f0.len();
    let voiced = |v: f32| v >= 0.001;

    let mut out = Vec::with_capacity(target_len);
    for j in 0..target_len {
        let pos = j as f64 * src_len as f64 / target_len as f64;
        let lo = (pos.floor() as usize).min(src_len - 1);
        let hi = (lo + 1).min(src_len - 1);
        if !voiced(f0[lo]) || !voiced(f0[hi]) {
            out.push(0.0);
            continue;
        }
        let frac = (pos - lo as f64) as f32;
        out.push(f0[lo] * (1.0 - frac) + f0[hi] * frac);
    }
    out
}

/// Applies a semitone shift: multiplies every voiced frame by
/// `2^(semitones / 12)`.
pub fn shift_semitones(f0: &mut [f32], semitones: f32) {
    if semitones == 0.0 {
        return;
    }
    let factor = 2.0f32.powf(semitones / 12.0);
    for v in f0 {
        *v *= factor;
    }
}

/// Median-of-three smoothing pass, removing single-frame outliers
/// (octave spikes) without blurring voiced/unvoiced transitions much.
pub fn median_smooth3(f0: &[f32]) -> Vec<f32> {
    let n = f0.len();
    if n < 3 {
        return f0.to_vec();
    }
    let mut out = Vec::with_capacity(n);
    out.push(median3(0.0, f0[0], f0[1]));
    for i in 1..n - 1 {
        out.push(median3(f0[i - 1], f0[i], f0[i + 1]));
    }
    out.push(median3(f0[n - 2], f0[n - 1], 0.0));
    out
}

fn median3(a: f32, b: f32, c: f32) -> f32 {
    a.max(b).min(a.max(c)).min(b.max(c))
}

/// Quantizes Hz values to mel-scale bins.
///
/// `mel = 1127 ln(1 + hz/700)`, scaled so the band `[F0_MIN, F0_MAX]` maps
/// onto `[1, 255]` and rounded; values are clipped to that range. 0 is
/// reserved for unvoiced frames.
pub fn quantize(f0: &[f32]) -> Vec<i64> {
    let mel_min = hz_to_mel(F0_MIN);
    let mel_max = hz_to_mel(F0_MAX);
    let span = mel_max - mel_min;

    f0.iter()
        .map(|&hz| {
            if hz <= 0.0 {
                return 0;
            }
            let mel = hz_to_mel(hz);
            let scaled = (mel - mel_min) * (F0_BINS - 2) as f64 / span + 1.0;
            (scaled.round() as i64).clamp(1, F0_BINS - 1)
        })
        .collect()
}

fn hz_to_mel(hz: f32) -> f64 {
    1127.0 * (1.0 + hz as f64 / 700.0).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_interior_gap() {
        let f0 = vec![100.0, 0.0, 0.0, 0.0, 200.0];
        let out = interpolate_gaps(&f0);
        let expected = [100.0, 133.0 + 1.0 / 3.0, 166.0 + 2.0 / 3.0, 200.0, 200.0];
        for (got, want) in out.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-3, "got {got}, want {want}");
        }
    }

    #[test]
    fn interior_gap_reaches_right_value_on_last_frame() {
        // The ramp lands on the right bracket one frame before the voiced
        // frame itself.
        let f0 = vec![100.0, 0.0, 200.0];
        let out = interpolate_gaps(&f0);
        assert_eq!(out, vec![100.0, 200.0, 200.0]);
        let f0 = vec![100.0, 0.0, 0.0, 200.0];
        let out = interpolate_gaps(&f0);
        assert_eq!(out, vec![100.0, 150.0, 200.0, 200.0]);
    }

    #[test]
    fn interpolate_leading_and_trailing_edge_hold() {
        let f0 = vec![0.0, 0.0, 150.0, 0.0, 0.0];
        let out = interpolate_gaps(&f0);
        assert_eq!(out, vec![150.0, 150.0, 150.0, 150.0, 150.0]);
    }

    #[test]
    fn interpolate_all_unvoiced_stays_zero() {
        let f0 = vec![0.0; 5];
        assert_eq!(interpolate_gaps(&f0), vec![0.0; 5]);
    }

    #[test]
    fn interpolated_track_is_nonnegative_with_no_interior_gaps() {
        let f0 = vec![0.0, 110.0, 0.0, 0.0, 220.0, 0.0, 330.0, 0.0];
        let out = interpolate_gaps(&f0);
        assert!(out.iter().all(|&v| v >= 0.0));
        // No interior unvoiced frame remains.
        for &v in &out[1..out.len() - 1] {
            assert!(v > 0.0);
        }
    }

    #[test]
    fn resize_constant_track() {
        let f0 = vec![220.0; 10];
        let out = resize_f0(&f0, 25);
        assert_eq!(out.len(), 25);
        assert!(out.iter().all(|&v| (v - 220.0).abs() < 1e-3));
    }

    #[test]
    fn resize_keeps_unvoiced_frames_zero() {
        let f0 = vec![220.0, 220.0, 0.0, 0.0, 220.0, 220.0];
        let out = resize_f0(&f0, 12);
        assert_eq!(out.len(), 12);
        // Zeros survive as zeros; no fractional smearing.
        assert!(out.iter().any(|&v| v == 0.0));
        for &v in &out {
            assert!(v == 0.0 || (v - 220.0).abs() < 1e-3);
        }
    }

    #[test]
    fn shift_up_one_octave() {
        let mut f0 = vec![220.0, 0.0];
        shift_semitones(&mut f0, 12.0);
        assert!((f0[0] - 440.0).abs() < 1e-3);
        assert_eq!(f0[1], 0.0);
    }

    #[test]
    fn median_removes_spike() {
        let f0 = vec![200.0, 200.0, 800.0, 200.0, 200.0];
        let out = median_smooth3(&f0);
        assert_eq!(out[2], 200.0);
    }

    #[test]
    fn quantize_bounds() {
        let bins = quantize(&[0.0, F0_MIN, F0_MAX, 10.0, 4000.0, 220.0]);
        assert_eq!(bins[0], 0);
        assert_eq!(bins[1], 1);
        assert_eq!(bins[2], 255);
        assert_eq!(bins[3], 1, "below-band voiced clips to bin 1");
        assert_eq!(bins[4], 255, "above-band clips to bin 255");
        assert!(bins[5] > 1 && bins[5] < 255);
    }

    #[test]
    fn quantize_is_monotonic() {
        let bins = quantize(&[100.0, 200.0, 400.0, 800.0]);
        for w in bins.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn track_invariants() {
        let track = PitchTrack::from_hz(vec![0.0, 220.0, 440.0]);
        assert_eq!(track.pitch.len(), track.pitchf.len());
        assert_eq!(track.pitch[0], 0);
        assert!(track.pitch[1] >= 1);
        let (p, pf) = track.slice(1, 10);
        assert_eq!(p.len(), 2);
        assert_eq!(pf.len(), 2);
    }
}
