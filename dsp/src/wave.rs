//! Waveform utilities: padding, downmix, peak normalization.

/// Pads a signal by mirror reflection (excluding the edge sample) on both
/// sides.
///
/// A single-sample signal repeats that sample; an empty signal pads with
/// zeros.
pub fn reflect_pad(x: &[f32], left: usize, right: usize) -> Vec<f32> {
    let n = x.len();
    let mut out = Vec::with_capacity(n + left + right);
    if n == 0 {
        out.resize(left + right, 0.0);
        return out;
    }
    if n == 1 {
        out.resize(left + 1 + right, x[0]);
        return out;
    }

    // Mirror an arbitrary integer position into [0, n-1] with period 2n-2.
    let mirror = |i: isize| -> usize {
        let period = 2 * (n as isize - 1);
        let mut j = i.rem_euclid(period);
        if j >= n as isize {
            j = period - j;
        }
        j as usize
    };

    for i in 0..left {
        out.push(x[mirror(i as isize - left as isize)]);
    }
    out.extend_from_slice(x);
    for i in 0..right {
        out.push(x[mirror(n as isize + i as isize)]);
    }
    out
}

/// Downmixes interleaved stereo to mono by averaging channel pairs.
/// A trailing unpaired sample is passed through unchanged.
pub fn downmix_stereo(interleaved: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(interleaved.len().div_ceil(2));
    let mut chunks = interleaved.chunks_exact(2);
    for pair in &mut chunks {
        out.push((pair[0] + pair[1]) * 0.5);
    }
    if let [last] = chunks.remainder() {
        out.push(*last);
    }
    out
}

/// Scales samples into the 16-bit PCM range with 1% headroom.
///
/// The nominal scale is 32768. When the peak exceeds 0.99 of full scale the
/// whole buffer is attenuated so the peak lands at `32768 * 0.99`; quiet
/// signals are never amplified beyond the nominal scale.
pub fn scale_to_pcm16(x: &mut [f32]) {
    let peak = x.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
    let audio_max = peak / 0.99;
    let mut scale = 32768.0f32;
    if audio_max > 1.0 {
        scale /= audio_max;
    }
    for v in x {
        *v *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_pad_basic() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let out = reflect_pad(&x, 2, 2);
        assert_eq!(out, vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0]);
    }

    #[test]
    fn reflect_pad_longer_than_signal() {
        let x = vec![1.0, 2.0];
        let out = reflect_pad(&x, 3, 3);
        assert_eq!(out.len(), 8);
        assert_eq!(&out[3..5], &[1.0, 2.0]);
        // Values never leave the signal's range.
        assert!(out.iter().all(|&v| (1.0..=2.0).contains(&v)));
    }

    #[test]
    fn reflect_pad_single_sample() {
        assert_eq!(reflect_pad(&[5.0], 2, 1), vec![5.0, 5.0, 5.0, 5.0]);
    }

    #[test]
    fn reflect_pad_empty() {
        assert_eq!(reflect_pad(&[], 2, 1), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn downmix_averages_pairs() {
        let x = vec![0.1, 0.2, 0.1, 0.2];
        let out = downmix_stereo(&x);
        assert_eq!(out.len(), 2);
        for &v in &out {
            assert!((v - 0.15).abs() < 1e-6);
        }
    }

    #[test]
    fn downmix_odd_trailing_sample() {
        let out = downmix_stereo(&[0.2, 0.4, 0.6]);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.3).abs() < 1e-6);
        assert!((out[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn scale_quiet_signal_uses_nominal_scale() {
        let mut x = vec![0.5f32, -0.5];
        scale_to_pcm16(&mut x);
        assert_eq!(x, vec![16384.0, -16384.0]);
    }

    #[test]
    fn scale_attenuates_clipping_peak() {
        let mut x = vec![2.0f32, -1.0];
        scale_to_pcm16(&mut x);
        let peak = x.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
        assert!((peak - 32768.0 * 0.99).abs() < 1.0, "peak = {peak}");
        assert!(peak <= 32768.0);
    }

    #[test]
    fn scale_peak_at_headroom_boundary() {
        // Peak exactly 0.99 maps to audio_max = 1.0: nominal scale applies.
        let mut x = vec![0.99f32];
        scale_to_pcm16(&mut x);
        assert!((x[0] - 0.99 * 32768.0).abs() < 0.5);
    }
}
