//! Short-time RMS envelopes and loudness matching.

use crate::interp::linear_resize;

/// Floor applied to the output envelope before division.
const RMS_EPS: f64 = 1e-6;

/// Computes a centered short-time RMS envelope.
///
/// The signal is zero-padded by `frame_len / 2` on each side and an RMS
/// value is taken every `hop_len` samples, giving `1 + len / hop_len`
/// points. Used at half-second granularity (`frame_len = sr`,
/// `hop_len = sr / 2`) by [`loudness_match`].
pub fn rms_envelope(x: &[f32], frame_len: usize, hop_len: usize) -> Vec<f32> {
    if x.is_empty() || frame_len == 0 || hop_len == 0 {
        return Vec::new();
    }

    let half = frame_len / 2;
    let n_frames = 1 + x.len() / hop_len;
    let mut env = Vec::with_capacity(n_frames);
    for f in 0..n_frames {
        // Frame centered at f * hop_len in the unpadded signal.
        let center = f * hop_len;
        let start = center.saturating_sub(half);
        let end = (center + frame_len - half).min(x.len());
        let mut acc = 0.0f64;
        for &v in &x[start.min(end)..end] {
            acc += (v as f64) * (v as f64);
        }
        env.push((acc / frame_len as f64).sqrt() as f32);
    }
    env
}

/// Rescales `output` so its loudness contour follows a mix of the input's
/// and its own dynamics.
///
/// Both signals get half-second RMS envelopes which are interpolated to the
/// output length; each output sample is scaled by
/// `rms_in^(1 - rate) * rms_out^(rate - 1)`. `rate = 1` keeps the converted
/// dynamics untouched, `rate = 0` fully re-imposes the input dynamics. The
/// output envelope is floored at a small epsilon so silence cannot blow up
/// the ratio.
pub fn loudness_match(
    input: &[f32],
    input_sr: u32,
    output: &[f32],
    output_sr: u32,
    rate: f32,
) -> Vec<f32> {
    if output.is_empty() {
        return Vec::new();
    }

    let in_sr = input_sr as usize;
    let out_sr = output_sr as usize;
    let rms_in = rms_envelope(input, in_sr / 2 * 2, in_sr / 2);
    let rms_out = rms_envelope(output, out_sr / 2 * 2, out_sr / 2);

    let rms_in = linear_resize(&rms_in, output.len());
    let rms_out = linear_resize(&rms_out, output.len());

    let e_in = (1.0 - rate) as f64;
    let e_out = (rate - 1.0) as f64;
    output
        .iter()
        .zip(rms_in.iter().zip(rms_out.iter()))
        .map(|(&y, (&ri, &ro))| {
            let ro = (ro as f64).max(RMS_EPS);
            let gain = (ri as f64).powf(e_in) * ro.powf(e_out);
            (y as f64 * gain) as f32
        })
        .collect()
}
