//! One-shot sample-rate conversion.
//!
//! Wraps rubato's FFT resampler for whole-buffer conversion of mono f32
//! audio. The pipeline resamples once, at the very end, so there is no
//! streaming variant.

use rubato::{FftFixedInOut, Resampler as RubatoResampler};

use crate::error::DspError;

/// Frames per processing block fed to the FFT resampler.
const CHUNK_SIZE: usize = 1024;

/// Resamples a mono f32 buffer from `from_rate` to `to_rate`.
///
/// The output length is exactly `len * to_rate / from_rate` (rounded down);
/// the resampler's internal delay is compensated by flushing zeros and
/// trimming the leading latency.
pub fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, DspError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(DspError::UnsupportedRate {
            from: from_rate,
            to: to_rate,
        });
    }
    if from_rate == to_rate {
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut resampler =
        FftFixedInOut::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, 1)?;
    let delay = resampler.output_delay();
    let expected = (input.len() as u64 * to_rate as u64 / from_rate as u64) as usize;

    let mut produced: Vec<f32> = Vec::with_capacity(expected + delay);
    let mut pos = 0usize;
    while produced.len() < delay + expected {
        let need = resampler.input_frames_next();
        let take = need.min(input.len().saturating_sub(pos));
        let mut chunk = vec![0.0f32; need];
        chunk[..take].copy_from_slice(&input[pos..pos + take]);
        pos += take;

        let out_frames = resampler.output_frames_next();
        let mut out_buf = vec![vec![0.0f32; out_frames]];
        let in_buf = vec![chunk];
        let (_, written) = resampler.process_into_buffer(&in_buf, &mut out_buf, None)?;
        produced.extend_from_slice(&out_buf[0][..written]);
    }

    Ok(produced[delay..delay + expected].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn same_rate_is_identity() {
        let x = vec![0.1f32, 0.2, 0.3];
        assert_eq!(resample(&x, 16000, 16000).unwrap(), x);
    }

    #[test]
    fn upsample_length() {
        let x = vec![0.0f32; 16000];
        let y = resample(&x, 16000, 24000).unwrap();
        assert_eq!(y.len(), 24000);
    }

    #[test]
    fn downsample_length() {
        let x = vec![0.0f32; 48000];
        let y = resample(&x, 48000, 16000).unwrap();
        assert_eq!(y.len(), 16000);
    }

    #[test]
    fn tone_survives_resampling() {
        let n = 32000;
        let x: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 32000.0).sin())
            .collect();
        let y = resample(&x, 32000, 16000).unwrap();
        assert_eq!(y.len(), 16000);
        // Energy should be preserved away from the edges.
        let mid = &y[4000..12000];
        let rms =
            (mid.iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>() / mid.len() as f64).sqrt();
        assert!((rms - 1.0 / 2f64.sqrt()).abs() < 0.05, "rms = {rms}");
        assert!(y.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_input() {
        assert!(resample(&[], 16000, 24000).unwrap().is_empty());
    }

    #[test]
    fn zero_rate_rejected() {
        assert!(resample(&[0.0], 0, 16000).is_err());
    }
}
