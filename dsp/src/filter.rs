//! Zero-phase high-pass prefilter.
//!
//! The pipeline analyses speech at 16 kHz and removes DC offset and rumble
//! below the voice band before any energy or pitch measurement. The filter
//! is a fixed 5th-order Butterworth high-pass with a 48 Hz cutoff at a
//! 16 kHz sample rate, applied forward and backward so the result has zero
//! phase shift (segment boundaries stay sample-aligned with the input).

use crate::error::DspError;

/// Numerator coefficients of the 48 Hz @ 16 kHz Butterworth high-pass.
const B: [f64; 6] = [
    0.9699606451838447,
    -4.849803225919223,
    9.699606451838447,
    -9.699606451838447,
    4.849803225919223,
    -0.9699606451838447,
];

/// Denominator coefficients (a[0] = 1).
const A: [f64; 6] = [
    1.0,
    -4.939001819168364,
    9.75786352673954,
    -9.639544849413456,
    4.761506797356208,
    -0.94082365320546,
];

/// Steady-state filter delays for a unit step input. Scaled by the first
/// sample of each pass to suppress startup transients.
const ZI: [f64; 5] = [
    -0.9699602578354631,
    3.879841054969399,
    -5.819761617176403,
    3.8798411007999465,
    -0.9699602807573254,
];

/// Edge extension length for the forward-backward pass,
/// `3 * max(len(a), len(b))`.
const PAD_LEN: usize = 18;

/// Direct-form-II-transposed IIR filter with initial state `zi`.
fn lfilter(x: &[f64], zi: &[f64; 5]) -> Vec<f64> {
    let mut z = *zi;
    let mut y = Vec::with_capacity(x.len());
    for &xi in x {
        let yi = B[0] * xi + z[0];
        z[0] = B[1] * xi + z[1] - A[1] * yi;
        z[1] = B[2] * xi + z[2] - A[2] * yi;
        z[2] = B[3] * xi + z[3] - A[3] * yi;
        z[3] = B[4] * xi + z[4] - A[4] * yi;
        z[4] = B[5] * xi - A[5] * yi;
        y.push(yi);
    }
    y
}

/// Extends the signal at both ends by odd reflection about the endpoints.
fn odd_ext(x: &[f64], n: usize) -> Vec<f64> {
    let len = x.len();
    let mut ext = Vec::with_capacity(len + 2 * n);
    for i in (1..=n).rev() {
        ext.push(2.0 * x[0] - x[i]);
    }
    ext.extend_from_slice(x);
    for i in 1..=n {
        ext.push(2.0 * x[len - 1] - x[len - 1 - i]);
    }
    ext
}

fn scaled_zi(first: f64) -> [f64; 5] {
    let mut z = ZI;
    for v in &mut z {
        *v *= first;
    }
    z
}

/// Applies the fixed 48 Hz Butterworth high-pass with zero phase.
///
/// The input is extended by odd reflection, filtered forward, reversed,
/// filtered again, reversed back, and trimmed, so the output has the same
/// length as the input and no phase distortion.
///
/// Returns [`DspError::InputTooShort`] when the input does not exceed the
/// edge extension length (18 samples).
pub fn zero_phase_highpass(x: &[f32]) -> Result<Vec<f32>, DspError> {
    if x.len() <= PAD_LEN {
        return Err(DspError::InputTooShort {
            min: PAD_LEN,
            got: x.len(),
        });
    }

    let x64: Vec<f64> = x.iter().map(|&v| v as f64).collect();
    let ext = odd_ext(&x64, PAD_LEN);

    // Forward pass.
    let mut y = lfilter(&ext, &scaled_zi(ext[0]));

    // Backward pass.
    y.reverse();
    let mut y = lfilter(&y, &scaled_zi(y[0]));
    y.reverse();

    Ok(y[PAD_LEN..PAD_LEN + x.len()]
        .iter()
        .map(|&v| v as f32)
        .collect())
}
