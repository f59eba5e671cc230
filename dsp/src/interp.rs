//! Linear interpolation helpers.

/// Resizes a sequence to `dst_len` points by linear interpolation.
///
/// Sample positions follow the half-open pixel convention (destination
/// index `i` reads source position `(i + 0.5) * src_len / dst_len - 0.5`),
/// so resizing to the same length is the identity and endpoints are not
/// over-weighted.
pub fn linear_resize(src: &[f32], dst_len: usize) -> Vec<f32> {
    if dst_len == 0 || src.is_empty() {
        return vec![0.0; dst_len];
    }
    if src.len() == 1 {
        return vec![src[0]; dst_len];
    }

    let scale = src.len() as f64 / dst_len as f64;
    let mut out = Vec::with_capacity(dst_len);
    for i in 0..dst_len {
        let pos = ((i as f64 + 0.5) * scale - 0.5).clamp(0.0, (src.len() - 1) as f64);
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(src.len() - 1);
        let frac = (pos - lo as f64) as f32;
        out.push(src[lo] * (1.0 - frac) + src[hi] * frac);
    }
    out
}

/// One-dimensional linear interpolation over a monotonically increasing
/// grid, clamping outside the grid to the edge values.
///
/// `xp` and `fp` must have equal, nonzero length and `xp` must be sorted
/// ascending; violating that yields clamped nonsense rather than a panic.
pub fn interp(x: &[f32], xp: &[f32], fp: &[f32]) -> Vec<f32> {
    if xp.is_empty() || fp.is_empty() {
        return vec![0.0; x.len()];
    }
    let n = xp.len().min(fp.len());

    x.iter()
        .map(|&xi| {
            if xi <= xp[0] {
                return fp[0];
            }
            if xi >= xp[n - 1] {
                return fp[n - 1];
            }
            // Binary search for the bracketing interval.
            let mut lo = 0usize;
            let mut hi = n - 1;
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if xp[mid] <= xi {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let span = xp[hi] - xp[lo];
            if span <= 0.0 {
                return fp[lo];
            }
            let frac = (xi - xp[lo]) / span;
            fp[lo] * (1.0 - frac) + fp[hi] * frac
        })
        .collect()
}
