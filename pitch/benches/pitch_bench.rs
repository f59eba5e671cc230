use criterion::{black_box, criterion_group, criterion_main, Criterion};
use revoice_pitch::track::{interpolate_gaps, quantize, resize_f0};

/// Deterministic F0-like track with unvoiced gaps.
fn synthetic_track(len: usize, seed: u64) -> Vec<f32> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let r = ((state >> 33) as f32) / (u32::MAX as f32);
            if r < 0.3 {
                0.0
            } else {
                80.0 + r * 300.0
            }
        })
        .collect()
}

fn bench_conditioning(c: &mut Criterion) {
    let f0 = synthetic_track(4000, 42);

    c.bench_function("interpolate_gaps_4000", |b| {
        b.iter(|| interpolate_gaps(black_box(&f0)))
    });

    let filled = interpolate_gaps(&f0);
    c.bench_function("resize_f0_4000_to_6000", |b| {
        b.iter(|| resize_f0(black_box(&filled), 6000))
    });

    c.bench_function("quantize_4000", |b| b.iter(|| quantize(black_box(&filled))));
}

criterion_group!(benches, bench_conditioning);
criterion_main!(benches);
