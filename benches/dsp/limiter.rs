//! Benchmarks for the output limiter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lattice_tuner::dsp::{Limiter, LimiterParams};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/limiter");

    for &size in BLOCK_SIZES {
        let quiet: Vec<f32> = (0..size).map(|i| (i as f32 * 0.06).sin() * 0.05).collect();
        let loud: Vec<f32> = quiet.iter().map(|s| s * 20.0).collect();
        let mut buffer = vec![0.0f32; size];

        let mut limiter = Limiter::new(LimiterParams::default(), SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("below_knee", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&quiet);
                limiter.process(black_box(&mut buffer))
            })
        });

        let mut limiter = Limiter::new(LimiterParams::default(), SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("compressing", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&loud);
                limiter.process(black_box(&mut buffer))
            })
        });
    }

    group.finish();
}
