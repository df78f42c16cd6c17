//! Benchmarks for gain and bus summing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lattice_tuner::dsp::amplify;

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut bus = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("accumulate", size), &size, |b, _| {
            b.iter(|| amplify::accumulate(black_box(&mut bus), black_box(&signal)))
        });

        let mut signal_copy = signal.clone();
        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                signal_copy.copy_from_slice(&signal);
                amplify::apply_gain(black_box(&mut signal_copy), black_box(0.5))
            })
        });

        group.bench_with_input(BenchmarkId::new("rms", size), &size, |b, _| {
            b.iter(|| amplify::rms(black_box(&signal)))
        });
    }

    group.finish();
}
