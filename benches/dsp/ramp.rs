//! Benchmarks for parameter automation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lattice_tuner::dsp::SmoothedParam;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramp");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![1.0f32; size];

        // Held value - the common case once a note has settled
        let mut param = SmoothedParam::new(0.15);
        group.bench_with_input(BenchmarkId::new("hold", size), &size, |b, _| {
            b.iter(|| param.apply(black_box(&mut buffer)))
        });

        // Exponential approach, as the master gain follows the voice count
        let mut param = SmoothedParam::new(0.6);
        group.bench_with_input(BenchmarkId::new("approach", size), &size, |b, _| {
            b.iter(|| {
                param.set_target(black_box(0.3), 0.01, SAMPLE_RATE);
                param.apply(black_box(&mut buffer))
            })
        });

        // Release ramp towards the floor
        let mut param = SmoothedParam::new(0.15);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                param.set_value(0.15);
                param.exponential_ramp_to(0.0, 0.01, SAMPLE_RATE, 1e-4);
                param.apply(black_box(&mut buffer))
            })
        });
    }

    group.finish();
}
