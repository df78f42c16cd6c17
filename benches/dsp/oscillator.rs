//! Benchmarks for sine generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lattice_tuner::dsp::SineOscillator;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut osc = SineOscillator::new(440.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });

        // Retuning every block, as a voice does when it is restarted
        let mut osc = SineOscillator::new(440.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("sine_retuned", size), &size, |b, _| {
            b.iter(|| {
                osc.set_frequency(black_box(659.26), SAMPLE_RATE);
                osc.render(black_box(&mut buffer))
            })
        });
    }

    group.finish();
}
