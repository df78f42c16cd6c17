//! Benchmarks for the tone engine and the lattice pipeline.
//!
//! Run with: cargo bench
//!
//! The engine renders inside the audio callback, so its numbers are measured
//! against real-time deadlines. Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (oscillator, ramps, limiter, gain)
//!   - scenarios/*  Chords through the engine, note generation and projection

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_amplify,
    dsp::bench_oscillator,
    dsp::bench_ramp,
    dsp::bench_limiter,
    // Real-world scenarios
    scenarios::bench_engine,
    scenarios::bench_lattice,
);
criterion_main!(benches);
