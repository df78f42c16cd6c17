//! Benchmarks for chords rendered through the tone engine.
//!
//! Each chord is started once and then held, so every iteration renders the
//! steady state: all voices summed, master gain, limiter.

use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lattice_tuner::{
    dsp::LimiterParams,
    synth::{ToneEngine, VoiceCommand, VoiceConfig, VoiceKey, BASE_LEVEL},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn held_chord(size: usize) -> ToneEngine<VecDeque<VoiceCommand>> {
    let mut commands = VecDeque::new();
    for i in 0..size {
        // 12-EDO steps above A3
        let frequency = 220.0 * 2f64.powf(i as f64 / 12.0);
        commands.push_back(VoiceCommand::Start {
            key: VoiceKey::from_frequency(frequency),
            frequency: frequency as f32,
        });
    }
    commands.push_back(VoiceCommand::MasterLevel {
        level: BASE_LEVEL / (size as f32).sqrt(),
    });

    let mut engine = ToneEngine::new(
        SAMPLE_RATE,
        64,
        VoiceConfig::default(),
        LimiterParams::default(),
        commands,
    );
    // drain the queue and get past the attack
    let mut warmup = vec![0.0f32; 4_800];
    engine.render_block(&mut warmup);
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SINGLE NOTE ===
        let mut engine = held_chord(1);
        group.bench_with_input(BenchmarkId::new("single", size), &size, |b, _| {
            b.iter(|| engine.render_block(black_box(&mut buffer)))
        });

        // === TRIAD ===
        let mut engine = held_chord(3);
        group.bench_with_input(BenchmarkId::new("triad", size), &size, |b, _| {
            b.iter(|| engine.render_block(black_box(&mut buffer)))
        });

        // === CLUSTER: every pool slot sounding ===
        let mut engine = held_chord(64);
        group.bench_with_input(BenchmarkId::new("cluster_64", size), &size, |b, _| {
            b.iter(|| engine.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
