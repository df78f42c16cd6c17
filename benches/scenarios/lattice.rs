//! Benchmarks for the control-side lattice work done per edit and per frame.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lattice_tuner::{
    geometry::{guide_lines, nearest_note, project, Matrix, Vector},
    lattice::{generate_notes, NoteRange},
    tuning::Val,
};

pub fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/lattice");

    let edo = Val::from_p_division(12, 19, 2.0, 440.0).unwrap();
    let just = Val::just_intonation(2.0, 3.0, 440.0).unwrap();

    // Note-set rebuilds, as after a tuning or range edit
    for (flats, sharps) in [(0, 0), (2, 2), (4, 4)] {
        let range = NoteRange {
            flats,
            sharps,
            ..NoteRange::default()
        };
        let label = format!("{flats}b{sharps}s");
        group.bench_with_input(BenchmarkId::new("generate_edo", &label), &range, |b, range| {
            b.iter(|| generate_notes(black_box(&edo), black_box(range)))
        });
        group.bench_with_input(BenchmarkId::new("generate_just", &label), &range, |b, range| {
            b.iter(|| generate_notes(black_box(&just), black_box(range)))
        });
    }

    // Per-frame work: project every note, pick under the pointer, lay out guides
    let notes = generate_notes(&edo, &NoteRange::default()).unwrap();
    let view = Matrix::new(1.0, -2.0, 2.0, -3.0).scale(100.0);

    group.bench_function("project_all", |b| {
        b.iter(|| {
            notes
                .iter()
                .map(|note| project(note.monzo(), black_box(&view)))
                .fold(Vector::default(), |acc, v| acc + v)
        })
    });
    group.bench_function("nearest_note", |b| {
        b.iter(|| nearest_note(&notes, black_box(&view), black_box(Vector::new(120.0, -40.0))))
    });
    group.bench_function("guide_lines", |b| {
        b.iter(|| guide_lines(black_box(&edo), black_box(&view), 5, 12.0))
    });

    group.finish();
}
