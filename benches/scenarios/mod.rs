//! Real-world scenario benchmarks.
//!
//! Chords rendered through the full engine, and the control-side work of
//! rebuilding and laying out a note set.

mod engine;
mod lattice;

pub use engine::bench_engine;
pub use lattice::bench_lattice;
