//! Two-generator tuning explorer.
//!
//! Notes live on an integer lattice spanned by two generator ratios. A
//! [`tuning::Val`] sounds them, [`lattice::generate_notes`] spells them,
//! [`geometry::BasisEditor`] lays them out in the plane, and
//! [`synth::VoicePool`] plays them as sine tones.

pub mod dsp;
pub mod error;
pub mod geometry; // Lattice layout, change of basis and eased transitions
pub mod lattice; // Note spelling and range generation
pub mod synth; // Voice registry and realtime tone engine
pub mod tuning;

pub use error::{LatticeError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
