//! Two-generator tuning model.
//!
//! A lattice position is a [`Monzo`]: a pair of integer exponents over two
//! generator ratios. A [`Val`] maps monzos to frequencies and, for
//! equal-division tunings, to integer step counts.

/// Integer lattice coordinates.
pub mod monzo;
/// Tuning specifications and their four builders.
pub mod val;

pub use monzo::Monzo;
pub use val::{companion_steps, EqualSteps, TuningMode, Val};
