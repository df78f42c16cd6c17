//! Enharmonically spelled notes over a two-generator tuning.
//!
//! The generator spells every natural, flat and sharp name across the
//! requested octaves, re-expresses the spellings relative to a base note and
//! attaches frequencies (and step counts where the tuning has them).

/// Range parsing, spelling and band filtering.
pub mod generator;
/// Letters, accidentals and octave-qualified pitches.
pub mod name;
/// Immutable generated notes.
pub mod note;

pub use generator::{chromatic_spellings, generate_notes, NoteRange};
pub use name::{Accidental, Letter, NoteName, Pitch, FLAT, SHARP};
pub use note::Note;
