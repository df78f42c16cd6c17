//! Error type shared by the tuning, lattice, geometry and voice layers.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LatticeError>;

/// Which of the three range-defining note names a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRole {
    Base,
    Min,
    Max,
}

impl fmt::Display for NoteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteRole::Base => "base",
            NoteRole::Min => "min",
            NoteRole::Max => "max",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// A note-name string that does not parse as letter + accidentals + octave.
    #[error("invalid {role} note name '{input}': {reason}")]
    InvalidNoteName {
        role: NoteRole,
        input: String,
        reason: &'static str,
    },

    /// A parsed note name that the generated lattice does not contain.
    #[error("{role} note {name} not found in the generated lattice")]
    NoteNotFound { role: NoteRole, name: String },

    /// Attempted to sharpen a flatted note or flatten a sharpened one.
    #[error("cannot add {adding} to {name}: a note carries only flats or only sharps")]
    MixedAccidentals { name: String, adding: &'static str },

    /// An equal-division builder was asked to divide by zero steps.
    #[error("step count '{field}' must be non-zero to divide a generator")]
    ZeroStepDivisor { field: &'static str },

    /// A ratio or frequency that is not a finite positive number.
    #[error("tuning parameter '{field}' must be finite and positive, got {value}")]
    InvalidTuningParameter { field: &'static str, value: f64 },

    /// The pre-image basis of a change-of-basis edit has no inverse.
    #[error("basis matrix is not invertible (determinant {determinant})")]
    DegenerateBasis { determinant: f64 },

    /// The audio command queue had no room for the request.
    #[error("voice command queue is full")]
    CommandQueueFull,

    /// Every voice slot is already sounding a note.
    #[error("all {limit} voices are in use")]
    PolyphonyExhausted { limit: usize },
}

impl LatticeError {
    pub(crate) fn invalid_note_name(
        role: NoteRole,
        input: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidNoteName {
            role,
            input: input.into(),
            reason,
        }
    }
}
