use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{LatticeError, NoteRole, Result},
    lattice::{
        name::{Letter, NoteName, Pitch},
        note::Note,
    },
    tuning::{Monzo, Val},
};

/*
Spelling the Lattice
====================

Every note name is a fixed lattice point; the tuning only decides how that
point sounds. Names are spelled along a chain of fifths (Q moves) folded back
into one octave (P moves):

          F      C      G      D      A      E      B
    n:   -1      0      1      2      3      4      5
    m:    2      0     -1     -3     -4     -6     -7

Accidentals shift seven fifths along the chain:

    flat  = [ 11 -7>      (C -> C♭)
    sharp = [-11  7>      (C -> C♯)

and octaves shift P alone:  C4 -> C5 is [1 0>.

So under a Pythagorean val (P = 2, Q = 3) C♯ and D♭ are distinct pitches,
while under 12 steps per octave both land on step 1. Both spellings are kept
either way; the lattice view shows them at different positions.

Pipeline
--------

    naturals (octave 0)
      -> + flats / sharps           chromatic spellings
      -> x octaves                  absolute monzos, lowest..highest octave
      -> resolve base/min/max       by parsed name
      -> - base monzo               coordinates relative to the base note
      -> frequency, steps           via the val
      -> sort, band-filter          [min frequency, max frequency]
*/

/// Range and spelling depth of the generated note set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRange {
    /// Note placed at the lattice origin and tuned to the val's base frequency.
    pub base: String,
    /// Lowest admissible note (by frequency).
    pub min: String,
    /// Highest admissible note (by frequency).
    pub max: String,
    /// Deepest flat spelling generated (0 = none).
    pub flats: u32,
    /// Deepest sharp spelling generated (0 = none).
    pub sharps: u32,
    /// Extra octaves spelled on each side of the named octaves.
    pub octave_padding: u32,
}

impl Default for NoteRange {
    fn default() -> Self {
        Self {
            base: "A4".to_string(),
            min: "C2".to_string(),
            max: "C7".to_string(),
            flats: 2,
            sharps: 2,
            octave_padding: 0,
        }
    }
}

/// Largest distance, in octaves, a spelled note may sit from octave 0.
const MAX_OCTAVE: i64 = 1 << 16;
/// Widest run of octaves spelled on either side of the base note.
const MAX_OCTAVE_SPAN: i64 = 256;

/// Inclusive octave run to spell, checked against the octave limits.
fn octave_span(base: Pitch, min: Pitch, max: Pitch, padding: u32) -> Result<(i32, i32)> {
    let padding = i64::from(padding);
    let out_of_range = |pitch: Pitch, role| {
        LatticeError::invalid_note_name(role, pitch.to_string(), "octave out of range")
    };

    for (pitch, role) in [(base, NoteRole::Base), (min, NoteRole::Min), (max, NoteRole::Max)] {
        if i64::from(pitch.octave).abs() + padding > MAX_OCTAVE {
            return Err(out_of_range(pitch, role));
        }
    }
    for (pitch, role) in [(min, NoteRole::Min), (max, NoteRole::Max)] {
        if (i64::from(pitch.octave) - i64::from(base.octave)).abs() + padding > MAX_OCTAVE_SPAN {
            return Err(out_of_range(pitch, role));
        }
    }

    // both ends are within MAX_OCTAVE, so they fit in i32
    let padding = padding as i32;
    let lowest = base.octave.min(min.octave).min(max.octave) - padding;
    let highest = base.octave.max(min.octave).max(max.octave) + padding;
    Ok((lowest, highest))
}

/// One octave of spellings: naturals, then each flat depth, then each sharp depth.
pub fn chromatic_spellings(flats: u32, sharps: u32) -> Result<Vec<NoteName>> {
    let naturals = Letter::ALL.map(NoteName::natural);
    let mut names = Vec::with_capacity(naturals.len() * (1 + flats + sharps) as usize);
    names.extend(naturals);

    for depth in 1..=flats {
        for natural in naturals {
            names.push(natural.flattened(depth)?);
        }
    }
    for depth in 1..=sharps {
        for natural in naturals {
            names.push(natural.sharpened(depth)?);
        }
    }

    Ok(names)
}

/// Build the playable notes for `val` over `range`, sorted by frequency.
///
/// Fails if a range name is malformed, not spelled by the requested
/// accidental depth, or too many octaves away from the base note. A `min` above `max` yields an empty list.
pub fn generate_notes(val: &Val, range: &NoteRange) -> Result<Vec<Note>> {
    let base = Pitch::parse(&range.base, NoteRole::Base)?;
    let min = Pitch::parse(&range.min, NoteRole::Min)?;
    let max = Pitch::parse(&range.max, NoteRole::Max)?;

    let spellings = chromatic_spellings(range.flats, range.sharps)?;

    let (lowest, highest) = octave_span(base, min, max, range.octave_padding)?;

    let spelled: Vec<(Pitch, Monzo)> = (lowest..=highest)
        .flat_map(|octave| {
            spellings.iter().map(move |&name| {
                let monzo = name.monzo() + Monzo::new(octave, 0);
                (Pitch { name, octave }, monzo)
            })
        })
        .collect();

    let resolve = |pitch: Pitch, role: NoteRole| -> Result<Monzo> {
        spelled
            .iter()
            .find(|(candidate, _)| *candidate == pitch)
            .map(|&(_, monzo)| monzo)
            .ok_or_else(|| LatticeError::NoteNotFound {
                role,
                name: pitch.to_string(),
            })
    };
    let base_monzo = resolve(base, NoteRole::Base)?;
    let min_frequency = val.frequency(resolve(min, NoteRole::Min)? - base_monzo);
    let max_frequency = val.frequency(resolve(max, NoteRole::Max)? - base_monzo);

    let mut notes: Vec<Note> = spelled
        .into_iter()
        .map(|(pitch, monzo)| Note::new(pitch, monzo - base_monzo, *val))
        .filter(|note| note.frequency() >= min_frequency && note.frequency() <= max_frequency)
        .collect();
    notes.sort_by(|a, b| a.frequency().total_cmp(&b.frequency()));

    debug!(
        count = notes.len(),
        base = %base,
        min_frequency,
        max_frequency,
        "generated note lattice"
    );

    Ok(notes)
}
