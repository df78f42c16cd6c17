//! Note names: letter, accidental and octave.

use std::fmt;
use std::str::FromStr;

use crate::{
    error::{LatticeError, NoteRole, Result},
    tuning::Monzo,
};

/// One flat: down a chromatic semitone, seven fifths down and eleven octaves up.
pub const FLAT: Monzo = Monzo::new(11, -7);
/// One sharp: seven fifths up and eleven octaves down.
pub const SHARP: Monzo = Monzo::new(-11, 7);

/// Natural note letters in scale order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position of the natural in octave 0, spelled as a chain of fifths from C.
    ///
    /// Under 12/19 steps these land on 0, 2, 4, 5, 7, 9, 11.
    pub const fn monzo(self) -> Monzo {
        match self {
            Letter::C => Monzo::new(0, 0),
            Letter::D => Monzo::new(-3, 2),
            Letter::E => Monzo::new(-6, 4),
            Letter::F => Monzo::new(2, -1),
            Letter::G => Monzo::new(-1, 1),
            Letter::A => Monzo::new(-4, 3),
            Letter::B => Monzo::new(-7, 5),
        }
    }

    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        };
        f.write_str(c)
    }
}

/// Accidental marks. Flats and sharps never mix on one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Flat(u32),
    Sharp(u32),
}

impl Accidental {
    /// Lattice offset of the accidental relative to the natural.
    pub fn monzo(self) -> Monzo {
        match self {
            Accidental::Natural => Monzo::ORIGIN,
            Accidental::Flat(count) => FLAT * count as i32,
            Accidental::Sharp(count) => SHARP * count as i32,
        }
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Accidental::Natural => Ok(()),
            Accidental::Flat(count) => f.write_str(&"♭".repeat(count as usize)),
            Accidental::Sharp(count) => f.write_str(&"♯".repeat(count as usize)),
        }
    }
}

/// Letter plus accidental, without an octave: `C`, `E♭`, `F♯♯`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl NoteName {
    pub const fn natural(letter: Letter) -> Self {
        Self {
            letter,
            accidental: Accidental::Natural,
        }
    }

    /// Add `count` flats. Fails on a sharpened name.
    pub fn flattened(self, count: u32) -> Result<Self> {
        let accidental = match self.accidental {
            Accidental::Natural => Accidental::Flat(count),
            Accidental::Flat(existing) => Accidental::Flat(existing + count),
            Accidental::Sharp(_) => {
                return Err(LatticeError::MixedAccidentals {
                    name: self.to_string(),
                    adding: "a flat",
                })
            }
        };
        Ok(Self { accidental, ..self })
    }

    /// Add `count` sharps. Fails on a flatted name.
    pub fn sharpened(self, count: u32) -> Result<Self> {
        let accidental = match self.accidental {
            Accidental::Natural => Accidental::Sharp(count),
            Accidental::Sharp(existing) => Accidental::Sharp(existing + count),
            Accidental::Flat(_) => {
                return Err(LatticeError::MixedAccidentals {
                    name: self.to_string(),
                    adding: "a sharp",
                })
            }
        };
        Ok(Self { accidental, ..self })
    }

    /// Lattice position in octave 0.
    pub fn monzo(self) -> Monzo {
        self.letter.monzo() + self.accidental.monzo()
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.accidental)
    }
}

/// A note name with its octave number: `C♯4`, `B♭♭-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub name: NoteName,
    pub octave: i32,
}

impl Pitch {
    /// Parse a user-supplied name, tagging failures with the name's role.
    ///
    /// Case-insensitive. `#`/`♯` are sharps, `b`/`♭` flats (any count, never
    /// mixed). The octave is one or more digits with an optional minus sign.
    pub fn parse(input: &str, role: NoteRole) -> Result<Self> {
        let fail = |reason| LatticeError::invalid_note_name(role, input, reason);
        let trimmed = input.trim();
        let mut chars = trimmed.char_indices().peekable();

        let letter = chars
            .next()
            .and_then(|(_, c)| Letter::from_char(c))
            .ok_or_else(|| fail("expected a letter A-G"))?;

        let mut flats = 0u32;
        let mut sharps = 0u32;
        while let Some(&(_, c)) = chars.peek() {
            match c {
                'b' | 'B' | '♭' => flats += 1,
                '#' | '♯' => sharps += 1,
                _ => break,
            }
            chars.next();
        }
        if flats > 0 && sharps > 0 {
            return Err(fail("mixes flats and sharps"));
        }

        let octave_text = match chars.peek() {
            Some(&(start, _)) => &trimmed[start..],
            None => return Err(fail("missing octave number")),
        };
        let digits = octave_text.strip_prefix('-').unwrap_or(octave_text);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(fail("octave must be an integer"));
        }
        let octave = octave_text
            .parse::<i32>()
            .map_err(|_| fail("octave out of range"))?;

        let accidental = if flats > 0 {
            Accidental::Flat(flats)
        } else if sharps > 0 {
            Accidental::Sharp(sharps)
        } else {
            Accidental::Natural
        };

        Ok(Self {
            name: NoteName { letter, accidental },
            octave,
        })
    }
}

impl FromStr for Pitch {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self> {
        Pitch::parse(s, NoteRole::Base)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Pitch> {
        Pitch::parse(s, NoteRole::Min)
    }

    #[test]
    fn parses_naturals_and_accidentals() {
        let c_sharp = parse("C#4").unwrap();
        assert_eq!(c_sharp.name.letter, Letter::C);
        assert_eq!(c_sharp.name.accidental, Accidental::Sharp(1));
        assert_eq!(c_sharp.octave, 4);

        assert_eq!(parse("c♯4").unwrap(), c_sharp);
        assert_eq!(parse("bbb3").unwrap().name.accidental, Accidental::Flat(2));
        assert_eq!(parse("B3").unwrap().name.accidental, Accidental::Natural);
        assert_eq!(parse("E♭♭♭12").unwrap().octave, 12);
        assert_eq!(parse("F##-1").unwrap().octave, -1);
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["", "H4", "C", "C#", "C#b4", "C4.5", "C-", "4C"] {
            let err = parse(bad).unwrap_err();
            assert!(
                matches!(err, LatticeError::InvalidNoteName { role: NoteRole::Min, .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn display_uses_music_symbols() {
        assert_eq!(parse("ebb5").unwrap().to_string(), "E♭♭5");
        assert_eq!(parse("G#3").unwrap().to_string(), "G♯3");
    }

    #[test]
    fn flats_and_sharps_do_not_mix() {
        let e_flat = NoteName::natural(Letter::E).flattened(1).unwrap();
        assert!(matches!(
            e_flat.sharpened(1),
            Err(LatticeError::MixedAccidentals { .. })
        ));

        let f_sharp = NoteName::natural(Letter::F).sharpened(1).unwrap();
        assert!(f_sharp.flattened(2).is_err());
        assert_eq!(f_sharp.sharpened(1).unwrap().accidental, Accidental::Sharp(2));
    }

    #[test]
    fn accidentals_move_along_the_lattice() {
        let b_flat = NoteName::natural(Letter::B).flattened(1).unwrap();
        assert_eq!(b_flat.monzo(), Monzo::new(4, -2));

        let c_sharp = NoteName::natural(Letter::C).sharpened(1).unwrap();
        assert_eq!(c_sharp.monzo(), Monzo::new(-11, 7));
    }
}
