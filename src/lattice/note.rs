use std::fmt;

use crate::{
    lattice::name::{NoteName, Pitch},
    tuning::{Monzo, Val},
};

/// Hue of a note sounding at 1 Hz.
const HUE_OFFSET: f64 = 100.0;

/// A named lattice point under a particular tuning.
///
/// Notes are produced by [`generate_notes`](crate::lattice::generate_notes)
/// and never change afterwards; a tuning or range change rebuilds the set.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    name: NoteName,
    octave: i32,
    monzo: Monzo,
    val: Val,
    frequency: f64,
    steps: Option<i64>,
}

impl Note {
    /// `monzo` is relative to the base note the lattice was built around.
    pub(crate) fn new(pitch: Pitch, monzo: Monzo, val: Val) -> Self {
        Self {
            name: pitch.name,
            octave: pitch.octave,
            monzo,
            val,
            frequency: val.frequency(monzo),
            steps: val.steps(monzo),
        }
    }

    pub fn name(&self) -> NoteName {
        self.name
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn pitch(&self) -> Pitch {
        Pitch {
            name: self.name,
            octave: self.octave,
        }
    }

    /// Position relative to the base note.
    pub fn monzo(&self) -> Monzo {
        self.monzo
    }

    /// The tuning this note was computed under.
    pub fn val(&self) -> &Val {
        &self.val
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn steps(&self) -> Option<i64> {
        self.steps
    }

    /// Colour-wheel angle in degrees. One turn per period, so notes a
    /// period apart share a hue. A unison period gives every note the same hue.
    pub fn hue(&self) -> f64 {
        let turns = self.frequency.ln() / self.val.p_ratio.ln();
        if !turns.is_finite() {
            return HUE_OFFSET;
        }
        (turns * 360.0 + HUE_OFFSET).rem_euclid(360.0)
    }

    /// Short label, e.g. `E♭5`.
    pub fn label(&self) -> String {
        self.pitch().to_string()
    }

    /// Two-line annotation: lattice coordinate (with steps when asked for and
    /// defined) and frequency.
    pub fn describe(&self, show_steps: bool) -> String {
        match self.steps {
            Some(steps) if show_steps => {
                format!("{} = {}\n{:.1}Hz", self.monzo, steps, self.frequency)
            }
            _ => format!("{}\n{:.1}Hz", self.monzo, self.frequency),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} Hz)", self.pitch(), self.frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::name::{Accidental, Letter};

    fn e5() -> Pitch {
        Pitch {
            name: NoteName::natural(Letter::E),
            octave: 5,
        }
    }

    #[test]
    fn derives_frequency_and_steps_from_val() {
        let val = Val::from_p_division(12, 19, 2.0, 440.0).unwrap();
        let note = Note::new(e5(), Monzo::new(-1, 1), val);

        assert_eq!(note.steps(), Some(7));
        assert!((note.frequency() - 659.255).abs() < 1e-2);
        assert_eq!(note.label(), "E5");
        assert_eq!(note.val(), &val);
    }

    #[test]
    fn describe_hides_undefined_steps() {
        let just = Val::just_intonation(2.0, 3.0, 440.0).unwrap();
        let note = Note::new(e5(), Monzo::new(-1, 1), just);

        assert_eq!(note.describe(true), "［-1 1〉\n660.0Hz");

        let edo = Val::from_p_division(12, 19, 2.0, 440.0).unwrap();
        let note = Note::new(e5(), Monzo::new(-1, 1), edo);
        assert_eq!(note.describe(true), "［-1 1〉 = 7\n659.3Hz");
        assert_eq!(note.describe(false), "［-1 1〉\n659.3Hz");
    }

    #[test]
    fn hue_repeats_every_period() {
        let val = Val::just_intonation(2.0, 3.0, 440.0).unwrap();
        let a4 = Note::new(e5(), Monzo::ORIGIN, val);
        let a5 = Note::new(e5(), Monzo::new(1, 0), val);
        let fifth = Note::new(e5(), Monzo::new(-1, 1), val);

        assert!((a4.hue() - a5.hue()).abs() < 1e-6);
        assert!((0.0..360.0).contains(&fifth.hue()));
        assert!((a4.hue() - fifth.hue()).abs() > 1.0);
    }

    #[test]
    fn unison_period_keeps_hue_finite() {
        // S^0: the period collapses to a unison
        let val = Val::from_unit_step(0, 12, 2f64.powf(1.0 / 12.0), 440.0).unwrap();
        let note = Note::new(e5(), Monzo::new(0, 1), val);
        assert_eq!(note.hue(), 100.0);
    }

    #[test]
    fn label_includes_accidentals() {
        let val = Val::just_intonation(2.0, 3.0, 440.0).unwrap();
        let pitch = Pitch {
            name: NoteName {
                letter: Letter::B,
                accidental: Accidental::Flat(2),
            },
            octave: 3,
        };
        assert_eq!(Note::new(pitch, Monzo::ORIGIN, val).label(), "B♭♭3");
    }
}
