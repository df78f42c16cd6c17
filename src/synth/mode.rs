#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    lattice::Note,
    synth::{message::CommandSink, pool::VoicePool},
};

/// How a trigger (click, key press) maps onto the voice pool.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    /// Notes sound while the trigger is held; letting go silences everything.
    #[default]
    Hold,
    /// Each trigger flips a note on or off; notes accumulate into chords.
    Toggle,
}

impl PlayMode {
    /// Trigger pressed on `note`.
    pub fn press<S: CommandSink>(self, pool: &mut VoicePool<S>, note: &Note) -> Result<()> {
        match self {
            PlayMode::Hold => pool.play_note(note),
            PlayMode::Toggle if pool.is_playing(note) => pool.stop_note(note),
            PlayMode::Toggle => pool.play_note(note),
        }
    }

    /// Trigger let go.
    pub fn release<S: CommandSink>(self, pool: &mut VoicePool<S>) -> Result<()> {
        match self {
            PlayMode::Hold => pool.stop_all_notes(),
            PlayMode::Toggle => Ok(()),
        }
    }

    /// Switch to `next`, silencing whatever the old mode left sounding.
    pub fn switch_to<S: CommandSink>(&mut self, next: PlayMode, pool: &mut VoicePool<S>) -> Result<()> {
        pool.stop_all_notes()?;
        *self = next;
        Ok(())
    }

    pub fn toggled(self) -> PlayMode {
        match self {
            PlayMode::Hold => PlayMode::Toggle,
            PlayMode::Toggle => PlayMode::Hold,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayMode::Hold => "hold",
            PlayMode::Toggle => "toggle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lattice::{generate_notes, NoteRange},
        synth::message::VoiceCommand,
        tuning::Val,
    };

    fn notes() -> Vec<Note> {
        let val = Val::just_intonation(2.0, 3.0, 440.0).unwrap();
        let range = NoteRange {
            flats: 0,
            sharps: 0,
            min: "A4".into(),
            max: "E5".into(),
            ..NoteRange::default()
        };
        generate_notes(&val, &range).unwrap()
    }

    #[test]
    fn hold_plays_until_release() {
        let notes = notes();
        let mut pool = VoicePool::new(Vec::<VoiceCommand>::new(), 8);

        PlayMode::Hold.press(&mut pool, &notes[0]).unwrap();
        PlayMode::Hold.press(&mut pool, &notes[0]).unwrap();
        assert!(pool.is_playing(&notes[0]));

        PlayMode::Hold.release(&mut pool).unwrap();
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn toggle_flips_and_accumulates() {
        let notes = notes();
        let mut pool = VoicePool::new(Vec::<VoiceCommand>::new(), 8);

        PlayMode::Toggle.press(&mut pool, &notes[0]).unwrap();
        PlayMode::Toggle.press(&mut pool, &notes[1]).unwrap();
        PlayMode::Toggle.release(&mut pool).unwrap();
        assert_eq!(pool.active_count(), 2);

        PlayMode::Toggle.press(&mut pool, &notes[0]).unwrap();
        assert!(!pool.is_playing(&notes[0]));
        assert!(pool.is_playing(&notes[1]));
    }

    #[test]
    fn switching_mode_stops_everything() {
        let notes = notes();
        let mut pool = VoicePool::new(Vec::<VoiceCommand>::new(), 8);
        let mut mode = PlayMode::Toggle;

        mode.press(&mut pool, &notes[0]).unwrap();
        mode.switch_to(mode.toggled(), &mut pool).unwrap();

        assert_eq!(mode, PlayMode::Hold);
        assert_eq!(pool.active_count(), 0);
    }
}
