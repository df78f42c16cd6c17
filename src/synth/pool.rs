use std::collections::HashMap;

use tracing::debug;

use crate::{
    dsp::amplify::loudness_compensation,
    error::{LatticeError, Result},
    lattice::Note,
    synth::{
        engine::BASE_LEVEL,
        message::{CommandSink, VoiceCommand, VoiceKey},
    },
};

/*
Voice Registry
==============

The pool is the control-thread view of what is sounding. It is keyed by
frequency, so two spellings that land on the same pitch share one tone.

    play_note(A4)      registry: {440}          → Start, MasterLevel(0.6)
    play_note(E5)      registry: {440, 659.3}   → Start, MasterLevel(0.42)
    stop_note(A4)      registry: {659.3}        → Release, MasterLevel(0.6)

A stop removes the entry at once, so `is_playing` turns false immediately,
while the engine keeps the tone decaying for its release window. Every
change is sent as one batch: if the queue cannot take all of it, nothing is
sent and the registry is left as it was.
*/

/// Control-side registry of sounding notes.
#[derive(Debug)]
pub struct VoicePool<S: CommandSink> {
    sink: S,
    voices: HashMap<VoiceKey, f64>,
    capacity: usize,
}

impl<S: CommandSink> VoicePool<S> {
    /// `capacity` should match the engine's voice count.
    pub fn new(sink: S, capacity: usize) -> Self {
        Self {
            sink,
            voices: HashMap::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn play_note(&mut self, note: &Note) -> Result<()> {
        self.play_frequency(note.frequency())
    }

    /// Start a tone unless one is already sounding at exactly `frequency`.
    pub fn play_frequency(&mut self, frequency: f64) -> Result<()> {
        let key = VoiceKey::from_frequency(frequency);

        if self.voices.contains_key(&key) {
            return self.refresh_master_level();
        }
        if self.voices.len() >= self.capacity {
            return Err(LatticeError::PolyphonyExhausted {
                limit: self.capacity,
            });
        }

        self.sink.push_all(&[
            VoiceCommand::Start {
                key,
                frequency: frequency as f32,
            },
            master_level(self.voices.len() + 1),
        ])?;
        self.voices.insert(key, frequency);

        debug!(frequency, voices = self.voices.len(), "voice started");
        Ok(())
    }

    pub fn stop_note(&mut self, note: &Note) -> Result<()> {
        self.stop_frequency(note.frequency())
    }

    /// Release the tone at `frequency`, if any. The registry entry goes now;
    /// the tone decays on the audio side.
    pub fn stop_frequency(&mut self, frequency: f64) -> Result<()> {
        let key = VoiceKey::from_frequency(frequency);

        if !self.voices.contains_key(&key) {
            return self.refresh_master_level();
        }

        self.sink.push_all(&[
            VoiceCommand::Release { key },
            master_level(self.voices.len() - 1),
        ])?;
        self.voices.remove(&key);

        debug!(frequency, voices = self.voices.len(), "voice released");
        Ok(())
    }

    pub fn stop_all_notes(&mut self) -> Result<()> {
        self.sink
            .push_all(&[VoiceCommand::ReleaseAll, master_level(0)])?;

        if !self.voices.is_empty() {
            debug!(released = self.voices.len(), "all voices released");
        }
        self.voices.clear();
        Ok(())
    }

    pub fn is_playing(&self, note: &Note) -> bool {
        self.is_playing_frequency(note.frequency())
    }

    pub fn is_playing_frequency(&self, frequency: f64) -> bool {
        self.voices.contains_key(&VoiceKey::from_frequency(frequency))
    }

    pub fn active_count(&self) -> usize {
        self.voices.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Master gain the engine is currently steering towards.
    pub fn master_level_target(&self) -> f32 {
        loudness_compensation(BASE_LEVEL, self.voices.len())
    }

    /// Sounding frequencies, lowest first.
    pub fn frequencies(&self) -> Vec<f64> {
        let mut frequencies: Vec<f64> = self.voices.values().copied().collect();
        frequencies.sort_by(f64::total_cmp);
        frequencies
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn refresh_master_level(&mut self) -> Result<()> {
        self.sink.push_all(&[master_level(self.voices.len())])
    }
}

fn master_level(count: usize) -> VoiceCommand {
    VoiceCommand::MasterLevel {
        level: loudness_compensation(BASE_LEVEL, count),
    }
}
