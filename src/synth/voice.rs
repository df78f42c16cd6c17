#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{oscillator::SineOscillator, ramp::SmoothedParam},
    synth::message::VoiceKey,
    MIN_TIME,
};

/// Per-voice amplitude shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    /// Sustained amplitude of one tone.
    pub level: f32,
    /// Seconds to ramp from silence to `level`.
    pub attack: f32,
    /// Seconds of exponential decay after release; the tone stops at the end.
    pub release: f32,
    /// Amplitude the release decays to before the tone is cut.
    pub floor: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            level: 0.15,
            attack: 0.01,
            release: 0.01,
            floor: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Sounding, gain at or ramping to level
    Releasing, // Decaying towards the floor
}

/// One preallocated sine tone.
#[derive(Debug, Clone)]
pub struct Voice {
    key: Option<VoiceKey>,
    state: VoiceState,
    age: u64,
    sample_rate: f32,
    config: VoiceConfig,
    osc: SineOscillator,
    gain: SmoothedParam,
    release_remaining: u32,
}

impl Voice {
    pub fn new(sample_rate: f32, config: VoiceConfig) -> Self {
        Self {
            key: None,
            state: VoiceState::Free,
            age: 0,
            sample_rate,
            config,
            osc: SineOscillator::new(0.0, sample_rate),
            gain: SmoothedParam::new(0.0),
            release_remaining: 0,
        }
    }

    pub fn start(&mut self, key: VoiceKey, frequency: f32, age: u64) {
        self.key = Some(key);
        self.state = VoiceState::Active;
        self.age = age;

        self.osc.reset();
        self.osc.set_frequency(frequency, self.sample_rate);
        self.gain.set_value(0.0);
        self.gain
            .linear_ramp_to(self.config.level, self.config.attack, self.sample_rate);
    }

    /// Cancel pending automation and decay from the current level.
    pub fn release(&mut self) {
        if self.state != VoiceState::Active {
            return;
        }
        self.state = VoiceState::Releasing;

        let release = self.config.release.max(MIN_TIME);
        self.gain.cancel();
        self.gain
            .exponential_ramp_to(self.config.floor, release, self.sample_rate, self.config.floor);
        self.release_remaining = (release * self.sample_rate).round().max(1.0) as u32;
    }

    /// Overwrite `out` with this voice's next samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            if self.state == VoiceState::Free {
                *sample = 0.0;
                continue;
            }

            *sample = self.osc.next_sample() * self.gain.next_sample();

            if self.state == VoiceState::Releasing {
                self.release_remaining = self.release_remaining.saturating_sub(1);
                if self.release_remaining == 0 {
                    self.free();
                }
            }
        }
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.key = None;
        self.gain.set_value(0.0);
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn key(&self) -> Option<VoiceKey> {
        self.key
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn level(&self) -> f32 {
        self.gain.value()
    }
}
