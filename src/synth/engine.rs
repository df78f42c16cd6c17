use crate::{
    dsp::{
        amplify::accumulate,
        limiter::{Limiter, LimiterParams},
        ramp::SmoothedParam,
    },
    synth::{
        message::{MessageReceiver, VoiceCommand, VoiceKey},
        voice::{Voice, VoiceConfig, VoiceState},
    },
    MAX_BLOCK_SIZE,
};

/// Master gain with no voices sounding, and the numerator of the 1/√k law.
pub const BASE_LEVEL: f32 = 0.6;
/// Time constant of the master gain smoothing, in seconds.
pub const MASTER_TIME_CONSTANT: f32 = 0.01;

/// Audio-thread half of the voice pool.
///
/// Owns a fixed set of preallocated voices and never allocates, locks or logs
/// while rendering. All control arrives as [`VoiceCommand`]s drained at the
/// start of each block.
pub struct ToneEngine<R: MessageReceiver> {
    voices: Vec<Voice>,
    rx: R,
    temp_buffer: Vec<f32>,
    master: SmoothedParam,
    limiter: Limiter,
    sample_rate: f32,
    frame_counter: u64,
}

impl<R: MessageReceiver> ToneEngine<R> {
    pub fn new(
        sample_rate: f32,
        max_voices: usize,
        voice_config: VoiceConfig,
        limiter: LimiterParams,
        rx: R,
    ) -> Self {
        let voices = (0..max_voices.max(1))
            .map(|_| Voice::new(sample_rate, voice_config))
            .collect();

        Self {
            voices,
            rx,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            master: SmoothedParam::new(BASE_LEVEL),
            limiter: Limiter::new(limiter, sample_rate),
            sample_rate,
            frame_counter: 0,
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        // Process control messages
        while let Some(command) = self.rx.pop() {
            self.handle(command);
        }

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        // Mix voices
        out.fill(0.0);
        let temp = &mut self.temp_buffer[..out.len()];
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.render(temp);
                accumulate(out, temp);
            }
        }

        self.master.apply(out);
        self.limiter.process(out);

        self.frame_counter += out.len() as u64;
    }

    fn handle(&mut self, command: VoiceCommand) {
        match command {
            VoiceCommand::Start { key, frequency } => {
                let age = self.frame_counter;
                if let Some(voice) = self.allocate_voice() {
                    voice.start(key, frequency, age);
                }
            }
            VoiceCommand::Release { key } => {
                if let Some(voice) = self.find_voice(key) {
                    voice.release();
                }
            }
            VoiceCommand::ReleaseAll => {
                for voice in &mut self.voices {
                    voice.release();
                }
            }
            VoiceCommand::MasterLevel { level } => {
                self.master
                    .set_target(level, MASTER_TIME_CONSTANT, self.sample_rate);
            }
        }
    }

    fn allocate_voice(&mut self) -> Option<&mut Voice> {
        // First pass: find free voice index
        let free_idx = self.voices.iter().position(|v| v.is_free());
        if let Some(idx) = free_idx {
            return Some(&mut self.voices[idx]);
        }

        // Second pass: steal oldest releasing voice
        let steal_idx = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx);

        steal_idx.map(|idx| &mut self.voices[idx])
    }

    fn find_voice(&mut self, key: VoiceKey) -> Option<&mut Voice> {
        self.voices
            .iter_mut()
            .find(|v| v.key() == Some(key) && v.state() == VoiceState::Active)
    }

    /// Voices still producing sound, releasing ones included.
    pub fn sounding_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Voices sounding and not yet released.
    pub fn held_voices(&self) -> usize {
        self.voices
            .iter()
            .filter(|v| v.state() == VoiceState::Active)
            .count()
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn master_gain(&self) -> f32 {
        self.master.value()
    }

    /// Deepest limiter gain reduction in the last rendered chunk, in dB.
    pub fn limiter_reduction_db(&self) -> f32 {
        self.limiter.reduction_db()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frame_counter
    }
}
