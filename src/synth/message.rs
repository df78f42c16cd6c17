#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};
use std::collections::VecDeque;

use crate::error::{LatticeError, Result};

/// Identity of a sounding tone: the exact bits of its frequency.
///
/// Two notes with bit-identical frequencies share one voice; enharmonic
/// spellings that differ by even one ulp do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceKey(u64);

impl VoiceKey {
    pub fn from_frequency(frequency: f64) -> Self {
        // -0.0 and 0.0 are one key
        Self((frequency + 0.0).to_bits())
    }

    pub fn frequency(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Control messages from the voice pool to the tone engine.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceCommand {
    /// Start a tone at `frequency` Hz.
    Start { key: VoiceKey, frequency: f32 },
    /// Begin the release of the tone started under `key`.
    Release { key: VoiceKey },
    /// Release every sounding tone.
    ReleaseAll,
    /// New target for the smoothed master gain.
    MasterLevel { level: f32 },
}

/// Audio-side end of the command channel.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceCommand>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceCommand> {
    fn pop(&mut self) -> Option<VoiceCommand> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<VoiceCommand> {
    fn pop(&mut self) -> Option<VoiceCommand> {
        self.pop_front()
    }
}

/// Control-side end of the command channel.
pub trait CommandSink {
    /// Commands that can be pushed right now without failing.
    fn free_slots(&self) -> usize;

    fn push(&mut self, command: VoiceCommand) -> Result<()>;

    /// Push every command or none of them.
    fn push_all(&mut self, commands: &[VoiceCommand]) -> Result<()> {
        if self.free_slots() < commands.len() {
            return Err(LatticeError::CommandQueueFull);
        }
        for &command in commands {
            self.push(command)?;
        }
        Ok(())
    }
}

#[cfg(feature = "rtrb")]
impl CommandSink for Producer<VoiceCommand> {
    fn free_slots(&self) -> usize {
        self.slots()
    }

    fn push(&mut self, command: VoiceCommand) -> Result<()> {
        Producer::push(self, command).map_err(|_| LatticeError::CommandQueueFull)
    }
}

/// Unbounded sink, for offline rendering and tests.
impl CommandSink for Vec<VoiceCommand> {
    fn free_slots(&self) -> usize {
        usize::MAX
    }

    fn push(&mut self, command: VoiceCommand) -> Result<()> {
        Vec::push(self, command);
        Ok(())
    }
}

impl CommandSink for VecDeque<VoiceCommand> {
    fn free_slots(&self) -> usize {
        usize::MAX
    }

    fn push(&mut self, command: VoiceCommand) -> Result<()> {
        self.push_back(command);
        Ok(())
    }
}
