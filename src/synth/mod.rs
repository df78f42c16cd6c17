// Purpose: polyphonic sine voices for the lattice
// The pool tracks what should sound on the control thread; the engine renders
// it on the audio thread. They talk only through VoiceCommand messages.

pub mod engine;
pub mod message;
pub mod mode;
pub mod pool;
pub mod voice;

pub use engine::{ToneEngine, BASE_LEVEL, MASTER_TIME_CONSTANT};
pub use message::{CommandSink, MessageReceiver, VoiceCommand, VoiceKey};
pub use mode::PlayMode;
pub use pool::VoicePool;
pub use voice::{Voice, VoiceConfig, VoiceState};

/// Connected pool and engine over a wait-free ring buffer of `queue_capacity`
/// commands, both sized for `max_voices`.
#[cfg(feature = "rtrb")]
pub fn voice_channel(
    sample_rate: f32,
    max_voices: usize,
    queue_capacity: usize,
    voice_config: VoiceConfig,
    limiter: crate::dsp::LimiterParams,
) -> (
    VoicePool<rtrb::Producer<VoiceCommand>>,
    ToneEngine<rtrb::Consumer<VoiceCommand>>,
) {
    let (tx, rx) = rtrb::RingBuffer::new(queue_capacity);
    (
        VoicePool::new(tx, max_voices),
        ToneEngine::new(sample_rate, max_voices, voice_config, limiter, rx),
    )
}
