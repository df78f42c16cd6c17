//! Audio output: opens the default cpal device and runs the tone engine in
//! its callback.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{error, info};

use lattice_tuner::{
    synth::{voice_channel, VoiceCommand, VoicePool},
    MAX_BLOCK_SIZE,
};

use crate::config::AudioConfig;
use crate::ui::EngineStatus;

/// Samples buffered for the UI scope between frames.
const TAP_CAPACITY: usize = 16_384;
const STATUS_CAPACITY: usize = 64;

/// A running output stream and the UI ends of its queues.
pub struct AudioOutput {
    /// Playback stops when this is dropped.
    pub stream: cpal::Stream,
    pub sample_rate: f32,
    pub channels: usize,
    pub pool: VoicePool<Producer<VoiceCommand>>,
    pub samples: Consumer<f32>,
    pub status: Consumer<EngineStatus>,
}

pub fn start_audio(config: &AudioConfig) -> EyreResult<AudioOutput> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;
    let name = device.name().unwrap_or_default();
    info!(device = %name, sample_rate, channels, "opening audio output");

    let (pool, mut engine) = voice_channel(
        sample_rate,
        config.max_voices,
        config.queue_capacity,
        config.voice,
        config.limiter,
    );
    let (mut sample_tx, sample_rx) = RingBuffer::<f32>::new(TAP_CAPACITY);
    let (mut status_tx, status_rx) = RingBuffer::<EngineStatus>::new(STATUS_CAPACITY);

    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let block = &mut render_buf[..frames_to_render];
                engine.render_block(block);

                // Copy to output (mono to all channels)
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    let frame = out_off + i * channels;
                    data[frame..frame + channels].fill(s);
                    // the scope is lossy; a full tap drops samples
                    let _ = sample_tx.push(s);
                }

                frames_written += frames_to_render;
            }

            let _ = status_tx.push(EngineStatus {
                sounding: engine.sounding_voices(),
                held: engine.held_voices(),
                master_gain: engine.master_gain(),
                reduction_db: engine.limiter_reduction_db(),
                frames: engine.frames(),
            });
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;

    stream.play().wrap_err("failed to start audio stream")?;

    Ok(AudioOutput {
        stream,
        sample_rate,
        channels,
        pool,
        samples: sample_rx,
        status: status_rx,
    })
}
