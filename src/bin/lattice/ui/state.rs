//! Engine snapshot sent from the audio thread to the UI.
//!
//! Copy and allocation-free so the callback can push one per buffer.

/// Audio-side state at the end of one output buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineStatus {
    /// Voices producing sound, including those still releasing.
    pub sounding: usize,
    /// Voices started and not yet released.
    pub held: usize,
    /// Smoothed master gain.
    pub master_gain: f32,
    /// Gain reduction applied by the output limiter, in dB.
    pub reduction_db: f32,
    /// Frames rendered since the stream started.
    pub frames: u64,
}

/// Peak and RMS of the visualization buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        Self {
            peak: lattice_tuner::dsp::amplify::peak(buffer),
            rms: lattice_tuner::dsp::amplify::rms(buffer),
        }
    }
}
