//! `lattice.toml` configuration.

use std::fs;
use std::path::Path;

use lattice_tuner::{
    dsp::LimiterParams,
    geometry::Matrix,
    lattice::NoteRange,
    synth::{PlayMode, VoiceConfig},
    tuning::TuningMode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Frequency of the base note in Hz.
    pub base_freq: f64,
    /// Which generator is held exact, and the step counts.
    pub generators: TuningMode,
    /// Just ratios used for automatic step counts and the just-intonation toggle.
    pub reference_p: f64,
    pub reference_q: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            base_freq: 440.0,
            generators: TuningMode::default(),
            reference_p: 2.0,
            reference_q: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Pre-image basis handle (M1).
    pub preimage: Matrix,
    /// Image basis handle (M2).
    pub image: Matrix,
    /// Spacing between lattice points, in percent of `scale`.
    pub gap: f64,
    /// Drawing units per lattice step at 100% gap.
    pub scale: f64,
    pub show_steps: bool,
    pub show_guides: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            preimage: Matrix::new(2.0, -1.0, -1.0, 1.0),
            image: Matrix::new(0.0, 1.0, 1.0, 1.0),
            gap: 100.0,
            scale: 100.0,
            show_steps: false,
            show_guides: true,
        }
    }
}

impl ViewConfig {
    /// Drawing units per lattice unit.
    pub fn zoom(&self) -> f64 {
        self.gap / 100.0 * self.scale
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub max_voices: usize,
    /// Capacity of the control → audio command queue.
    pub queue_capacity: usize,
    pub voice: VoiceConfig,
    pub limiter: LimiterParams,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_voices: 64,
            queue_capacity: 1024,
            voice: VoiceConfig::default(),
            limiter: LimiterParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tuning: TuningConfig,
    pub range: NoteRange,
    pub view: ViewConfig,
    pub audio: AudioConfig,
    pub play_mode: PlayMode,
}

impl AppConfig {
    /// Read `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            info!(path, "no config file, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path_obj) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => {
                    info!(path, "loaded config");
                    return cfg;
                }
                Err(err) => warn!(path, %err, "failed to parse config, using defaults"),
            },
            Err(err) => warn!(path, %err, "failed to read config, using defaults"),
        }
        Self::default()
    }
}
