#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::amplify::{amp_to_db, db_to_amp};

/*
Output Safety Stage
===================

The master gain keeps loudness steady as voices come and go, but its
smoothing lags a sudden chord by a few milliseconds, and phase-aligned
sines can still peak above full scale. A compressor catches the overshoot,
and a hard ceiling guarantees nothing leaves the engine beyond it.

    bus ──→ envelope follower ──→ gain computer ──→ × gain ──→ clamp ──→ out
            (attack / release)    (soft knee)                 (ceiling)


Gain Computer (soft knee)
-------------------------

  out dB
      │                    ╱ ratio 1:1 (below the knee)
      │                 _-‾
      │             _-‾‾      slope 1/ratio (above the knee)
      │          _-‾
      │        ╱
      │      ╱ │knee│
      └────────────────── in dB
               T

    x < T - W/2           y = x
    |x - T| <= W/2        y = x + (1/R - 1)(x - T + W/2)² / 2W
    x > T + W/2           y = T + (x - T) / R

  with T = threshold, W = knee width, R = ratio. Gain reduction is y - x.


Envelope Follower
-----------------

  env = coeff × env + (1 - coeff) × |x|

  coeff = exp(-1 / (time × sample_rate)), using the attack time while the
  level rises and the release time while it falls. A fast attack grabs
  transients; a slow release avoids audible pumping.
*/

/// Compressor and ceiling settings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterParams {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    /// Seconds.
    pub attack: f32,
    /// Seconds.
    pub release: f32,
    /// Absolute sample ceiling applied after compression.
    pub ceiling: f32,
}

impl Default for LimiterParams {
    fn default() -> Self {
        Self {
            threshold_db: -18.0,
            knee_db: 24.0,
            ratio: 4.0,
            attack: 0.003,
            release: 0.25,
            ceiling: 0.98,
        }
    }
}

impl LimiterParams {
    /// Output level in dB for an input level in dB.
    pub fn compute(&self, input_db: f32) -> f32 {
        let over = input_db - self.threshold_db;
        let half_knee = self.knee_db * 0.5;
        let slope = 1.0 / self.ratio.max(1.0) - 1.0;

        if over < -half_knee {
            input_db
        } else if self.knee_db > 0.0 && over <= half_knee {
            let into_knee = over + half_knee;
            input_db + slope * into_knee * into_knee / (2.0 * self.knee_db)
        } else {
            self.threshold_db + over / self.ratio.max(1.0)
        }
    }
}

/// Streaming compressor with a hard ceiling.
#[derive(Debug, Clone)]
pub struct Limiter {
    params: LimiterParams,
    attack_coeff: f32,
    release_coeff: f32,
    envelope: f32,
    reduction_db: f32,
}

impl Limiter {
    pub fn new(params: LimiterParams, sample_rate: f32) -> Self {
        Self {
            params,
            attack_coeff: time_coeff(params.attack, sample_rate),
            release_coeff: time_coeff(params.release, sample_rate),
            envelope: 0.0,
            reduction_db: 0.0,
        }
    }

    pub fn params(&self) -> &LimiterParams {
        &self.params
    }

    /// Deepest gain reduction applied during the last `process` call (dB, ≥ 0).
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
        self.reduction_db = 0.0;
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        let ceiling = self.params.ceiling.abs();
        let mut deepest = 0.0f32;

        for sample in buffer.iter_mut() {
            let level = sample.abs();
            let coeff = if level > self.envelope {
                self.attack_coeff
            } else {
                self.release_coeff
            };
            self.envelope = coeff * self.envelope + (1.0 - coeff) * level;

            let input_db = amp_to_db(self.envelope);
            let gain_db = self.params.compute(input_db) - input_db;
            deepest = deepest.max(-gain_db);

            *sample = (*sample * db_to_amp(gain_db)).clamp(-ceiling, ceiling);
        }

        self.reduction_db = deepest;
    }
}

fn time_coeff(seconds: f32, sample_rate: f32) -> f32 {
    let samples = seconds * sample_rate;
    if samples > 0.0 {
        (-1.0 / samples).exp()
    } else {
        0.0
    }
}
