//! Gain, summing and level measurement on mono buffers.

/*
Gain and Summing
================

Each sounding note renders into its own scratch buffer, which is then
added onto the shared bus. The bus as a whole is scaled by the master gain.

Vocabulary
----------

  gain          A multiplier applied to amplitude.
                  gain = 1.0  →  unchanged (unity gain)
                  gain < 1.0  →  quieter (attenuation)
                  gain = 0.0  →  silence

  summing       Adding signals at equal weight. k sines at 0.15 each can
                reach k × 0.15 when their peaks line up.

  peak          Largest absolute sample in a buffer.

  RMS           Root mean square: sqrt(mean(x²)). Tracks perceived level
                better than the peak does.


Decibels
--------

    dB = 20 × log₁₀(amplitude)

    ×1.0   =   0 dB
    ×0.5   =  -6 dB
    ×0.126 = -18 dB   (limiter threshold)
    ×0.1   = -20 dB

Every halving of amplitude ≈ -6 dB.


Why 1/√k
--------

Uncorrelated signals add in POWER, not amplitude. k voices at equal level
carry k times the power of one, i.e. √k times the RMS amplitude. Scaling
the bus by 1/√k keeps the overall loudness roughly constant as notes are
added, while a pure 1/k would make chords sound progressively thinner.
*/

/// Add `signal` onto `bus` sample by sample.
#[inline]
pub fn accumulate(bus: &mut [f32], signal: &[f32]) {
    debug_assert_eq!(bus.len(), signal.len());

    for (b, &s) in bus.iter_mut().zip(signal.iter()) {
        *b += s;
    }
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Largest absolute sample; 0.0 for an empty buffer.
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Root mean square; 0.0 for an empty buffer.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum: f32 = signal.iter().map(|s| s * s).sum();
    (sum / signal.len() as f32).sqrt()
}

/// Linear amplitude to decibels, floored at -200 dB.
#[inline]
pub fn amp_to_db(amp: f32) -> f32 {
    20.0 * amp.abs().max(1e-10).log10()
}

#[inline]
pub fn db_to_amp(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Master level that keeps `count` summed voices at roughly `base_level`
/// loudness: `base_level / sqrt(count)`, or `base_level` when silent.
pub fn loudness_compensation(base_level: f32, count: usize) -> f32 {
    if count == 0 {
        base_level
    } else {
        base_level / (count as f32).sqrt()
    }
}
