use std::f32::consts::TAU;

/*
Sine Oscillator
===============

Every voice in the explorer is a pure sine: the lattice is about pitch, so
the tone carries no harmonics that could be mistaken for other notes.

Vocabulary
----------

  phase       Position within one cycle, kept in [0, TAU).

  increment   Phase advance per sample:  TAU * frequency / sample_rate

  sample_rate Samples per second (e.g., 48000).


The Phase Accumulator
---------------------

    sample[n] = sin(phase),   phase += increment,   wrap at TAU

    phase
     TAU ┐    ╱│   ╱│   ╱│
         │   ╱ │  ╱ │  ╱ │
         │  ╱  │ ╱  │ ╱  │
       0 └─╱───┴╱───┴╱───┴──→ n

Keeping the phase wrapped stops f32 precision from drifting on long notes.
Frequencies are not limited to any keyboard: lattice tunings produce
arbitrary real values, so the oscillator takes Hz directly.
*/

#[derive(Debug, Clone, Copy)]
pub struct SineOscillator {
    phase: f32,
    increment: f32,
}

impl SineOscillator {
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            increment: 0.0,
        };
        osc.set_frequency(frequency, sample_rate);
        osc
    }

    /// Change pitch without resetting the phase.
    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.increment = if sample_rate > 0.0 && frequency.is_finite() {
            TAU * frequency / sample_rate
        } else {
            0.0
        };
    }

    /// Restart the cycle at zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.phase.sin();
        self.phase += self.increment;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        sample
    }

    /// Overwrite `out` with the next `out.len()` samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = SineOscillator::new(frequency, sample_rate);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer);

        // sample n should be sin(2pi f n / sr)
        for sample_index in [0, 1, 12, 127] {
            let expected = (TAU * frequency * sample_index as f32 / sample_rate).sin();
            let actual = buffer[sample_index];
            assert!(
                (actual - expected).abs() < 1e-4,
                "sample {sample_index}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn non_integer_frequencies_are_accepted() {
        // 12-EDO C4 relative to A4 = 440
        let frequency = 261.625_57;
        let mut osc = SineOscillator::new(frequency, 48_000.0);
        let mut buffer = vec![0.0f32; 48_000];
        osc.render(&mut buffer);

        let upward_crossings = buffer
            .windows(2)
            .filter(|pair| pair[0] < 0.0 && pair[1] >= 0.0)
            .count();
        assert!((261..=262).contains(&upward_crossings), "{upward_crossings}");
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut osc = SineOscillator::new(19_000.0, 44_100.0);
        for _ in 0..100_000 {
            osc.next_sample();
        }
        assert!(osc.phase >= 0.0 && osc.phase < TAU);
    }

    #[test]
    fn bad_sample_rate_is_silent() {
        let mut osc = SineOscillator::new(440.0, 0.0);
        let mut buffer = [1.0f32; 16];
        osc.render(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }
}
