use crate::MIN_TIME;

/*
Parameter Automation
====================

Gains in the voice pool never jump. A jump in amplitude is a discontinuity
in the waveform, and a discontinuity is heard as a click. Instead every gain
is a `SmoothedParam`: a value that moves towards its target one sample at a
time along one of three curves.

Vocabulary
----------

  value       The parameter's current output, read once per sample.

  target      Where the current ramp ends.

  remaining   Samples left in a fixed-length ramp.

  time        Seconds, converted to samples with the sample rate.


The Curves
----------

  Linear (attack)                 value += step each sample

      0.15 ┐      ____________
           │    ╱
           │  ╱
         0 └╱──────────────────→ t
            |attack|

  Exponential (release)           value *= factor each sample

      0.15 ┐\
           │ \
           │  ‾-_
      1e-4 └─────‾‾──────────────→ t
             |release|

      factor = (end / start) ^ (1 / samples)

  An exponential ramp cannot cross zero, so it always ends on a small
  positive floor. Starting from zero is nudged up to the floor first.

  Approach (master gain)          value = target + (value - target) * coeff

      coeff = exp(-1 / (time_constant * sample_rate))

  After one time constant the gap has closed to 1/e (about 37%); after five
  it is below 1%. There is no fixed end: retargeting mid-way is smooth.


Cancelling
----------

`cancel` freezes the value where it is and drops any ramp in progress. A
release always cancels first, so a note stopped mid-attack decays from the
level it actually reached rather than from the attack target.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ramp {
    Hold,
    Linear { step: f32, target: f32, remaining: u32 },
    Exponential { factor: f32, target: f32, remaining: u32 },
    Approach { target: f32, coeff: f32 },
}

/// Settled when an approach ramp is this close to its target.
const APPROACH_EPSILON: f32 = 1e-6;

/// A per-sample automated control value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedParam {
    value: f32,
    ramp: Ramp,
}

impl SmoothedParam {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            ramp: Ramp::Hold,
        }
    }

    /// Jump to `value` immediately and drop any ramp.
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.ramp = Ramp::Hold;
    }

    /// Freeze at the current value.
    pub fn cancel(&mut self) {
        self.ramp = Ramp::Hold;
    }

    /// Straight line to `target` over `seconds`.
    pub fn linear_ramp_to(&mut self, target: f32, seconds: f32, sample_rate: f32) {
        let samples = ramp_samples(seconds, sample_rate);
        self.ramp = Ramp::Linear {
            step: (target - self.value) / samples as f32,
            target,
            remaining: samples,
        };
    }

    /// Exponential curve to `target` over `seconds`.
    ///
    /// Both ends are clamped to at least `floor`, which must be positive.
    pub fn exponential_ramp_to(&mut self, target: f32, seconds: f32, sample_rate: f32, floor: f32) {
        let floor = floor.max(f32::MIN_POSITIVE);
        let target = target.max(floor);
        self.value = self.value.max(floor);

        let samples = ramp_samples(seconds, sample_rate);
        self.ramp = Ramp::Exponential {
            factor: (target / self.value).powf(1.0 / samples as f32),
            target,
            remaining: samples,
        };
    }

    /// First-order approach to `target` with the given time constant.
    pub fn set_target(&mut self, target: f32, time_constant: f32, sample_rate: f32) {
        let samples = time_constant.max(MIN_TIME) * sample_rate.max(1.0);
        self.ramp = Ramp::Approach {
            target,
            coeff: (-1.0 / samples).exp(),
        };
    }

    /// Current value without advancing.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the current ramp is heading; the value itself when holding.
    pub fn target(&self) -> f32 {
        match self.ramp {
            Ramp::Hold => self.value,
            Ramp::Linear { target, .. }
            | Ramp::Exponential { target, .. }
            | Ramp::Approach { target, .. } => target,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.ramp, Ramp::Hold)
    }

    /// Return the current value, then advance one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let out = self.value;

        match self.ramp {
            Ramp::Hold => {}
            Ramp::Linear {
                step,
                target,
                remaining,
            } => {
                if remaining <= 1 {
                    self.set_value(target);
                } else {
                    self.value += step;
                    self.ramp = Ramp::Linear {
                        step,
                        target,
                        remaining: remaining - 1,
                    };
                }
            }
            Ramp::Exponential {
                factor,
                target,
                remaining,
            } => {
                if remaining <= 1 {
                    self.set_value(target);
                } else {
                    self.value *= factor;
                    self.ramp = Ramp::Exponential {
                        factor,
                        target,
                        remaining: remaining - 1,
                    };
                }
            }
            Ramp::Approach { target, coeff } => {
                self.value = target + (self.value - target) * coeff;
                if (self.value - target).abs() < APPROACH_EPSILON {
                    self.set_value(target);
                }
            }
        }

        out
    }

    /// Multiply `buffer` in place by successive values.
    pub fn apply(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample *= self.next_sample();
        }
    }
}

fn ramp_samples(seconds: f32, sample_rate: f32) -> u32 {
    (seconds.max(MIN_TIME) * sample_rate).round().max(1.0) as u32
}
