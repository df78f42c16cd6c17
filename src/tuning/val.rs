use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{LatticeError, Result},
    tuning::monzo::Monzo,
};

/*
Vals: Two-Generator Tunings
===========================

A val turns a lattice coordinate into a pitch. The lattice is spanned by two
generator ratios, P and Q (classically the octave 2/1 and the tritave 3/1),
and every coordinate is a monzo [m n>:

    frequency = base_freq * P^m * Q^n

Equal-Division Tunings
----------------------

An equal-division tuning additionally has a unit step S such that both
generators are whole numbers of steps:

    S^p = P        S^q = Q

Then every coordinate also has an integer step count:

    steps([m n>) = m*p + n*q

Example: 12-EDO with P = 2 divides the octave into p = 12 steps. The tritave
is approximated by q = 19 of those steps, so Q = 2^(19/12) ~= 2.9966, slightly
flat of a pure 3/1.

    coordinate   name   steps         frequency (base A4 = 440)
    [0 0>        A4     0             440.0
    [-1 1>       E5     -12 + 19 = 7  440 * 2^(7/12) ~= 659.3
    [1 -1>       D4     12 - 19 = -5  440 * 2^(-5/12) ~= 293.7

There are three ways to pin down an equal-division val, depending on which
ratio is held exact:

    from P:  S = P^(1/p),  Q = S^q     (octave exact, tritave tempered)
    from Q:  S = Q^(1/q),  P = S^p     (tritave exact, octave tempered)
    from S:  P = S^p,      Q = S^q     (step exact, both tempered)

Just Intonation
---------------

With P and Q taken as exact ratios (2 and 3), the lattice is Pythagorean and
no unit step exists: 2^a = 3^b has no integer solution besides a = b = 0.
Such a val has no step structure and `steps` returns None. None is not zero:
the origin of an equal-division val has zero steps, the origin of a just val
has no step count at all.
*/

/// The shared unit step of an equal-division val.
///
/// Grouping the three values makes "p known but q unknown" unrepresentable.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualSteps {
    /// Unit ratio S.
    pub unit: f64,
    /// Steps per P.
    pub p: i32,
    /// Steps per Q.
    pub q: i32,
}

/// A tuning: two generator ratios and the frequency of the lattice origin.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Val {
    /// Generator ratio P (exponent `m`).
    pub p_ratio: f64,
    /// Generator ratio Q (exponent `n`).
    pub q_ratio: f64,
    /// Frequency assigned to monzo [0 0> in Hz.
    pub base_freq: f64,
    /// Present only for equal-division tunings.
    pub equal_steps: Option<EqualSteps>,
}

fn finite_positive(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LatticeError::InvalidTuningParameter { field, value })
    }
}

fn nonzero_divisor(field: &'static str, steps: i32) -> Result<f64> {
    if steps == 0 {
        Err(LatticeError::ZeroStepDivisor { field })
    } else {
        Ok(steps as f64)
    }
}

impl Val {
    /// Equal division holding P exact: `S = P^(1/p)`, `Q = S^q`.
    pub fn from_p_division(p: i32, q: i32, p_ratio: f64, base_freq: f64) -> Result<Self> {
        let divisor = nonzero_divisor("p", p)?;
        let p_ratio = finite_positive("P", p_ratio)?;
        let base_freq = finite_positive("baseFreq", base_freq)?;

        let unit = finite_positive("S", p_ratio.powf(1.0 / divisor))?;
        let q_ratio = finite_positive("Q", unit.powi(q))?;

        Ok(Self::equal(p_ratio, q_ratio, base_freq, unit, p, q))
    }

    /// Equal division holding Q exact: `S = Q^(1/q)`, `P = S^p`.
    pub fn from_q_division(p: i32, q: i32, q_ratio: f64, base_freq: f64) -> Result<Self> {
        let divisor = nonzero_divisor("q", q)?;
        let q_ratio = finite_positive("Q", q_ratio)?;
        let base_freq = finite_positive("baseFreq", base_freq)?;

        let unit = finite_positive("S", q_ratio.powf(1.0 / divisor))?;
        let p_ratio = finite_positive("P", unit.powi(p))?;

        Ok(Self::equal(p_ratio, q_ratio, base_freq, unit, p, q))
    }

    /// Equal division from the unit step itself: `P = S^p`, `Q = S^q`.
    pub fn from_unit_step(p: i32, q: i32, unit: f64, base_freq: f64) -> Result<Self> {
        let unit = finite_positive("S", unit)?;
        let base_freq = finite_positive("baseFreq", base_freq)?;

        let p_ratio = finite_positive("P", unit.powi(p))?;
        let q_ratio = finite_positive("Q", unit.powi(q))?;

        Ok(Self::equal(p_ratio, q_ratio, base_freq, unit, p, q))
    }

    /// Exact generator ratios with no step structure.
    pub fn just_intonation(p_ratio: f64, q_ratio: f64, base_freq: f64) -> Result<Self> {
        Ok(Self {
            p_ratio: finite_positive("P", p_ratio)?,
            q_ratio: finite_positive("Q", q_ratio)?,
            base_freq: finite_positive("baseFreq", base_freq)?,
            equal_steps: None,
        })
    }

    fn equal(p_ratio: f64, q_ratio: f64, base_freq: f64, unit: f64, p: i32, q: i32) -> Self {
        Self {
            p_ratio,
            q_ratio,
            base_freq,
            equal_steps: Some(EqualSteps { unit, p, q }),
        }
    }

    /// `base_freq * P^m * Q^n`
    pub fn frequency(&self, monzo: Monzo) -> f64 {
        self.base_freq * self.p_ratio.powi(monzo.m) * self.q_ratio.powi(monzo.n)
    }

    /// `m*p + n*q`, or `None` when the val has no step structure.
    pub fn steps(&self, monzo: Monzo) -> Option<i64> {
        self.equal_steps
            .map(|s| monzo.m as i64 * s.p as i64 + monzo.n as i64 * s.q as i64)
    }

    /// Checks `P = S^p` and `Q = S^q` within a relative tolerance.
    ///
    /// Always true for vals without a step structure.
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        let Some(steps) = self.equal_steps else {
            return true;
        };
        let close = |actual: f64, expected: f64| {
            (actual - expected).abs() <= tolerance * expected.abs().max(1.0)
        };
        close(self.p_ratio, steps.unit.powi(steps.p)) && close(self.q_ratio, steps.unit.powi(steps.q))
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.equal_steps {
            Some(steps) => write!(
                f,
                "{}/{} steps, S={:.6} (P={:.4}, Q={:.4}) @ {:.1} Hz",
                steps.p, steps.q, steps.unit, self.p_ratio, self.q_ratio, self.base_freq
            ),
            None => write!(
                f,
                "JI (P={:.4}, Q={:.4}) @ {:.1} Hz",
                self.p_ratio, self.q_ratio, self.base_freq
            ),
        }
    }
}

/// Nearest step count for the other generator: `round(count * ln(to) / ln(from))`.
///
/// With P = 2 and Q = 3 this is the familiar `q = round(p * log2(3))`
/// (12 -> 19, 19 -> 30, 31 -> 49). Returns `None` when `from_ratio` is 1 or
/// either ratio is not positive.
pub fn companion_steps(count: i32, from_ratio: f64, to_ratio: f64) -> Option<i32> {
    let scaled = count as f64 * to_ratio.ln() / from_ratio.ln();
    if scaled.is_finite() && scaled.abs() <= i32::MAX as f64 {
        Some(scaled.round() as i32)
    } else {
        None
    }
}

/// How a val is specified: which ratio is held exact, plus the mode's inputs.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "mode", rename_all = "kebab-case")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TuningMode {
    FromP { p: i32, q: i32, p_ratio: f64 },
    FromQ { p: i32, q: i32, q_ratio: f64 },
    FromS { p: i32, q: i32, unit: f64 },
    JustIntonation { p_ratio: f64, q_ratio: f64 },
}

impl TuningMode {
    pub fn build(&self, base_freq: f64) -> Result<Val> {
        match *self {
            TuningMode::FromP { p, q, p_ratio } => Val::from_p_division(p, q, p_ratio, base_freq),
            TuningMode::FromQ { p, q, q_ratio } => Val::from_q_division(p, q, q_ratio, base_freq),
            TuningMode::FromS { p, q, unit } => Val::from_unit_step(p, q, unit, base_freq),
            TuningMode::JustIntonation { p_ratio, q_ratio } => {
                Val::just_intonation(p_ratio, q_ratio, base_freq)
            }
        }
    }

    /// Step counts of an equal-division mode.
    pub fn step_counts(&self) -> Option<(i32, i32)> {
        match *self {
            TuningMode::FromP { p, q, .. }
            | TuningMode::FromQ { p, q, .. }
            | TuningMode::FromS { p, q, .. } => Some((p, q)),
            TuningMode::JustIntonation { .. } => None,
        }
    }

    /// Same mode with new step counts; just intonation is returned unchanged.
    pub fn with_step_counts(self, p: i32, q: i32) -> Self {
        match self {
            TuningMode::FromP { p_ratio, .. } => TuningMode::FromP { p, q, p_ratio },
            TuningMode::FromQ { q_ratio, .. } => TuningMode::FromQ { p, q, q_ratio },
            TuningMode::FromS { unit, .. } => TuningMode::FromS { p, q, unit },
            just @ TuningMode::JustIntonation { .. } => just,
        }
    }
}

impl Default for TuningMode {
    /// 12-EDO with an exact octave.
    fn default() -> Self {
        TuningMode::FromP {
            p: 12,
            q: 19,
            p_ratio: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn all_builders() -> Vec<Val> {
        vec![
            Val::from_p_division(12, 19, 2.0, 440.0).unwrap(),
            Val::from_q_division(13, 19, 3.0, 261.6).unwrap(),
            Val::from_unit_step(12, 19, 1.059_463_094_359_295_3, 440.0).unwrap(),
            Val::just_intonation(2.0, 3.0, 440.0).unwrap(),
        ]
    }

    #[test]
    fn twelve_edo_from_octave() {
        let val = Val::from_p_division(12, 19, 2.0, 440.0).unwrap();
        let steps = val.equal_steps.unwrap();

        assert!((val.q_ratio - 2.9966).abs() < 1e-4, "Q = {}", val.q_ratio);
        assert!((steps.unit - 1.059_463).abs() < 1e-6, "S = {}", steps.unit);

        let fifth_up = val.frequency(Monzo::new(0, 1));
        assert!((fifth_up - 440.0 * 2.996_614).abs() < 1e-2, "got {fifth_up}");
    }

    #[test]
    fn equal_division_keeps_shared_unit() {
        for (p, q) in [(12, 19), (19, 30), (31, 49), (5, 8), (7, -3)] {
            let val = Val::from_p_division(p, q, 2.0, 100.0).unwrap();
            assert!(val.is_consistent(TOLERANCE), "{p}/{q}: {val:?}");

            // S^p = P and S^q = Q imply Q^p = P^q
            let lhs = val.q_ratio.powi(p);
            let rhs = val.p_ratio.powi(q);
            assert!((lhs - rhs).abs() <= 1e-9 * rhs.abs(), "{p}/{q}: {lhs} vs {rhs}");
        }

        let from_q = Val::from_q_division(13, 19, 3.0, 100.0).unwrap();
        assert!(from_q.is_consistent(TOLERANCE));
        assert_eq!(from_q.q_ratio, 3.0);

        let from_s = Val::from_unit_step(22, 35, 2f64.powf(1.0 / 22.0), 100.0).unwrap();
        assert!(from_s.is_consistent(TOLERANCE));
        assert!((from_s.p_ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn origin_sounds_at_base_frequency() {
        for val in all_builders() {
            assert_eq!(val.frequency(Monzo::ORIGIN), val.base_freq, "{val}");
        }
    }

    #[test]
    fn steps_are_linear() {
        let val = Val::from_p_division(12, 19, 2.0, 440.0).unwrap();
        let a = Monzo::new(-4, 3);
        let b = Monzo::new(11, -7);

        let sum = val.steps(a + b).unwrap();
        assert_eq!(sum, val.steps(a).unwrap() + val.steps(b).unwrap());
        assert_eq!(val.steps(Monzo::new(-1, 1)), Some(7));
        assert_eq!(val.steps(Monzo::ORIGIN), Some(0));
    }

    #[test]
    fn just_intonation_has_no_steps() {
        let val = Val::just_intonation(2.0, 3.0, 440.0).unwrap();

        assert_eq!(val.steps(Monzo::ORIGIN), None);
        assert_eq!(val.steps(Monzo::new(-1, 1)), None);
        assert!(val.is_consistent(TOLERANCE));
        assert!((val.frequency(Monzo::new(-1, 1)) - 660.0).abs() < 1e-9);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert_eq!(
            Val::from_p_division(0, 19, 2.0, 440.0),
            Err(LatticeError::ZeroStepDivisor { field: "p" })
        );
        assert_eq!(
            Val::from_q_division(12, 0, 3.0, 440.0),
            Err(LatticeError::ZeroStepDivisor { field: "q" })
        );
        // q = 0 only divides in the from-Q builder
        assert!(Val::from_p_division(12, 0, 2.0, 440.0).is_ok());
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        assert!(matches!(
            Val::just_intonation(f64::NAN, 3.0, 440.0),
            Err(LatticeError::InvalidTuningParameter { field: "P", .. })
        ));
        assert!(matches!(
            Val::from_unit_step(12, 19, f64::INFINITY, 440.0),
            Err(LatticeError::InvalidTuningParameter { field: "S", .. })
        ));
        assert!(matches!(
            Val::from_p_division(12, 19, 2.0, -1.0),
            Err(LatticeError::InvalidTuningParameter { field: "baseFreq", .. })
        ));
        assert!(matches!(
            Val::from_unit_step(12, 5000, 2.0, 440.0),
            Err(LatticeError::InvalidTuningParameter { field: "Q", .. })
        ));
    }

    #[test]
    fn companion_step_counts() {
        assert_eq!(companion_steps(12, 2.0, 3.0), Some(19));
        assert_eq!(companion_steps(31, 2.0, 3.0), Some(49));
        assert_eq!(companion_steps(19, 3.0, 2.0), Some(12));
        assert_eq!(companion_steps(12, 1.0, 3.0), None);
    }

    #[test]
    fn tuning_modes_dispatch_to_builders() {
        let mode = TuningMode::default();
        assert_eq!(mode.build(440.0), Val::from_p_division(12, 19, 2.0, 440.0));
        assert_eq!(mode.step_counts(), Some((12, 19)));

        let retuned = mode.with_step_counts(19, 30);
        assert_eq!(retuned.step_counts(), Some((19, 30)));

        let just = TuningMode::JustIntonation {
            p_ratio: 2.0,
            q_ratio: 3.0,
        };
        assert_eq!(just.with_step_counts(5, 8), just);
        assert_eq!(just.build(440.0).unwrap().equal_steps, None);
    }
}
