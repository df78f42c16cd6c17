//! Low-level DSP primitives used by the tone engine.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs.

/// Gain, summing and level metering helpers.
pub mod amplify;
/// Soft-knee compressor followed by a hard ceiling.
pub mod limiter;
/// Phase-accumulator sine source.
pub mod oscillator;
/// Sample-accurate linear, exponential and first-order parameter ramps.
pub mod ramp;

pub use limiter::{Limiter, LimiterParams};
pub use oscillator::SineOscillator;
pub use ramp::SmoothedParam;
