//! Benchmarks for low-level DSP primitives.

mod amplify;
mod limiter;
mod oscillator;
mod ramp;

pub use amplify::bench_amplify;
pub use limiter::bench_limiter;
pub use oscillator::bench_oscillator;
pub use ramp::bench_ramp;
