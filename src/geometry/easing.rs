use std::cell::Cell;

use crate::geometry::matrix::Matrix;

/*
Animated Transforms
===================

When the lattice transform changes, the view glides to the new layout
instead of jumping. Each matrix entry is eased independently from where it
currently is to its new target over a fixed duration.

Vocabulary
----------

  clock       Logical time, advanced by the caller once per frame. All reads
              within one frame see the same `now`, so every note in a frame
              is projected through the same matrix.

  start       Value the channel was showing when its target last changed.

  target      Value the channel settles on.

  timestamp   Clock time at which the current transition began.


The Curve: Smoothstep
---------------------

    value
    target ┐            ___----
           │        _--‾
           │      _/
           │    _/
    start  └--‾‾────────────────→ t
           0                    1

    ease(t) = t²(3 - 2t),  t = clamp((now - timestamp) / duration, 0, 1)

Zero slope at both ends: the transition starts and stops without a jolt.


Retargeting
-----------

A new target during a transition re-anchors `start` at the value currently
shown and restarts the clock, so the curve never jumps. A hard set
back-dates `timestamp` by a full duration, so the very next read already
returns the target.
*/

/// Default transition length in seconds.
pub const TRANSITION_SECS: f64 = 0.5;

/// Frame clock shared by every interpolator read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clock {
    now: f64,
    tick: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock already at `now` seconds.
    pub fn starting_at(now: f64) -> Self {
        Self { now, tick: 0 }
    }

    /// Current time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of advances so far; identifies a frame.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Move to `now` and start a new frame. Time never runs backwards.
    pub fn advance_to(&mut self, now: f64) {
        self.now = self.now.max(now);
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn advance_by(&mut self, seconds: f64) {
        self.advance_to(self.now + seconds.max(0.0));
    }
}

/// Smoothstep, clamped to `[0, 1]`.
pub fn ease(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    t * t * (3.0 - 2.0 * t)
}

/// One eased scalar channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValue {
    start: f64,
    target: f64,
    timestamp: f64,
    duration: f64,
}

impl AnimatedValue {
    pub fn new(value: f64, clock: &Clock) -> Self {
        Self::with_duration(value, TRANSITION_SECS, clock)
    }

    pub fn with_duration(value: f64, duration: f64, clock: &Clock) -> Self {
        Self {
            start: value,
            target: value,
            timestamp: clock.now(),
            duration: duration.max(f64::MIN_POSITIVE),
        }
    }

    pub fn current(&self, clock: &Clock) -> f64 {
        let t = (clock.now() - self.timestamp) / self.duration;
        if t >= 1.0 {
            return self.target;
        }
        self.start + (self.target - self.start) * ease(t)
    }

    /// Start a transition from the value currently shown.
    pub fn set_target(&mut self, target: f64, clock: &Clock) {
        self.start = self.current(clock);
        self.target = target;
        self.timestamp = clock.now();
    }

    /// Jump straight to `target`.
    pub fn hard_set(&mut self, target: f64, clock: &Clock) {
        self.target = target;
        self.timestamp = clock.now() - self.duration;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self, clock: &Clock) -> bool {
        clock.now() - self.timestamp >= self.duration
    }
}

/// Four eased channels, one per matrix entry, memoized per frame.
#[derive(Debug, Clone)]
pub struct AnimatedMatrix {
    a: AnimatedValue,
    b: AnimatedValue,
    c: AnimatedValue,
    d: AnimatedValue,
    cached: Cell<Option<(u64, Matrix)>>,
}

impl AnimatedMatrix {
    pub fn new(matrix: Matrix, clock: &Clock) -> Self {
        Self::with_duration(matrix, TRANSITION_SECS, clock)
    }

    pub fn with_duration(matrix: Matrix, duration: f64, clock: &Clock) -> Self {
        Self {
            a: AnimatedValue::with_duration(matrix.a, duration, clock),
            b: AnimatedValue::with_duration(matrix.b, duration, clock),
            c: AnimatedValue::with_duration(matrix.c, duration, clock),
            d: AnimatedValue::with_duration(matrix.d, duration, clock),
            cached: Cell::new(Some((clock.tick(), matrix))),
        }
    }

    /// Interpolated matrix for this frame. Repeated reads within one clock
    /// tick return the same value without re-evaluating the channels.
    pub fn current(&self, clock: &Clock) -> Matrix {
        if let Some((tick, matrix)) = self.cached.get() {
            if tick == clock.tick() {
                return matrix;
            }
        }
        let matrix = Matrix::new(
            self.a.current(clock),
            self.b.current(clock),
            self.c.current(clock),
            self.d.current(clock),
        );
        self.cached.set(Some((clock.tick(), matrix)));
        matrix
    }

    pub fn set_target(&mut self, matrix: Matrix, clock: &Clock) {
        self.a.set_target(matrix.a, clock);
        self.b.set_target(matrix.b, clock);
        self.c.set_target(matrix.c, clock);
        self.d.set_target(matrix.d, clock);
        self.cached.set(None);
    }

    pub fn hard_set(&mut self, matrix: Matrix, clock: &Clock) {
        self.a.hard_set(matrix.a, clock);
        self.b.hard_set(matrix.b, clock);
        self.c.hard_set(matrix.c, clock);
        self.d.hard_set(matrix.d, clock);
        self.cached.set(None);
    }

    /// The matrix the animation is heading to.
    pub fn target(&self) -> Matrix {
        Matrix::new(
            self.a.target(),
            self.b.target(),
            self.c.target(),
            self.d.target(),
        )
    }

    pub fn is_settled(&self, clock: &Clock) -> bool {
        [&self.a, &self.b, &self.c, &self.d]
            .iter()
            .all(|channel| channel.is_settled(clock))
    }
}
