//! Background grid for the lattice view.
//!
//! Two families of segments, both in drawing coordinates:
//!
//! - **pitch lines** run along the direction of constant pitch, `[ln Q, -ln P>`,
//!   one per period (`[1 0>`) step. Every note on one line sounds at the same
//!   frequency, up to octave.
//! - **period lines** run along the period axis. With an equal-step tuning they
//!   repeat at each `[q, -p>` step, the direction that adds no steps; without
//!   one there is only the axis through the origin.

use crate::{
    geometry::matrix::{Matrix, Vector},
    tuning::Val,
};

/// Which family a guide segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    Pitch,
    Period,
}

/// One straight segment of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub kind: GuideKind,
    pub from: Vector,
    pub to: Vector,
}

impl Guide {
    fn centred(kind: GuideKind, centre: Vector, half: Vector) -> Self {
        Self {
            kind,
            from: centre - half,
            to: centre + half,
        }
    }
}

/// Grid segments for `val` under `matrix`.
///
/// `count` repetitions are laid out on each side of the origin; each segment
/// extends `extent` times its direction vector either way.
pub fn guide_lines(val: &Val, matrix: &Matrix, count: u32, extent: f64) -> Vec<Guide> {
    let period = matrix.apply(Vector::new(1.0, 0.0));
    let pitch = matrix.apply(Vector::new(val.q_ratio.ln(), -val.p_ratio.ln()));
    let count = count as i32;

    let mut guides = Vec::new();

    match val.equal_steps {
        Some(steps) => {
            let flat = matrix.apply(Vector::new(steps.q as f64, -steps.p as f64));
            guides.extend((-count..=count).map(|i| {
                Guide::centred(GuideKind::Period, flat.scaled(i as f64), period.scaled(extent))
            }));
        }
        None => guides.push(Guide::centred(
            GuideKind::Period,
            Vector::default(),
            period.scaled(extent),
        )),
    }

    guides.extend((-count..=count).map(|i| {
        Guide::centred(GuideKind::Pitch, period.scaled(i as f64), pitch.scaled(extent))
    }));

    guides
}
