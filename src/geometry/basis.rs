use tracing::{debug, warn};

use crate::{
    error::{LatticeError, Result},
    geometry::{
        easing::{AnimatedMatrix, Clock},
        matrix::{Matrix, Vector},
    },
    lattice::Note,
    tuning::Monzo,
};

/*
Change of Basis
===============

The lattice layout is edited through two "handles" instead of the transform
itself:

    M1  pre-image basis   two lattice directions, as columns
    M2  image basis       where those two directions should appear

The transform that sends M1's columns onto M2's is M2 · M1⁻¹. Screen rows
grow downwards, so the effective transform also mirrors the vertical axis:

    T = flipY · M2 · M1⁻¹          flipY = | 1  0 |
                                           | 0 -1 |

Editing M2 moves the layout (T changes and is animated towards). Editing M1
only re-describes the current layout in a different basis: M2 is recomputed
so that T is unchanged,

    M2 = flipY · T · M1            (flipY is its own inverse)

A singular M1 cannot be inverted, so such an edit is rejected and nothing
changes.
*/

/// How a new transform is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Ease from the transform currently shown.
    #[default]
    Animate,
    /// Jump to the new transform on the next read.
    Immediate,
}

/// Owner of the two basis handles and the animated transform derived from them.
#[derive(Debug, Clone)]
pub struct BasisEditor {
    preimage: Matrix,
    image: Matrix,
    transform: Matrix,
    animated: AnimatedMatrix,
}

impl BasisEditor {
    pub fn new(preimage: Matrix, image: Matrix, clock: &Clock) -> Result<Self> {
        let transform = effective_transform(&preimage, &image)?;
        Ok(Self {
            preimage,
            image,
            transform,
            animated: AnimatedMatrix::new(transform, clock),
        })
    }

    /// Pre-image handle (M1).
    pub fn preimage(&self) -> Matrix {
        self.preimage
    }

    /// Image handle (M2).
    pub fn image(&self) -> Matrix {
        self.image
    }

    /// Effective transform the view is heading to.
    pub fn transform(&self) -> Matrix {
        self.transform
    }

    /// Replace M1, keeping the effective transform. M2 follows.
    pub fn edit_preimage(&mut self, preimage: Matrix) -> Result<()> {
        if !preimage.is_invertible() {
            let determinant = preimage.determinant();
            warn!(?preimage, determinant, "rejected non-invertible pre-image basis");
            return Err(LatticeError::DegenerateBasis { determinant });
        }

        self.preimage = preimage;
        self.image = Matrix::FLIP_Y * self.transform * preimage;
        debug!(image = ?self.image, "pre-image basis changed");
        Ok(())
    }

    /// Replace M2 and move the view to the resulting transform.
    pub fn edit_image(&mut self, image: Matrix, transition: Transition, clock: &Clock) -> Result<()> {
        let transform = effective_transform(&self.preimage, &image)?;
        self.image = image;
        self.install(transform, transition, clock);
        Ok(())
    }

    /// Replace both handles at once, e.g. when applying a saved layout.
    pub fn set_handles(
        &mut self,
        preimage: Matrix,
        image: Matrix,
        transition: Transition,
        clock: &Clock,
    ) -> Result<()> {
        let transform = effective_transform(&preimage, &image).inspect_err(|_| {
            warn!(?preimage, "rejected non-invertible pre-image basis");
        })?;
        self.preimage = preimage;
        self.image = image;
        self.install(transform, transition, clock);
        Ok(())
    }

    /// Transform shown at this frame.
    pub fn current(&self, clock: &Clock) -> Matrix {
        self.animated.current(clock)
    }

    /// Transform shown at this frame, scaled by `zoom` into drawing units.
    pub fn view_transform(&self, clock: &Clock, zoom: f64) -> Matrix {
        self.current(clock).scale(zoom)
    }

    pub fn is_animating(&self, clock: &Clock) -> bool {
        !self.animated.is_settled(clock)
    }

    fn install(&mut self, transform: Matrix, transition: Transition, clock: &Clock) {
        self.transform = transform;
        match transition {
            Transition::Animate => self.animated.set_target(transform, clock),
            Transition::Immediate => self.animated.hard_set(transform, clock),
        }
        debug!(?transform, ?transition, "lattice transform changed");
    }
}

/// `flipY · image · preimage⁻¹`, or `DegenerateBasis` for a singular pre-image
/// or an image that does not map to finite positions.
pub fn effective_transform(preimage: &Matrix, image: &Matrix) -> Result<Matrix> {
    let inverse = preimage.inverse().ok_or(LatticeError::DegenerateBasis {
        determinant: preimage.determinant(),
    })?;
    let transform = Matrix::FLIP_Y * (*image * inverse);
    if !image.is_finite() || !transform.is_finite() {
        return Err(LatticeError::DegenerateBasis {
            determinant: image.determinant(),
        });
    }
    Ok(transform)
}

/// Drawing position of a lattice point.
pub fn project(monzo: Monzo, matrix: &Matrix) -> Vector {
    matrix.apply(Vector::from(monzo))
}

/// The note drawn closest to `point` under `matrix`, if any.
pub fn nearest_note<'a>(notes: &'a [Note], matrix: &Matrix, point: Vector) -> Option<&'a Note> {
    notes
        .iter()
        .map(|note| (note, (project(note.monzo(), matrix) - point).length()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(note, _)| note)
}
