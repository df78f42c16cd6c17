//! Plane geometry for the lattice view: 2×2 maps, the change-of-basis editor,
//! eased transitions and the background grid.

/// Change-of-basis handles and projection of lattice points.
pub mod basis;
/// Frame clock and smoothstep interpolators.
pub mod easing;
pub mod guides;
/// 2×2 matrices and plane vectors.
pub mod matrix;

pub use basis::{effective_transform, nearest_note, project, BasisEditor, Transition};
pub use easing::{ease, AnimatedMatrix, AnimatedValue, Clock, TRANSITION_SECS};
pub use guides::{guide_lines, Guide, GuideKind};
pub use matrix::{Matrix, Vector, DETERMINANT_EPSILON};
