//! Errors reported by the constraint context.

use knotwork_graphics::{GraphicsError, Scalar};
use thiserror::Error;

use crate::constraint::Axis;

/// Everything that can go wrong while registering, solving or reading
/// point constraints.
///
/// Indices name points in creation order and constraints in registration
/// order, both counted from zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// A [`Var`](crate::Var) was handed to a context that did not create it.
    #[error("point variable belongs to a different context")]
    ForeignVar,

    #[error("non-finite {what}")]
    NonFinite { what: &'static str },

    /// The equations leave a coordinate free.
    #[error("underdetermined system: {axis} coordinate of point {var} is not determined")]
    Underdetermined { var: usize, axis: Axis },

    /// A constraint contradicts the ones registered before it.
    #[error("inconsistent system: constraint {constraint} is off by {residual}")]
    Inconsistent { constraint: usize, residual: Scalar },

    /// Parallel lines in an intersection, or a line through two
    /// coincident points.
    #[error("degenerate geometry in constraint {constraint}")]
    DegenerateGeometry { constraint: usize },

    /// The point has an unknown coordinate and the context is not solved.
    #[error("point {var} is not solved")]
    Unsolved { var: usize },

    #[error(transparent)]
    Path(#[from] GraphicsError),
}
