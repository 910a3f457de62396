//! Points with unknown coordinates, linear constraints between them, and
//! Hobby paths drawn through the solved points.
//!
//! The path engine lives in [`knotwork_graphics`]; its public API is
//! re-exported here so one dependency covers both layers.

pub mod constraint;
pub mod context;
pub mod equation;
pub mod error;
pub mod path;

pub use constraint::{Axis, Constraint};
pub use context::{Context, SolverConfig, Var};
pub use error::SolveError;
pub use path::VarPathBuilder;

pub use knotwork_graphics as graphics;
pub use knotwork_graphics::{
    Arrow, BoundingBox, Color, CubicSegment, DashPattern, EPSILON, GraphicsError, Intersection,
    Knot, KnotDirection, KnotSpec, LineCap, LineJoin, Path, PathBuilder, Pen, Point, Scalar, Style,
    Tension, Transform, Transformable, Vec2, VecExt, between, build_cycle, dir, distance,
    fullcircle, halfcircle, midpoint, quartercircle, unitsquare,
};
