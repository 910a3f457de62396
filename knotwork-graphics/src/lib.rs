//! Hobby splines and the path algebra built on them.
//!
//! [`PathBuilder`] collects knots with optional directions, curls and
//! tensions and resolves them into a [`Path`] of concrete cubic Bezier
//! segments. Paths answer `MetaPost`-style queries (points and controls at
//! a time, subpaths, intersections, direction times, arc length, bounding
//! boxes) and carry a [`Style`] for whoever renders them.

pub mod types;

pub mod bbox;
pub mod bezier;
pub mod cycle;
pub mod error;
pub mod intersection;
pub mod math;
pub mod path;
pub mod point;
pub mod shapes;
pub mod style;
pub mod transform;

pub use bbox::BoundingBox;
pub use bezier::CubicSegment;
pub use cycle::build_cycle;
pub use error::GraphicsError;
pub use intersection::Intersection;
pub use path::Path;
pub use path::builder::PathBuilder;
pub use point::{Point, Vec2, VecExt, between, dir, distance, midpoint};
pub use shapes::{fullcircle, halfcircle, quartercircle, unitsquare};
pub use style::{Arrow, Color, DashPattern, LineCap, LineJoin, Pen, Style};
pub use transform::{Transform, Transformable};
pub use types::{EPSILON, Knot, KnotDirection, KnotSpec, Scalar, Tension};
