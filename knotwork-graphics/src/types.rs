//! Scalar constants and knot records shared across the crate.
//!
//! A path is assembled from [`KnotSpec`] records, whose control points may
//! still be hints (a direction, a curl, or nothing at all). The knot resolver
//! turns them into [`Knot`]s, where every control point is a concrete
//! coordinate.

use crate::point::Point;

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// All coordinates and parameters are double precision.
pub type Scalar = f64;

/// Tolerance for geometric comparisons (one `MetaPost` scaled unit).
pub const EPSILON: Scalar = 1.0 / 65536.0;

/// Threshold below which a length or determinant is treated as zero.
pub const NEAR_ZERO: Scalar = 1e-12;

/// The largest tension `MetaPost` accepts; used for `tension infinity`.
pub const INFINITY_VAL: Scalar = 4_095.999_98;

/// Smallest tension the resolver accepts.
pub const MIN_TENSION: Scalar = 0.75;

/// Convert a small index into a scalar path time.
#[expect(
    clippy::cast_precision_loss,
    reason = "knot counts are far below 2^52"
)]
#[inline]
pub const fn index_to_scalar(i: usize) -> Scalar {
    i as Scalar
}

/// Integer part of a non-negative path time, as a segment index.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "callers clamp t into [0, segment count] first"
)]
#[inline]
pub fn scalar_to_index(t: Scalar) -> usize {
    t.max(0.0).floor() as usize
}

// ---------------------------------------------------------------------------
// Tension
// ---------------------------------------------------------------------------

/// Tension on one side of a segment.
///
/// `at_least` marks `tension atleast t`: the control point may be pulled
/// closer so the curve stays inside the triangle formed by the chord and the
/// two tangents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tension {
    pub value: Scalar,
    pub at_least: bool,
}

impl Tension {
    pub const DEFAULT: Self = Self::new(1.0);
    pub const INFINITY: Self = Self::new(INFINITY_VAL);

    #[inline]
    pub const fn new(value: Scalar) -> Self {
        Self {
            value,
            at_least: false,
        }
    }

    #[inline]
    pub const fn at_least(value: Scalar) -> Self {
        Self {
            value,
            at_least: true,
        }
    }

    /// Tension as used by the velocity function.
    #[inline]
    pub fn effective(self) -> Scalar {
        self.value.max(MIN_TENSION)
    }

    #[inline]
    pub fn is_unit(self) -> bool {
        (self.effective() - 1.0).abs() < EPSILON
    }
}

impl Default for Tension {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// KnotDirection
// ---------------------------------------------------------------------------

/// Control information for one side of a knot before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnotDirection {
    /// A concrete Bezier control point.
    Explicit(Point),
    /// Tangent direction, in radians.
    Given(Scalar),
    /// Curl at a boundary of a smooth run.
    Curl(Scalar),
    /// Chosen by the resolver.
    #[default]
    Open,
}

impl KnotDirection {
    #[inline]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    #[inline]
    pub const fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }
}

// ---------------------------------------------------------------------------
// Knots
// ---------------------------------------------------------------------------

/// A waypoint awaiting resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotSpec {
    pub point: Point,
    pub left: KnotDirection,
    pub right: KnotDirection,
    pub left_tension: Tension,
    pub right_tension: Tension,
}

impl KnotSpec {
    /// A knot with both sides open and unit tension.
    #[inline]
    pub const fn new(point: Point) -> Self {
        Self {
            point,
            left: KnotDirection::Open,
            right: KnotDirection::Open,
            left_tension: Tension::DEFAULT,
            right_tension: Tension::DEFAULT,
        }
    }
}

/// A resolved waypoint: on-curve point plus incoming and outgoing controls.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Knot {
    pub point: Point,
    /// Control point of the segment arriving at this knot.
    pub left: Point,
    /// Control point of the segment leaving this knot.
    pub right: Point,
}

impl Knot {
    /// A knot whose controls coincide with the point itself.
    #[inline]
    pub const fn new(point: Point) -> Self {
        Self {
            point,
            left: point,
            right: point,
        }
    }

    #[inline]
    pub const fn with_controls(point: Point, left: Point, right: Point) -> Self {
        Self { point, left, right }
    }

    /// The same knot traversed backwards.
    #[inline]
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            point: self.point,
            left: self.right,
            right: self.left,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
