//! Fluent path construction.
//!
//! [`PathBuilder`] collects knots together with their direction, curl and
//! tension hints, then hands them to the Hobby resolver. Each method consumes
//! and returns the builder, so a path reads left to right the way it would
//! in `MetaPost`:
//!
//! ```
//! use knotwork_graphics::{PathBuilder, Point};
//!
//! // (0,0){dir 45}..(10,5)..tension 1.5..(20,0)--(20,-5)
//! let path = PathBuilder::new()
//!     .move_to(Point::new(0.0, 0.0))
//!     .dir(45.0)
//!     .curve_to(Point::new(10.0, 5.0))
//!     .tension(1.5)
//!     .curve_to(Point::new(20.0, 0.0))
//!     .line_to(Point::new(20.0, -5.0))
//!     .build()
//!     .unwrap();
//! assert_eq!(path.path_length(), 3);
//! ```
//!
//! Mistakes such as a `line_to` before any `move_to` do not panic. The first
//! one is remembered and returned from [`PathBuilder::build`].

use tracing::debug;

use super::Path;
use super::hobby;
use crate::error::GraphicsError;
use crate::point::Point;
use crate::style::{Color, DashPattern, LineCap, LineJoin, Pen, Style};
use crate::types::{KnotDirection, KnotSpec, MIN_TENSION, Scalar, Tension};

/// Left-side settings waiting for the next knot.
///
/// `in_dir`, `in_curl`, `in_tension` and the second half of
/// `curve_to_with_controls` describe the side of a knot that has not been
/// added yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PendingJoin {
    left: Option<KnotDirection>,
    tension: Option<Tension>,
}

impl PendingJoin {
    const fn is_empty(&self) -> bool {
        self.left.is_none() && self.tension.is_none()
    }

    fn apply(self, knot: &mut KnotSpec) {
        if let Some(left) = self.left {
            knot.left = left;
        }
        if let Some(tension) = self.tension {
            knot.left_tension = tension;
        }
    }
}

/// Single-use builder producing one [`Path`].
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    knots: Vec<KnotSpec>,
    pending: PendingJoin,
    cyclic: bool,
    style: Style,
    error: Option<GraphicsError>,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(mut self, err: GraphicsError) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }

    /// Index the next knot will get, for error reports.
    fn next_index(&self) -> usize {
        self.knots.len()
    }

    /// Fails if the path is already closed or `p` is not finite.
    fn check_new_knot(self, p: Point) -> Result<Self, Self> {
        if self.cyclic {
            let index = self.next_index();
            return Err(self.fail(GraphicsError::PathBuild {
                index,
                reason: "knot added after the path was closed",
            }));
        }
        if !p.is_finite() {
            return Err(self.fail(GraphicsError::NonFinite {
                what: "knot coordinate",
            }));
        }
        Ok(self)
    }

    fn check_has_knot(self, reason: &'static str) -> Result<Self, Self> {
        if self.cyclic || self.knots.is_empty() {
            let index = self.next_index();
            return Err(self.fail(GraphicsError::PathBuild { index, reason }));
        }
        Ok(self)
    }

    fn push(mut self, mut knot: KnotSpec) -> Self {
        std::mem::take(&mut self.pending).apply(&mut knot);
        self.knots.push(knot);
        self
    }

    fn modify_last(self, reason: &'static str, f: impl FnOnce(&mut KnotSpec)) -> Self {
        match self.check_has_knot(reason) {
            Ok(mut b) => {
                if let Some(last) = b.knots.last_mut() {
                    f(last);
                }
                b
            }
            Err(b) => b,
        }
    }

    /// Negative tensions are rejected rather than folded into positive ones.
    fn checked_tension(self, value: Scalar, at_least: bool) -> Result<(Self, Tension), Self> {
        if !value.is_finite() || value < MIN_TENSION {
            let index = self.knots.len().saturating_sub(1);
            return Err(self.fail(GraphicsError::InvalidTension { index, value }));
        }
        let tension = if at_least {
            Tension::at_least(value)
        } else {
            Tension::new(value)
        };
        Ok((self, tension))
    }

    fn checked_curl(self, amount: Scalar) -> Result<Self, Self> {
        if amount.is_nan() || amount.is_infinite() {
            return Err(self.fail(GraphicsError::NonFinite { what: "curl" }));
        }
        if amount < 0.0 {
            let index = self.knots.len().saturating_sub(1);
            return Err(self.fail(GraphicsError::InvalidCurl {
                index,
                value: amount,
            }));
        }
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Knots
    // -----------------------------------------------------------------------

    /// Start the path at `p`. Must be the first knot.
    #[must_use]
    pub fn move_to(self, p: Point) -> Self {
        let b = match self.check_new_knot(p) {
            Ok(b) => b,
            Err(b) => return b,
        };
        if !b.knots.is_empty() {
            let index = b.next_index();
            return b.fail(GraphicsError::PathBuild {
                index,
                reason: "move_to must start the path",
            });
        }
        b.push(KnotSpec::new(p))
    }

    /// A straight segment to `p` (`--`): curl 1 at both of its ends.
    #[must_use]
    pub fn line_to(self, p: Point) -> Self {
        let mut b = match self
            .check_new_knot(p)
            .and_then(|b| b.check_has_knot("line_to before move_to"))
        {
            Ok(b) => b,
            Err(b) => return b,
        };
        if let Some(last) = b.knots.last_mut() {
            if last.right.is_open() {
                last.right = KnotDirection::Curl(1.0);
            }
        }
        let mut knot = KnotSpec::new(p);
        knot.left = KnotDirection::Curl(1.0);
        b.push(knot)
    }

    /// A smooth segment to `p` (`..`).
    #[must_use]
    pub fn curve_to(self, p: Point) -> Self {
        match self
            .check_new_knot(p)
            .and_then(|b| b.check_has_knot("curve_to before move_to"))
        {
            Ok(b) => b.push(KnotSpec::new(p)),
            Err(b) => b,
        }
    }

    /// A segment to `p` with explicit Bezier controls `c1` and `c2`
    /// (`..controls c1 and c2..`).
    #[must_use]
    pub fn curve_to_with_controls(self, p: Point, c1: Point, c2: Point) -> Self {
        if !(c1.is_finite() && c2.is_finite()) {
            return self.fail(GraphicsError::NonFinite {
                what: "control point",
            });
        }
        let mut b = match self
            .check_new_knot(p)
            .and_then(|b| b.check_has_knot("curve_to_with_controls before move_to"))
        {
            Ok(b) => b,
            Err(b) => return b,
        };
        if let Some(last) = b.knots.last_mut() {
            last.right = KnotDirection::Explicit(c1);
        }
        b.pending.left = Some(KnotDirection::Explicit(c2));
        b.push(KnotSpec::new(p))
    }

    // -----------------------------------------------------------------------
    // Directions and curls
    // -----------------------------------------------------------------------

    /// Leave the last knot heading `degrees` (`{dir degrees}` after it).
    #[must_use]
    pub fn dir(self, degrees: Scalar) -> Self {
        if !degrees.is_finite() {
            return self.fail(GraphicsError::NonFinite { what: "direction" });
        }
        self.modify_last("dir before move_to", |k| {
            k.right = KnotDirection::Given(degrees.to_radians());
        })
    }

    /// Arrive at the next knot heading `degrees` (`{dir degrees}` before it).
    #[must_use]
    pub fn in_dir(mut self, degrees: Scalar) -> Self {
        if !degrees.is_finite() {
            return self.fail(GraphicsError::NonFinite { what: "direction" });
        }
        self.pending.left = Some(KnotDirection::Given(degrees.to_radians()));
        self
    }

    /// Curl on the outgoing side of the last knot.
    #[must_use]
    pub fn curl(self, amount: Scalar) -> Self {
        self.out_curl(amount)
    }

    #[must_use]
    pub fn out_curl(self, amount: Scalar) -> Self {
        match self.checked_curl(amount) {
            Ok(b) => b.modify_last("curl before move_to", |k| {
                k.right = KnotDirection::Curl(amount);
            }),
            Err(b) => b,
        }
    }

    /// Curl on the incoming side of the next knot.
    #[must_use]
    pub fn in_curl(self, amount: Scalar) -> Self {
        match self.checked_curl(amount) {
            Ok(mut b) => {
                b.pending.left = Some(KnotDirection::Curl(amount));
                b
            }
            Err(b) => b,
        }
    }

    // -----------------------------------------------------------------------
    // Tension
    // -----------------------------------------------------------------------

    /// Tension on both ends of the next segment (`..tension t..`).
    #[must_use]
    pub fn tension(self, value: Scalar) -> Self {
        self.out_tension(value).in_tension(value)
    }

    /// Tension leaving the last knot.
    #[must_use]
    pub fn out_tension(self, value: Scalar) -> Self {
        match self.checked_tension(value, false) {
            Ok((b, t)) => b.modify_last("tension before move_to", |k| k.right_tension = t),
            Err(b) => b,
        }
    }

    /// Tension arriving at the next knot.
    #[must_use]
    pub fn in_tension(self, value: Scalar) -> Self {
        match self.checked_tension(value, false) {
            Ok((mut b, t)) => {
                b.pending.tension = Some(t);
                b
            }
            Err(b) => b,
        }
    }

    /// `..tension atleast t..`: like [`tension`](Self::tension), but controls
    /// are pulled in so the segment stays inside its tangent triangle.
    #[must_use]
    pub fn tension_at_least(self, value: Scalar) -> Self {
        match self.checked_tension(value, true) {
            Ok((b, t)) => {
                let mut b = b.modify_last("tension before move_to", |k| k.right_tension = t);
                b.pending.tension = Some(t);
                b
            }
            Err(b) => b,
        }
    }

    /// `..tension infinity..`: the next segment is as straight as its end
    /// directions allow.
    #[must_use]
    pub fn tension_infinity(self) -> Self {
        let mut b = self.modify_last("tension before move_to", |k| {
            k.right_tension = Tension::INFINITY;
        });
        b.pending.tension = Some(Tension::INFINITY);
        b
    }

    // -----------------------------------------------------------------------
    // Closing
    // -----------------------------------------------------------------------

    /// Close the path smoothly back to its first knot (`..cycle`).
    ///
    /// Pending incoming settings apply to the first knot.
    #[must_use]
    pub fn close(self) -> Self {
        let mut b = match self.check_has_knot("close before move_to") {
            Ok(b) => b,
            Err(b) => return b,
        };
        let pending = std::mem::take(&mut b.pending);
        if let Some(first) = b.knots.first_mut() {
            pending.apply(first);
        }
        b.cyclic = true;
        b
    }

    /// Same as [`close`](Self::close).
    #[must_use]
    pub fn cycle(self) -> Self {
        self.close()
    }

    /// Close the path with a straight segment (`--cycle`).
    #[must_use]
    pub fn close_straight(self) -> Self {
        let mut b = match self.check_has_knot("close before move_to") {
            Ok(b) => b,
            Err(b) => return b,
        };
        if let Some(last) = b.knots.last_mut() {
            if last.right.is_open() {
                last.right = KnotDirection::Curl(1.0);
            }
        }
        if b.pending.left.is_none() {
            b.pending.left = Some(KnotDirection::Curl(1.0));
        }
        b.close()
    }

    // -----------------------------------------------------------------------
    // Style
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn stroke(mut self, color: Color) -> Self {
        self.style.set_stroke(color);
        self
    }

    #[must_use]
    pub fn stroke_width(mut self, width: Scalar) -> Self {
        self.style.set_stroke_width(width);
        self
    }

    #[must_use]
    pub fn fill(mut self, color: Color) -> Self {
        self.style.set_fill(color);
        self
    }

    #[must_use]
    pub fn pen(mut self, pen: Pen) -> Self {
        self.style.set_pen(pen);
        self
    }

    #[must_use]
    pub fn dash(mut self, dash: DashPattern) -> Self {
        self.style.set_dash(dash);
        self
    }

    #[must_use]
    pub fn evenly(self) -> Self {
        self.dash(DashPattern::evenly())
    }

    #[must_use]
    pub fn with_dots(self) -> Self {
        self.dash(DashPattern::with_dots())
    }

    #[must_use]
    pub fn arrow(mut self) -> Self {
        self.style.set_arrow();
        self
    }

    #[must_use]
    pub fn double_arrow(mut self) -> Self {
        self.style.set_double_arrow();
        self
    }

    #[must_use]
    pub fn arrow_style(mut self, length: Scalar, angle: Scalar) -> Self {
        self.style.set_arrow_style(length, angle);
        self
    }

    #[must_use]
    pub fn line_join(mut self, join: LineJoin) -> Self {
        self.style.set_line_join(join);
        self
    }

    #[must_use]
    pub fn line_cap(mut self, cap: LineCap) -> Self {
        self.style.set_line_cap(cap);
        self
    }

    // -----------------------------------------------------------------------
    // Finishing
    // -----------------------------------------------------------------------

    /// Resolve all control points and produce the path.
    pub fn build(self) -> Result<Path, GraphicsError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.knots.is_empty() {
            return Err(GraphicsError::EmptyPath);
        }
        if !self.cyclic {
            if !self.pending.is_empty() {
                return Err(GraphicsError::PathBuild {
                    index: self.knots.len(),
                    reason: "incoming setting with no knot to apply it to",
                });
            }
            if !self.knots[0].left.is_open() {
                return Err(GraphicsError::PathBuild {
                    index: 0,
                    reason: "incoming direction on the first knot of an open path",
                });
            }
        }

        debug!(knots = self.knots.len(), cyclic = self.cyclic, "building path");
        let knots = hobby::resolve(self.knots, self.cyclic);
        Ok(Path::from_knots(knots, self.cyclic)?.with_style(self.style))
    }

    /// Same as [`build`](Self::build).
    pub fn solve(self) -> Result<Path, GraphicsError> {
        self.build()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
