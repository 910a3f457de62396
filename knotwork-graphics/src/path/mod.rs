//! Resolved paths and the queries defined on them.
//!
//! A [`Path`] is a sequence of [`Knot`]s whose control points are all
//! concrete, optionally closed into a cycle, plus a [`Style`] bag. Paths
//! are produced by [`PathBuilder`](builder::PathBuilder) (which runs the
//! Hobby resolver), by the predefined shapes, or directly from knots.
//!
//! Time on a path follows `MetaPost`: the integer part of `t` selects a
//! segment and the fractional part is the Bezier parameter inside it, so a
//! path with `n` segments spans times `[0, n]`.

pub mod arc;
pub mod builder;
pub mod direction;
pub mod hobby;

use kurbo::{BezPath, PathEl};

use crate::bbox::{self, BoundingBox};
use crate::bezier::CubicSegment;
use crate::error::GraphicsError;
use crate::point::{Point, Vec2};
use crate::style::{Color, DashPattern, LineCap, LineJoin, Pen, Style};
use crate::types::{Knot, NEAR_ZERO, Scalar, index_to_scalar, scalar_to_index};

/// Slack allowed when checking a time against the ends of an open path.
const TIME_SLACK: Scalar = 1e-9;

/// A fully resolved path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    knots: Vec<Knot>,
    cyclic: bool,
    style: Style,
}

/// Where a path time lands.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Location {
    Knot(usize),
    Inside { segment: usize, t: Scalar },
}

impl Path {
    /// Build a path from already resolved knots.
    pub fn from_knots(knots: Vec<Knot>, cyclic: bool) -> Result<Self, GraphicsError> {
        if knots.is_empty() {
            return Err(GraphicsError::EmptyPath);
        }
        let finite = knots
            .iter()
            .all(|k| k.point.is_finite() && k.left.is_finite() && k.right.is_finite());
        if !finite {
            return Err(GraphicsError::NonFinite {
                what: "knot coordinate",
            });
        }
        Ok(Self::from_parts(knots, cyclic, Style::default()))
    }

    /// Internal constructor; callers guarantee at least one knot.
    pub(crate) const fn from_parts(knots: Vec<Knot>, cyclic: bool, style: Style) -> Self {
        Self {
            knots,
            cyclic,
            style,
        }
    }

    /// A one-knot open path sitting at `p`.
    pub(crate) fn single_point(p: Point, style: Style) -> Self {
        Self::from_parts(vec![Knot::new(p)], false, style)
    }

    /// Same style, different geometry.
    pub(crate) fn with_geometry(&self, knots: Vec<Knot>, cyclic: bool) -> Self {
        Self::from_parts(knots, cyclic, self.style.clone())
    }

    #[must_use]
    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    #[must_use]
    pub const fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    pub const fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Replace the whole style bag.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Number of segments (`MetaPost`'s `length`).
    #[must_use]
    pub fn path_length(&self) -> usize {
        if self.cyclic {
            self.knots.len()
        } else {
            self.knots.len().saturating_sub(1)
        }
    }

    /// Segment `i`, from knot `i` to the next knot (wrapping on cycles).
    #[must_use]
    pub fn segment(&self, i: usize) -> Option<CubicSegment> {
        (i < self.path_length()).then(|| self.segment_at(i))
    }

    /// All segments in order.
    pub fn segments(&self) -> impl Iterator<Item = CubicSegment> + '_ {
        (0..self.path_length()).filter_map(|i| self.segment(i))
    }

    fn locate(&self, t: Scalar) -> Result<Location, GraphicsError> {
        if !t.is_finite() {
            return Err(GraphicsError::NonFinite { what: "path time" });
        }
        let n = self.path_length();
        let n_f = index_to_scalar(n);
        let t = if self.cyclic {
            t.rem_euclid(n_f)
        } else if t < -TIME_SLACK || t > n_f + TIME_SLACK {
            return Err(GraphicsError::TimeOutOfRange { t, length: n });
        } else {
            t.clamp(0.0, n_f)
        };
        if n == 0 {
            return Ok(Location::Knot(0));
        }

        let segment = scalar_to_index(t).min(n - 1);
        let frac = t - index_to_scalar(segment);
        Ok(if frac <= 0.0 {
            Location::Knot(segment)
        } else if frac >= 1.0 {
            Location::Knot((segment + 1) % self.knots.len())
        } else {
            Location::Inside { segment, t: frac }
        })
    }

    fn segment_at(&self, segment: usize) -> CubicSegment {
        let k0 = &self.knots[segment];
        let k1 = &self.knots[(segment + 1) % self.knots.len()];
        CubicSegment::new(k0.point, k0.right, k1.left, k1.point)
    }

    /// Point at time `t`.
    ///
    /// Open paths reject times outside `[0, path_length]`; cycles wrap.
    pub fn point_at(&self, t: Scalar) -> Result<Point, GraphicsError> {
        Ok(match self.locate(t)? {
            Location::Knot(i) => self.knots[i].point,
            Location::Inside { segment, t } => self.segment_at(segment).eval(t),
        })
    }

    /// Incoming control point at time `t`.
    pub fn precontrol(&self, t: Scalar) -> Result<Point, GraphicsError> {
        Ok(match self.locate(t)? {
            Location::Knot(i) => self.knots[i].left,
            Location::Inside { segment, t } => self.segment_at(segment).split(t).0.p2,
        })
    }

    /// Outgoing control point at time `t`.
    pub fn postcontrol(&self, t: Scalar) -> Result<Point, GraphicsError> {
        Ok(match self.locate(t)? {
            Location::Knot(i) => self.knots[i].right,
            Location::Inside { segment, t } => self.segment_at(segment).split(t).1.p1,
        })
    }

    /// Tangent at time `t`, as `postcontrol(t) - precontrol(t)`.
    ///
    /// The vector is zero where both controls coincide with the point.
    pub fn direction_at(&self, t: Scalar) -> Result<Vec2, GraphicsError> {
        Ok(self.postcontrol(t)? - self.precontrol(t)?)
    }

    /// The part of the path between times `t1` and `t2`.
    ///
    /// With `t1 > t2` the result runs backwards. Open paths clamp both times
    /// into `[0, path_length]`; cycles wrap and may go around once.
    pub fn subpath(&self, t1: Scalar, t2: Scalar) -> Result<Self, GraphicsError> {
        if !(t1.is_finite() && t2.is_finite()) {
            return Err(GraphicsError::NonFinite { what: "path time" });
        }
        if t1 > t2 {
            return Ok(self.subpath(t2, t1)?.reversed());
        }

        let n = self.path_length();
        let n_f = index_to_scalar(n);
        if n == 0 {
            return Ok(Self::single_point(self.knots[0].point, self.style.clone()));
        }
        let (a, b) = if self.cyclic {
            let shift = (t1 / n_f).floor() * n_f;
            let a = t1 - shift;
            (a, (t2 - shift).min(a + n_f))
        } else {
            (t1.clamp(0.0, n_f), t2.clamp(0.0, n_f))
        };

        let mut knots: Vec<Knot> = Vec::new();
        for i in scalar_to_index(a)..scalar_to_index(b.ceil()) {
            let base = index_to_scalar(i);
            let lo = (a - base).max(0.0);
            let hi = (b - base).min(1.0);
            if hi - lo <= NEAR_ZERO {
                continue;
            }
            let piece = self.segment_at(i % n).subsegment(lo, hi);
            match knots.last_mut() {
                Some(last) => last.right = piece.p1,
                None => knots.push(Knot::with_controls(piece.p0, piece.p0, piece.p1)),
            }
            knots.push(Knot::with_controls(piece.p3, piece.p2, piece.p3));
        }

        if knots.is_empty() {
            return Ok(Self::single_point(self.point_at(a)?, self.style.clone()));
        }
        Ok(self.with_geometry(knots, false))
    }

    /// The same curve traversed in the opposite direction.
    ///
    /// A cycle keeps knot 0 as its starting point, so time `t` on the result
    /// is time `path_length - t` on `self`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut knots: Vec<Knot> = self.knots.iter().rev().map(|k| k.reversed()).collect();
        if self.cyclic {
            knots.rotate_right(1);
        }
        self.with_geometry(knots, self.cyclic)
    }

    // -----------------------------------------------------------------------
    // Bounding box
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn bbox(&self) -> BoundingBox {
        bbox::path_bbox(self)
    }

    #[must_use]
    pub fn llcorner(&self) -> Point {
        self.bbox().llcorner()
    }

    #[must_use]
    pub fn lrcorner(&self) -> Point {
        self.bbox().lrcorner()
    }

    #[must_use]
    pub fn ulcorner(&self) -> Point {
        self.bbox().ulcorner()
    }

    #[must_use]
    pub fn urcorner(&self) -> Point {
        self.bbox().urcorner()
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bbox().center()
    }

    /// The bounding box as a closed rectangle, counter-clockwise from the
    /// lower-left corner.
    #[must_use]
    pub fn bbox_path(&self) -> Self {
        let bb = self.bbox();
        let corners = [bb.llcorner(), bb.lrcorner(), bb.urcorner(), bb.ulcorner()];
        let knots = (0..corners.len())
            .map(|i| {
                let p = corners[i];
                let prev = corners[(i + corners.len() - 1) % corners.len()];
                let next = corners[(i + 1) % corners.len()];
                Knot::with_controls(p, p.lerp(prev, 1.0 / 3.0), p.lerp(next, 1.0 / 3.0))
            })
            .collect();
        Self::from_parts(knots, true, Style::default())
    }

    // -----------------------------------------------------------------------
    // Style setters
    // -----------------------------------------------------------------------

    pub fn stroke(&mut self, color: Color) -> &mut Self {
        self.style.set_stroke(color);
        self
    }

    pub fn stroke_width(&mut self, width: Scalar) -> &mut Self {
        self.style.set_stroke_width(width);
        self
    }

    pub fn fill(&mut self, color: Color) -> &mut Self {
        self.style.set_fill(color);
        self
    }

    pub fn pen(&mut self, pen: Pen) -> &mut Self {
        self.style.set_pen(pen);
        self
    }

    pub fn dash(&mut self, dash: DashPattern) -> &mut Self {
        self.style.set_dash(dash);
        self
    }

    pub fn evenly(&mut self) -> &mut Self {
        self.dash(DashPattern::evenly())
    }

    pub fn with_dots(&mut self) -> &mut Self {
        self.dash(DashPattern::with_dots())
    }

    pub fn arrow(&mut self) -> &mut Self {
        self.style.set_arrow();
        self
    }

    pub fn double_arrow(&mut self) -> &mut Self {
        self.style.set_double_arrow();
        self
    }

    pub fn arrow_style(&mut self, length: Scalar, angle: Scalar) -> &mut Self {
        self.style.set_arrow_style(length, angle);
        self
    }

    pub fn line_join(&mut self, join: LineJoin) -> &mut Self {
        self.style.set_line_join(join);
        self
    }

    pub fn line_cap(&mut self, cap: LineCap) -> &mut Self {
        self.style.set_line_cap(cap);
        self
    }

    // -----------------------------------------------------------------------
    // kurbo conversion
    // -----------------------------------------------------------------------

    /// Convert to a `kurbo::BezPath` made of cubic segments.
    #[must_use]
    pub fn to_bez_path(&self) -> BezPath {
        let mut bp = BezPath::new();
        let Some(first) = self.knots.first() else {
            return bp;
        };
        bp.move_to(first.point);
        for seg in self.segments() {
            bp.curve_to(seg.p1, seg.p2, seg.p3);
        }
        if self.cyclic {
            bp.close_path();
        }
        bp
    }

    /// Build a path from the first subpath of a `kurbo::BezPath`.
    ///
    /// Lines become cubics with controls on their endpoints and quadratics
    /// are degree-elevated. A closing segment back onto the start point is
    /// folded into the cycle.
    pub fn from_bez_path(bp: &BezPath) -> Result<Self, GraphicsError> {
        let mut knots: Vec<Knot> = Vec::new();
        let mut cyclic = false;

        for (index, el) in bp.elements().iter().enumerate() {
            let current = knots.last().map(|k| k.point);
            match (*el, current) {
                (PathEl::MoveTo(p), None) => knots.push(Knot::new(p)),
                (PathEl::MoveTo(_), Some(_)) => {
                    return Err(GraphicsError::PathBuild {
                        index,
                        reason: "only a single subpath can be converted",
                    });
                }
                (PathEl::LineTo(p), Some(_)) => knots.push(Knot::new(p)),
                (PathEl::QuadTo(q, p), Some(from)) => {
                    push_curve(&mut knots, from.lerp(q, 2.0 / 3.0), p.lerp(q, 2.0 / 3.0), p);
                }
                (PathEl::CurveTo(c1, c2, p), Some(_)) => {
                    push_curve(&mut knots, c1, c2, p);
                }
                (PathEl::ClosePath, Some(_)) => cyclic = true,
                (_, None) => {
                    return Err(GraphicsError::PathBuild {
                        index,
                        reason: "drawing command before moveto",
                    });
                }
            }
        }

        if cyclic && knots.len() > 1 {
            let first = knots[0].point;
            let last = knots[knots.len() - 1];
            if last.point.distance(first) < NEAR_ZERO {
                knots.pop();
                knots[0].left = last.left;
            }
        }
        Self::from_knots(knots, cyclic)
    }
}

fn push_curve(knots: &mut Vec<Knot>, c1: Point, c2: Point, p: Point) {
    if let Some(prev) = knots.last_mut() {
        prev.right = c1;
    }
    knots.push(Knot::with_controls(p, c2, p));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
