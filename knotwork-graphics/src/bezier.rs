//! Cubic Bezier segment operations.
//!
//! [`CubicSegment`] is the unit every path query reduces to: de Casteljau
//! evaluation and splitting, derivatives and bounding boxes. Arc length is
//! delegated to [`kurbo::CubicBez`].

use kurbo::{CubicBez, ParamCurveArclen};

use crate::bbox::BoundingBox;
use crate::math;
use crate::point::{Point, Vec2};
use crate::types::{NEAR_ZERO, Scalar};

/// Absolute arc-length tolerance per unit of segment size.
pub const ARC_TOLERANCE: Scalar = 1e-9;

/// Four control points of a cubic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicSegment {
    #[must_use]
    pub const fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the point at parameter `t` in [0, 1].
    #[expect(
        clippy::many_single_char_names,
        reason = "standard Bezier math variable names (a, b, c, d, s, t)"
    )]
    #[must_use]
    pub fn eval(&self, t: Scalar) -> Point {
        let s = 1.0 - t;
        let a = s * s * s;
        let b = 3.0 * s * s * t;
        let c = 3.0 * s * t * t;
        let d = t * t * t;
        Point::new(
            d.mul_add(
                self.p3.x,
                a.mul_add(self.p0.x, b.mul_add(self.p1.x, c * self.p2.x)),
            ),
            d.mul_add(
                self.p3.y,
                a.mul_add(self.p0.y, b.mul_add(self.p1.y, c * self.p2.y)),
            ),
        )
    }

    /// Evaluate the derivative (tangent vector) at parameter `t` in [0, 1].
    #[expect(
        clippy::many_single_char_names,
        reason = "standard Bezier math variable names (a, b, c, s, t)"
    )]
    #[must_use]
    pub fn eval_deriv(&self, t: Scalar) -> Vec2 {
        let s = 1.0 - t;
        let a = 3.0 * s * s;
        let b = 6.0 * s * t;
        let c = 3.0 * t * t;
        Vec2::new(
            a.mul_add(
                self.p1.x - self.p0.x,
                b.mul_add(self.p2.x - self.p1.x, c * (self.p3.x - self.p2.x)),
            ),
            a.mul_add(
                self.p1.y - self.p0.y,
                b.mul_add(self.p2.y - self.p1.y, c * (self.p3.y - self.p2.y)),
            ),
        )
    }

    /// Split at parameter `t` using de Casteljau's algorithm.
    ///
    /// Returns `(left_half, right_half)`.
    #[must_use]
    pub fn split(&self, t: Scalar) -> (Self, Self) {
        let ab = self.p0.lerp(self.p1, t);
        let bc = self.p1.lerp(self.p2, t);
        let cd = self.p2.lerp(self.p3, t);
        let abc = ab.lerp(bc, t);
        let bcd = bc.lerp(cd, t);
        let abcd = abc.lerp(bcd, t);

        (
            Self::new(self.p0, ab, abc, abcd),
            Self::new(abcd, bcd, cd, self.p3),
        )
    }

    /// The part of this segment between parameters `a <= b`.
    #[must_use]
    pub fn subsegment(&self, a: Scalar, b: Scalar) -> Self {
        let (a, b) = (a.clamp(0.0, 1.0), b.clamp(0.0, 1.0));
        if a <= 0.0 && b >= 1.0 {
            return *self;
        }
        if a <= 0.0 {
            return self.split(b).0;
        }
        let right = self.split(a).1;
        if b >= 1.0 {
            return right;
        }
        let rest = 1.0 - a;
        if rest < NEAR_ZERO {
            return Self::new(self.p3, self.p3, self.p3, self.p3);
        }
        right.split((b - a) / rest).0
    }

    /// Axis-aligned bounding box of the control-point hull: `(min, max)`.
    #[must_use]
    pub const fn bbox(&self) -> (Point, Point) {
        let min_x = self.p0.x.min(self.p1.x).min(self.p2.x).min(self.p3.x);
        let min_y = self.p0.y.min(self.p1.y).min(self.p2.y).min(self.p3.y);
        let max_x = self.p0.x.max(self.p1.x).max(self.p2.x).max(self.p3.x);
        let max_y = self.p0.y.max(self.p1.y).max(self.p2.y).max(self.p3.y);
        (Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Maximum extent (diagonal of bounding box).
    #[must_use]
    pub fn extent(&self) -> Scalar {
        let (min, max) = self.bbox();
        (max.x - min.x).hypot(max.y - min.y)
    }

    /// Exact bounding box of the curve itself, from the extrema of each
    /// coordinate.
    #[must_use]
    pub fn tight_bbox(&self) -> BoundingBox {
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        let roots_x = math::unit_quadratic_roots(
            d0.x - 2.0 * d1.x + d2.x,
            2.0 * (d1.x - d0.x),
            d0.x,
        );
        let roots_y = math::unit_quadratic_roots(
            d0.y - 2.0 * d1.y + d2.y,
            2.0 * (d1.y - d0.y),
            d0.y,
        );
        let extrema = roots_x.into_iter().chain(roots_y).map(|t| self.eval(t));
        BoundingBox::from_points([self.p0, self.p3].into_iter().chain(extrema))
    }

    fn arc_accuracy(&self) -> Scalar {
        ARC_TOLERANCE * self.extent().max(1.0)
    }

    /// Arc length of the whole segment.
    #[must_use]
    pub fn arc_length(&self) -> Scalar {
        CubicBez::from(*self).arclen(self.arc_accuracy())
    }

    /// Arc length from parameter 0 to `u`.
    #[must_use]
    pub fn arc_length_to(&self, u: Scalar) -> Scalar {
        let u = u.clamp(0.0, 1.0);
        if u <= 0.0 {
            return 0.0;
        }
        self.subsegment(0.0, u).arc_length()
    }

    /// Parameter at which the arc length from the start reaches `len`,
    /// clamped to [0, 1].
    #[must_use]
    pub fn arc_time(&self, len: Scalar) -> Scalar {
        if len <= 0.0 {
            return 0.0;
        }
        CubicBez::from(*self)
            .inv_arclen(len, self.arc_accuracy())
            .clamp(0.0, 1.0)
    }
}

impl From<CubicSegment> for CubicBez {
    fn from(seg: CubicSegment) -> Self {
        Self::new(seg.p0, seg.p1, seg.p2, seg.p3)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use kurbo::ParamCurve;

    use super::*;
    use crate::types::EPSILON;

    fn arch() -> CubicSegment {
        CubicSegment::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 2.0),
            Point::new(4.0, 0.0),
        )
    }

    fn line() -> CubicSegment {
        CubicSegment::new(
            Point::new(0.0, 0.0),
            Point::new(10.0 / 3.0, 0.0),
            Point::new(20.0 / 3.0, 0.0),
            Point::new(10.0, 0.0),
        )
    }

    #[test]
    fn eval_endpoints() {
        let seg = arch();
        let p0 = seg.eval(0.0);
        assert!((p0.x).abs() < EPSILON);
        assert!((p0.y).abs() < EPSILON);
        let p1 = seg.eval(1.0);
        assert!((p1.x - 4.0).abs() < EPSILON);
        assert!((p1.y).abs() < EPSILON);
    }

    #[test]
    fn eval_midpoint_of_line() {
        let mid = line().eval(0.5);
        assert!((mid.x - 5.0).abs() < EPSILON);
        assert!((mid.y).abs() < EPSILON);
    }

    #[test]
    fn split_preserves_endpoints() {
        let (left, right) = arch().split(0.5);
        assert!((left.p0.x).abs() < EPSILON);
        assert!((right.p3.x - 4.0).abs() < EPSILON);
        assert!((left.p3.x - right.p0.x).abs() < EPSILON);
        assert!((left.p3.y - right.p0.y).abs() < EPSILON);
    }

    #[test]
    fn subsegment_matches_evaluation() {
        let seg = arch();
        let sub = seg.subsegment(0.2, 0.7);
        for i in 0..=4 {
            let u = f64::from(i) / 4.0;
            let expected = seg.eval(0.5f64.mul_add(u, 0.2));
            let got = sub.eval(u);
            assert!((got.x - expected.x).abs() < 1e-9);
            assert!((got.y - expected.y).abs() < 1e-9);
        }
        assert_eq!(seg.subsegment(0.0, 1.0), seg);
    }

    #[test]
    fn deriv_direction_of_line() {
        let d = line().eval_deriv(0.5);
        assert!(d.x > 0.0);
        assert!(d.y.abs() < EPSILON);
    }

    #[test]
    fn hull_bbox_contains_controls() {
        let seg = CubicSegment::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 5.0),
            Point::new(3.0, -1.0),
            Point::new(4.0, 0.0),
        );
        let (min, max) = seg.bbox();
        assert!(min.x <= 0.0 && max.x >= 4.0);
        assert!(min.y <= -1.0 && max.y >= 5.0);
    }

    #[test]
    fn tight_bbox_of_arch() {
        // Peak of the arch is at t = 0.5: y = 0.75 * 2 = 1.5.
        let bb = arch().tight_bbox();
        assert!((bb.min_x).abs() < EPSILON);
        assert!((bb.max_x - 4.0).abs() < EPSILON);
        assert!((bb.min_y).abs() < EPSILON);
        assert!((bb.max_y - 1.5).abs() < EPSILON);
    }

    #[test]
    fn arc_length_of_line() {
        assert!((line().arc_length() - 10.0).abs() < 1e-9);
        assert!((line().arc_length_to(0.5) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn arc_time_inverts_arc_length() {
        let seg = arch();
        for len in [0.5, 2.0, 4.5] {
            let u = seg.arc_time(len);
            assert!((seg.arc_length_to(u) - len).abs() < 1e-6, "len {len}");
        }
        assert!((line().arc_time(2.5) - 0.25).abs() < 1e-6);
        assert!((seg.arc_time(seg.arc_length() + 1.0) - 1.0).abs() < EPSILON);
        assert!(seg.arc_time(-1.0).abs() < EPSILON);
    }

    #[test]
    fn eval_agrees_with_kurbo() {
        let seg = arch();
        let bez = CubicBez::from(seg);
        for t in [0.0, 0.3, 0.5, 0.9] {
            let (ours, theirs) = (seg.eval(t), bez.eval(t));
            assert!((ours - theirs).length() < 1e-12);
        }
    }
}
