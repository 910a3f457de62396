//! Positions and displacements in the plane.
//!
//! Positions are [`kurbo::Point`] and displacements are [`kurbo::Vec2`]:
//! `q - p` is a `Vec2`, `p + v` is a `Point`. This module adds the
//! `MetaPost` flavoured helpers on top, with angles in degrees.

pub use kurbo::{Point, Vec2};

use crate::math;
use crate::types::{NEAR_ZERO, Scalar};

/// Unit vector pointing at `degrees` counter-clockwise from the x axis
/// (`dir`).
#[inline]
pub fn dir(degrees: Scalar) -> Vec2 {
    Vec2::new(math::cosd(degrees), math::sind(degrees))
}

/// Point halfway between `a` and `b`.
#[inline]
pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}

/// Euclidean distance between `a` and `b`.
#[inline]
pub fn distance(a: Point, b: Point) -> Scalar {
    a.distance(b)
}

/// `a + t * (b - a)`; `t` is not restricted to [0, 1].
#[inline]
pub fn between(a: Point, b: Point, t: Scalar) -> Point {
    a.lerp(b, t)
}

/// Degree-based vector operations missing from [`Vec2`].
pub trait VecExt: Sized {
    /// Angle in degrees, in (-180, 180]; the zero vector has angle 0
    /// (`angle`).
    fn degrees(self) -> Scalar;

    /// Signed turn from `self` to `other`, in radians.
    fn turn_to(self, other: Self) -> Scalar;

    /// Counter-clockwise rotation by `degrees`.
    #[must_use]
    fn rotated(self, degrees: Scalar) -> Self;

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    #[must_use]
    fn unit_or_zero(self) -> Self;
}

impl VecExt for Vec2 {
    #[inline]
    fn degrees(self) -> Scalar {
        math::angle(self.x, self.y)
    }

    #[inline]
    fn turn_to(self, other: Self) -> Scalar {
        self.cross(other).atan2(self.dot(other))
    }

    fn rotated(self, degrees: Scalar) -> Self {
        let (s, c) = (math::sind(degrees), math::cosd(degrees));
        Self::new(
            self.x.mul_add(c, -(self.y * s)),
            self.x.mul_add(s, self.y * c),
        )
    }

    fn unit_or_zero(self) -> Self {
        let len = self.length();
        if len < NEAR_ZERO { Self::ZERO } else { self / len }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EPSILON;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn dir_is_unit_and_degrees() {
        assert!(close(dir(0.0), Vec2::new(1.0, 0.0)));
        assert!(close(dir(90.0), Vec2::new(0.0, 1.0)));
        assert!(close(dir(225.0), Vec2::new(-0.5_f64.sqrt(), -0.5_f64.sqrt())));
        assert!((dir(33.0).length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn positions_and_displacements() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -1.0);
        assert!(close(b - a, Vec2::new(2.0, -3.0)));
        assert_eq!(a + (b - a), b);
        assert!(close((b - a) * 2.0, Vec2::new(4.0, -6.0)));
        assert!(close(-(b - a), a - b));
    }

    #[test]
    fn degrees_and_unit() {
        let v = Vec2::new(3.0, 4.0);
        assert!((Vec2::new(0.0, 2.0).degrees() - 90.0).abs() < EPSILON);
        assert!((Vec2::new(-1.0, 0.0).degrees() - 180.0).abs() < EPSILON);
        assert!(Vec2::ZERO.degrees().abs() < EPSILON);
        assert!(close(v.unit_or_zero(), Vec2::new(0.6, 0.8)));
        assert_eq!(Vec2::ZERO.unit_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn rotation_by_degrees() {
        assert!(close(Vec2::new(1.0, 0.0).rotated(90.0), Vec2::new(0.0, 1.0)));
        assert!(close(Vec2::new(2.0, 1.0).rotated(180.0), Vec2::new(-2.0, -1.0)));
    }

    #[test]
    fn turn_is_signed() {
        let x = Vec2::new(1.0, 0.0);
        let y = Vec2::new(0.0, 1.0);
        assert!((x.turn_to(y) - std::f64::consts::FRAC_PI_2).abs() < EPSILON);
        assert!((y.turn_to(x) + std::f64::consts::FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn midpoint_between_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 4.0);
        assert_eq!(midpoint(a, b), Point::new(5.0, 2.0));
        assert!(close(between(a, b, 0.5) - midpoint(a, b), Vec2::ZERO));
        assert!(close(between(a, b, 1.5).to_vec2(), Vec2::new(15.0, 6.0)));
        assert!((distance(a, b) - distance(b, a)).abs() < EPSILON);
    }
}
