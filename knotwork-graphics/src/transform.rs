//! Affine transform operations.
//!
//! `MetaPost` provides these transform primitives:
//! - `shifted (dx, dy)` — translate
//! - `rotated angle` — rotate by degrees
//! - `scaled s` — uniform scale
//! - `xscaled s` — scale x only
//! - `yscaled s` — scale y only
//! - `slanted s` — horizontal shear
//! - `zscaled (a, b)` — complex multiplication (rotate + scale)
//! - `rotatedaround`, `scaledaround`, `reflectedabout` — the same about an
//!   arbitrary point or line
//! - `transformed T` — apply an arbitrary 6-component transform
//!
//! The [`Transformable`] trait provides a uniform interface for applying
//! transforms to points, knots and paths. Bezier curves are affine
//! invariant, so transforming a path only has to move its knots and
//! control points.

use kurbo::Affine;

use crate::math;
use crate::path::Path;
use crate::point::{Point, VecExt};
use crate::types::{Knot, NEAR_ZERO, Scalar};

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// An affine map in `MetaPost`'s six-component form:
///
/// ```text
/// x' = tx + txx * x + txy * y
/// y' = ty + tyx * x + tyy * y
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub tx: Scalar,
    pub ty: Scalar,
    pub txx: Scalar,
    pub txy: Scalar,
    pub tyx: Scalar,
    pub tyy: Scalar,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        txx: 1.0,
        txy: 0.0,
        tyx: 0.0,
        tyy: 1.0,
    };

    /// Apply this transform to a point.
    #[inline]
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.txy.mul_add(p.y, self.txx.mul_add(p.x, self.tx)),
            self.tyy.mul_add(p.y, self.tyx.mul_add(p.x, self.ty)),
        )
    }

    /// Compose: `self` applied first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            txx: next.txx.mul_add(self.txx, next.txy * self.tyx),
            txy: next.txx.mul_add(self.txy, next.txy * self.tyy),
            tyx: next.tyx.mul_add(self.txx, next.tyy * self.tyx),
            tyy: next.tyx.mul_add(self.txy, next.tyy * self.tyy),
            tx: next.txy.mul_add(self.ty, next.txx.mul_add(self.tx, next.tx)),
            ty: next.tyy.mul_add(self.ty, next.tyx.mul_add(self.tx, next.ty)),
        }
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(&self) -> Scalar {
        self.txx.mul_add(self.tyy, -(self.txy * self.tyx))
    }

    /// Compute the inverse of a transform, if it exists.
    ///
    /// Returns `None` if the transform is singular (determinant is zero).
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < NEAR_ZERO {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Self {
            txx: self.tyy * inv_det,
            txy: -self.txy * inv_det,
            tyx: -self.tyx * inv_det,
            tyy: self.txx * inv_det,
            tx: self.txy.mul_add(self.ty, -(self.tyy * self.tx)) * inv_det,
            ty: self.tyx.mul_add(self.tx, -(self.txx * self.ty)) * inv_det,
        })
    }

    /// Convert to a kurbo `Affine`.
    ///
    /// kurbo Affine coefficients: [a, b, c, d, e, f]
    /// mapping: x' = a*x + c*y + e,  y' = b*x + d*y + f
    #[inline]
    #[must_use]
    pub const fn to_affine(self) -> Affine {
        Affine::new([self.txx, self.tyx, self.txy, self.tyy, self.tx, self.ty])
    }

    /// Create from a kurbo `Affine`.
    #[inline]
    #[must_use]
    pub fn from_affine(a: Affine) -> Self {
        let c = a.as_coeffs();
        Self {
            txx: c[0],
            tyx: c[1],
            txy: c[2],
            tyy: c[3],
            tx: c[4],
            ty: c[5],
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ---------------------------------------------------------------------------
// Standard transform constructors
// ---------------------------------------------------------------------------

/// Create a translation transform.
#[must_use]
pub const fn shifted(dx: Scalar, dy: Scalar) -> Transform {
    Transform {
        tx: dx,
        ty: dy,
        ..Transform::IDENTITY
    }
}

/// Create a rotation transform (angle in degrees).
#[must_use]
pub fn rotated(degrees: Scalar) -> Transform {
    let c = math::cosd(degrees);
    let s = math::sind(degrees);
    Transform {
        txx: c,
        txy: -s,
        tyx: s,
        tyy: c,
        ..Transform::IDENTITY
    }
}

/// Create a uniform scaling transform.
#[must_use]
pub const fn scaled(factor: Scalar) -> Transform {
    Transform {
        txx: factor,
        tyy: factor,
        ..Transform::IDENTITY
    }
}

/// Create an x-only scaling transform.
#[must_use]
pub const fn xscaled(factor: Scalar) -> Transform {
    Transform {
        txx: factor,
        ..Transform::IDENTITY
    }
}

/// Create a y-only scaling transform.
#[must_use]
pub const fn yscaled(factor: Scalar) -> Transform {
    Transform {
        tyy: factor,
        ..Transform::IDENTITY
    }
}

/// Create a horizontal shear (slant) transform.
#[must_use]
pub const fn slanted(factor: Scalar) -> Transform {
    Transform {
        txy: factor,
        ..Transform::IDENTITY
    }
}

/// Create a complex-multiplication transform: `zscaled (a, b)`.
///
/// This simultaneously rotates and scales: the point (1, 0) maps to (a, b).
#[must_use]
pub const fn zscaled(a: Scalar, b: Scalar) -> Transform {
    Transform {
        txx: a,
        txy: -b,
        tyx: b,
        tyy: a,
        ..Transform::IDENTITY
    }
}

/// Rotation by `degrees` about `center`.
#[must_use]
pub fn rotated_around(center: Point, degrees: Scalar) -> Transform {
    about(center, rotated(degrees))
}

/// Uniform scaling by `factor` about `center`.
#[must_use]
pub fn scaled_around(center: Point, factor: Scalar) -> Transform {
    about(center, scaled(factor))
}

/// Mirror image in the line through `p1` and `p2`.
///
/// Coincident points describe no line; the horizontal through `p1` is used.
#[must_use]
pub fn reflected_about(p1: Point, p2: Point) -> Transform {
    let theta = (p2 - p1).degrees();
    let (s, c) = (math::sind(2.0 * theta), math::cosd(2.0 * theta));
    let mirror = Transform {
        txx: c,
        txy: s,
        tyx: s,
        tyy: -c,
        ..Transform::IDENTITY
    };
    about(p1, mirror)
}

/// Conjugate `t` so that it acts with `center` as its origin.
fn about(center: Point, t: Transform) -> Transform {
    shifted(-center.x, -center.y)
        .then(&t)
        .then(&shifted(center.x, center.y))
}

// ---------------------------------------------------------------------------
// Transformable trait
// ---------------------------------------------------------------------------

/// A type that can be transformed by an affine [`Transform`].
pub trait Transformable {
    /// Apply a transform, returning the transformed value.
    #[must_use]
    fn transformed(&self, t: &Transform) -> Self;
}

impl Transformable for Point {
    #[inline]
    fn transformed(&self, t: &Transform) -> Self {
        t.apply(*self)
    }
}

impl Transformable for Knot {
    fn transformed(&self, t: &Transform) -> Self {
        Self {
            point: t.apply(self.point),
            left: t.apply(self.left),
            right: t.apply(self.right),
        }
    }
}

impl Transformable for Path {
    /// Style is carried over unchanged.
    fn transformed(&self, t: &Transform) -> Self {
        let knots = self.knots().iter().map(|k| k.transformed(t)).collect();
        self.with_geometry(knots, self.is_cyclic())
    }
}

impl Transformable for Transform {
    /// Compose: `self` applied first, then `t`.
    #[inline]
    fn transformed(&self, t: &Transform) -> Self {
        self.then(t)
    }
}

// ---------------------------------------------------------------------------
// Path shorthands
// ---------------------------------------------------------------------------

impl Path {
    #[must_use]
    pub fn shifted(&self, dx: Scalar, dy: Scalar) -> Self {
        self.transformed(&shifted(dx, dy))
    }

    /// Rotate about the origin by `degrees`.
    #[must_use]
    pub fn rotated(&self, degrees: Scalar) -> Self {
        self.transformed(&rotated(degrees))
    }

    #[must_use]
    pub fn scaled(&self, factor: Scalar) -> Self {
        self.transformed(&scaled(factor))
    }

    #[must_use]
    pub fn xscaled(&self, factor: Scalar) -> Self {
        self.transformed(&xscaled(factor))
    }

    #[must_use]
    pub fn yscaled(&self, factor: Scalar) -> Self {
        self.transformed(&yscaled(factor))
    }

    #[must_use]
    pub fn slanted(&self, factor: Scalar) -> Self {
        self.transformed(&slanted(factor))
    }

    #[must_use]
    pub fn zscaled(&self, a: Scalar, b: Scalar) -> Self {
        self.transformed(&zscaled(a, b))
    }

    #[must_use]
    pub fn rotated_around(&self, center: Point, degrees: Scalar) -> Self {
        self.transformed(&rotated_around(center, degrees))
    }

    #[must_use]
    pub fn scaled_around(&self, center: Point, factor: Scalar) -> Self {
        self.transformed(&scaled_around(center, factor))
    }

    #[must_use]
    pub fn reflected_about(&self, p1: Point, p2: Point) -> Self {
        self.transformed(&reflected_about(p1, p2))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;
    use crate::types::EPSILON;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a} != {b}"
        );
    }

    fn assert_paths_close(a: &Path, b: &Path) {
        assert_eq!(a.knots().len(), b.knots().len());
        for (ka, kb) in a.knots().iter().zip(b.knots()) {
            assert_close(ka.point, kb.point);
            assert_close(ka.left, kb.left);
            assert_close(ka.right, kb.right);
        }
    }

    #[test]
    fn test_shifted() {
        let p = Point::ZERO.transformed(&shifted(3.0, 4.0));
        assert!((p.x - 3.0).abs() < EPSILON);
        assert!((p.y - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotated_90() {
        let p = Point::new(1.0, 0.0).transformed(&rotated(90.0));
        assert!(p.x.abs() < EPSILON);
        assert!((p.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_scales_and_slant() {
        assert_close(Point::new(2.0, 5.0).transformed(&scaled(3.0)), Point::new(6.0, 15.0));
        assert_close(Point::new(3.0, 4.0).transformed(&xscaled(2.0)), Point::new(6.0, 4.0));
        assert_close(Point::new(3.0, 4.0).transformed(&yscaled(2.0)), Point::new(3.0, 8.0));
        // x' = 0 + 1*1 = 1, y' = 1
        assert_close(Point::new(0.0, 1.0).transformed(&slanted(1.0)), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_zscaled_scale_and_rotate() {
        // zscaled (1, 1) = scale by sqrt(2) and rotate 45 degrees
        let p = Point::new(1.0, 0.0).transformed(&zscaled(1.0, 1.0));
        assert_close(p, Point::new(1.0, 1.0));
        let p = Point::new(1.0, 0.0).transformed(&zscaled(0.0, 1.0));
        assert_close(p, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_compose_order() {
        // (0,0) → shifted → (1,0) → rotated 90 → (0,1)
        let c = shifted(1.0, 0.0).then(&rotated(90.0));
        assert_close(Point::ZERO.transformed(&c), Point::new(0.0, 1.0));
        // (1,0) → rotated 90 → (0,1) → shifted → (1,1)
        let c = rotated(90.0).then(&shifted(1.0, 0.0));
        assert_close(Point::new(1.0, 0.0).transformed(&c), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_around_center() {
        let c = Point::new(1.0, 1.0);
        assert_close(Point::new(2.0, 1.0).transformed(&rotated_around(c, 90.0)), Point::new(1.0, 2.0));
        assert_close(Point::new(2.0, 2.0).transformed(&scaled_around(c, 3.0)), Point::new(4.0, 4.0));
        assert_close(c.transformed(&scaled_around(c, 7.0)), c);
    }

    #[test]
    fn test_reflection() {
        // Mirror in y = x swaps coordinates.
        let t = reflected_about(Point::ZERO, Point::new(1.0, 1.0));
        assert_close(Point::new(3.0, 1.0).transformed(&t), Point::new(1.0, 3.0));
        // Mirror in the vertical line x = 2.
        let t = reflected_about(Point::new(2.0, 0.0), Point::new(2.0, 5.0));
        assert_close(Point::new(0.0, 7.0).transformed(&t), Point::new(4.0, 7.0));
        assert!((t.determinant() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = rotated(30.0).then(&shifted(5.0, -3.0));
        let inv = t.inverse().unwrap();
        let original = Point::new(7.0, 11.0);
        let back = original.transformed(&t).transformed(&inv);
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
        assert!(scaled(0.0).inverse().is_none());
    }

    #[test]
    fn test_determinant() {
        assert!((Transform::IDENTITY.determinant() - 1.0).abs() < EPSILON);
        assert!((scaled(3.0).determinant() - 9.0).abs() < EPSILON);
        assert!((rotated(45.0).determinant() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_affine_round_trip() {
        let t = rotated(30.0).then(&shifted(2.0, 1.0)).then(&slanted(0.5));
        assert_eq!(Transform::from_affine(t.to_affine()), t);
        let p = Point::new(3.0, -2.0);
        let via_kurbo = t.to_affine() * p;
        assert_close(via_kurbo, t.apply(p));
    }

    #[test]
    fn test_path_transforms_keep_shape() {
        let c = shapes::fullcircle();
        let moved = c.shifted(10.0, 20.0);
        assert_close(moved.center(), Point::new(10.0, 20.0));
        assert_paths_close(&moved.shifted(-10.0, -20.0), &c);

        let big = c.scaled(4.0);
        assert!((big.bbox().width() - 4.0).abs() < 1e-3);
        let wide = c.xscaled(2.0).yscaled(0.5);
        assert!((wide.bbox().width() - 2.0).abs() < 1e-3);
        assert!((wide.bbox().height() - 0.5).abs() < 1e-3);

        assert_paths_close(&c.rotated(90.0).rotated(-90.0), &c);
        assert_paths_close(&c.zscaled(0.0, 1.0), &c.rotated(90.0));
        let p = Point::new(3.0, 4.0);
        assert_paths_close(
            &c.reflected_about(p, Point::new(5.0, 9.0)).reflected_about(p, Point::new(5.0, 9.0)),
            &c,
        );
        assert_paths_close(&c.scaled_around(p, 2.0).scaled_around(p, 0.5), &c);
        assert_paths_close(&c.rotated_around(p, 30.0).rotated_around(p, -30.0), &c);
        assert_paths_close(&c.slanted(1.0).slanted(-1.0), &c);
    }

    #[test]
    fn test_transform_keeps_style() {
        let mut sq = shapes::unitsquare();
        sq.evenly();
        let t = sq.shifted(1.0, 1.0);
        assert_eq!(t.style(), sq.style());
        assert!(t.is_cyclic());
    }
}
