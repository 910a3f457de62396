//! Numeric helpers in `MetaPost` conventions.
//!
//! Public angles are in degrees (`sind`, `cosd`, `angle`); the knot resolver
//! works in radians and uses [`normalize_angle`].

use std::f64::consts::{PI, TAU};

use crate::types::{NEAR_ZERO, Scalar};

/// Sine of an angle in degrees.
#[inline]
pub fn sind(degrees: Scalar) -> Scalar {
    degrees.to_radians().sin()
}

/// Cosine of an angle in degrees.
#[inline]
pub fn cosd(degrees: Scalar) -> Scalar {
    degrees.to_radians().cos()
}

/// Angle of the vector (x, y) in degrees, in the range (-180, 180].
///
/// The zero vector has angle 0.
pub fn angle(x: Scalar, y: Scalar) -> Scalar {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    y.atan2(x).to_degrees()
}

/// Pythagorean addition: `a ++ b = sqrt(a² + b²)`.
#[inline]
pub fn pyth_add(a: Scalar, b: Scalar) -> Scalar {
    a.hypot(b)
}

/// Reduce an angle in radians into (-π, π].
pub fn normalize_angle(mut a: Scalar) -> Scalar {
    if !a.is_finite() {
        return 0.0;
    }
    a = a.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

/// Real roots of `a t² + b t + c` lying in [0, 1], ascending.
///
/// Degenerates to the linear case when `a` vanishes; an identically zero
/// polynomial has no isolated roots and yields an empty list.
pub fn unit_quadratic_roots(a: Scalar, b: Scalar, c: Scalar) -> Vec<Scalar> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale < NEAR_ZERO {
        return Vec::new();
    }
    let (a, b, c) = (a / scale, b / scale, c / scale);

    let mut roots = Vec::with_capacity(2);
    if a.abs() < 1e-10 {
        if b.abs() >= 1e-10 {
            roots.push(-c / b);
        }
    } else {
        let disc = b.mul_add(b, -4.0 * a * c);
        if disc >= 0.0 {
            // Numerically stable form, avoids cancellation in -b ± sqrt(disc).
            let q = -0.5 * (b + b.signum() * disc.sqrt());
            if q.abs() < NEAR_ZERO {
                roots.push(0.0);
            } else {
                roots.push(q / a);
                roots.push(c / q);
            }
        } else if disc > -1e-12 {
            roots.push(-b / (2.0 * a));
        }
    }

    let mut roots: Vec<Scalar> = roots
        .into_iter()
        .filter(|t| (-1e-12..=1.0 + 1e-12).contains(t))
        .map(|t| t.clamp(0.0, 1.0))
        .collect();
    roots.sort_by(Scalar::total_cmp);
    roots.dedup_by(|x, y| (*x - *y).abs() < 1e-12);
    roots
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
