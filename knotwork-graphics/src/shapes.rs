//! Predefined paths from the plain macro package.
//!
//! Each shape is resolved once and cloned on every call.

use std::sync::LazyLock;

use crate::path::Path;
use crate::path::hobby;
use crate::point::Point;
use crate::style::Style;
use crate::types::{Knot, KnotSpec};

static FULLCIRCLE: LazyLock<Path> = LazyLock::new(|| {
    let h = 0.5 * std::f64::consts::FRAC_1_SQRT_2;
    let specs = [
        (0.5, 0.0),
        (h, h),
        (0.0, 0.5),
        (-h, h),
        (-0.5, 0.0),
        (-h, -h),
        (0.0, -0.5),
        (h, -h),
    ]
    .into_iter()
    .map(|(x, y)| KnotSpec::new(Point::new(x, y)))
    .collect();
    Path::from_parts(hobby::resolve(specs, true), true, Style::default())
});

static UNITSQUARE: LazyLock<Path> = LazyLock::new(|| {
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];
    let knots = (0..corners.len())
        .map(|i| {
            let p = corners[i];
            let prev = corners[(i + corners.len() - 1) % corners.len()];
            let next = corners[(i + 1) % corners.len()];
            Knot::with_controls(p, p.lerp(prev, 1.0 / 3.0), p.lerp(next, 1.0 / 3.0))
        })
        .collect();
    Path::from_parts(knots, true, Style::default())
});

/// `fullcircle`: diameter 1, centred at the origin, counter-clockwise from
/// `(0.5, 0)` through eight knots.
#[must_use]
pub fn fullcircle() -> Path {
    FULLCIRCLE.clone()
}

/// `halfcircle`: the upper half of [`fullcircle`], from `(0.5, 0)` to
/// `(-0.5, 0)`.
#[must_use]
pub fn halfcircle() -> Path {
    first_segments(4)
}

/// `quartercircle`: the first quadrant of [`fullcircle`].
#[must_use]
pub fn quartercircle() -> Path {
    first_segments(2)
}

/// The first `n` segments of the circle as an open path, with the outer
/// controls pulled onto their knots.
fn first_segments(n: usize) -> Path {
    let mut knots = FULLCIRCLE.knots()[..=n].to_vec();
    knots[0].left = knots[0].point;
    knots[n].right = knots[n].point;
    Path::from_parts(knots, false, Style::default())
}

/// `unitsquare`: `(0,0)--(1,0)--(1,1)--(0,1)--cycle`.
#[must_use]
pub fn unitsquare() -> Path {
    UNITSQUARE.clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
