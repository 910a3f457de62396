//! Direction times: where a path first heads a given way.
//!
//! Inside a segment the tangent `B'(t)` is a quadratic in `t`. Rotating the
//! target direction onto the x axis turns "parallel and pointing the same
//! way" into "y component zero, x component positive", so candidate times
//! are the roots of one quadratic. At a corner the heading jumps from the
//! incoming to the outgoing tangent; like `MetaPost`, every direction swept
//! by the shorter turn counts as reached at the knot itself.

use super::Path;
use crate::bezier::CubicSegment;
use crate::math;
use crate::point::{Point, Vec2};
use crate::types::{NEAR_ZERO, Scalar, index_to_scalar};

/// Sine of the largest angle still treated as "the same direction".
const PARALLEL_TOL: Scalar = 1e-9;

/// Step used to read a tangent next to a cusp.
const CUSP_STEP: Scalar = 1e-7;

impl Path {
    /// First time at which the path heads in direction `(dx, dy)`
    /// (`directiontime (dx, dy) of p`).
    ///
    /// `None` when the path never does, or when the direction is zero.
    #[must_use]
    pub fn direction_time_of(&self, dx: Scalar, dy: Scalar) -> Option<Scalar> {
        let target = Vec2::new(dx, dy);
        if !target.is_finite() || target.length() < NEAR_ZERO {
            return None;
        }
        let u = target.normalize();
        let n = self.path_length();

        for i in 0..n {
            let seg = self.segment(i)?;
            if i > 0 || self.is_cyclic() {
                let prev = self.segment((i + n - 1) % n)?;
                if turns_through(exit_tangent(&prev), entry_tangent(&seg), u) {
                    return Some(index_to_scalar(i));
                }
            }
            if let Some(t) = segment_direction_time(&seg, u) {
                return Some(index_to_scalar(i) + t);
            }
        }
        None
    }

    /// Point at [`direction_time_of`](Self::direction_time_of)
    /// (`directionpoint (dx, dy) of p`).
    #[must_use]
    pub fn direction_point_of(&self, dx: Scalar, dy: Scalar) -> Option<Point> {
        let t = self.direction_time_of(dx, dy)?;
        self.point_at(t).ok()
    }
}

/// Tangent at `t`, looking a little inside the segment when it vanishes.
fn tangent_near(seg: &CubicSegment, t: Scalar) -> Vec2 {
    let v = seg.eval_deriv(t);
    if v.length() > NEAR_ZERO {
        return v;
    }
    let nudged = if t < 0.5 { t + CUSP_STEP } else { t - CUSP_STEP };
    let v = seg.eval_deriv(nudged);
    if v.length() > NEAR_ZERO {
        v
    } else {
        seg.p3 - seg.p0
    }
}

fn entry_tangent(seg: &CubicSegment) -> Vec2 {
    tangent_near(seg, 0.0)
}

fn exit_tangent(seg: &CubicSegment) -> Vec2 {
    tangent_near(seg, 1.0)
}

fn heads_along(v: Vec2, u: Vec2) -> bool {
    let len = v.length();
    len > NEAR_ZERO && (u.cross(v) / len).abs() < PARALLEL_TOL && u.dot(v) > 0.0
}

/// Whether the turn from `vin` to `vout` (the shorter way round) passes
/// strictly through `u`.
fn turns_through(vin: Vec2, vout: Vec2, u: Vec2) -> bool {
    let turn = vin.cross(vout);
    if turn.abs() < NEAR_ZERO * vin.length() * vout.length() {
        return false;
    }
    let before = vin.cross(u);
    let after = u.cross(vout);
    before != 0.0
        && after != 0.0
        && before.signum() == turn.signum()
        && after.signum() == turn.signum()
}

/// Smallest local time in [0, 1] at which `seg` heads along unit vector `u`.
fn segment_direction_time(seg: &CubicSegment, u: Vec2) -> Option<Scalar> {
    if heads_along(entry_tangent(seg), u) {
        return Some(0.0);
    }

    // B'(t) / 3 = d0 (1-t)^2 + 2 d1 t (1-t) + d2 t^2, projected across u.
    let d0 = seg.p1 - seg.p0;
    let d1 = seg.p2 - seg.p1;
    let d2 = seg.p3 - seg.p2;
    let (y0, y1, y2) = (u.cross(d0), u.cross(d1), u.cross(d2));
    let roots = math::unit_quadratic_roots(y0 - 2.0 * y1 + y2, 2.0 * (y1 - y0), y0);

    if roots.is_empty() && y0.abs().max(y1.abs()).max(y2.abs()) < NEAR_ZERO {
        // A straight segment along the line of u: it either goes our way
        // from some point on or never.
        let (x0, x1, x2) = (u.dot(d0), u.dot(d1), u.dot(d2));
        let mut candidates = math::unit_quadratic_roots(x0 - 2.0 * x1 + x2, 2.0 * (x1 - x0), x0);
        candidates.insert(0, 0.0);
        return candidates
            .into_iter()
            .find(|&t| u.dot(tangent_near(seg, (t + CUSP_STEP).min(1.0))) > 0.0);
    }

    roots
        .into_iter()
        .find(|&t| u.dot(tangent_near(seg, t)) > 0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::builder::PathBuilder;
    use crate::shapes;

    fn assert_time(actual: Option<Scalar>, expected: Scalar) {
        let t = actual.expect("direction should be found");
        assert!((t - expected).abs() < 1e-6, "expected {expected}, got {t}");
    }

    #[test]
    fn circle_directions() {
        let c = shapes::fullcircle();
        // Counter-clockwise from (0.5, 0): heading up at the start, left at
        // the top, down at the left, right at the bottom.
        assert_time(c.direction_time_of(0.0, 1.0), 0.0);
        assert_time(c.direction_time_of(-1.0, 0.0), 2.0);
        assert_time(c.direction_time_of(0.0, -1.0), 4.0);
        assert_time(c.direction_time_of(1.0, 0.0), 6.0);
        let p = c.direction_point_of(-1.0, 0.0).unwrap();
        assert!(p.x.abs() < 1e-6 && (p.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn direction_inside_segment() {
        let c = shapes::fullcircle();
        let t = c.direction_time_of(-1.0, 1.0).unwrap();
        assert!(t > 0.0 && t < 2.0);
        let d = c.direction_at(t).unwrap();
        assert!((d.x + d.y).abs() / d.length() < 1e-6 && d.y > 0.0);
    }

    #[test]
    fn corner_sweeps_intermediate_directions() {
        let elbow = PathBuilder::new()
            .move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(10.0, 0.0))
            .line_to(Point::new(10.0, 10.0))
            .build()
            .unwrap();
        assert_time(elbow.direction_time_of(1.0, 0.0), 0.0);
        assert_time(elbow.direction_time_of(1.0, 1.0), 1.0);
        assert_time(elbow.direction_time_of(0.0, 1.0), 1.0);
        assert_eq!(elbow.direction_time_of(-1.0, 0.0), None);
    }

    #[test]
    fn straight_line_never_turns() {
        let line = PathBuilder::new()
            .move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(5.0, 5.0))
            .build()
            .unwrap();
        assert_time(line.direction_time_of(2.0, 2.0), 0.0);
        assert_eq!(line.direction_time_of(-1.0, -1.0), None);
        assert_eq!(line.direction_time_of(1.0, 0.0), None);
        assert_eq!(line.direction_point_of(0.0, 0.0), None);
    }
}
