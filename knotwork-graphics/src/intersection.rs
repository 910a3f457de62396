//! Curve-curve intersection using bisection.
//!
//! Implements `MetaPost`'s `intersectiontimes` operator: given two paths,
//! find the (time1, time2) pair where they intersect, preferring the
//! smallest time on the first path.
//!
//! The algorithm recursively bisects both curves and checks bounding-box
//! overlap, stopping when the sub-curves are small enough. A few Newton
//! steps then polish the hit. The number of visited sub-curve pairs is
//! capped so that overlapping or nearly tangent curves cannot stall the
//! search; running out of budget reports the best hit found so far.

use tracing::debug;

use crate::bezier::CubicSegment;
use crate::path::Path;
use crate::point::Point;
use crate::types::{NEAR_ZERO, Scalar, index_to_scalar};

/// Maximum recursion depth for bisection.
const MAX_DEPTH: u32 = 40;

/// Tolerance for convergence.
pub const INTERSECT_TOL: Scalar = 1e-6;

/// Sub-curve pairs examined per path pair before giving up.
const WORK_BUDGET: usize = 1 << 16;

/// Newton iterations used to polish a bisection hit.
const NEWTON_STEPS: usize = 8;

/// Result of an intersection search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Time parameter on the first path.
    pub t1: Scalar,
    /// Time parameter on the second path.
    pub t2: Scalar,
}

/// Find the first intersection between two paths.
///
/// Returns `None` if the paths don't intersect. The returned times are in
/// the range [0, `path.path_length()`].
#[must_use]
pub fn intersection_times(path1: &Path, path2: &Path) -> Option<Intersection> {
    intersection_times_within(path1, path2, WORK_BUDGET)
}

/// [`intersection_times`] with an explicit cap on sub-curve pairs visited.
fn intersection_times_within(path1: &Path, path2: &Path, budget: usize) -> Option<Intersection> {
    let n1 = path1.path_length();
    let n2 = path2.path_length();
    if n1 == 0 || n2 == 0 {
        return None;
    }

    let mut search = Search::new(budget);
    for (i, seg1) in path1.segments().enumerate() {
        let mut best: Option<(Scalar, Scalar, usize)> = None;
        for (j, seg2) in path2.segments().enumerate() {
            let Some((t1, t2)) = search.first_hit(&seg1, &seg2) else {
                continue;
            };
            if best.is_none_or(|(b1, _, _)| t1 < b1 - INTERSECT_TOL) {
                best = Some((t1, t2, j));
            }
        }
        if search.exhausted() {
            debug!(
                budget,
                segment = i,
                found = best.is_some(),
                "intersection search ran out of budget"
            );
        }
        if let Some((t1, t2, j)) = best {
            let seg2 = path2.segment(j)?;
            let (t1, t2) = polish(&seg1, &seg2, t1, t2);
            return Some(Intersection {
                t1: index_to_scalar(i) + t1,
                t2: index_to_scalar(j) + t2,
            });
        }
        if search.exhausted() {
            return None;
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Bounding box overlap
// ---------------------------------------------------------------------------

/// Check if two bounding boxes overlap.
fn bbox_overlap(a: &(Point, Point), b: &(Point, Point)) -> bool {
    a.0.x <= b.1.x && a.1.x >= b.0.x && a.0.y <= b.1.y && a.1.y >= b.0.y
}

// ---------------------------------------------------------------------------
// Bisection intersection algorithm
// ---------------------------------------------------------------------------

/// Parameter interval of a sub-curve within its segment.
#[derive(Debug, Clone, Copy)]
struct Span {
    lo: Scalar,
    hi: Scalar,
}

impl Span {
    const UNIT: Self = Self { lo: 0.0, hi: 1.0 };

    fn mid(self) -> Scalar {
        f64::midpoint(self.lo, self.hi)
    }

    fn halves(self) -> (Self, Self) {
        let m = self.mid();
        (Self { lo: self.lo, hi: m }, Self { lo: m, hi: self.hi })
    }
}

struct Search {
    work: usize,
    budget: usize,
}

impl Search {
    const fn new(budget: usize) -> Self {
        Self { work: 0, budget }
    }

    const fn exhausted(&self) -> bool {
        self.work >= self.budget
    }

    fn first_hit(&mut self, seg1: &CubicSegment, seg2: &CubicSegment) -> Option<(Scalar, Scalar)> {
        self.bisect(seg1, seg2, Span::UNIT, Span::UNIT, 0)
    }

    /// Find one intersection between two cubic segments via bisection.
    ///
    /// Halves of the first curve are visited left to right, so the hit has
    /// the smallest time on `seg1` this resolution can tell apart.
    fn bisect(
        &mut self,
        seg1: &CubicSegment,
        seg2: &CubicSegment,
        span1: Span,
        span2: Span,
        depth: u32,
    ) -> Option<(Scalar, Scalar)> {
        if self.exhausted() {
            return None;
        }
        self.work += 1;

        if !bbox_overlap(&seg1.bbox(), &seg2.bbox()) {
            return None;
        }

        // Check convergence
        if (seg1.extent() < INTERSECT_TOL && seg2.extent() < INTERSECT_TOL) || depth >= MAX_DEPTH {
            return Some((span1.mid(), span2.mid()));
        }

        let (s1_left, s1_right) = seg1.split(0.5);
        let (s2_left, s2_right) = seg2.split(0.5);
        let (a1, b1) = span1.halves();
        let (a2, b2) = span2.halves();

        let d = depth + 1;
        self.bisect(&s1_left, &s2_left, a1, a2, d)
            .or_else(|| self.bisect(&s1_left, &s2_right, a1, b2, d))
            .or_else(|| self.bisect(&s1_right, &s2_left, b1, a2, d))
            .or_else(|| self.bisect(&s1_right, &s2_right, b1, b2, d))
    }
}

/// Refine `(t1, t2)` with Newton steps on `seg1(t1) - seg2(t2) = 0`.
///
/// Steps that leave [0, 1] or do not shrink the gap are discarded.
fn polish(seg1: &CubicSegment, seg2: &CubicSegment, t1: Scalar, t2: Scalar) -> (Scalar, Scalar) {
    let (mut t1, mut t2) = (t1, t2);
    let mut gap = seg1.eval(t1) - seg2.eval(t2);
    for _ in 0..NEWTON_STEPS {
        if gap.length() < NEAR_ZERO {
            break;
        }
        let d1 = seg1.eval_deriv(t1);
        let d2 = seg2.eval_deriv(t2);
        // [d1 | -d2] * (dt1, dt2) = -gap
        let det = d2.cross(d1);
        if det.abs() < NEAR_ZERO {
            break;
        }
        let dt1 = d2.cross(gap) / det;
        let dt2 = d1.cross(gap) / det;
        let (n1, n2) = (t1 - dt1, t2 - dt2);
        if !(0.0..=1.0).contains(&n1) || !(0.0..=1.0).contains(&n2) {
            break;
        }
        let next_gap = seg1.eval(n1) - seg2.eval(n2);
        if next_gap.length() >= gap.length() {
            break;
        }
        (t1, t2, gap) = (n1, n2, next_gap);
    }
    (t1, t2)
}

// ---------------------------------------------------------------------------
// Path operations built on intersections
// ---------------------------------------------------------------------------

impl Path {
    /// `p intersectiontimes q`.
    #[must_use]
    pub fn intersection_times(&self, other: &Self) -> Option<(Scalar, Scalar)> {
        intersection_times(self, other).map(|ix| (ix.t1, ix.t2))
    }

    /// `p intersectionpoint q`: the point at the first intersection time.
    #[must_use]
    pub fn intersection_point(&self, other: &Self) -> Option<Point> {
        let ix = intersection_times(self, other)?;
        self.point_at(ix.t1).ok()
    }

    /// `p cutbefore q`: drop the part of `self` before its first
    /// intersection with `other`. Without an intersection `self` is returned
    /// unchanged.
    #[must_use]
    pub fn cut_before(&self, other: &Self) -> Self {
        let Some(ix) = intersection_times(self, other) else {
            return self.clone();
        };
        let end = index_to_scalar(self.path_length());
        self.subpath(ix.t1, end).unwrap_or_else(|_| self.clone())
    }

    /// `p cutafter q`: drop the part of `self` after its last intersection
    /// with `other`.
    #[must_use]
    pub fn cut_after(&self, other: &Self) -> Self {
        let reversed = self.reversed();
        if intersection_times(&reversed, other).is_none() {
            return self.clone();
        }
        reversed.cut_before(other).reversed()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
