//! Hobby's spline algorithm
//!
//! Given a sequence of knots with optional direction, curl, and tension
//! constraints, this computes cubic Bezier control points that produce
//! aesthetically pleasing smooth curves.
//!
//! The algorithm is described in:
//! - John D. Hobby, "Smooth, Easy to Compute Interpolating Splines",
//!   *Discrete and Computational Geometry* 1 (1986), pp. 123-140.
//! - D.E. Knuth, *The `METAFONTbook`*, Chapter 14.
//! - The `MetaPost` source code (mp.web), sections on `make_choices`,
//!   `solve_choices` and `set_controls`.
//!
//! # Overview
//!
//! 1. Normalise the knot sides: coincident neighbours become degenerate
//!    explicit segments, one-sided hints are mirrored, explicit controls
//!    next to an open side become given directions, and open-path ends
//!    default to curl 1.
//! 2. Split the chain at breakpoints (knots with anything but `Open` on
//!    either side). A cycle without breakpoints is solved as one closed run.
//! 3. For each run, compute turning angles `psi_k` between chords and solve
//!    the tridiagonal mock-curvature system for the outgoing angles
//!    `theta_k` (radians).
//! 4. Place the control points with the velocity function.
//!
//! Knots live in a flat slice; cyclic neighbours are reached by index
//! arithmetic modulo the knot count.

use tracing::trace;

use crate::math;
use crate::point::{Point, Vec2, VecExt};
use crate::types::{EPSILON, Knot, KnotDirection, KnotSpec, NEAR_ZERO, Scalar, Tension};

/// Resolve every control point of a knot chain.
///
/// Returns an empty vector for an empty chain.
pub fn resolve(mut knots: Vec<KnotSpec>, cyclic: bool) -> Vec<Knot> {
    make_choices(&mut knots, cyclic);
    knots
        .into_iter()
        .map(|k| Knot {
            point: k.point,
            left: control_or(k.left, k.point),
            right: control_or(k.right, k.point),
        })
        .collect()
}

const fn control_or(dir: KnotDirection, fallback: Point) -> Point {
    match dir {
        KnotDirection::Explicit(p) => p,
        _ => fallback,
    }
}

/// Solve for control points, modifying knots in place.
///
/// Afterwards every side of every knot is `Explicit`.
pub fn make_choices(knots: &mut [KnotSpec], cyclic: bool) {
    let n = knots.len();
    if n == 0 {
        return;
    }
    if n == 1 && !cyclic {
        let p = knots[0].point;
        knots[0].left = KnotDirection::Explicit(p);
        knots[0].right = KnotDirection::Explicit(p);
        return;
    }

    if !cyclic {
        // The outer sides of an open path belong to no segment.
        for idx in [0, n - 1] {
            let k = &mut knots[idx];
            if idx == 0 && k.left.is_explicit() {
                k.left = KnotDirection::Open;
            }
            if idx == n - 1 && k.right.is_explicit() {
                k.right = KnotDirection::Open;
            }
        }
    }

    let segments = if cyclic { n } else { n - 1 };
    join_coincident_knots(knots, segments);
    pair_explicit_controls(knots, segments);
    mirror_one_sided_constraints(knots);
    for idx in 0..n {
        infer_right_from_left(knots, idx);
        infer_left_from_right(knots, idx);
    }

    if !cyclic {
        if knots[0].right.is_open() {
            knots[0].right = KnotDirection::Curl(1.0);
        }
        if knots[n - 1].left.is_open() {
            knots[n - 1].left = KnotDirection::Curl(1.0);
        }
    }

    let breaks: Vec<usize> = (0..n).filter(|&k| is_breakpoint(&knots[k])).collect();
    if breaks.is_empty() {
        // Only a cycle can get here: open ends are always breakpoints.
        let run = Run {
            idx: (0..n).collect(),
            closed: true,
        };
        solve_choices(knots, &run);
    } else {
        let pairs = if cyclic {
            breaks.len()
        } else {
            breaks.len() - 1
        };
        for i in 0..pairs {
            let start = breaks[i];
            let end = breaks[(i + 1) % breaks.len()];
            let run = Run {
                idx: cyclic_index_range(start, end, n),
                closed: false,
            };
            solve_choices(knots, &run);
        }
    }

    if !cyclic {
        let first = knots[0].point;
        knots[0].left = KnotDirection::Explicit(first);
        let last = knots[n - 1].point;
        knots[n - 1].right = KnotDirection::Explicit(last);
    }
}

// ---------------------------------------------------------------------------
// Normalisation passes
// ---------------------------------------------------------------------------

const fn is_breakpoint(knot: &KnotSpec) -> bool {
    !knot.left.is_open() || !knot.right.is_open()
}

/// A zero-length segment gets controls on its knot, and the far sides of
/// its two knots become curls if nothing else constrains them.
fn join_coincident_knots(knots: &mut [KnotSpec], segments: usize) {
    let n = knots.len();
    for i in 0..segments {
        let j = (i + 1) % n;
        let p = knots[i].point;
        if knots[i].right.is_explicit() || p.distance(knots[j].point) >= NEAR_ZERO {
            continue;
        }
        knots[i].right = KnotDirection::Explicit(p);
        if knots[i].left.is_open() {
            knots[i].left = KnotDirection::Curl(1.0);
        }
        knots[j].left = KnotDirection::Explicit(p);
        if knots[j].right.is_open() {
            knots[j].right = KnotDirection::Curl(1.0);
        }
    }
}

/// A segment with an explicit control on only one end keeps that control's
/// direction as a given angle and lets the resolver pick the other end.
fn pair_explicit_controls(knots: &mut [KnotSpec], segments: usize) {
    let n = knots.len();
    for i in 0..segments {
        let j = (i + 1) % n;
        match (knots[i].right, knots[j].left) {
            (KnotDirection::Explicit(c), right) if !right.is_explicit() => {
                knots[i].right = direction_or_curl(c - knots[i].point);
            }
            (left, KnotDirection::Explicit(c)) if !left.is_explicit() => {
                knots[j].left = direction_or_curl(knots[j].point - c);
            }
            _ => {}
        }
    }
}

fn direction_or_curl(d: Vec2) -> KnotDirection {
    if d.length() < EPSILON {
        KnotDirection::Curl(1.0)
    } else {
        KnotDirection::Given(d.angle())
    }
}

/// A direction or curl on one side of a knot also applies to an open
/// other side.
fn mirror_one_sided_constraints(knots: &mut [KnotSpec]) {
    for knot in knots.iter_mut() {
        if knot.left.is_open() {
            match knot.right {
                KnotDirection::Given(angle) => knot.left = KnotDirection::Given(angle),
                KnotDirection::Curl(curl) => knot.left = KnotDirection::Curl(curl),
                _ => {}
            }
        }

        if knot.right.is_open() {
            match knot.left {
                KnotDirection::Given(angle) => knot.right = KnotDirection::Given(angle),
                KnotDirection::Curl(curl) => knot.right = KnotDirection::Curl(curl),
                _ => {}
            }
        }
    }
}

fn infer_right_from_left(knots: &mut [KnotSpec], idx: usize) {
    if !knots[idx].right.is_open() {
        return;
    }
    if let KnotDirection::Explicit(point) = knots[idx].left {
        knots[idx].right = direction_or_curl(knots[idx].point - point);
    }
}

fn infer_left_from_right(knots: &mut [KnotSpec], idx: usize) {
    if !knots[idx].left.is_open() {
        return;
    }
    if let KnotDirection::Explicit(point) = knots[idx].right {
        knots[idx].left = direction_or_curl(point - knots[idx].point);
    }
}

/// Knot indices from `start` to `end` going forward around a cycle of
/// length `n`, taking at least one step.
fn cyclic_index_range(start: usize, end: usize, n: usize) -> Vec<usize> {
    let mut indices = vec![start];
    let mut k = start;
    loop {
        k = (k + 1) % n;
        indices.push(k);
        if k == end {
            break;
        }
    }
    indices
}

// ---------------------------------------------------------------------------
// Solving one run
// ---------------------------------------------------------------------------

/// Consecutive knots solved together.
///
/// An open run lists its knots from one breakpoint to the next, both
/// included. A closed run lists every knot of a breakpoint-free cycle once.
struct Run {
    idx: Vec<usize>,
    closed: bool,
}

impl Run {
    fn segments(&self) -> usize {
        if self.closed {
            self.idx.len()
        } else {
            self.idx.len() - 1
        }
    }

    fn knot(&self, k: usize) -> usize {
        self.idx[k % self.idx.len()]
    }
}

/// The tridiagonal system of `mp.web`'s `solve_choices`.
///
/// Each equation has the form `theta[k] + uu[k] * theta[k+1] = vv[k] +
/// ww[k] * theta[0]`; `ww` is only non-zero on a closed run.
#[expect(
    clippy::too_many_lines,
    reason = "tridiagonal solver with boundary conditions is a single logical unit"
)]
fn solve_choices(knots: &mut [KnotSpec], run: &Run) {
    let n = run.segments();
    let p = run.knot(0);
    let q = run.knot(n);

    if knots[p].right.is_explicit() {
        return;
    }

    let delta: Vec<Vec2> = (0..n)
        .map(|k| knots[run.knot(k + 1)].point - knots[run.knot(k)].point)
        .collect();
    let dist: Vec<Scalar> = delta.iter().map(|d| d.length()).collect();

    let mut psi = vec![0.0; n + 2];
    for k in 1..n {
        psi[k] = delta[k - 1].turn_to(delta[k]);
    }
    if run.closed {
        psi[n] = delta[n - 1].turn_to(delta[0]);
        psi[n + 1] = psi[1];
    }

    trace!(segments = n, closed = run.closed, "solving smooth run");

    let mut uu = vec![0.0; n + 1];
    let mut vv = vec![0.0; n + 1];
    let mut ww = vec![0.0; n + 1];
    let mut theta = vec![0.0; n + 1];

    // Equation for theta[0].
    if run.closed {
        ww[0] = 1.0;
    } else {
        match (knots[p].right, knots[run.knot(1)].left) {
            (KnotDirection::Given(a0), KnotDirection::Given(a1)) if n == 1 => {
                let chord = delta[0].angle();
                set_controls(knots, p, q, delta[0], a0 - chord, -(a1 - chord));
                return;
            }
            (KnotDirection::Curl(_), KnotDirection::Curl(_)) if n == 1 => {
                set_straight_controls(knots, p, q, delta[0]);
                return;
            }
            (KnotDirection::Given(a0), _) => {
                vv[0] = math::normalize_angle(a0 - delta[0].angle());
            }
            (KnotDirection::Curl(gamma), _) => {
                let rt = knots[p].right_tension;
                let lt = knots[run.knot(1)].left_tension;
                uu[0] = curl_ratio(gamma, rt, lt);
                vv[0] = -psi[1] * uu[0];
            }
            _ => return,
        }
    }

    for k in 1..=n {
        let s = run.knot(k);
        if k == n && !run.closed {
            // Equation for theta[n] at the far breakpoint.
            theta[n] = match knots[s].left {
                KnotDirection::Curl(gamma) => {
                    let lt = knots[s].left_tension;
                    let rt = knots[run.knot(n - 1)].right_tension;
                    let ff = curl_ratio(gamma, lt, rt);
                    let denom = ff.mul_add(-uu[n - 1], 1.0);
                    if denom.abs() < NEAR_ZERO {
                        0.0
                    } else {
                        -(vv[n - 1] * ff) / denom
                    }
                }
                KnotDirection::Given(angle) => {
                    math::normalize_angle(angle - delta[n - 1].angle())
                }
                _ => 0.0,
            };
            break;
        }

        // Mock-curvature continuity at an interior knot.
        let r = run.knot(k - 1);
        let t = run.knot(k + 1);
        let d_next = dist[k % n];
        let d_prev = dist[k - 1];

        let rt_r = knots[r].right_tension;
        let (aa, dd) = if rt_r.is_unit() {
            (0.5, 2.0 * d_next)
        } else {
            let rt = rt_r.effective();
            (1.0 / 3.0f64.mul_add(rt, -1.0), d_next * (3.0 - 1.0 / rt))
        };
        let lt_t = knots[t].left_tension;
        let (bb, mut ee) = if lt_t.is_unit() {
            (0.5, 2.0 * d_prev)
        } else {
            let lt = lt_t.effective();
            (1.0 / 3.0f64.mul_add(lt, -1.0), d_prev * (3.0 - 1.0 / lt))
        };
        let cc = uu[k - 1].mul_add(-aa, 1.0);

        let mut dd = dd * cc;
        let lt_s = knots[s].left_tension.effective();
        let rt_s = knots[s].right_tension.effective();
        if lt_s < rt_s {
            let ratio = lt_s / rt_s;
            dd *= ratio * ratio;
        } else if rt_s < lt_s {
            let ratio = rt_s / lt_s;
            ee *= ratio * ratio;
        }

        let denom = ee + dd;
        let ff = if denom.abs() < NEAR_ZERO {
            0.0
        } else {
            ee / denom
        };
        uu[k] = ff * bb;

        let bk = if cc.abs() < NEAR_ZERO {
            0.0
        } else {
            (1.0 - ff) / cc
        };
        let acc = psi[k].mul_add(-bk, -psi[k + 1] * uu[k]);
        let ak = bk * aa;
        vv[k] = vv[k - 1].mul_add(-ak, acc);
        ww[k] = if ww[k - 1] == 0.0 {
            0.0
        } else {
            -ww[k - 1] * ak
        };

        if k == n {
            // Closed run: fold the equations back onto theta[0] = theta[n].
            let mut a: f64 = 0.0;
            let mut b: f64 = 1.0;
            let mut j = n;
            loop {
                j = if j == 1 { n } else { j - 1 };
                a = a.mul_add(-uu[j], vv[j]);
                b = b.mul_add(-uu[j], ww[j]);
                if j == n {
                    break;
                }
            }
            let closing = if (1.0 - b).abs() < NEAR_ZERO {
                0.0
            } else {
                a / (1.0 - b)
            };
            theta[n] = closing;
            vv[0] = closing;
            for j in 1..n {
                vv[j] = closing.mul_add(ww[j], vv[j]);
            }
        }
    }

    for k in (0..n).rev() {
        theta[k] = uu[k].mul_add(-theta[k + 1], vv[k]);
    }

    for k in 0..n {
        let phi = -psi[k + 1] - theta[k + 1];
        set_controls(knots, run.knot(k), run.knot(k + 1), delta[k], theta[k], phi);
    }
}

// ---------------------------------------------------------------------------
// Control point computation
// ---------------------------------------------------------------------------

/// Set the controls of the segment from knot `i` to knot `j`, given the
/// outgoing angle `theta` at `i` and incoming angle `phi` at `j` (radians,
/// relative to the chord `d`).
fn set_controls(knots: &mut [KnotSpec], i: usize, j: usize, d: Vec2, theta: Scalar, phi: Scalar) {
    let (st, ct) = theta.sin_cos();
    let (sf, cf) = phi.sin_cos();
    let right_t = knots[i].right_tension;
    let left_t = knots[j].left_tension;

    let rr = velocity(st, ct, sf, cf, right_t.effective());
    let ss = velocity(sf, cf, st, ct, left_t.effective());
    let (rr, ss) = clamp_at_least(rr, ss, (st, ct), (sf, cf), right_t, left_t);

    let pi = knots[i].point;
    let pj = knots[j].point;
    let right_cp = Point::new(
        rr.mul_add(d.x.mul_add(ct, -(d.y * st)), pi.x),
        rr.mul_add(d.y.mul_add(ct, d.x * st), pi.y),
    );
    let left_cp = Point::new(
        ss.mul_add(-d.x.mul_add(cf, d.y * sf), pj.x),
        ss.mul_add(-d.y.mul_add(cf, -(d.x * sf)), pj.y),
    );

    knots[i].right = KnotDirection::Explicit(right_cp);
    knots[j].left = KnotDirection::Explicit(left_cp);
}

/// Curl against curl: a straight segment with controls a third of the chord
/// (scaled by tension) in from each end.
fn set_straight_controls(knots: &mut [KnotSpec], i: usize, j: usize, d: Vec2) {
    let rt = knots[i].right_tension.effective();
    let lt = knots[j].left_tension.effective();
    knots[i].right = KnotDirection::Explicit(knots[i].point + d / (3.0 * rt));
    knots[j].left = KnotDirection::Explicit(knots[j].point - d / (3.0 * lt));
}

/// Clamp velocities for "at least" tension (bounding triangle constraint).
///
/// When `sin(theta)` and `sin(phi)` have the same sign, the curve must stay
/// inside the triangle formed by the chord and the two tangent lines.
fn clamp_at_least(
    rr: Scalar,
    ss: Scalar,
    (st, ct): (Scalar, Scalar),
    (sf, cf): (Scalar, Scalar),
    right_t: Tension,
    left_t: Tension,
) -> (Scalar, Scalar) {
    if !(right_t.at_least || left_t.at_least) {
        return (rr, ss);
    }
    if !((st >= 0.0 && sf >= 0.0) || (st <= 0.0 && sf <= 0.0)) {
        return (rr, ss);
    }

    // sin(|theta| + |phi|) when both have the same sign.
    let sine = st.abs().mul_add(cf, sf.abs() * ct);
    if sine <= 0.0 {
        return (rr, ss);
    }
    let sine = sine * (1.0 + EPSILON);

    let rr = if right_t.at_least {
        rr.min(sf.abs() / sine)
    } else {
        rr
    };
    let ss = if left_t.at_least {
        ss.min(st.abs() / sine)
    } else {
        ss
    };
    (rr, ss)
}

/// Hobby's velocity function.
///
/// Fraction of the chord length to use for the control point distance:
///
///   f(θ, φ) = (2 + √2·(sin θ − sin φ / 16)·(sin φ − sin θ / 16)·(cos θ − cos φ))
///             / (3·(1 + ½(√5 − 1)·cos θ + ½(3 − √5)·cos φ))
///
/// divided by the tension and capped at 4.
fn velocity(st: Scalar, ct: Scalar, sf: Scalar, cf: Scalar, tension: Scalar) -> Scalar {
    let sqrt2 = std::f64::consts::SQRT_2;
    let sqrt5 = 5.0_f64.sqrt();

    let num = (sqrt2 * (st - sf / 16.0) * (sf - st / 16.0)).mul_add(ct - cf, 2.0);
    let denom = 3.0 * (0.5 * (3.0 - sqrt5)).mul_add(cf, (0.5 * (sqrt5 - 1.0)).mul_add(ct, 1.0));

    if denom.abs() < NEAR_ZERO {
        return 0.0;
    }
    (num / (denom * tension)).min(4.0)
}

/// `mp.web`'s `curl_ratio(gamma, a_tension, b_tension)`.
///
/// With `alpha = 1/a` and `beta = 1/b`:
///   ((3 - alpha) * alpha^2 * gamma + beta^3) / (alpha^3 * gamma + (3 - beta) * beta^2)
/// capped at 4.
fn curl_ratio(gamma: Scalar, a_tension: Tension, b_tension: Tension) -> Scalar {
    if a_tension.is_unit() && b_tension.is_unit() {
        return 2.0f64.mul_add(gamma, 1.0) / (gamma + 2.0);
    }

    let alpha = 1.0 / a_tension.effective();
    let beta = 1.0 / b_tension.effective();
    let a3 = alpha * alpha * alpha;
    let b3 = beta * beta * beta;
    let num = ((3.0 - alpha) * alpha * alpha).mul_add(gamma, b3);
    let denom = a3.mul_add(gamma, (3.0 - beta) * beta * beta);
    if denom.abs() < NEAR_ZERO {
        0.0
    } else {
        (num / denom).min(4.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
