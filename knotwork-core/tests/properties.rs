//! End-to-end checks of points, constraints and path algebra through the
//! public API.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use proptest::prelude::*;

use knotwork_core::{
    Axis, BoundingBox, Context, Path, PathBuilder, Point, Scalar, SolveError, between,
    build_cycle, distance, fullcircle, midpoint, unitsquare,
};

const TOL: Scalar = 1e-6;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_point() -> impl Strategy<Value = Point> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
}

/// Open or closed smooth paths through 2 to 6 well separated points.
fn arb_path() -> impl Strategy<Value = Path> {
    (
        prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..6),
        any::<bool>(),
    )
        .prop_filter_map("points too close", |(coords, cyclic)| {
            let points: Vec<Point> = coords.into_iter().map(Point::from).collect();
            let separated = points.windows(2).all(|w| distance(w[0], w[1]) > 1.0);
            let closes = !cyclic || distance(points[0], points[points.len() - 1]) > 1.0;
            if !(separated && closes) {
                return None;
            }
            let mut b = PathBuilder::new().move_to(points[0]);
            for &p in &points[1..] {
                b = b.curve_to(p);
            }
            if cyclic {
                b = b.cycle();
            }
            b.build().ok()
        })
}

fn assert_same_curve(a: &Path, b: &Path) {
    assert_eq!(a.path_length(), b.path_length());
    let steps = a.path_length() * 4;
    for i in 0..=steps {
        let t = Scalar::from(u32::try_from(i).unwrap()) / 4.0;
        let (pa, pb) = (a.point_at(t).unwrap(), b.point_at(t).unwrap());
        assert_abs_diff_eq!(pa.x, pb.x, epsilon = TOL);
        assert_abs_diff_eq!(pa.y, pb.y, epsilon = TOL);
    }
}

fn line(a: (Scalar, Scalar), b: (Scalar, Scalar)) -> Path {
    PathBuilder::new()
        .move_to(Point::from(a))
        .line_to(Point::from(b))
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn midpoint_is_between_at_half(a in arb_point(), b in arb_point()) {
        let m = midpoint(a, b);
        let h = between(a, b, 0.5);
        prop_assert!((m.x - h.x).abs() < TOL && (m.y - h.y).abs() < TOL, "{} != {}", m, h);
    }

    #[test]
    fn distance_is_symmetric(a in arb_point(), b in arb_point()) {
        prop_assert!((distance(a, b) - distance(b, a)).abs() < TOL);
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[test]
fn fixed_coordinates_solve() {
    let mut ctx = Context::new();
    let v = ctx.unknown();
    ctx.eqx(v, 3.0).unwrap().eqy(v, 4.0).unwrap();
    ctx.solve().unwrap();
    let (x, y) = ctx.xy(v).unwrap();
    assert_relative_eq!(x, 3.0);
    assert_relative_eq!(y, 4.0);
}

#[test]
fn midpoint_constraint_solves() {
    let mut ctx = Context::new();
    let m = ctx.unknown();
    let a = ctx.known(0.0, 0.0).unwrap();
    let b = ctx.known(10.0, 0.0).unwrap();
    ctx.midpoint(m, a, b).unwrap();
    ctx.solve().unwrap();
    assert_eq!(ctx.point_of(m).unwrap(), Point::new(5.0, 0.0));
}

#[test]
fn intersection_of_crossing_lines() {
    let mut ctx = Context::new();
    let a1 = ctx.known(1.0, 0.0).unwrap();
    let a2 = ctx.known(1.0, 8.0).unwrap();
    let b1 = ctx.known(-2.0, 1.0).unwrap();
    let b2 = ctx.known(4.0, 4.0).unwrap();
    let p = ctx.intersection_of(a1, a2, b1, b2).unwrap();
    ctx.solve().unwrap();
    // y = 1 + (x + 2) / 2 at x = 1
    let (x, y) = ctx.xy(p).unwrap();
    assert_abs_diff_eq!(x, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(y, 2.5, epsilon = 1e-12);
}

#[test]
fn intersection_of_parallel_lines_is_degenerate() {
    let mut ctx = Context::new();
    let a1 = ctx.known(0.0, 0.0).unwrap();
    let a2 = ctx.known(1.0, 0.0).unwrap();
    let b1 = ctx.known(0.0, 1.0).unwrap();
    let b2 = ctx.known(1.0, 1.0).unwrap();
    ctx.intersection_of(a1, a2, b1, b2).unwrap();
    assert!(matches!(
        ctx.solve(),
        Err(SolveError::DegenerateGeometry { .. })
    ));
}

#[test]
fn lone_unknown_is_underdetermined() {
    let mut ctx = Context::new();
    ctx.unknown();
    assert!(matches!(
        ctx.solve(),
        Err(SolveError::Underdetermined { var: 0, axis: Axis::X })
    ));
}

#[test]
fn solved_points_feed_a_path() {
    // A square from one corner, a side length and right angles.
    let mut ctx = Context::new();
    let [a, b, c, d] = [ctx.unknown(), ctx.unknown(), ctx.unknown(), ctx.unknown()];
    let side = ctx.known(3.0, 0.0).unwrap();
    let up = ctx.known(0.0, 3.0).unwrap();
    ctx.eq(a, Point::new(1.0, 1.0))
        .unwrap()
        .sum(b, a, side)
        .unwrap()
        .sum(d, a, up)
        .unwrap()
        .sum(c, b, up)
        .unwrap();
    ctx.solve().unwrap();

    let square = ctx
        .path()
        .move_to_var(a)
        .line_to_var(b)
        .line_to_var(c)
        .line_to_var(d)
        .close_straight()
        .build(&ctx)
        .unwrap();
    let bb: BoundingBox = square.bbox();
    assert_abs_diff_eq!(bb.llcorner().x, 1.0, epsilon = TOL);
    assert_abs_diff_eq!(bb.llcorner().y, 1.0, epsilon = TOL);
    assert_abs_diff_eq!(bb.urcorner().x, 4.0, epsilon = TOL);
    assert_abs_diff_eq!(bb.urcorner().y, 4.0, epsilon = TOL);
    assert_abs_diff_eq!(square.arc_length(), 12.0, epsilon = TOL);
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reversing_twice_is_identity(path in arb_path()) {
        assert_same_curve(&path.reversed().reversed(), &path);
    }

    #[test]
    fn shifting_back_is_identity(path in arb_path(), dx in -50.0f64..50.0, dy in -50.0f64..50.0) {
        assert_same_curve(&path.shifted(dx, dy).shifted(-dx, -dy), &path);
    }
}

#[test]
fn full_circle_wraps_around() {
    let c = fullcircle();
    let n = Scalar::from(u32::try_from(c.path_length()).unwrap());
    let (start, end) = (c.point_at(0.0).unwrap(), c.point_at(n).unwrap());
    assert_abs_diff_eq!(start.x, end.x, epsilon = 1e-12);
    assert_abs_diff_eq!(start.y, end.y, epsilon = 1e-12);
}

#[test]
fn arc_time_of_full_length_is_path_length() {
    let open = PathBuilder::new()
        .move_to(Point::new(0.0, 0.0))
        .curve_to(Point::new(3.0, 4.0))
        .curve_to(Point::new(7.0, -1.0))
        .build()
        .unwrap();
    for path in [unitsquare(), fullcircle(), open] {
        let n = Scalar::from(u32::try_from(path.path_length()).unwrap());
        let t = path.arc_time(path.arc_length()).unwrap();
        assert_abs_diff_eq!(t, n, epsilon = 1e-6);
    }
}

#[test]
fn infinite_tension_segment_is_straight() {
    let path = PathBuilder::new()
        .move_to(Point::new(0.0, 0.0))
        .tension_infinity()
        .curve_to(Point::new(6.0, 2.0))
        .build()
        .unwrap();
    let (p0, p3) = (path.knots()[0].point, path.knots()[1].point);
    let chord = p3 - p0;
    for c in [path.knots()[0].right, path.knots()[1].left] {
        assert_abs_diff_eq!(chord.cross(c - p0) / chord.length(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn build_cycle_of_square_sides() {
    let sides = [
        line((-1.0, 0.0), (5.0, 0.0)),
        line((4.0, -1.0), (4.0, 5.0)),
        line((5.0, 4.0), (-1.0, 4.0)),
        line((0.0, 5.0), (0.0, -1.0)),
    ];
    let region = build_cycle(&sides).unwrap();
    assert!(region.is_cyclic());
    let bb = region.bbox();
    assert_abs_diff_eq!(bb.llcorner().x, 0.0, epsilon = TOL);
    assert_abs_diff_eq!(bb.llcorner().y, 0.0, epsilon = TOL);
    assert_abs_diff_eq!(bb.urcorner().x, 4.0, epsilon = TOL);
    assert_abs_diff_eq!(bb.urcorner().y, 4.0, epsilon = TOL);
}

#[test]
fn not_found_is_not_an_error() {
    let a = line((0.0, 0.0), (1.0, 0.0));
    let b = line((0.0, 1.0), (1.0, 1.0));
    assert_eq!(a.intersection_times(&b), None);
    assert_eq!(a.direction_time_of(0.0, 1.0), None);
}
