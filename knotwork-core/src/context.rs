//! Points with unknown coordinates and the relations between them.
//!
//! A [`Context`] hands out [`Var`] handles, records constraints on them and
//! resolves every coordinate at once in [`Context::solve`]:
//!
//! ```
//! use knotwork_core::Context;
//!
//! let mut ctx = Context::new();
//! let a = ctx.known(0.0, 0.0)?;
//! let b = ctx.known(10.0, 0.0)?;
//! let m = ctx.midpoint_of(a, b)?;
//! ctx.solve()?;
//! assert_eq!(ctx.xy(m)?, (5.0, 0.0));
//! # Ok::<(), knotwork_core::SolveError>(())
//! ```
//!
//! Registration checks its arguments straight away and leaves the context
//! untouched on failure. Underdetermined, inconsistent and degenerate
//! systems are only discovered by `solve`, which rebuilds the whole
//! equation system from the registered constraints every time.

use std::sync::atomic::{AtomicU32, Ordering};

use knotwork_graphics::{Point, Scalar};
use tracing::debug;

use crate::constraint::{Axis, Constraint, Step};
use crate::equation::{LinearForm, LinearSystem, Outcome, UnknownId};
use crate::error::SolveError;
use crate::path::VarPathBuilder;

static NEXT_CONTEXT: AtomicU32 = AtomicU32::new(1);

// ---------------------------------------------------------------------------
// Var
// ---------------------------------------------------------------------------

/// Handle to a point owned by a [`Context`].
///
/// The handle is a plain index. Its coordinates are read through the
/// context that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Var {
    context: u32,
    index: usize,
}

impl Var {
    /// Creation order within the owning context.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    pub(crate) const fn unknown(self, axis: Axis) -> UnknownId {
        UnknownId(self.index * 2 + axis.offset())
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Numeric tolerances used by [`Context::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Coefficients at or below this magnitude are dropped.
    pub coefficient_threshold: Scalar,
    /// Largest residual an equation may leave and still count as satisfied.
    pub consistency_tolerance: Scalar,
    /// Two lines are parallel when the sine of the angle between them is at
    /// or below this; line points closer than this coincide.
    pub parallel_tolerance: Scalar,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            coefficient_threshold: 1e-9,
            consistency_tolerance: 1e-6,
            parallel_tolerance: 1e-9,
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Owner of a set of points and the constraints between them.
#[derive(Debug, Clone)]
pub struct Context {
    id: u32,
    config: SolverConfig,
    /// Coordinates given at creation or through `set_*`, per point.
    seeds: Vec<[Option<Scalar>; 2]>,
    constraints: Vec<Constraint>,
    /// Two values per point, valid until the next change.
    solution: Option<Vec<Scalar>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    #[must_use]
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            id: NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed),
            config,
            seeds: Vec::new(),
            constraints: Vec::new(),
            solution: None,
        }
    }

    pub(crate) const fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Number of points created so far.
    #[must_use]
    pub fn var_count(&self) -> usize {
        self.seeds.len()
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether the last [`solve`](Self::solve) succeeded and nothing has
    /// changed since.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    // -----------------------------------------------------------------------
    // Points
    // -----------------------------------------------------------------------

    fn alloc(&mut self, seed: [Option<Scalar>; 2]) -> Var {
        self.solution = None;
        self.seeds.push(seed);
        Var {
            context: self.id,
            index: self.seeds.len() - 1,
        }
    }

    /// A point with both coordinates unknown.
    pub fn unknown(&mut self) -> Var {
        self.alloc([None, None])
    }

    /// Same as [`unknown`](Self::unknown).
    pub fn point(&mut self) -> Var {
        self.unknown()
    }

    /// A point fixed at `(x, y)`.
    pub fn known(&mut self, x: Scalar, y: Scalar) -> Result<Var, SolveError> {
        finite(x, "coordinate")?;
        finite(y, "coordinate")?;
        Ok(self.alloc([Some(x), Some(y)]))
    }

    /// `n` unknown points, in order.
    pub fn points(&mut self, n: usize) -> Vec<Var> {
        (0..n).map(|_| self.unknown()).collect()
    }

    // -----------------------------------------------------------------------
    // Constraints
    // -----------------------------------------------------------------------

    fn check(&self, vars: &[Var]) -> Result<(), SolveError> {
        if vars
            .iter()
            .all(|v| v.context == self.id && v.index < self.seeds.len())
        {
            Ok(())
        } else {
            Err(SolveError::ForeignVar)
        }
    }

    fn register(&mut self, constraint: Constraint) -> Result<&mut Self, SolveError> {
        self.check(&constraint.vars())?;
        self.solution = None;
        self.constraints.push(constraint);
        Ok(self)
    }

    /// `v = p`.
    pub fn eq(&mut self, v: Var, p: Point) -> Result<&mut Self, SolveError> {
        finite(p.x, "coordinate")?;
        finite(p.y, "coordinate")?;
        self.register(Constraint::Fix {
            var: v,
            x: Some(p.x),
            y: Some(p.y),
        })
    }

    /// `v.x = x`.
    pub fn eqx(&mut self, v: Var, x: Scalar) -> Result<&mut Self, SolveError> {
        finite(x, "coordinate")?;
        self.register(Constraint::Fix {
            var: v,
            x: Some(x),
            y: None,
        })
    }

    /// `v.y = y`.
    pub fn eqy(&mut self, v: Var, y: Scalar) -> Result<&mut Self, SolveError> {
        finite(y, "coordinate")?;
        self.register(Constraint::Fix {
            var: v,
            x: None,
            y: Some(y),
        })
    }

    /// `a = b`.
    pub fn eqvar(&mut self, a: Var, b: Var) -> Result<&mut Self, SolveError> {
        self.register(Constraint::Equal { a, b, axis: None })
    }

    /// `a.x = b.x`.
    pub fn eqvarx(&mut self, a: Var, b: Var) -> Result<&mut Self, SolveError> {
        self.register(Constraint::Equal {
            a,
            b,
            axis: Some(Axis::X),
        })
    }

    /// `a.y = b.y`.
    pub fn eqvary(&mut self, a: Var, b: Var) -> Result<&mut Self, SolveError> {
        self.register(Constraint::Equal {
            a,
            b,
            axis: Some(Axis::Y),
        })
    }

    /// `m = (a + b) / 2`.
    pub fn midpoint(&mut self, m: Var, a: Var, b: Var) -> Result<&mut Self, SolveError> {
        self.between(m, a, b, 0.5)
    }

    /// A new point halfway between `a` and `b`.
    pub fn midpoint_of(&mut self, a: Var, b: Var) -> Result<Var, SolveError> {
        self.between_at(a, b, 0.5)
    }

    /// `p = a + t·(b - a)`; `t` may lie outside [0, 1].
    pub fn between(&mut self, p: Var, a: Var, b: Var, t: Scalar) -> Result<&mut Self, SolveError> {
        finite(t, "interpolation factor")?;
        self.register(Constraint::Between { p, a, b, t })
    }

    /// A new point at `a + t·(b - a)`.
    pub fn between_at(&mut self, a: Var, b: Var, t: Scalar) -> Result<Var, SolveError> {
        self.check(&[a, b])?;
        finite(t, "interpolation factor")?;
        let p = self.unknown();
        self.register(Constraint::Between { p, a, b, t })?;
        Ok(p)
    }

    /// `p` lies on the line through `a` and `b`.
    pub fn collinear(&mut self, p: Var, a: Var, b: Var) -> Result<&mut Self, SolveError> {
        self.register(Constraint::Collinear { p, a, b })
    }

    /// `p` is the intersection of line `a1 a2` with line `b1 b2`.
    ///
    /// Parallel lines surface as [`SolveError::DegenerateGeometry`] from
    /// [`solve`](Self::solve).
    pub fn intersection(
        &mut self,
        p: Var,
        a1: Var,
        a2: Var,
        b1: Var,
        b2: Var,
    ) -> Result<&mut Self, SolveError> {
        self.register(Constraint::Intersection { p, a1, a2, b1, b2 })
    }

    /// A new point where line `a1 a2` meets line `b1 b2`.
    pub fn intersection_of(&mut self, a1: Var, a2: Var, b1: Var, b2: Var) -> Result<Var, SolveError> {
        self.check(&[a1, a2, b1, b2])?;
        let p = self.unknown();
        self.register(Constraint::Intersection { p, a1, a2, b1, b2 })?;
        Ok(p)
    }

    /// `result = a + b`.
    pub fn sum(&mut self, result: Var, a: Var, b: Var) -> Result<&mut Self, SolveError> {
        self.register(Constraint::Sum { result, a, b })
    }

    /// `result = a - b`.
    pub fn diff(&mut self, result: Var, a: Var, b: Var) -> Result<&mut Self, SolveError> {
        self.register(Constraint::Diff { result, a, b })
    }

    /// `result = factor · v`.
    pub fn scaled(&mut self, result: Var, v: Var, factor: Scalar) -> Result<&mut Self, SolveError> {
        finite(factor, "scale factor")?;
        self.register(Constraint::Scaled { result, v, factor })
    }

    // -----------------------------------------------------------------------
    // Solving
    // -----------------------------------------------------------------------

    /// Resolve every coordinate from scratch.
    ///
    /// Fails without a partial result: afterwards either every point has a
    /// value or [`is_solved`](Self::is_solved) is false.
    pub fn solve(&mut self) -> Result<&mut Self, SolveError> {
        debug!(
            vars = self.seeds.len(),
            constraints = self.constraints.len(),
            "solving context"
        );
        self.solution = None;
        let mut system = LinearSystem::new(
            self.seeds.len() * 2,
            self.config.coefficient_threshold,
            self.config.consistency_tolerance,
        );

        for (index, seed) in self.seeds.iter().enumerate() {
            let var = Var {
                context: self.id,
                index,
            };
            for axis in Axis::BOTH {
                if let Some(value) = seed[axis.offset()] {
                    let form = LinearForm::unknown(var.unknown(axis)) - LinearForm::constant(value);
                    let outcome = system.add_equation(&form);
                    debug_assert!(
                        matches!(outcome, Outcome::Pivoted(_)),
                        "seed for var {index} did not pivot: {outcome:?}"
                    );
                }
            }
        }

        let mut pending: Vec<(usize, Constraint)> =
            self.constraints.iter().copied().enumerate().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::with_capacity(before);
            for (index, constraint) in pending {
                let step = constraint.linearize(
                    |v| known_point(&system, v),
                    self.config.parallel_tolerance,
                );
                match step {
                    Step::Equations(forms) => {
                        if !constraint.is_linear() {
                            debug!(constraint = index, "nonlinear constraint became linear");
                        }
                        for form in &forms {
                            add_equation(&mut system, index, form)?;
                        }
                    }
                    Step::Waiting => waiting.push((index, constraint)),
                    Step::Degenerate => {
                        return Err(SolveError::DegenerateGeometry { constraint: index });
                    }
                }
            }
            pending = waiting;

            if pending.len() == before {
                // Stuck: fall back on one intersection's two collinear halves.
                let Some(pos) = pending.iter().position(|(_, c)| c.split().is_some()) else {
                    break;
                };
                let (index, constraint) = pending.remove(pos);
                if let Some(halves) = constraint.split() {
                    debug!(constraint = index, "splitting intersection into two lines");
                    pending.extend(halves.map(|half| (index, half)));
                }
            }
        }

        let mut values = Vec::with_capacity(system.len());
        for index in 0..self.seeds.len() {
            let var = Var {
                context: self.id,
                index,
            };
            for axis in Axis::BOTH {
                let value = system
                    .value(var.unknown(axis))
                    .ok_or(SolveError::Underdetermined { var: index, axis })?;
                values.push(value);
            }
        }

        debug!(vars = self.seeds.len(), "context solved");
        self.solution = Some(values);
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Reading and writing coordinates
    // -----------------------------------------------------------------------

    fn coordinate(&self, v: Var, axis: Axis) -> Result<Scalar, SolveError> {
        self.check(&[v])?;
        let solved = self
            .solution
            .as_ref()
            .and_then(|values| values.get(v.unknown(axis).index()).copied());
        solved
            .or(self.seeds[v.index][axis.offset()])
            .ok_or(SolveError::Unsolved { var: v.index })
    }

    /// `v.x`, fixed or solved.
    pub fn x(&self, v: Var) -> Result<Scalar, SolveError> {
        self.coordinate(v, Axis::X)
    }

    /// `v.y`, fixed or solved.
    pub fn y(&self, v: Var) -> Result<Scalar, SolveError> {
        self.coordinate(v, Axis::Y)
    }

    pub fn xy(&self, v: Var) -> Result<(Scalar, Scalar), SolveError> {
        Ok((self.x(v)?, self.y(v)?))
    }

    /// Snapshot of `v` as a [`Point`].
    pub fn point_of(&self, v: Var) -> Result<Point, SolveError> {
        let (x, y) = self.xy(v)?;
        Ok(Point::new(x, y))
    }

    fn seed(&mut self, v: Var, axis: Axis, value: Scalar) -> Result<&mut Self, SolveError> {
        self.check(&[v])?;
        finite(value, "coordinate")?;
        self.seeds[v.index][axis.offset()] = Some(value);
        self.solution = None;
        Ok(self)
    }

    /// Fix `v.x` to `x` from now on.
    pub fn set_x(&mut self, v: Var, x: Scalar) -> Result<&mut Self, SolveError> {
        self.seed(v, Axis::X, x)
    }

    /// Fix `v.y` to `y` from now on.
    pub fn set_y(&mut self, v: Var, y: Scalar) -> Result<&mut Self, SolveError> {
        self.seed(v, Axis::Y, y)
    }

    pub fn set_xy(&mut self, v: Var, x: Scalar, y: Scalar) -> Result<&mut Self, SolveError> {
        finite(y, "coordinate")?;
        self.set_x(v, x)?.set_y(v, y)
    }

    /// A path builder whose knots may be points of this context.
    ///
    /// Points are read when the path is built, so build after solving.
    #[must_use]
    pub fn path(&self) -> VarPathBuilder {
        VarPathBuilder::new(self.id)
    }
}

fn finite(value: Scalar, what: &'static str) -> Result<(), SolveError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SolveError::NonFinite { what })
    }
}

fn known_point(system: &LinearSystem, v: Var) -> Option<Point> {
    Some(Point::new(
        system.value(v.unknown(Axis::X))?,
        system.value(v.unknown(Axis::Y))?,
    ))
}

fn add_equation(
    system: &mut LinearSystem,
    constraint: usize,
    form: &LinearForm,
) -> Result<(), SolveError> {
    match system.add_equation(form) {
        Outcome::Inconsistent(residual) => Err(SolveError::Inconsistent {
            constraint,
            residual,
        }),
        Outcome::Pivoted(_) | Outcome::Redundant => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (Scalar, Scalar), b: (Scalar, Scalar)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn fixes_coordinates() {
        let mut ctx = Context::new();
        let v = ctx.unknown();
        ctx.eqx(v, 3.0).unwrap().eqy(v, 4.0).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(v).unwrap(), (3.0, 4.0)));
    }

    #[test]
    fn midpoint_of_known_points() {
        let mut ctx = Context::new();
        let m = ctx.unknown();
        let a = ctx.known(0.0, 0.0).unwrap();
        let b = ctx.known(10.0, 0.0).unwrap();
        ctx.midpoint(m, a, b).unwrap().solve().unwrap();
        assert!(close(ctx.xy(m).unwrap(), (5.0, 0.0)));
    }

    #[test]
    fn solves_backwards_through_relations() {
        // Known midpoint and one end give the other end.
        let mut ctx = Context::new();
        let a = ctx.known(2.0, 2.0).unwrap();
        let b = ctx.unknown();
        let m = ctx.midpoint_of(a, b).unwrap();
        ctx.eq(m, Point::new(5.0, 3.0)).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(b).unwrap(), (8.0, 4.0)));
    }

    #[test]
    fn vector_arithmetic() {
        let mut ctx = Context::new();
        let a = ctx.known(1.0, 2.0).unwrap();
        let b = ctx.known(3.0, -1.0).unwrap();
        let [s, d, k] = [ctx.unknown(), ctx.unknown(), ctx.unknown()];
        ctx.sum(s, a, b)
            .unwrap()
            .diff(d, a, b)
            .unwrap()
            .scaled(k, a, 2.5)
            .unwrap()
            .solve()
            .unwrap();
        assert!(close(ctx.xy(s).unwrap(), (4.0, 1.0)));
        assert!(close(ctx.xy(d).unwrap(), (-2.0, 3.0)));
        assert!(close(ctx.xy(k).unwrap(), (2.5, 5.0)));
    }

    #[test]
    fn between_extrapolates() {
        let mut ctx = Context::new();
        let a = ctx.known(0.0, 0.0).unwrap();
        let b = ctx.known(4.0, 2.0).unwrap();
        let p = ctx.between_at(a, b, 1.5).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(p).unwrap(), (6.0, 3.0)));
    }

    #[test]
    fn axis_equalities() {
        let mut ctx = Context::new();
        let a = ctx.known(7.0, 1.0).unwrap();
        let b = ctx.known(2.0, 9.0).unwrap();
        let p = ctx.unknown();
        ctx.eqvarx(p, a).unwrap().eqvary(p, b).unwrap();
        let q = ctx.unknown();
        ctx.eqvar(q, p).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(p).unwrap(), (7.0, 9.0)));
        assert!(close(ctx.xy(q).unwrap(), (7.0, 9.0)));
    }

    #[test]
    fn intersection_of_known_lines() {
        let mut ctx = Context::new();
        let a1 = ctx.known(0.0, 0.0).unwrap();
        let a2 = ctx.known(10.0, 10.0).unwrap();
        let b1 = ctx.known(0.0, 10.0).unwrap();
        let b2 = ctx.known(10.0, 0.0).unwrap();
        let p = ctx.intersection_of(a1, a2, b1, b2).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(p).unwrap(), (5.0, 5.0)));
    }

    #[test]
    fn parallel_lines_are_degenerate() {
        let mut ctx = Context::new();
        let a1 = ctx.known(0.0, 0.0).unwrap();
        let a2 = ctx.known(1.0, 0.0).unwrap();
        let b1 = ctx.known(0.0, 1.0).unwrap();
        let b2 = ctx.known(1.0, 1.0).unwrap();
        let p = ctx.unknown();
        ctx.intersection(p, a1, a2, b1, b2).unwrap();
        assert_eq!(
            ctx.solve().unwrap_err(),
            SolveError::DegenerateGeometry { constraint: 0 }
        );
        assert!(!ctx.is_solved());
    }

    #[test]
    fn intersection_waits_for_its_lines() {
        // a2 is only known through a midpoint registered afterwards.
        let mut ctx = Context::new();
        let a1 = ctx.known(0.0, 0.0).unwrap();
        let a2 = ctx.unknown();
        let b1 = ctx.known(0.0, 4.0).unwrap();
        let b2 = ctx.known(4.0, 0.0).unwrap();
        let p = ctx.intersection_of(a1, a2, b1, b2).unwrap();
        let far = ctx.known(6.0, 6.0).unwrap();
        ctx.midpoint(a2, a1, far).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(p).unwrap(), (2.0, 2.0)));
    }

    #[test]
    fn intersection_with_partly_known_point() {
        // p.x is fixed and one line is unknown except for a direction.
        let mut ctx = Context::new();
        let a1 = ctx.known(0.0, 0.0).unwrap();
        let a2 = ctx.known(1.0, 1.0).unwrap();
        let b1 = ctx.known(0.0, 10.0).unwrap();
        let b2 = ctx.unknown();
        let p = ctx.intersection_of(a1, a2, b1, b2).unwrap();
        ctx.eqx(p, 3.0).unwrap();
        ctx.eqx(b2, 6.0).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(p).unwrap(), (3.0, 3.0)));
        // b2 lies on the line from (0, 10) through (3, 3).
        let (x, y) = ctx.xy(b2).unwrap();
        assert!((x - 6.0).abs() < 1e-9);
        assert!((y - (10.0 - 14.0)).abs() < 1e-9, "y = {y}");
    }

    #[test]
    fn collinear_leaves_one_freedom() {
        let mut ctx = Context::new();
        let a = ctx.known(0.0, 0.0).unwrap();
        let b = ctx.known(2.0, 1.0).unwrap();
        let p = ctx.unknown();
        ctx.collinear(p, a, b).unwrap();
        assert_eq!(
            ctx.solve().unwrap_err(),
            SolveError::Underdetermined {
                var: 2,
                axis: Axis::X
            }
        );
        ctx.eqx(p, 6.0).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(p).unwrap(), (6.0, 3.0)));
    }

    #[test]
    fn collinear_through_coincident_points_is_degenerate() {
        let mut ctx = Context::new();
        let a = ctx.known(1.0, 1.0).unwrap();
        let b = ctx.known(1.0, 1.0).unwrap();
        let p = ctx.known(3.0, 0.0).unwrap();
        ctx.collinear(p, a, b).unwrap();
        assert_eq!(
            ctx.solve().unwrap_err(),
            SolveError::DegenerateGeometry { constraint: 0 }
        );
    }

    #[test]
    fn non_collinear_known_points_are_inconsistent() {
        let mut ctx = Context::new();
        let a = ctx.known(0.0, 0.0).unwrap();
        let b = ctx.known(1.0, 0.0).unwrap();
        let p = ctx.known(0.5, 2.0).unwrap();
        ctx.collinear(p, a, b).unwrap();
        assert!(matches!(
            ctx.solve(),
            Err(SolveError::Inconsistent { constraint: 0, .. })
        ));
    }

    #[test]
    fn lone_unknown_is_underdetermined() {
        let mut ctx = Context::new();
        let v = ctx.unknown();
        assert_eq!(
            ctx.solve().unwrap_err(),
            SolveError::Underdetermined {
                var: 0,
                axis: Axis::X
            }
        );
        assert_eq!(ctx.x(v), Err(SolveError::Unsolved { var: 0 }));
    }

    #[test]
    fn seeds_pivot_on_their_own_unknowns() {
        let mut ctx = Context::new();
        // Equal seeds on different points, interleaved with a free point.
        let a = ctx.known(2.0, 2.0).unwrap();
        let free = ctx.unknown();
        let b = ctx.known(2.0, 2.0).unwrap();
        let c = ctx.known(-1.0, 0.0).unwrap();
        ctx.midpoint_of(free, b).unwrap();
        ctx.eqvar(free, c).unwrap();
        ctx.solve().unwrap();
        assert!(close(ctx.xy(a).unwrap(), (2.0, 2.0)));
        assert!(close(ctx.xy(b).unwrap(), (2.0, 2.0)));
        assert!(close(ctx.xy(free).unwrap(), (-1.0, 0.0)));
    }

    #[test]
    fn conflicting_values_are_inconsistent() {
        let mut ctx = Context::new();
        let v = ctx.known(1.0, 1.0).unwrap();
        ctx.eqx(v, 1.0).unwrap();
        ctx.eqy(v, 2.0).unwrap();
        match ctx.solve() {
            Err(SolveError::Inconsistent {
                constraint,
                residual,
            }) => {
                assert_eq!(constraint, 1);
                assert!((residual.abs() - 1.0).abs() < 1e-12);
            }
            other => panic!("expected Inconsistent, got {other:?}"),
        }
    }

    #[test]
    fn foreign_vars_are_rejected_without_side_effects() {
        let mut first = Context::new();
        let mut second = Context::new();
        let v = first.unknown();
        let w = second.unknown();
        assert_eq!(second.eqvar(v, w).err(), Some(SolveError::ForeignVar));
        assert!(second.constraints().is_empty());
        assert_eq!(second.midpoint_of(v, w), Err(SolveError::ForeignVar));
        assert_eq!(second.var_count(), 1);
        assert_eq!(second.x(v), Err(SolveError::ForeignVar));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut ctx = Context::new();
        assert_eq!(
            ctx.known(Scalar::NAN, 0.0),
            Err(SolveError::NonFinite { what: "coordinate" })
        );
        let v = ctx.unknown();
        assert!(ctx.eqx(v, Scalar::INFINITY).is_err());
        assert!(ctx.constraints().is_empty());
    }

    #[test]
    fn reads_before_solving() {
        let mut ctx = Context::new();
        let k = ctx.known(1.0, 2.0).unwrap();
        let u = ctx.unknown();
        assert_eq!(ctx.point_of(k), Ok(Point::new(1.0, 2.0)));
        assert_eq!(ctx.y(u), Err(SolveError::Unsolved { var: 1 }));
    }

    #[test]
    fn changes_invalidate_and_resolve() {
        let mut ctx = Context::new();
        let a = ctx.known(0.0, 0.0).unwrap();
        let b = ctx.known(2.0, 0.0).unwrap();
        let m = ctx.midpoint_of(a, b).unwrap();
        ctx.solve().unwrap();
        assert!(ctx.is_solved());
        assert!(close(ctx.xy(m).unwrap(), (1.0, 0.0)));

        ctx.set_xy(b, 4.0, 4.0).unwrap();
        assert!(!ctx.is_solved());
        assert!(ctx.x(m).is_err());
        ctx.solve().unwrap();
        assert!(close(ctx.xy(m).unwrap(), (2.0, 2.0)));
    }

    #[test]
    fn points_come_in_order() {
        let mut ctx = Context::new();
        let vars = ctx.points(3);
        let indices: Vec<usize> = vars.iter().map(|v| v.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let extra = ctx.point();
        assert_eq!(extra.index(), 3);
    }
}
