//! Geometric relations between points and the equations they stand for.
//!
//! Most relations are linear in the coordinates and turn into equations
//! straight away. Collinearity is bilinear: it becomes linear once two of
//! its three points are known, so the solver defers it until then. An
//! intersection of two lines is fixed directly when all four line points
//! are known; otherwise it is split into two collinear relations.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use knotwork_graphics::{Point, Scalar, Vec2};

use crate::context::Var;
use crate::equation::LinearForm;

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// One coordinate of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Self; 2] = [Self::X, Self::Y];

    pub(crate) const fn offset(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

// ---------------------------------------------------------------------------
// Points as pairs of linear forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
struct PointForm {
    x: LinearForm,
    y: LinearForm,
}

impl PointForm {
    fn of(v: Var) -> Self {
        Self {
            x: LinearForm::unknown(v.unknown(Axis::X)),
            y: LinearForm::unknown(v.unknown(Axis::Y)),
        }
    }

    const fn fixed(p: Point) -> Self {
        Self {
            x: LinearForm::constant(p.x),
            y: LinearForm::constant(p.y),
        }
    }

    /// `n.x · x + n.y · y`.
    fn dot(self, n: Vec2) -> LinearForm {
        self.x * n.x + self.y * n.y
    }

    fn into_equations(self) -> Vec<LinearForm> {
        vec![self.x, self.y]
    }

    fn on(self, axis: Axis) -> LinearForm {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

impl Add for PointForm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for PointForm {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<Scalar> for PointForm {
    type Output = Self;

    fn mul(self, rhs: Scalar) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

/// A registered relation between points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// `var.x = x` and/or `var.y = y`.
    Fix {
        var: Var,
        x: Option<Scalar>,
        y: Option<Scalar>,
    },
    /// `a = b` on one axis, or on both when `axis` is `None`.
    Equal { a: Var, b: Var, axis: Option<Axis> },
    /// `p = a + t·(b - a)`; a midpoint is `t = 0.5`.
    Between { p: Var, a: Var, b: Var, t: Scalar },
    /// `p` lies on the line through `a` and `b`.
    Collinear { p: Var, a: Var, b: Var },
    /// `p` is where line `a1 a2` meets line `b1 b2`.
    Intersection {
        p: Var,
        a1: Var,
        a2: Var,
        b1: Var,
        b2: Var,
    },
    /// `result = a + b`.
    Sum { result: Var, a: Var, b: Var },
    /// `result = a - b`.
    Diff { result: Var, a: Var, b: Var },
    /// `result = factor · v`.
    Scaled { result: Var, v: Var, factor: Scalar },
}

/// What a constraint contributes given the points known so far.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// Equations of the form `form = 0`.
    Equations(Vec<LinearForm>),
    /// Not linear yet; try again once more points are known.
    Waiting,
    /// The known points make the relation meaningless.
    Degenerate,
}

impl Constraint {
    /// Every point the relation mentions.
    #[must_use]
    pub fn vars(&self) -> Vec<Var> {
        match *self {
            Self::Fix { var, .. } => vec![var],
            Self::Equal { a, b, .. } => vec![a, b],
            Self::Between { p, a, b, .. } | Self::Collinear { p, a, b } => vec![p, a, b],
            Self::Intersection { p, a1, a2, b1, b2 } => vec![p, a1, a2, b1, b2],
            Self::Sum { result, a, b } | Self::Diff { result, a, b } => vec![result, a, b],
            Self::Scaled { result, v, .. } => vec![result, v],
        }
    }

    /// Whether the relation is linear in the unknown coordinates.
    #[must_use]
    pub const fn is_linear(&self) -> bool {
        !matches!(self, Self::Collinear { .. } | Self::Intersection { .. })
    }

    /// Turn the relation into equations. `known` gives the value of a
    /// point whose coordinates are both determined.
    pub(crate) fn linearize(
        &self,
        known: impl Fn(Var) -> Option<Point>,
        degenerate: Scalar,
    ) -> Step {
        match *self {
            Self::Fix { var, x, y } => {
                let target = PointForm::of(var);
                let mut forms = Vec::with_capacity(2);
                for (axis, value) in [(Axis::X, x), (Axis::Y, y)] {
                    if let Some(value) = value {
                        forms.push(target.clone().on(axis) - LinearForm::constant(value));
                    }
                }
                Step::Equations(forms)
            }
            Self::Equal { a, b, axis } => {
                let gap = PointForm::of(a) - PointForm::of(b);
                match axis {
                    Some(axis) => Step::Equations(vec![gap.on(axis)]),
                    None => Step::Equations(gap.into_equations()),
                }
            }
            Self::Between { p, a, b, t } => {
                let at = PointForm::of(a) * (1.0 - t) + PointForm::of(b) * t;
                Step::Equations((PointForm::of(p) - at).into_equations())
            }
            Self::Sum { result, a, b } => Step::Equations(
                (PointForm::of(result) - (PointForm::of(a) + PointForm::of(b))).into_equations(),
            ),
            Self::Diff { result, a, b } => Step::Equations(
                (PointForm::of(result) - (PointForm::of(a) - PointForm::of(b))).into_equations(),
            ),
            Self::Scaled { result, v, factor } => Step::Equations(
                (PointForm::of(result) - PointForm::of(v) * factor).into_equations(),
            ),
            Self::Collinear { p, a, b } => collinear(p, a, b, &known, degenerate),
            Self::Intersection { p, a1, a2, b1, b2 } => {
                let (Some(a1), Some(a2), Some(b1), Some(b2)) =
                    (known(a1), known(a2), known(b1), known(b2))
                else {
                    return Step::Waiting;
                };
                line_intersection(a1, a2, b1, b2, degenerate).map_or(Step::Degenerate, |x| {
                    Step::Equations((PointForm::of(p) - PointForm::fixed(x)).into_equations())
                })
            }
        }
    }

    /// An intersection as two collinear relations, one per line.
    #[must_use]
    pub(crate) const fn split(&self) -> Option<[Self; 2]> {
        match *self {
            Self::Intersection { p, a1, a2, b1, b2 } => Some([
                Self::Collinear { p, a: a1, b: a2 },
                Self::Collinear { p, a: b1, b: b2 },
            ]),
            _ => None,
        }
    }
}

/// `p` on line `a b`, linear in whichever point is still unknown.
///
/// Equations are scaled so their residual is a distance.
fn collinear(
    p: Var,
    a: Var,
    b: Var,
    known: &impl Fn(Var) -> Option<Point>,
    degenerate: Scalar,
) -> Step {
    let on_line = |free: Var, through: Point, along: Vec2| {
        let n = Vec2::new(-along.y, along.x) / along.length();
        Step::Equations(vec![
            PointForm::of(free).dot(n) - LinearForm::constant(n.dot(through.to_vec2())),
        ])
    };

    match (known(p), known(a), known(b)) {
        (_, Some(pa), Some(pb)) => {
            let along = pb - pa;
            if along.length() <= degenerate {
                Step::Degenerate
            } else {
                on_line(p, pa, along)
            }
        }
        // With p and one line point known, the other line point must lie
        // on the line through them. Coincident known points constrain
        // nothing.
        (Some(pp), Some(pa), None) => {
            let along = pp - pa;
            if along.length() <= degenerate {
                Step::Equations(Vec::new())
            } else {
                on_line(b, pa, along)
            }
        }
        (Some(pp), None, Some(pb)) => {
            let along = pp - pb;
            if along.length() <= degenerate {
                Step::Equations(Vec::new())
            } else {
                on_line(a, pb, along)
            }
        }
        _ => Step::Waiting,
    }
}

/// Where line `a1 a2` meets line `b1 b2`; `None` for parallel lines or a
/// line through two coincident points.
fn line_intersection(a1: Point, a2: Point, b1: Point, b2: Point, tol: Scalar) -> Option<Point> {
    let (da, db) = (a2 - a1, b2 - b1);
    let (la, lb) = (da.length(), db.length());
    if la <= tol || lb <= tol {
        return None;
    }
    let det = da.cross(db);
    if det.abs() <= tol * la * lb {
        return None;
    }
    let s = (b1 - a1).cross(db) / det;
    Some(a1 + da * s)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
