//! Paths through solved points.
//!
//! [`VarPathBuilder`] accepts the same calls as
//! [`PathBuilder`](knotwork_graphics::PathBuilder), plus knots given as
//! [`Var`]s. Calls are recorded and replayed in [`VarPathBuilder::build`],
//! which is when the points' coordinates are read.

use knotwork_graphics::{
    Color, DashPattern, LineCap, LineJoin, Path, PathBuilder, Pen, Point, Scalar, Style,
};

use crate::context::{Context, Var};
use crate::error::SolveError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    At(Point),
    Var(Var),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    Move,
    Line,
    Curve,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Knot(Join, Target),
    Controls { to: Point, c1: Point, c2: Point },
    Dir(Scalar),
    InDir(Scalar),
    OutCurl(Scalar),
    InCurl(Scalar),
    Tension(Scalar),
    OutTension(Scalar),
    InTension(Scalar),
    TensionAtLeast(Scalar),
    TensionInfinity,
    Close,
    CloseStraight,
}

/// Path builder returned by [`Context::path`].
#[derive(Debug, Clone)]
pub struct VarPathBuilder {
    context: u32,
    ops: Vec<Op>,
    style: Style,
}

impl VarPathBuilder {
    pub(crate) fn new(context: u32) -> Self {
        Self {
            context,
            ops: Vec::new(),
            style: Style::default(),
        }
    }

    fn push(mut self, op: Op) -> Self {
        self.ops.push(op);
        self
    }

    // -----------------------------------------------------------------------
    // Knots
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn move_to_var(self, v: Var) -> Self {
        self.push(Op::Knot(Join::Move, Target::Var(v)))
    }

    #[must_use]
    pub fn line_to_var(self, v: Var) -> Self {
        self.push(Op::Knot(Join::Line, Target::Var(v)))
    }

    #[must_use]
    pub fn curve_to_var(self, v: Var) -> Self {
        self.push(Op::Knot(Join::Curve, Target::Var(v)))
    }

    #[must_use]
    pub fn move_to(self, p: Point) -> Self {
        self.push(Op::Knot(Join::Move, Target::At(p)))
    }

    #[must_use]
    pub fn line_to(self, p: Point) -> Self {
        self.push(Op::Knot(Join::Line, Target::At(p)))
    }

    #[must_use]
    pub fn curve_to(self, p: Point) -> Self {
        self.push(Op::Knot(Join::Curve, Target::At(p)))
    }

    #[must_use]
    pub fn curve_to_with_controls(self, p: Point, c1: Point, c2: Point) -> Self {
        self.push(Op::Controls { to: p, c1, c2 })
    }

    // -----------------------------------------------------------------------
    // Directions, curls and tensions
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn dir(self, degrees: Scalar) -> Self {
        self.push(Op::Dir(degrees))
    }

    #[must_use]
    pub fn in_dir(self, degrees: Scalar) -> Self {
        self.push(Op::InDir(degrees))
    }

    #[must_use]
    pub fn curl(self, amount: Scalar) -> Self {
        self.out_curl(amount)
    }

    #[must_use]
    pub fn out_curl(self, amount: Scalar) -> Self {
        self.push(Op::OutCurl(amount))
    }

    #[must_use]
    pub fn in_curl(self, amount: Scalar) -> Self {
        self.push(Op::InCurl(amount))
    }

    #[must_use]
    pub fn tension(self, value: Scalar) -> Self {
        self.push(Op::Tension(value))
    }

    #[must_use]
    pub fn out_tension(self, value: Scalar) -> Self {
        self.push(Op::OutTension(value))
    }

    #[must_use]
    pub fn in_tension(self, value: Scalar) -> Self {
        self.push(Op::InTension(value))
    }

    #[must_use]
    pub fn tension_at_least(self, value: Scalar) -> Self {
        self.push(Op::TensionAtLeast(value))
    }

    #[must_use]
    pub fn tension_infinity(self) -> Self {
        self.push(Op::TensionInfinity)
    }

    #[must_use]
    pub fn close(self) -> Self {
        self.push(Op::Close)
    }

    #[must_use]
    pub fn cycle(self) -> Self {
        self.close()
    }

    #[must_use]
    pub fn close_straight(self) -> Self {
        self.push(Op::CloseStraight)
    }

    // -----------------------------------------------------------------------
    // Style
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn stroke(mut self, color: Color) -> Self {
        self.style.set_stroke(color);
        self
    }

    #[must_use]
    pub fn stroke_width(mut self, width: Scalar) -> Self {
        self.style.set_stroke_width(width);
        self
    }

    #[must_use]
    pub fn fill(mut self, color: Color) -> Self {
        self.style.set_fill(color);
        self
    }

    #[must_use]
    pub fn pen(mut self, pen: Pen) -> Self {
        self.style.set_pen(pen);
        self
    }

    #[must_use]
    pub fn dash(mut self, dash: DashPattern) -> Self {
        self.style.set_dash(dash);
        self
    }

    #[must_use]
    pub fn evenly(self) -> Self {
        self.dash(DashPattern::evenly())
    }

    #[must_use]
    pub fn with_dots(self) -> Self {
        self.dash(DashPattern::with_dots())
    }

    #[must_use]
    pub fn arrow(mut self) -> Self {
        self.style.set_arrow();
        self
    }

    #[must_use]
    pub fn double_arrow(mut self) -> Self {
        self.style.set_double_arrow();
        self
    }

    #[must_use]
    pub fn arrow_style(mut self, length: Scalar, angle: Scalar) -> Self {
        self.style.set_arrow_style(length, angle);
        self
    }

    #[must_use]
    pub fn line_join(mut self, join: LineJoin) -> Self {
        self.style.set_line_join(join);
        self
    }

    #[must_use]
    pub fn line_cap(mut self, cap: LineCap) -> Self {
        self.style.set_line_cap(cap);
        self
    }

    // -----------------------------------------------------------------------
    // Finishing
    // -----------------------------------------------------------------------

    /// Read every point from `ctx` and resolve the path.
    ///
    /// Unknown points fail with [`SolveError::Unsolved`] unless `ctx` has
    /// been solved since they were last constrained.
    pub fn build(self, ctx: &Context) -> Result<Path, SolveError> {
        if self.context != ctx.id() {
            return Err(SolveError::ForeignVar);
        }
        let mut b = PathBuilder::new();
        for op in self.ops {
            b = match op {
                Op::Knot(join, target) => {
                    let p = match target {
                        Target::At(p) => p,
                        Target::Var(v) => ctx.point_of(v)?,
                    };
                    match join {
                        Join::Move => b.move_to(p),
                        Join::Line => b.line_to(p),
                        Join::Curve => b.curve_to(p),
                    }
                }
                Op::Controls { to, c1, c2 } => b.curve_to_with_controls(to, c1, c2),
                Op::Dir(degrees) => b.dir(degrees),
                Op::InDir(degrees) => b.in_dir(degrees),
                Op::OutCurl(amount) => b.out_curl(amount),
                Op::InCurl(amount) => b.in_curl(amount),
                Op::Tension(value) => b.tension(value),
                Op::OutTension(value) => b.out_tension(value),
                Op::InTension(value) => b.in_tension(value),
                Op::TensionAtLeast(value) => b.tension_at_least(value),
                Op::TensionInfinity => b.tension_infinity(),
                Op::Close => b.close(),
                Op::CloseStraight => b.close_straight(),
            };
        }
        Ok(b.with_style(self.style).build()?)
    }

    /// Same as [`build`](Self::build).
    pub fn solve(self, ctx: &Context) -> Result<Path, SolveError> {
        self.build(ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use knotwork_graphics::GraphicsError;

    use super::*;

    fn triangle() -> (Context, [Var; 3]) {
        let mut ctx = Context::new();
        let a = ctx.known(0.0, 0.0).unwrap();
        let b = ctx.known(4.0, 0.0).unwrap();
        let c = ctx.unknown();
        ctx.eqx(c, 2.0).unwrap().eqy(c, 3.0).unwrap();
        (ctx, [a, b, c])
    }

    #[test]
    fn reads_points_at_build_time() {
        let (mut ctx, [a, b, c]) = triangle();
        let builder = ctx.path().move_to_var(a).line_to_var(b).line_to_var(c).close_straight();
        ctx.solve().unwrap();
        let path = builder.build(&ctx).unwrap();
        assert!(path.is_cyclic());
        assert_eq!(path.path_length(), 3);
        assert_eq!(path.point_at(2.0).unwrap(), Point::new(2.0, 3.0));
    }

    #[test]
    fn unsolved_points_fail() {
        let (ctx, [a, _, c]) = triangle();
        let result = ctx.path().move_to_var(a).curve_to_var(c).build(&ctx);
        assert_eq!(result, Err(SolveError::Unsolved { var: 2 }));
    }

    #[test]
    fn mixes_points_and_vars() {
        let (mut ctx, [a, _, c]) = triangle();
        ctx.solve().unwrap();
        let path = ctx
            .path()
            .move_to_var(a)
            .dir(90.0)
            .curve_to(Point::new(1.0, 5.0))
            .curve_to_var(c)
            .build(&ctx)
            .unwrap();
        assert_eq!(path.path_length(), 2);
        let start = path.direction_at(0.0).unwrap();
        assert!(start.x.abs() < 1e-9 && start.y > 0.0);
    }

    #[test]
    fn style_travels_with_the_path() {
        let (mut ctx, [a, b, _]) = triangle();
        ctx.solve().unwrap();
        let path = ctx
            .path()
            .move_to_var(a)
            .line_to_var(b)
            .stroke(Color::rgb(1.0, 0.0, 0.0))
            .stroke_width(2.0)
            .arrow()
            .build(&ctx)
            .unwrap();
        let mut expected = Style::default();
        expected.set_stroke(Color::rgb(1.0, 0.0, 0.0));
        expected.set_stroke_width(2.0);
        expected.set_arrow();
        assert_eq!(path.style(), &expected);
    }

    #[test]
    fn builder_errors_pass_through() {
        let (mut ctx, [a, b, _]) = triangle();
        ctx.solve().unwrap();
        let result = ctx.path().move_to_var(a).tension(0.5).line_to_var(b).build(&ctx);
        assert!(matches!(
            result,
            Err(SolveError::Path(GraphicsError::InvalidTension { .. }))
        ));
    }

    #[test]
    fn other_context_is_rejected() {
        let (mut ctx, [a, b, _]) = triangle();
        ctx.solve().unwrap();
        let other = Context::new();
        let result = ctx.path().move_to_var(a).line_to_var(b).build(&other);
        assert_eq!(result, Err(SolveError::ForeignVar));
    }
}
