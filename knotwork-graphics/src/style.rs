//! Drawing attributes carried by a path.
//!
//! None of these values take part in path algebra. They ride along with a
//! [`Path`](crate::path::Path) so renderers can stroke and fill it.

use std::fmt;
use std::str::FromStr;

use crate::error::GraphicsError;
use crate::types::Scalar;

/// `MetaPost`'s default arrowhead length (`ahlength`).
pub const DEFAULT_ARROW_LENGTH: Scalar = 4.0;

/// `MetaPost`'s default arrowhead angle in degrees (`ahangle`).
pub const DEFAULT_ARROW_ANGLE: Scalar = 45.0;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: Scalar,
    pub g: Scalar,
    pub b: Scalar,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[inline]
    pub const fn rgb(r: Scalar, g: Scalar, b: Scalar) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn gray(level: Scalar) -> Self {
        Self::rgb(level, level, level)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// ---------------------------------------------------------------------------
// Pen
// ---------------------------------------------------------------------------

/// Pen nib shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pen {
    /// `pencircle scaled diameter`.
    Circle { diameter: Scalar },
    /// `pensquare scaled size`.
    Square { size: Scalar },
    /// `penrazor scaled size rotated angle`, angle in degrees.
    Razor { size: Scalar, angle: Scalar },
    /// `penspeck`: a tiny nib for marking points.
    Speck,
}

impl Pen {
    #[inline]
    pub const fn circle(diameter: Scalar) -> Self {
        Self::Circle { diameter }
    }

    #[inline]
    pub const fn square(size: Scalar) -> Self {
        Self::Square { size }
    }

    #[inline]
    pub const fn razor(size: Scalar) -> Self {
        Self::Razor { size, angle: 0.0 }
    }

    #[inline]
    pub const fn razor_rotated(size: Scalar, angle: Scalar) -> Self {
        Self::Razor { size, angle }
    }

    #[inline]
    pub const fn speck() -> Self {
        Self::Speck
    }
}

impl Default for Pen {
    /// `pencircle scaled 0.5bp`, the plain format's default pen.
    fn default() -> Self {
        Self::circle(0.5)
    }
}

// ---------------------------------------------------------------------------
// DashPattern
// ---------------------------------------------------------------------------

/// A dash pattern: alternating on/off lengths with an offset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashPattern {
    /// Alternating on, off, on, off, ... lengths.
    pub dashes: Vec<Scalar>,
    /// Starting offset into the pattern.
    pub offset: Scalar,
}

impl DashPattern {
    pub fn new(dashes: impl Into<Vec<Scalar>>) -> Self {
        Self {
            dashes: dashes.into(),
            offset: 0.0,
        }
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: Scalar) -> Self {
        self.offset = offset;
        self
    }

    /// `dashpattern(on 3 off 3)`.
    pub fn evenly() -> Self {
        Self::new([3.0, 3.0])
    }

    /// `dashpattern(off 2.5 on 0 off 2.5)`: round dots when stroked with
    /// a round cap.
    pub fn with_dots() -> Self {
        Self::new([0.0, 5.0]).with_offset(2.5)
    }
}

// ---------------------------------------------------------------------------
// Arrows
// ---------------------------------------------------------------------------

/// Arrowheads at either end of a stroked path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arrow {
    pub at_start: bool,
    pub at_end: bool,
    pub length: Scalar,
    /// Opening angle of the head, in degrees.
    pub angle: Scalar,
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            at_start: false,
            at_end: false,
            length: DEFAULT_ARROW_LENGTH,
            angle: DEFAULT_ARROW_ANGLE,
        }
    }
}

// ---------------------------------------------------------------------------
// LineCap / LineJoin
// ---------------------------------------------------------------------------

/// Stroke line-cap styles (matches SVG / PostScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl FromStr for LineCap {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(Self::Butt),
            "round" | "rounded" => Ok(Self::Round),
            "square" | "squared" => Ok(Self::Square),
            other => Err(GraphicsError::UnknownKeyword {
                kind: "line cap",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for LineCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        })
    }
}

/// Stroke line-join styles (matches SVG / PostScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

impl FromStr for LineJoin {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" | "mitered" => Ok(Self::Miter),
            "round" | "rounded" => Ok(Self::Round),
            "bevel" | "beveled" => Ok(Self::Bevel),
            other => Err(GraphicsError::UnknownKeyword {
                kind: "line join",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for LineJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        })
    }
}

// ---------------------------------------------------------------------------
// Style bag
// ---------------------------------------------------------------------------

/// Everything a renderer needs besides geometry. Unset fields defer to the
/// renderer's defaults.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub stroke: Option<Color>,
    pub stroke_width: Option<Scalar>,
    pub fill: Option<Color>,
    pub pen: Option<Pen>,
    pub dash: Option<DashPattern>,
    pub arrow: Arrow,
    pub line_join: Option<LineJoin>,
    pub line_cap: Option<LineCap>,
}

impl Style {
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke = Some(color);
    }

    pub fn set_stroke_width(&mut self, width: Scalar) {
        self.stroke_width = Some(width);
    }

    pub fn set_fill(&mut self, color: Color) {
        self.fill = Some(color);
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = Some(pen);
    }

    pub fn set_dash(&mut self, dash: DashPattern) {
        self.dash = Some(dash);
    }

    /// Arrowhead at the end only.
    pub fn set_arrow(&mut self) {
        self.arrow.at_end = true;
    }

    /// Arrowheads at both ends.
    pub fn set_double_arrow(&mut self) {
        self.arrow.at_start = true;
        self.arrow.at_end = true;
    }

    pub fn set_arrow_style(&mut self, length: Scalar, angle: Scalar) {
        self.arrow.length = length;
        self.arrow.angle = angle;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = Some(join);
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = Some(cap);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
