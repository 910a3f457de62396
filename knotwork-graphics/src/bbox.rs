//! Axis-aligned bounding boxes.

use crate::path::Path;
use crate::point::Point;
use crate::types::Scalar;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_x: Scalar,
    pub min_y: Scalar,
    pub max_x: Scalar,
    pub max_y: Scalar,
}

impl BoundingBox {
    /// An empty (inverted) bounding box.
    pub const EMPTY: Self = Self {
        min_x: Scalar::INFINITY,
        min_y: Scalar::INFINITY,
        max_x: Scalar::NEG_INFINITY,
        max_y: Scalar::NEG_INFINITY,
    };

    /// The smallest box holding every point of `points`.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        points.into_iter().fold(Self::EMPTY, |mut bb, p| {
            bb.include_point(p);
            bb
        })
    }

    /// `false` for [`EMPTY`](Self::EMPTY) and anything else inverted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    #[must_use]
    pub fn width(&self) -> Scalar {
        (self.max_x - self.min_x).max(0.0)
    }

    #[must_use]
    pub fn height(&self) -> Scalar {
        (self.max_y - self.min_y).max(0.0)
    }

    /// Lower-left corner.
    #[must_use]
    pub const fn llcorner(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn lrcorner(&self) -> Point {
        Point::new(self.max_x, self.min_y)
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn ulcorner(&self) -> Point {
        Point::new(self.min_x, self.max_y)
    }

    /// Upper-right corner.
    #[must_use]
    pub const fn urcorner(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            f64::midpoint(self.min_x, self.max_x),
            f64::midpoint(self.min_y, self.max_y),
        )
    }

    /// Expand to include a point.
    pub const fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// This box grown to cover `other`. Empty boxes add nothing.
    #[must_use]
    pub fn including(mut self, other: &Self) -> Self {
        if other.is_valid() {
            self.include_point(other.llcorner());
            self.include_point(other.urcorner());
        }
        self
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<BoundingBox> for kurbo::Rect {
    fn from(bb: BoundingBox) -> Self {
        Self::new(bb.min_x, bb.min_y, bb.max_x, bb.max_y)
    }
}

impl From<kurbo::Rect> for BoundingBox {
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Self {
            min_x: r.x0,
            min_y: r.y0,
            max_x: r.x1,
            max_y: r.y1,
        }
    }
}

/// Tight bounding box of a resolved path.
///
/// Each segment contributes its endpoints and the points where a coordinate
/// reaches an extremum, so control points lying off the curve do not inflate
/// the box. A single-knot path yields a degenerate box at that knot.
#[must_use]
pub fn path_bbox(path: &Path) -> BoundingBox {
    let start = BoundingBox::from_points(path.knots().first().map(|k| k.point));
    path.segments().fold(start, |bb, seg| bb.including(&seg.tight_bbox()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;
    use crate::types::EPSILON;

    #[test]
    fn empty_box_has_no_extent() {
        let bb = BoundingBox::EMPTY;
        assert!(!bb.is_valid());
        assert!((bb.width()).abs() < EPSILON);
        assert_eq!(BoundingBox::from_points(std::iter::empty()), bb);
    }

    #[test]
    fn box_from_points() {
        let bb = BoundingBox::from_points([Point::new(1.0, 2.0), Point::new(-3.0, 5.0)]);
        assert!((bb.min_x + 3.0).abs() < EPSILON);
        assert!((bb.max_y - 5.0).abs() < EPSILON);
        assert!((bb.width() - 4.0).abs() < EPSILON);
        assert!((bb.height() - 3.0).abs() < EPSILON);
    }

    #[test]
    fn corners_and_center() {
        let bb = BoundingBox {
            min_x: 0.0,
            min_y: 1.0,
            max_x: 4.0,
            max_y: 3.0,
        };
        assert_eq!(bb.llcorner(), Point::new(0.0, 1.0));
        assert_eq!(bb.lrcorner(), Point::new(4.0, 1.0));
        assert_eq!(bb.ulcorner(), Point::new(0.0, 3.0));
        assert_eq!(bb.urcorner(), Point::new(4.0, 3.0));
        assert_eq!(bb.center(), Point::new(2.0, 2.0));
    }

    #[test]
    fn including_skips_empty_boxes() {
        let bb = BoundingBox::from_points([Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(bb.including(&BoundingBox::EMPTY), bb);
        let grown = bb.including(&BoundingBox::from_points([Point::new(3.0, -2.0)]));
        assert_eq!(grown.lrcorner(), Point::new(3.0, -2.0));
        assert_eq!(grown.ulcorner(), Point::new(0.0, 1.0));
    }

    #[test]
    fn kurbo_rect_round_trip() {
        let rect = kurbo::Rect::new(4.0, 3.0, 0.0, 1.0);
        let bb = BoundingBox::from(rect);
        assert_eq!(bb.llcorner(), Point::new(0.0, 1.0));
        assert_eq!(kurbo::Rect::from(bb), rect.abs());
    }

    #[test]
    fn unit_square_box() {
        let bb = path_bbox(&shapes::unitsquare());
        assert!((bb.min_x).abs() < EPSILON);
        assert!((bb.min_y).abs() < EPSILON);
        assert!((bb.max_x - 1.0).abs() < EPSILON);
        assert!((bb.max_y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn full_circle_box_is_tight() {
        // The control polygon bulges past the circle; the curve does not.
        let bb = path_bbox(&shapes::fullcircle());
        assert!((bb.max_x - 0.5).abs() < 1e-3, "max_x = {}", bb.max_x);
        assert!((bb.min_y + 0.5).abs() < 1e-3, "min_y = {}", bb.min_y);
    }
}
