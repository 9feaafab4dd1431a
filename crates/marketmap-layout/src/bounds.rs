//! Edge-based rectangle used throughout the layout pass.

use marketmap_core::Rect;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored by its edges.
///
/// `x1 >= x0` and `y1 >= y0` always hold. A zero width or height is legal
/// and means "not drawable"; every layout stage returns such a degenerate
/// rectangle instead of failing when space runs out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectBounds {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl RectBounds {
    /// Create bounds from edges. Inverted edges collapse onto the start edge.
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0,
            y0,
            x1: x1.max(x0),
            y1: y1.max(y0),
        }
    }

    /// Bounds of a `width × height` canvas anchored at the origin.
    #[must_use]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width.max(0.0), height.max(0.0))
    }

    /// A zero-area rectangle at a point.
    #[must_use]
    pub const fn degenerate_at(x: f64, y: f64) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    /// Width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Whether the rectangle has positive width and height.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Shrink by `padding` on all four sides.
    ///
    /// When the padding exceeds half of a side, that axis collapses to its
    /// midpoint rather than inverting.
    #[must_use]
    pub fn inset(&self, padding: f64) -> Self {
        self.inset_sides(padding, padding, padding, padding)
    }

    /// Shrink each side independently (CSS order: top, right, bottom, left).
    #[must_use]
    pub fn inset_sides(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        let (x0, x1) = collapse(self.x0 + left, self.x1 - right);
        let (y0, y1) = collapse(self.y0 + top, self.y1 - bottom);
        Self { x0, y0, x1, y1 }
    }

    /// Split off a strip of `height` from the top. Returns `(strip, rest)`.
    #[must_use]
    pub fn split_top(&self, height: f64) -> (Self, Self) {
        let cut = (self.y0 + height.max(0.0)).min(self.y1);
        (
            Self::new(self.x0, self.y0, self.x1, cut),
            Self::new(self.x0, cut, self.x1, self.y1),
        )
    }

    /// Round every edge to the nearest whole pixel.
    ///
    /// Edges are rounded independently, so two rectangles that share an edge
    /// still share it after snapping.
    #[must_use]
    pub fn snapped(&self) -> Self {
        Self::new(
            self.x0.round(),
            self.y0.round(),
            self.x1.round(),
            self.y1.round(),
        )
    }

    /// Area of the overlap with another rectangle (0 when they only touch).
    #[must_use]
    pub fn overlap_area(&self, other: &Self) -> f64 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Whether a point lies inside (left/top inclusive, right/bottom exclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Convert to the paint-space [`Rect`].
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x0 as f32,
            self.y0 as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }
}

impl From<Rect> for RectBounds {
    fn from(rect: Rect) -> Self {
        Self::new(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.x + rect.width),
            f64::from(rect.y + rect.height),
        )
    }
}

fn collapse(start: f64, end: f64) -> (f64, f64) {
    if end >= start {
        (start, end)
    } else {
        let mid = (start + end) / 2.0;
        (mid, mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_inverted_edges() {
        let b = RectBounds::new(10.0, 10.0, 5.0, 20.0);
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.height(), 10.0);
        assert!(!b.is_drawable());
    }

    #[test]
    fn test_inset() {
        let b = RectBounds::from_size(100.0, 50.0).inset(5.0);
        assert_eq!(b, RectBounds::new(5.0, 5.0, 95.0, 45.0));
        assert_eq!(b.area(), 90.0 * 40.0);
    }

    #[test]
    fn test_inset_collapses_to_midpoint() {
        let b = RectBounds::from_size(10.0, 100.0).inset(8.0);
        assert_eq!(b.x0, 5.0);
        assert_eq!(b.x1, 5.0);
        assert_eq!(b.height(), 84.0);
    }

    #[test]
    fn test_split_top() {
        let (head, rest) = RectBounds::from_size(100.0, 50.0).split_top(20.0);
        assert_eq!(head, RectBounds::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(rest, RectBounds::new(0.0, 20.0, 100.0, 50.0));

        let (head, rest) = RectBounds::from_size(100.0, 10.0).split_top(20.0);
        assert_eq!(head.height(), 10.0);
        assert!(!rest.is_drawable());
    }

    #[test]
    fn test_snapped_preserves_shared_edges() {
        let a = RectBounds::new(0.0, 0.0, 33.4, 10.0).snapped();
        let b = RectBounds::new(33.4, 0.0, 66.6, 10.0).snapped();
        assert_eq!(a.x1, b.x0);
        assert_eq!(b.x1, 67.0);
    }

    #[test]
    fn test_overlap_area() {
        let a = RectBounds::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&RectBounds::new(10.0, 0.0, 20.0, 10.0)), 0.0);
        assert_eq!(a.overlap_area(&RectBounds::new(5.0, 5.0, 20.0, 20.0)), 25.0);
    }

    #[test]
    fn test_rect_conversion() {
        let b = RectBounds::new(1.0, 2.0, 11.0, 22.0);
        let r = b.to_rect();
        assert_eq!(r, Rect::new(1.0, 2.0, 10.0, 20.0));
        assert_eq!(RectBounds::from(r), b);
    }

    #[test]
    fn test_contains_half_open() {
        let b = RectBounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(0.0, 0.0));
        assert!(!b.contains(10.0, 5.0));
    }
}
