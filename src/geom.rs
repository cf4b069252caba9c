//! Rect: cell-space rectangle used for widget bounds and drawing.
//!
//! Coordinates are signed so widgets may sit partially off screen; drawing
//! clips at the buffer edge.

use crate::style::Spacing;

/// A rectangle defined by position and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate (column) of the top-left corner.
    pub x: i32,
    /// Y coordinate (row) of the top-left corner.
    pub y: i32,
    /// Width in columns.
    pub width: i32,
    /// Height in rows.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle covering a whole terminal.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Check if the rectangle covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle intersects with another.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Shrink the rectangle by a margin on all sides.
    #[inline]
    #[must_use]
    pub const fn shrink(&self, margin: i32) -> Self {
        let m2 = margin.saturating_mul(2);
        let (x, y) = (self.x.saturating_add(margin), self.y.saturating_add(margin));
        if self.width <= m2 || self.height <= m2 {
            return Self::new(x, y, 0, 0);
        }
        Self::new(x, y, self.width - m2, self.height - m2)
    }

    /// Shrink by per-side spacing.
    #[must_use]
    pub fn inset(&self, spacing: Spacing) -> Self {
        let (top, right, bottom, left) = (
            i32::from(spacing.top),
            i32::from(spacing.right),
            i32::from(spacing.bottom),
            i32::from(spacing.left),
        );
        Self::new(
            self.x.saturating_add(left),
            self.y.saturating_add(top),
            self.width.saturating_sub(left + right).max(0),
            self.height.saturating_sub(top + bottom).max(0),
        )
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(-2, 1, 4, 2);
        assert!(rect.contains(-2, 1));
        assert!(rect.contains(1, 2));
        assert!(!rect.contains(2, 1));
        assert!(!rect.contains(0, 3));
    }

    #[test]
    fn test_rect_empty() {
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(Rect::new(0, 0, -3, 5).is_empty());
        assert_eq!(Rect::new(0, 0, -3, 5).area(), 0);
        assert_eq!(Rect::from_size(80, 24).area(), 1920);
    }

    #[test]
    fn test_rect_shrink_and_inset() {
        let rect = Rect::new(0, 0, 10, 4);
        assert_eq!(rect.shrink(1), Rect::new(1, 1, 8, 2));
        assert!(rect.shrink(2).is_empty());
        let inner = rect.inset(Spacing { top: 1, right: 2, bottom: 0, left: 3 });
        assert_eq!(inner, Rect::new(3, 1, 5, 3));
    }

    #[test]
    fn test_rect_shrink_and_inset_saturate() {
        let far = Rect::new(i32::MAX - 1, i32::MAX, 10, 10);
        assert_eq!(far.shrink(1), Rect::new(i32::MAX, i32::MAX, 8, 8));
        assert!(Rect::new(0, 0, 4, 4).shrink(i32::MAX).is_empty());
        let spacing = Spacing { top: 5, right: 5, bottom: 5, left: 5 };
        assert!(Rect::new(i32::MAX, 0, i32::MIN, 3).inset(spacing).is_empty());
        assert_eq!(far.inset(spacing).x, i32::MAX);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 5, 5);
        assert!(a.intersects(&Rect::new(4, 4, 2, 2)));
        assert!(!a.intersects(&Rect::new(5, 0, 2, 2)));
    }
}
