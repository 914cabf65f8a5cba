//! Integer rectangles in image coordinates.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. Covers the half-open ranges
/// `x..x + width` and `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Center point, rounded toward the origin corner like the pixel grid.
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Whether `self` lies completely within `outer`.
    pub fn is_within(&self, outer: &Rect) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.x + self.width <= outer.x + outer.width
            && self.y + self.height <= outer.y + outer.height
    }

    /// Smallest rectangle covering every point. Returns `None` for no points.
    pub fn bounding<I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = IVec2>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));

        Some(Rect::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_uses_integer_division() {
        let rect = Rect::new(10, 20, 5, 7);
        assert_eq!(rect.center(), IVec2::new(12, 23));
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(-50, -50, 100, 100);
        assert!(rect.contains(IVec2::new(-50, -50)));
        assert!(rect.contains(IVec2::new(49, 49)));
        assert!(!rect.contains(IVec2::new(50, 0)));
        assert!(!rect.contains(IVec2::new(0, 50)));
    }

    #[test]
    fn test_bounding_of_points() {
        let points = [IVec2::new(3, 4), IVec2::new(10, 2), IVec2::new(5, 9)];
        assert_eq!(Rect::bounding(points), Some(Rect::new(3, 2, 8, 8)));
        assert_eq!(Rect::bounding(std::iter::empty()), None);
    }

    #[test]
    fn test_is_within() {
        let outer = Rect::new(0, 0, 100, 50);
        assert!(Rect::new(0, 0, 100, 50).is_within(&outer));
        assert!(Rect::new(10, 10, 20, 20).is_within(&outer));
        assert!(!Rect::new(90, 10, 20, 20).is_within(&outer));
        assert!(!Rect::new(-1, 0, 5, 5).is_within(&outer));
    }
}
