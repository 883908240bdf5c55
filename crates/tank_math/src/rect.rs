//! Axis-aligned rectangles.
//!
//! A [`Rect`] is stored as its top-left corner plus size, in world units.
//! The y axis grows downwards, matching screen space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub min: Vec2,
    /// Width and height. Both are expected to be non-negative.
    pub size: Vec2,
}

impl Rect {
    /// A zero-sized rectangle at the origin.
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        size: Vec2::ZERO,
    };

    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Create a rectangle of `size` centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Returns `true` if the two rectangles overlap with non-zero area.
    ///
    /// Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// Returns `true` if `point` lies inside the rectangle (max edges exclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }

    /// Translate the rectangle by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.min += offset;
        self
    }

    /// Move the rectangle so its centre is at `center`.
    #[must_use]
    pub fn with_center(self, center: Vec2) -> Self {
        Self::from_center(center, self.size)
    }

    /// Clamp the rectangle so it lies within `bounds`.
    ///
    /// If the rectangle is larger than `bounds` on an axis it is aligned to
    /// the bounds' minimum on that axis.
    #[must_use]
    pub fn clamped_to(mut self, bounds: &Rect) -> Self {
        let hi = (bounds.max() - self.size).max(bounds.min);
        self.min = self.min.clamp(bounds.min, hi);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_max() {
        let r = Rect::new(Vec2::new(2.0, 4.0), Vec2::new(4.0, 2.0));
        assert_eq!(r.center(), Vec2::new(4.0, 5.0));
        assert_eq!(r.max(), Vec2::new(6.0, 6.0));
        assert_eq!(Rect::from_center(r.center(), r.size), r);
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(2.0));
        let b = Rect::new(Vec2::splat(1.0), Vec2::splat(2.0));
        let touching = Rect::new(Vec2::new(2.0, 0.0), Vec2::splat(2.0));
        let far = Rect::new(Vec2::splat(10.0), Vec2::splat(1.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::new(Vec2::ZERO, Vec2::splat(1.0));
        assert!(r.contains_point(Vec2::new(0.5, 0.5)));
        assert!(r.contains_point(Vec2::ZERO));
        assert!(!r.contains_point(Vec2::new(1.0, 0.5)));
    }

    #[test]
    fn test_translated_and_with_center() {
        let r = Rect::new(Vec2::ZERO, Vec2::splat(2.0)).translated(Vec2::new(3.0, -1.0));
        assert_eq!(r.min, Vec2::new(3.0, -1.0));
        assert_eq!(r.with_center(Vec2::ZERO).min, Vec2::splat(-1.0));
    }

    #[test]
    fn test_clamped_to() {
        let bounds = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let r = Rect::new(Vec2::new(9.0, -3.0), Vec2::splat(2.0)).clamped_to(&bounds);
        assert_eq!(r.min, Vec2::new(8.0, 0.0));

        let huge = Rect::new(Vec2::splat(5.0), Vec2::splat(20.0)).clamped_to(&bounds);
        assert_eq!(huge.min, Vec2::ZERO);
    }

    #[test]
    fn test_json_shape() {
        let r = Rect::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
