//! Canvas geometry: points, rectangles and node anchors.
//!
//! Coordinates follow the canvas convention: x grows right, y grows down.
//! Node (x, y) is the box center, matching the editor wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. Always normalized: left <= right, top <= bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    /// Bounding box of a point sequence. Returns None for an empty slice.
    pub fn around_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut rect = Rect::from_corners(*first, *first);
        for p in &points[1..] {
            rect.left = rect.left.min(p.x);
            rect.top = rect.top.min(p.y);
            rect.right = rect.right.max(p.x);
            rect.bottom = rect.bottom.max(p.y);
        }
        Some(rect)
    }

    pub fn expand(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left - dx,
            top: self.top - dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Closed-interval overlap test. Touching boxes count as intersecting,
    /// so area queries used for placement never produce false negatives.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.top <= other.bottom
            && self.bottom >= other.top
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Which side of a node an anchor sits on, and therefore which edge ends
/// may attach there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    /// Left-edge midpoint; edges may only terminate here.
    Incoming,
    /// Right-edge midpoint; edges may only originate here.
    Outgoing,
}

/// A fixed connection point on a node boundary. Derived from node
/// geometry on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub kind: AnchorKind,
    pub point: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(10.0, 20.0), Point::new(-5.0, 2.0));
        assert_eq!(r.left, -5.0);
        assert_eq!(r.top, 2.0);
        assert_eq!(r.right, 10.0);
        assert_eq!(r.bottom, 20.0);
    }

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = Rect::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = Rect::from_corners(Point::new(5.0, 5.0), Point::new(15.0, 15.0));
        let touching = Rect::from_corners(Point::new(10.0, 0.0), Point::new(20.0, 10.0));
        let apart = Rect::from_corners(Point::new(11.0, 11.0), Point::new(20.0, 20.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_around_points() {
        let pts = [Point::new(1.0, 5.0), Point::new(-2.0, 3.0), Point::new(4.0, -1.0)];
        let r = Rect::around_points(&pts).unwrap();
        assert_eq!((r.left, r.top, r.right, r.bottom), (-2.0, -1.0, 4.0, 5.0));
        assert!(Rect::around_points(&[]).is_none());
    }
}
