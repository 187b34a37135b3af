//! Plain canvas-space geometry.
//!
//! All values are `f64` canvas units unless a function says otherwise.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn with_origin(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Inclusive on all edges.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    pub fn expand(&self, padding: f64) -> Rect {
        Rect::new(
            self.x - padding,
            self.y - padding,
            self.width + padding * 2.0,
            self.height + padding * 2.0,
        )
    }

    /// Point where the ray from this rectangle's center toward `target`
    /// leaves the rectangle. A target at the exact center maps to the
    /// top-center point.
    pub fn border_point_toward(&self, target: Point) -> Point {
        let center = self.center();
        let dx = target.x - center.x;
        let dy = target.y - center.y;

        if dx == 0.0 && dy == 0.0 {
            return Point::new(center.x, self.y);
        }

        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let sx = if dx != 0.0 { half_w / dx.abs() } else { f64::INFINITY };
        let sy = if dy != 0.0 { half_h / dy.abs() } else { f64::INFINITY };
        let s = sx.min(sy);

        Point::new(center.x + dx * s, center.y + dy * s)
    }

    /// Euclidean distance from `point` to the closest point of this
    /// rectangle's border region. Zero when the point is inside. A negative
    /// extent counts from the other edge.
    pub fn distance_to_point(&self, point: Point) -> f64 {
        let (left, right) = (self.x.min(self.right()), self.x.max(self.right()));
        let (top, bottom) = (self.y.min(self.bottom()), self.y.max(self.bottom()));
        let nearest = Point::new(point.x.max(left).min(right), point.y.max(top).min(bottom));
        nearest.distance_to(point)
    }

    /// Smallest rectangle covering `points`.
    pub fn from_points(points: &[Point]) -> Option<Rect> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Union of `rects` grown by `padding` on every side, or `None` for no input.
pub fn bounding_box(rects: &[Rect], padding: f64) -> Option<Rect> {
    let (first, rest) = rects.split_first()?;
    let union = rest.iter().fold(*first, |acc, r| acc.union(r));
    Some(union.expand(padding))
}
