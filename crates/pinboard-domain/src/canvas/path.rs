//! Curved connection geometry.
//!
//! Connections are quadratic Béziers between the border points of two
//! rectangles. The control point hangs below the midpoint so every curve
//! sags as if under gravity.

use pinboard_core::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Sag as a fraction of the endpoint distance.
pub const GRAVITY_SAG: f64 = 0.35;
/// Short connections still curve by at least this much.
pub const MIN_SAG: f64 = 20.0;
/// Horizontal nudge for near-vertical curves, as a fraction of the sag.
pub const VERTICAL_BIAS: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPath {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl ConnectionPath {
    /// Path between two free points, used for the live preview while drawing.
    pub fn between(start: Point, end: Point) -> Self {
        Self {
            start,
            control: control_point(start, end),
            end,
        }
    }

    /// Path linking two element rectangles. Each end sits on its rectangle's
    /// border, on the ray toward the other rectangle's center.
    pub fn linking(from: &Rect, to: &Rect) -> Self {
        let start = from.border_point_toward(to.center());
        let end = to.border_point_toward(from.center());
        Self::between(start, end)
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// Where the label pill goes.
    pub fn label_anchor(&self) -> Point {
        self.point_at(0.5)
    }

    /// Axis-aligned bounds of the curve itself (not of its control polygon).
    pub fn bounds(&self) -> Rect {
        let mut points = vec![self.start, self.end];
        for t in [self.extremum_t(|p| p.x), self.extremum_t(|p| p.y)]
            .into_iter()
            .flatten()
        {
            points.push(self.point_at(t));
        }
        // from_points only fails on empty input.
        Rect::from_points(&points).unwrap_or_default()
    }

    /// Parameter of the curve's turning point along one axis, if inside (0, 1).
    fn extremum_t(&self, axis: impl Fn(Point) -> f64) -> Option<f64> {
        let (a, b, c) = (axis(self.start), axis(self.control), axis(self.end));
        let denom = a - 2.0 * b + c;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let t = (a - b) / denom;
        (t > 0.0 && t < 1.0).then_some(t)
    }

    /// SVG path data, `M x y Q cx cy x y`.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

fn control_point(a: Point, b: Point) -> Point {
    let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let sag = MIN_SAG.max(dx.hypot(dy) * GRAVITY_SAG);

    let horizontal = if dy.abs() > dx.abs() * 2.0 {
        let direction = if dy >= 0.0 { 1.0 } else { -1.0 };
        direction * sag * VERTICAL_BIAS
    } else {
        0.0
    };

    Point::new(mid.x + horizontal, mid.y + sag)
}

/// The four handles a connection can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl AnchorSide {
    pub const ALL: [AnchorSide; 4] = [
        AnchorSide::Top,
        AnchorSide::Bottom,
        AnchorSide::Left,
        AnchorSide::Right,
    ];

    /// Midpoint of this side of `rect`.
    pub fn anchor_point(self, rect: &Rect) -> Point {
        let center = rect.center();
        match self {
            AnchorSide::Top => Point::new(center.x, rect.y),
            AnchorSide::Bottom => Point::new(center.x, rect.bottom()),
            AnchorSide::Left => Point::new(rect.x, center.y),
            AnchorSide::Right => Point::new(rect.right(), center.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_short_connection_uses_min_sag() {
        let path = ConnectionPath::between(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(path.control, Point::new(5.0, MIN_SAG));
    }

    #[test]
    fn test_long_connection_sags_with_distance() {
        let path = ConnectionPath::between(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        assert!((path.control.y - 70.0).abs() < EPS);
        assert!((path.control.x - 100.0).abs() < EPS);
    }

    #[test]
    fn test_vertical_connection_gets_horizontal_bias() {
        let down = ConnectionPath::between(Point::new(0.0, 0.0), Point::new(10.0, 100.0));
        let sag = MIN_SAG.max(10f64.hypot(100.0) * GRAVITY_SAG);
        assert!((down.control.x - (5.0 + sag * VERTICAL_BIAS)).abs() < EPS);

        let up = ConnectionPath::between(Point::new(0.0, 100.0), Point::new(10.0, 0.0));
        assert!((up.control.x - (5.0 - sag * VERTICAL_BIAS)).abs() < EPS);
    }

    #[test]
    fn test_linking_ends_on_borders() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(300.0, 0.0, 100.0, 50.0);
        let path = ConnectionPath::linking(&a, &b);
        assert_eq!(path.start, Point::new(100.0, 25.0));
        assert_eq!(path.end, Point::new(300.0, 25.0));
    }

    #[test]
    fn test_label_anchor_is_curve_midpoint() {
        let path = ConnectionPath::between(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        // B(0.5) = 0.25 * start + 0.5 * control + 0.25 * end
        assert!((path.label_anchor().y - 35.0).abs() < EPS);
    }

    #[test]
    fn test_bounds_include_sag() {
        let path = ConnectionPath::between(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        let bounds = path.bounds();
        assert!((bounds.height - 35.0).abs() < EPS);
        assert!((bounds.width - 200.0).abs() < EPS);
    }

    #[test]
    fn test_anchor_points() {
        let r = Rect::new(10.0, 20.0, 100.0, 60.0);
        assert_eq!(AnchorSide::Top.anchor_point(&r), Point::new(60.0, 20.0));
        assert_eq!(AnchorSide::Right.anchor_point(&r), Point::new(110.0, 50.0));
    }
}
