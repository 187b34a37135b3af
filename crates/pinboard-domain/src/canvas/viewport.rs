//! Pan/zoom state and screen/canvas coordinate transforms.
//!
//! `canvas = (screen - pan) / zoom`. Every zoom change pivots around a screen
//! point so that the canvas point under it stays put:
//! `pan' = screen - canvas * zoom'`.

use pinboard_core::{bounding_box, Point, Rect, Size};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 1.1;
pub const FIT_PADDING: f64 = 40.0;

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Zoom is clamped into range.
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self {
            x,
            y,
            zoom: clamp_zoom(zoom),
        }
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new((screen.x - self.x) / self.zoom, (screen.y - self.y) / self.zoom)
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(canvas.x * self.zoom + self.x, canvas.y * self.zoom + self.y)
    }

    /// Screen-space delta expressed in canvas units.
    pub fn screen_delta_to_canvas(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.zoom, dy / self.zoom)
    }

    /// Set the zoom to `zoom` (clamped) keeping the canvas point under
    /// `pivot` fixed on screen.
    pub fn zoom_around(&mut self, pivot: Point, zoom: f64) {
        let anchor = self.screen_to_canvas(pivot);
        let zoom = clamp_zoom(zoom);
        self.x = pivot.x - anchor.x * zoom;
        self.y = pivot.y - anchor.y * zoom;
        self.zoom = zoom;
    }

    pub fn zoom_by(&mut self, pivot: Point, factor: f64) {
        self.zoom_around(pivot, self.zoom * factor);
    }

    pub fn zoom_in(&mut self, container: Size) {
        self.zoom_by(container.center(), ZOOM_STEP);
    }

    pub fn zoom_out(&mut self, container: Size) {
        self.zoom_by(container.center(), 1.0 / ZOOM_STEP);
    }

    /// Back to 100% around the container center.
    pub fn zoom_reset(&mut self, container: Size) {
        self.zoom_around(container.center(), 1.0);
    }

    /// Mouse wheel: one step per event, in for negative `delta_y`.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        self.zoom_by(cursor, factor);
    }

    /// Two-finger pinch: the zoom follows the ratio of finger distances and
    /// pivots around their midpoint.
    pub fn pinch(&mut self, midpoint: Point, previous_distance: f64, distance: f64) {
        if previous_distance <= 0.0 || distance <= 0.0 {
            return;
        }
        self.zoom_by(midpoint, distance / previous_distance);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Canvas rectangle currently visible in a container of `container` size.
    pub fn visible_rect(&self, container: Size) -> Rect {
        let origin = self.screen_to_canvas(Point::new(0.0, 0.0));
        Rect::new(
            origin.x,
            origin.y,
            container.width / self.zoom,
            container.height / self.zoom,
        )
    }

    /// Canvas point at the middle of the container.
    pub fn center(&self, container: Size) -> Point {
        self.screen_to_canvas(container.center())
    }

    /// Viewport showing all of `rects` centered in `container`.
    /// No rectangles resets to the identity viewport.
    pub fn fit_all(rects: &[Rect], container: Size) -> Viewport {
        let Some(bounds) = bounding_box(rects, FIT_PADDING) else {
            return Viewport::default();
        };
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Viewport::default();
        }
        let zoom = clamp_zoom((container.width / bounds.width).min(container.height / bounds.height));
        Viewport {
            x: (container.width - bounds.width * zoom) / 2.0 - bounds.x * zoom,
            y: (container.height - bounds.height * zoom) / 2.0 - bounds.y * zoom,
            zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn test_transform_round_trip() {
        let vp = Viewport::new(120.0, -40.0, 2.5);
        let screen = Point::new(300.0, 200.0);
        assert!(close(vp.canvas_to_screen(vp.screen_to_canvas(screen)), screen));
    }

    #[test]
    fn test_zoom_pivot_is_invariant() {
        let pivots = [Point::new(0.0, 0.0), Point::new(400.0, 300.0), Point::new(-50.0, 920.0)];
        let factors = [1.1, 1.0 / 1.1, 3.0, 0.2];
        for pivot in pivots {
            for factor in factors {
                let mut vp = Viewport::new(37.0, -12.0, 1.3);
                let before = vp.screen_to_canvas(pivot);
                vp.zoom_by(pivot, factor);
                assert!(close(vp.screen_to_canvas(pivot), before));
            }
        }
    }

    #[test]
    fn test_zoom_stays_clamped() {
        let container = Size::new(800.0, 600.0);
        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.zoom_in(container);
            assert!(vp.zoom <= MAX_ZOOM);
        }
        assert!((vp.zoom - MAX_ZOOM).abs() < EPS);
        for _ in 0..200 {
            vp.zoom_out(container);
            assert!(vp.zoom >= MIN_ZOOM);
        }
        assert!((vp.zoom - MIN_ZOOM).abs() < EPS);
    }

    #[test]
    fn test_clamped_zoom_keeps_pivot() {
        let mut vp = Viewport::new(0.0, 0.0, 3.9);
        let pivot = Point::new(250.0, 125.0);
        let before = vp.screen_to_canvas(pivot);
        vp.zoom_by(pivot, 10.0);
        assert_eq!(vp.zoom, MAX_ZOOM);
        assert!(close(vp.screen_to_canvas(pivot), before));
    }

    #[test]
    fn test_fit_all_empty_resets() {
        let vp = Viewport::fit_all(&[], Size::new(800.0, 600.0));
        assert_eq!(vp, Viewport { x: 0.0, y: 0.0, zoom: 1.0 });
    }

    #[test]
    fn test_fit_all_centers_bounds() {
        let container = Size::new(800.0, 600.0);
        let rects = [Rect::new(0.0, 0.0, 220.0, 80.0), Rect::new(500.0, 300.0, 220.0, 80.0)];
        let vp = Viewport::fit_all(&rects, container);

        // Padded box: (-40, -40) 800 x 460, width-bound.
        assert!((vp.zoom - 1.0).abs() < EPS);
        let center = vp.center(container);
        assert!(close(center, Point::new(360.0, 190.0)));
    }

    #[test]
    fn test_wheel_direction() {
        let mut vp = Viewport::default();
        vp.wheel(Point::new(10.0, 10.0), -120.0);
        assert!((vp.zoom - ZOOM_STEP).abs() < EPS);
        vp.wheel(Point::new(10.0, 10.0), 120.0);
        assert!((vp.zoom - 1.0).abs() < EPS);
        vp.wheel(Point::new(10.0, 10.0), 0.0);
        assert!((vp.zoom - 1.0).abs() < EPS);
    }

    #[test]
    fn test_pinch_follows_distance_ratio() {
        let mut vp = Viewport::default();
        vp.pinch(Point::new(100.0, 100.0), 100.0, 150.0);
        assert!((vp.zoom - 1.5).abs() < EPS);
    }

    #[test]
    fn test_zoom_reset_pivots_on_center() {
        let container = Size::new(800.0, 600.0);
        let mut vp = Viewport::new(-100.0, 50.0, 2.0);
        let before = vp.center(container);
        vp.zoom_reset(container);
        assert_eq!(vp.zoom, 1.0);
        assert!(close(vp.center(container), before));
    }
}
