use pinboard_core::Point;

/// Screen pixels a background press may travel and still count as a click.
pub const PAN_CLICK_TOLERANCE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    /// Click on empty canvas.
    Click,
    Panned,
}

/// Dragging the empty canvas. Follows raw screen deltas.
#[derive(Debug, Clone)]
pub struct PanGesture {
    start_screen: Point,
    start_pan: Point,
    moved: bool,
}

impl PanGesture {
    pub fn new(start_screen: Point, start_pan: Point) -> Self {
        Self {
            start_screen,
            start_pan,
            moved: false,
        }
    }

    /// New pan offset for the pointer at `screen`.
    pub fn update(&mut self, screen: Point) -> Point {
        let dx = screen.x - self.start_screen.x;
        let dy = screen.y - self.start_screen.y;
        if dx.abs() > PAN_CLICK_TOLERANCE || dy.abs() > PAN_CLICK_TOLERANCE {
            self.moved = true;
        }
        self.start_pan.offset(dx, dy)
    }

    pub fn finish(self) -> PanOutcome {
        if self.moved {
            PanOutcome::Panned
        } else {
            PanOutcome::Click
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_follows_screen_delta() {
        let mut pan = PanGesture::new(Point::new(100.0, 100.0), Point::new(-20.0, 5.0));
        assert_eq!(pan.update(Point::new(150.0, 90.0)), Point::new(30.0, -5.0));
        assert_eq!(pan.finish(), PanOutcome::Panned);
    }

    #[test]
    fn test_tiny_movement_is_click() {
        let mut pan = PanGesture::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        pan.update(Point::new(3.0, -3.0));
        assert_eq!(pan.finish(), PanOutcome::Click);
    }
}
