use pinboard_core::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::GroupId;

pub const MIN_GROUP_WIDTH: f64 = 100.0;
pub const MIN_GROUP_HEIGHT: f64 = 80.0;

/// Resize handle on a group's corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se];

    fn west(self) -> bool {
        matches!(self, Corner::Nw | Corner::Sw)
    }

    fn north(self) -> bool {
        matches!(self, Corner::Nw | Corner::Ne)
    }

    /// Where the handle sits on `rect`.
    pub fn point(self, rect: &Rect) -> Point {
        let x = if self.west() { rect.x } else { rect.right() };
        let y = if self.north() { rect.y } else { rect.bottom() };
        Point::new(x, y)
    }
}

#[derive(Debug, Clone)]
pub struct ResizeGesture {
    group_id: GroupId,
    corner: Corner,
    start_screen: Point,
    start: Rect,
    current: Rect,
}

impl ResizeGesture {
    pub fn new(group_id: GroupId, corner: Corner, start: Rect, start_screen: Point) -> Self {
        Self {
            group_id,
            corner,
            start_screen,
            start,
            current: start,
        }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn current(&self) -> Rect {
        self.current
    }

    /// Track the pointer and return the live bounds. West and north handles
    /// move the origin; the opposite edge stays fixed when clamped.
    pub fn update(&mut self, screen: Point, zoom: f64) -> Rect {
        let dx = (screen.x - self.start_screen.x) / zoom;
        let dy = (screen.y - self.start_screen.y) / zoom;
        let s = self.start;

        let (x, width) = if self.corner.west() {
            let width = s.width - dx;
            if width < MIN_GROUP_WIDTH {
                (s.x + s.width - MIN_GROUP_WIDTH, MIN_GROUP_WIDTH)
            } else {
                (s.x + dx, width)
            }
        } else {
            (s.x, (s.width + dx).max(MIN_GROUP_WIDTH))
        };

        let (y, height) = if self.corner.north() {
            let height = s.height - dy;
            if height < MIN_GROUP_HEIGHT {
                (s.y + s.height - MIN_GROUP_HEIGHT, MIN_GROUP_HEIGHT)
            } else {
                (s.y + dy, height)
            }
        } else {
            (s.y, (s.height + dy).max(MIN_GROUP_HEIGHT))
        };

        self.current = Rect::new(x, y, width, height);
        self.current
    }

    /// Old and new bounds, or `None` if nothing changed.
    pub fn finish(self) -> Option<(Rect, Rect)> {
        (self.current != self.start).then_some((self.start, self.current))
    }
}
