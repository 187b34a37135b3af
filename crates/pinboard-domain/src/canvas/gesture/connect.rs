use pinboard_core::Point;

use crate::canvas::{AnchorSide, ConnectionPath, Scene};
use crate::Endpoint;

/// How close (canvas units) the cursor must come to a target to snap.
pub const SNAP_RADIUS: f64 = 40.0;

/// Drawing a new connection out of an anchor handle.
#[derive(Debug, Clone)]
pub struct ConnectGesture {
    source: Endpoint,
    side: AnchorSide,
    anchor: Point,
    cursor: Point,
    target: Option<Endpoint>,
}

impl ConnectGesture {
    /// `anchor` is the handle's canvas position.
    pub fn new(source: Endpoint, side: AnchorSide, anchor: Point) -> Self {
        Self {
            source,
            side,
            anchor,
            cursor: anchor,
            target: None,
        }
    }

    pub fn source(&self) -> Endpoint {
        self.source
    }

    pub fn side(&self) -> AnchorSide {
        self.side
    }

    /// Highlighted snap target, if any.
    pub fn target(&self) -> Option<Endpoint> {
        self.target
    }

    /// Move the free end to `cursor` (canvas) and re-pick the snap target.
    pub fn update(&mut self, cursor: Point, scene: &Scene) -> Option<Endpoint> {
        self.cursor = cursor;
        self.target = scene.nearest_element(cursor, SNAP_RADIUS, self.source);
        self.target
    }

    /// Preview curve from the fixed anchor to the cursor.
    pub fn preview(&self) -> ConnectionPath {
        ConnectionPath::between(self.anchor, self.cursor)
    }

    /// Source and target when released over a valid distinct target.
    pub fn finish(self) -> Option<(Endpoint, Endpoint)> {
        let target = self.target?;
        (target != self.source).then_some((self.source, target))
    }
}
