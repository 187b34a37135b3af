//! Pointer gesture state machines.
//!
//! Each gesture is `idle -> active -> idle`. Live updates only touch the
//! scene; a gesture yields a proposed change when it finishes and the
//! caller decides whether that becomes a command. At most one gesture is
//! active at a time, owned by the pointer that started it.

pub mod connect;
pub mod drag;
pub mod pan;
pub mod resize;

pub use connect::{ConnectGesture, SNAP_RADIUS};
pub use drag::{DragGesture, DragOutcome, DragSubject, DRAG_THRESHOLD};
pub use pan::{PanGesture, PanOutcome, PAN_CLICK_TOLERANCE};
pub use resize::{Corner, ResizeGesture, MIN_GROUP_HEIGHT, MIN_GROUP_WIDTH};

use super::AnchorSide;
use crate::{Endpoint, GroupId, PlacementId};

pub type PointerId = u32;

/// What a pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressTarget {
    Background,
    Card(PlacementId),
    Group(GroupId),
    GroupCorner(GroupId, Corner),
    Anchor(Endpoint, AnchorSide),
}

#[derive(Debug, Clone)]
pub enum Gesture {
    Drag(DragGesture),
    Resize(ResizeGesture),
    Connect(ConnectGesture),
    Pan(PanGesture),
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Drag(_) => "drag",
            Gesture::Resize(_) => "resize",
            Gesture::Connect(_) => "connect",
            Gesture::Pan(_) => "pan",
        }
    }
}

#[derive(Debug, Default)]
pub struct GestureController {
    active: Option<(PointerId, Gesture)>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `gesture` for `pointer`. Refused while another gesture runs.
    pub fn begin(&mut self, pointer: PointerId, gesture: Gesture) -> bool {
        if let Some((owner, current)) = &self.active {
            tracing::warn!(
                pointer,
                owner,
                active = current.name(),
                rejected = gesture.name(),
                "gesture already in progress"
            );
            return false;
        }
        self.active = Some((pointer, gesture));
        true
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Gesture> {
        self.active.as_ref().map(|(_, g)| g)
    }

    /// The running gesture, only for the pointer that owns it.
    pub fn active_mut(&mut self, pointer: PointerId) -> Option<&mut Gesture> {
        match &mut self.active {
            Some((owner, gesture)) if *owner == pointer => Some(gesture),
            _ => None,
        }
    }

    /// End the gesture owned by `pointer` and hand it back for committing.
    pub fn finish(&mut self, pointer: PointerId) -> Option<Gesture> {
        match &self.active {
            Some((owner, _)) if *owner == pointer => self.active.take().map(|(_, g)| g),
            _ => None,
        }
    }

    /// Drop whatever is running without committing it.
    pub fn cancel(&mut self) -> Option<Gesture> {
        self.active.take().map(|(_, g)| g)
    }
}

#[cfg(test)]
mod tests {
    use pinboard_core::Point;

    use super::*;

    fn pan() -> Gesture {
        Gesture::Pan(PanGesture::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0)))
    }

    #[test]
    fn test_only_one_gesture_at_a_time() {
        let mut ctl = GestureController::new();
        assert!(ctl.begin(1, pan()));
        assert!(!ctl.begin(2, pan()));
        assert!(ctl.active_mut(2).is_none());
        assert!(ctl.finish(2).is_none());
        assert!(ctl.is_active());

        assert!(ctl.finish(1).is_some());
        assert!(!ctl.is_active());
        assert!(ctl.begin(2, pan()));
    }

    #[test]
    fn test_cancel_clears() {
        let mut ctl = GestureController::new();
        ctl.begin(7, pan());
        assert!(matches!(ctl.cancel(), Some(Gesture::Pan(_))));
        assert!(ctl.active().is_none());
    }
}
