//! Everything between pointer input and rows: the viewport transform, the
//! selection, the scene graph, connection geometry and gestures.

pub mod gesture;
pub mod path;
pub mod scene;
pub mod selection;
pub mod viewport;

pub use gesture::{
    ConnectGesture, Corner, DragGesture, DragOutcome, DragSubject, Gesture, GestureController,
    PanGesture, PanOutcome, PointerId, PressTarget, ResizeGesture,
};
pub use path::{AnchorSide, ConnectionPath};
pub use scene::{CardNode, ConnectionNode, ElementRef, GroupNode, Scene};
pub use selection::{PropertyPanel, Selection};
pub use viewport::Viewport;
