//! Typed notifications from a [`crate::Session`] to whoever renders it.

use pinboard_domain::canvas::{Selection, Viewport};
use pinboard_domain::{BoardId, HistoryStatus};
use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    HistoryChanged(HistoryStatus),
    SelectionChanged(Selection),
    ViewportChanged(Viewport),
    /// The scene was rebuilt or moved; redraw it.
    SceneChanged,
    TabsChanged,
    BoardChanged(BoardId),
    /// A write was refused for lack of space. Nothing was changed.
    StorageFull(String),
    /// Message for assistive technology.
    Announce(String),
}

/// Broadcast side of the session's event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Events sent while nobody listens are dropped.
    pub fn emit(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("no event subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(SessionEvent::SceneChanged);
        bus.emit(SessionEvent::Announce("Card created: Rome".into()));
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::SceneChanged);
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::Announce("Card created: Rome".into())
        );
    }

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        EventBus::new().emit(SessionEvent::TabsChanged);
    }
}
