//! Pointer input: starting, tracking and committing gestures.
//!
//! Moves only touch the scene. A gesture becomes a command when the pointer
//! is released, and only if it changed something.

use pinboard_core::{PinboardResult, Point};
use pinboard_domain::canvas::{
    ConnectGesture, ConnectionPath, DragGesture, DragOutcome, DragSubject, ElementRef, Gesture,
    PanGesture, PanOutcome, PointerId, PressTarget, ResizeGesture,
};
use pinboard_domain::commands::ResizeGroup;
use pinboard_domain::{ConnectionColor, Endpoint};

use super::Session;
use crate::events::SessionEvent;

impl Session {
    /// Start a gesture for `pointer`. Returns `false` when another gesture
    /// is running or the target is not in the scene.
    pub fn pointer_down(&mut self, pointer: PointerId, screen: Point, target: PressTarget) -> bool {
        let gesture = match target {
            PressTarget::Background => Gesture::Pan(PanGesture::new(
                screen,
                Point::new(self.viewport.x, self.viewport.y),
            )),
            PressTarget::Card(placement_id) => {
                let Some(card) = self.scene.card(placement_id) else {
                    return false;
                };
                Gesture::Drag(DragGesture::new(
                    DragSubject::Card(placement_id),
                    card.rect.origin(),
                    screen,
                ))
            }
            PressTarget::Group(group_id) => {
                let Some(group) = self.scene.group(group_id) else {
                    return false;
                };
                let subject = DragSubject::Group {
                    group_id,
                    members: self.scene.members_of(group_id),
                };
                Gesture::Drag(DragGesture::new(subject, group.rect.origin(), screen))
            }
            PressTarget::GroupCorner(group_id, corner) => {
                let Some(group) = self.scene.group(group_id) else {
                    return false;
                };
                Gesture::Resize(ResizeGesture::new(group_id, corner, group.rect, screen))
            }
            PressTarget::Anchor(source, side) => {
                let Some(rect) = self.scene.rect_of(source) else {
                    return false;
                };
                Gesture::Connect(ConnectGesture::new(source, side, side.anchor_point(&rect)))
            }
        };
        self.gestures.begin(pointer, gesture)
    }

    /// Track `pointer`. Moves from pointers that own no gesture are ignored.
    pub fn pointer_move(&mut self, pointer: PointerId, screen: Point) {
        let zoom = self.viewport.zoom;
        let cursor = self.viewport.screen_to_canvas(screen);
        let Some(gesture) = self.gestures.active_mut(pointer) else {
            return;
        };
        match gesture {
            Gesture::Drag(drag) => {
                let position = drag.update(screen, zoom);
                match drag.subject() {
                    DragSubject::Card(placement_id) => self.scene.move_card(*placement_id, position),
                    DragSubject::Group { group_id, .. } => {
                        if let Some(rect) = self.scene.group(*group_id).map(|g| g.rect) {
                            self.scene.set_group_rect(*group_id, rect.with_origin(position));
                        }
                        for (placement_id, member) in drag.member_positions() {
                            self.scene.move_card(placement_id, member);
                        }
                    }
                }
            }
            Gesture::Resize(resize) => {
                let rect = resize.update(screen, zoom);
                self.scene.set_group_rect(resize.group_id(), rect);
            }
            Gesture::Connect(connect) => {
                connect.update(cursor, &self.scene);
            }
            Gesture::Pan(pan) => {
                let pan_to = pan.update(screen);
                self.viewport.x = pan_to.x;
                self.viewport.y = pan_to.y;
                self.events.emit(SessionEvent::ViewportChanged(self.viewport));
                return;
            }
        }
        self.events.emit(SessionEvent::SceneChanged);
    }

    /// Finish the gesture owned by `pointer` and commit its result.
    /// `additive` turns a card click into a multi-select toggle.
    pub async fn pointer_up(&mut self, pointer: PointerId, screen: Point, additive: bool) -> PinboardResult<()> {
        self.pointer_move(pointer, screen);
        let Some(gesture) = self.gestures.finish(pointer) else {
            return Ok(());
        };
        match gesture {
            Gesture::Drag(drag) => self.commit_drag(drag.finish(), additive).await,
            Gesture::Resize(resize) => {
                let group_id = resize.group_id();
                match resize.finish() {
                    Some((from, to)) => self.run(Box::new(ResizeGroup { group_id, from, to })).await,
                    None => Ok(()),
                }
            }
            Gesture::Connect(connect) => match connect.finish() {
                Some((from, to)) => self
                    .create_connection(from, to, None, ConnectionColor::default())
                    .await
                    .map(|_| ()),
                None => {
                    self.events.emit(SessionEvent::SceneChanged);
                    Ok(())
                }
            },
            Gesture::Pan(pan) => {
                if pan.finish() == PanOutcome::Click {
                    self.clear_selection();
                }
                Ok(())
            }
        }
    }

    /// Abandon the running gesture and put the scene back.
    pub async fn cancel_gesture(&mut self) -> PinboardResult<()> {
        let Some(gesture) = self.gestures.cancel() else {
            return Ok(());
        };
        tracing::debug!(gesture = gesture.name(), "gesture cancelled");
        self.refresh().await
    }

    /// Path from the anchor to the cursor while a connection is being drawn,
    /// with the element it would snap to.
    pub fn connection_preview(&self) -> Option<(ConnectionPath, Option<Endpoint>)> {
        match self.gestures.active()? {
            Gesture::Connect(connect) => Some((connect.preview(), connect.target())),
            _ => None,
        }
    }

    async fn commit_drag(&mut self, outcome: DragOutcome, additive: bool) -> PinboardResult<()> {
        match outcome {
            DragOutcome::Click(DragSubject::Card(placement_id)) => {
                if additive {
                    self.toggle_card(placement_id);
                } else {
                    self.select(ElementRef::Card(placement_id));
                }
                Ok(())
            }
            DragOutcome::Click(DragSubject::Group { group_id, .. }) => {
                self.select(ElementRef::Group(group_id));
                Ok(())
            }
            DragOutcome::Moved {
                subject: DragSubject::Card(placement_id),
                from,
                to,
                ..
            } => self.commit_card_move(placement_id, from, to).await.map(|_| ()),
            DragOutcome::Moved {
                subject: DragSubject::Group { group_id, .. },
                from,
                to,
                members,
            } => self
                .commit_group_move(group_id, from, to, members)
                .await
                .map(|_| ()),
        }
    }
}
