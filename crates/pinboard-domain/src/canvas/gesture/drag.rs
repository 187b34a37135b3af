use pinboard_core::Point;

use crate::{commands::MemberMove, GroupId, PlacementId};

/// Movement (canvas units, either axis) past which a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DragSubject {
    Card(PlacementId),
    /// Member origins are cached when the drag starts.
    Group {
        group_id: GroupId,
        members: Vec<(PlacementId, Point)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Never left the threshold; treat as a selection click.
    Click(DragSubject),
    Moved {
        subject: DragSubject,
        from: Point,
        to: Point,
        members: Vec<MemberMove>,
    },
}

#[derive(Debug, Clone)]
pub struct DragGesture {
    subject: DragSubject,
    start_screen: Point,
    origin: Point,
    delta: (f64, f64),
    moved: bool,
}

impl DragGesture {
    /// `origin` is the subject's canvas position at press time.
    pub fn new(subject: DragSubject, origin: Point, start_screen: Point) -> Self {
        Self {
            subject,
            start_screen,
            origin,
            delta: (0.0, 0.0),
            moved: false,
        }
    }

    pub fn subject(&self) -> &DragSubject {
        &self.subject
    }

    /// Track the pointer and return the subject's live canvas position.
    pub fn update(&mut self, screen: Point, zoom: f64) -> Point {
        let dx = (screen.x - self.start_screen.x) / zoom;
        let dy = (screen.y - self.start_screen.y) / zoom;
        if dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD {
            self.moved = true;
        }
        self.delta = (dx, dy);
        self.position()
    }

    pub fn position(&self) -> Point {
        self.origin.offset(self.delta.0, self.delta.1)
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Live positions of the group's members, empty for a card drag.
    pub fn member_positions(&self) -> Vec<(PlacementId, Point)> {
        self.member_moves()
            .into_iter()
            .map(|m| (m.placement_id, m.to))
            .collect()
    }

    fn member_moves(&self) -> Vec<MemberMove> {
        match &self.subject {
            DragSubject::Card(_) => Vec::new(),
            DragSubject::Group { members, .. } => members
                .iter()
                .map(|(placement_id, from)| MemberMove {
                    placement_id: *placement_id,
                    from: *from,
                    to: from.offset(self.delta.0, self.delta.1),
                })
                .collect(),
        }
    }

    pub fn finish(self) -> DragOutcome {
        if !self.moved {
            return DragOutcome::Click(self.subject);
        }
        let members = self.member_moves();
        let to = self.position();
        DragOutcome::Moved {
            subject: self.subject,
            from: self.origin,
            to,
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_small_jitter_is_a_click() {
        let id = Uuid::new_v4();
        let mut drag = DragGesture::new(DragSubject::Card(id), Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        drag.update(Point::new(1.5, -2.0), 1.0);
        assert_eq!(drag.finish(), DragOutcome::Click(DragSubject::Card(id)));
    }

    #[test]
    fn test_screen_delta_is_divided_by_zoom() {
        let id = Uuid::new_v4();
        let mut drag = DragGesture::new(DragSubject::Card(id), Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        let live = drag.update(Point::new(90.0, 30.0), 2.0);
        assert_eq!(live, Point::new(120.0, 90.0));
    }

    #[test]
    fn test_threshold_is_sticky() {
        let id = Uuid::new_v4();
        let mut drag = DragGesture::new(DragSubject::Card(id), Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        drag.update(Point::new(30.0, 0.0), 1.0);
        drag.update(Point::new(1.0, 0.0), 1.0);
        match drag.finish() {
            DragOutcome::Moved { from, to, .. } => {
                assert_eq!(from, Point::new(0.0, 0.0));
                assert_eq!(to, Point::new(1.0, 0.0));
            }
            other => panic!("expected a move, got {:?}", other),
        }
    }

    #[test]
    fn test_group_members_follow_the_delta() {
        let (group_id, a, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let subject = DragSubject::Group {
            group_id,
            members: vec![(a, Point::new(10.0, 10.0)), (b, Point::new(50.0, 20.0))],
        };
        let mut drag = DragGesture::new(subject, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        drag.update(Point::new(25.0, 5.0), 1.0);
        assert_eq!(
            drag.member_positions(),
            vec![(a, Point::new(35.0, 15.0)), (b, Point::new(75.0, 25.0))]
        );

        let DragOutcome::Moved { members, to, .. } = drag.finish() else {
            panic!("expected a move");
        };
        assert_eq!(to, Point::new(25.0, 5.0));
        assert_eq!(members[1].from, Point::new(50.0, 20.0));
        assert_eq!(members[1].to, Point::new(75.0, 25.0));
    }
}
