use pinboard_core::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{card::CardId, field_update::FieldUpdate, group::GroupId, tab::TabId};

pub type PlacementId = Uuid;

/// "This card appears on this tab at this position", optionally inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PlacementId,
    pub tab_id: TabId,
    pub card_id: CardId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub group_id: Option<GroupId>,
}

impl Placement {
    pub fn new(tab_id: TabId, card_id: CardId, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            tab_id,
            card_id,
            x,
            y,
            group_id: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn slot(&self) -> PlacementSlot {
        PlacementSlot {
            position: self.position(),
            group_id: self.group_id,
        }
    }

    pub fn update(&mut self, updates: PlacementUpdate) {
        if let Some(position) = updates.position {
            self.x = position.x;
            self.y = position.y;
        }
        updates.group_id.apply_to(&mut self.group_id);
    }
}

/// Where a placement sits: its position and the group it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSlot {
    pub position: Point,
    pub group_id: Option<GroupId>,
}

impl PlacementSlot {
    pub fn as_update(&self) -> PlacementUpdate {
        PlacementUpdate {
            position: Some(self.position),
            group_id: FieldUpdate::from(self.group_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementUpdate {
    pub position: Option<Point>,
    pub group_id: FieldUpdate<GroupId>,
}

impl PlacementUpdate {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn group(group_id: Option<GroupId>) -> Self {
        Self {
            group_id: FieldUpdate::from(group_id),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_update_round_trip() {
        let mut placement = Placement::new(Uuid::new_v4(), Uuid::new_v4(), 10.0, 20.0);
        let before = placement.slot();
        let group = Uuid::new_v4();

        placement.update(PlacementUpdate {
            position: Some(Point::new(50.0, 60.0)),
            group_id: FieldUpdate::Set(group),
        });
        assert_eq!(placement.group_id, Some(group));

        placement.update(before.as_update());
        assert_eq!(placement.slot(), before);
    }
}
