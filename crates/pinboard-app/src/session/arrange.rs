//! Moves and resizes requested directly rather than through a gesture.

use pinboard_core::{PinboardResult, Point, Rect};
use pinboard_domain::canvas::gesture::{MIN_GROUP_HEIGHT, MIN_GROUP_WIDTH};
use pinboard_domain::commands::{MemberMove, MoveGroup, MovePlacement, ResizeGroup};
use pinboard_domain::{GroupId, PlacementId, PlacementSlot};

use super::Session;

impl Session {
    /// Move a card of the current tab to `to`. Group membership follows the
    /// card's center. Returns `false` when nothing changed.
    pub async fn move_card(&mut self, placement_id: PlacementId, to: Point) -> PinboardResult<bool> {
        let Some(from) = self.scene.card(placement_id).map(|c| c.rect.origin()) else {
            return Ok(false);
        };
        self.commit_card_move(placement_id, from, to).await
    }

    /// Move a group of the current tab, carrying its members along.
    pub async fn move_group(&mut self, group_id: GroupId, to: Point) -> PinboardResult<bool> {
        let Some(from) = self.scene.group(group_id).map(|g| g.rect.origin()) else {
            return Ok(false);
        };
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let members = self
            .scene
            .members_of(group_id)
            .into_iter()
            .map(|(placement_id, origin)| MemberMove {
                placement_id,
                from: origin,
                to: origin.offset(dx, dy),
            })
            .collect();
        self.commit_group_move(group_id, from, to, members).await
    }

    /// Give a group new bounds, no smaller than the resize minimum.
    pub async fn resize_group(&mut self, group_id: GroupId, bounds: Rect) -> PinboardResult<bool> {
        let Some(from) = self.scene.group(group_id).map(|g| g.rect) else {
            return Ok(false);
        };
        let to = Rect::new(
            bounds.x,
            bounds.y,
            bounds.width.max(MIN_GROUP_WIDTH),
            bounds.height.max(MIN_GROUP_HEIGHT),
        );
        if to == from {
            return Ok(false);
        }
        self.run(Box::new(ResizeGroup { group_id, from, to })).await?;
        Ok(true)
    }

    pub(super) async fn commit_card_move(
        &mut self,
        placement_id: PlacementId,
        from: Point,
        to: Point,
    ) -> PinboardResult<bool> {
        let Some(card) = self.scene.card(placement_id) else {
            self.refresh().await?;
            return Ok(false);
        };
        let command = MovePlacement {
            placement_id,
            from: PlacementSlot {
                position: from,
                group_id: card.group_id,
            },
            to: PlacementSlot {
                position: to,
                group_id: self.group_at_card_center(to, card.rect.height),
            },
        };
        if command.is_noop() {
            self.refresh().await?;
            return Ok(false);
        }
        self.run(Box::new(command)).await?;
        Ok(true)
    }

    pub(super) async fn commit_group_move(
        &mut self,
        group_id: GroupId,
        from: Point,
        to: Point,
        members: Vec<MemberMove>,
    ) -> PinboardResult<bool> {
        if from == to {
            self.refresh().await?;
            return Ok(false);
        }
        self.run(Box::new(MoveGroup {
            group_id,
            from,
            to,
            members,
        }))
        .await?;
        Ok(true)
    }
}
