use pinboard_core::{Point, PinboardResult};

use super::Repository;
use crate::{CardId, GroupId, Placement, PlacementId, PlacementUpdate, TabId};

impl Repository<Placement> {
    pub async fn create(
        &self,
        tab_id: TabId,
        card_id: CardId,
        position: Point,
    ) -> PinboardResult<Placement> {
        let placement = Placement::new(tab_id, card_id, position.x, position.y);
        self.put(&placement).await?;
        Ok(placement)
    }

    pub async fn by_tab(&self, tab_id: TabId) -> PinboardResult<Vec<Placement>> {
        self.by_index("tab_id", tab_id).await
    }

    pub async fn by_card(&self, card_id: CardId) -> PinboardResult<Vec<Placement>> {
        self.by_index("card_id", card_id).await
    }

    pub async fn by_group(&self, group_id: GroupId) -> PinboardResult<Vec<Placement>> {
        self.by_index("group_id", group_id).await
    }

    /// The card's placement on `tab_id`, if it is already on that tab.
    pub async fn find_on_tab(
        &self,
        tab_id: TabId,
        card_id: CardId,
    ) -> PinboardResult<Option<Placement>> {
        Ok(self
            .by_card(card_id)
            .await?
            .into_iter()
            .find(|p| p.tab_id == tab_id))
    }

    pub async fn update(
        &self,
        id: PlacementId,
        updates: PlacementUpdate,
    ) -> PinboardResult<Option<Placement>> {
        let Some(mut placement) = self.get(id).await? else {
            return Ok(None);
        };
        placement.update(updates);
        self.put(&placement).await?;
        Ok(Some(placement))
    }
}
