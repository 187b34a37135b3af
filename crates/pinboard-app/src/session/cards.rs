use pinboard_core::{PinboardError, PinboardResult, Point, Rect};
use pinboard_domain::board_lifecycle;
use pinboard_domain::canvas::scene::{CARD_WIDTH, DEFAULT_CARD_HEIGHT};
use pinboard_domain::canvas::Selection;
use pinboard_domain::commands::{PlaceCard, RemovePlacement, UpdateCard};
use pinboard_domain::{
    Card, CardId, CardUpdate, Image, ImageHash, Placement, PlacementId, DEFAULT_CARD_TITLE,
};

use super::Session;
use crate::events::SessionEvent;

impl Session {
    /// Create a new card in the library and place it at `position` on the
    /// current tab, inside whichever group its center lands in.
    pub async fn add_card_at(&mut self, position: Point) -> PinboardResult<PlacementId> {
        let card = Card::new(self.board.id, DEFAULT_CARD_TITLE.to_string());
        let mut placement = Placement::new(self.tab.id, card.id, position.x, position.y);
        placement.group_id = self.group_at_card_center(position, DEFAULT_CARD_HEIGHT);
        let placement_id = placement.id;
        let title = card.title.clone();

        self.run(Box::new(PlaceCard {
            placement,
            card: Some(card),
        }))
        .await?;

        self.selection = Selection::card(placement_id);
        self.events
            .emit(SessionEvent::SelectionChanged(self.selection.clone()));
        self.announce(format!("Card created: {}", title));
        Ok(placement_id)
    }

    /// Like [`Session::add_card_at`], centered in the visible canvas.
    pub async fn add_card_at_center(&mut self) -> PinboardResult<PlacementId> {
        let center = self.viewport.center(self.container);
        self.add_card_at(center.offset(-CARD_WIDTH / 2.0, -DEFAULT_CARD_HEIGHT / 2.0))
            .await
    }

    /// Put an existing library card on the current tab. A card appears at
    /// most once per tab.
    pub async fn place_card(&mut self, card_id: CardId, position: Point) -> PinboardResult<PlacementId> {
        let card = self
            .repos
            .cards
            .get(card_id)
            .await?
            .filter(|c| c.board_id == self.board.id)
            .ok_or_else(|| PinboardError::NotFound(format!("card {}", card_id)))?;
        if self
            .repos
            .placements
            .find_on_tab(self.tab.id, card_id)
            .await?
            .is_some()
        {
            return Err(PinboardError::Validation(format!(
                "'{}' is already on this tab",
                card.title
            )));
        }

        let mut placement = Placement::new(self.tab.id, card_id, position.x, position.y);
        placement.group_id = self.group_at_card_center(position, DEFAULT_CARD_HEIGHT);
        let placement_id = placement.id;
        self.run(Box::new(PlaceCard {
            placement,
            card: None,
        }))
        .await?;
        self.announce(format!("Card placed: {}", card.title));
        Ok(placement_id)
    }

    /// The board's card library, sorted by title.
    pub async fn card_library(&self) -> PinboardResult<Vec<Card>> {
        self.repos.cards.by_board(self.board.id).await
    }

    /// Returns `false` when the card is gone or nothing would change.
    pub async fn update_card(&mut self, card_id: CardId, updates: CardUpdate) -> PinboardResult<bool> {
        let Some(command) = UpdateCard::capture(&self.repos, card_id, updates).await? else {
            return Ok(false);
        };
        self.run(Box::new(command)).await?;
        Ok(true)
    }

    /// Store `bytes` content-addressed and make them the card's photo.
    pub async fn set_card_image(
        &mut self,
        card_id: CardId,
        bytes: Vec<u8>,
        content_type: &str,
        original_filename: &str,
    ) -> PinboardResult<ImageHash> {
        let result = self
            .repos
            .images
            .save(bytes, content_type, original_filename)
            .await;
        let hash = self.report(result)?;
        self.update_card(card_id, CardUpdate::image(Some(hash.clone())))
            .await?;
        Ok(hash)
    }

    pub async fn image(&self, hash: &str) -> PinboardResult<Option<Image>> {
        self.repos.images.get(hash).await
    }

    pub async fn image_hashes(&self) -> PinboardResult<Vec<ImageHash>> {
        self.repos.images.hashes().await
    }

    /// Delete a stored image no card of any board still shows. Returns
    /// `false` when it was not stored.
    pub async fn delete_image(&mut self, hash: &str) -> PinboardResult<bool> {
        if !self.repos.images.exists(hash).await? {
            return Ok(false);
        }
        let in_use = self
            .repos
            .cards
            .all()
            .await?
            .iter()
            .any(|card| card.image_filename.as_deref() == Some(hash));
        if in_use {
            return Err(PinboardError::Validation(format!(
                "image {} is still used by a card",
                hash
            )));
        }
        self.repos.images.delete(hash).await?;
        tracing::info!(%hash, "deleted image");
        Ok(true)
    }

    /// Take a card off the current tab. The card stays in the library.
    pub async fn remove_placement(&mut self, placement_id: PlacementId) -> PinboardResult<bool> {
        let Some(command) = RemovePlacement::capture(&self.repos, placement_id).await? else {
            return Ok(false);
        };
        self.run(Box::new(command)).await?;
        self.announce("Card removed from tab");
        Ok(true)
    }

    /// Remove a card from every tab and from the library. Not undoable.
    pub async fn delete_card_everywhere(&mut self, card_id: CardId) -> PinboardResult<bool> {
        let result = board_lifecycle::delete_card_everywhere(&self.repos, card_id).await;
        let deleted = self.report(result)?;
        if deleted {
            self.refresh().await?;
            self.announce("Card deleted");
        }
        Ok(deleted)
    }

    /// Group containing the center of a card whose top-left is `origin`.
    pub(super) fn group_at_card_center(&self, origin: Point, height: f64) -> Option<pinboard_domain::GroupId> {
        let center = Rect::new(origin.x, origin.y, CARD_WIDTH, height).center();
        self.scene.group_containing(center)
    }
}
