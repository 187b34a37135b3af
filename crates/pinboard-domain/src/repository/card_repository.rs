use pinboard_core::PinboardResult;

use super::Repository;
use crate::{BoardId, Card, CardId, CardUpdate};

impl Repository<Card> {
    pub async fn create(&self, board_id: BoardId, title: impl Into<String>) -> PinboardResult<Card> {
        let card = Card::new(board_id, title.into());
        self.put(&card).await?;
        Ok(card)
    }

    /// The board's card library, sorted by title.
    pub async fn by_board(&self, board_id: BoardId) -> PinboardResult<Vec<Card>> {
        let mut cards = self.by_index("board_id", board_id).await?;
        cards.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        Ok(cards)
    }

    /// Apply `updates` to the stored card. Untouched fields keep their values.
    pub async fn update(&self, id: CardId, updates: CardUpdate) -> PinboardResult<Option<Card>> {
        let Some(mut card) = self.get(id).await? else {
            return Ok(None);
        };
        card.update(updates);
        self.put(&card).await?;
        Ok(Some(card))
    }
}
