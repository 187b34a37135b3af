use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{board::BoardId, field_update::FieldUpdate};

pub type CardId = Uuid;

pub const DEFAULT_CARD_TITLE: &str = "New Card";

/// Board-scoped content. A card lives independently of any tab; it shows up
/// on canvases through placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Content hash of the card photo in the image store.
    #[serde(default)]
    pub image_filename: Option<String>,
}

impl Card {
    pub fn new(board_id: BoardId, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            title,
            description: None,
            image_filename: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn update(&mut self, updates: CardUpdate) {
        if let Some(title) = updates.title {
            self.title = title;
        }
        updates.description.apply_to(&mut self.description);
        updates.image_filename.apply_to(&mut self.image_filename);
    }
}

/// Partial update of the editable card fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub image_filename: FieldUpdate<String>,
}

impl CardUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn description(description: Option<String>) -> Self {
        Self {
            description: FieldUpdate::from(description),
            ..Default::default()
        }
    }

    pub fn image(hash: Option<String>) -> Self {
        Self {
            image_filename: FieldUpdate::from(hash),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && !self.description.is_change() && !self.image_filename.is_change()
    }

    /// Update restoring `card`'s current values for every field this update touches.
    pub fn inverse(&self, card: &Card) -> CardUpdate {
        CardUpdate {
            title: self.title.as_ref().map(|_| card.title.clone()),
            description: self.description.inverse(&card.description),
            image_filename: self.image_filename.inverse(&card.image_filename),
        }
    }

    /// Whether applying this update to `card` would change anything.
    pub fn changes(&self, card: &Card) -> bool {
        let mut updated = card.clone();
        updated.update(self.clone());
        updated != *card
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_touches_only_named_fields() {
        let mut card = Card::new(Uuid::new_v4(), "Title".to_string())
            .with_description(Some("keep me".to_string()));
        card.update(CardUpdate::title("Renamed"));
        assert_eq!(card.title, "Renamed");
        assert_eq!(card.description.as_deref(), Some("keep me"));
    }

    #[test]
    fn test_inverse_round_trip() {
        let original = Card::new(Uuid::new_v4(), "Title".to_string());
        let update = CardUpdate {
            title: Some("Other".to_string()),
            description: FieldUpdate::Set("desc".to_string()),
            image_filename: FieldUpdate::NoChange,
        };
        let undo = update.inverse(&original);

        let mut card = original.clone();
        card.update(update);
        card.update(undo);
        assert_eq!(card, original);
    }

    #[test]
    fn test_changes_detects_noop() {
        let card = Card::new(Uuid::new_v4(), "Same".to_string());
        assert!(!CardUpdate::title("Same").changes(&card));
        assert!(CardUpdate::title("Different").changes(&card));
        assert!(CardUpdate::default().is_empty());
    }
}
