use async_trait::async_trait;
use pinboard_core::PinboardResult;

use super::Command;
use crate::{repository::Repositories, Card, CardId, CardUpdate, Endpoint, Placement};

/// Update card fields (title, description, image)
pub struct UpdateCard {
    pub card_id: CardId,
    pub updates: CardUpdate,
    pub previous: CardUpdate,
}

impl UpdateCard {
    /// Capture the current values of every field `updates` touches.
    /// Returns `None` when the card is gone or nothing would change.
    pub async fn capture(
        repos: &Repositories,
        card_id: CardId,
        updates: CardUpdate,
    ) -> PinboardResult<Option<Self>> {
        let Some(card) = repos.cards.get(card_id).await? else {
            return Ok(None);
        };
        if !updates.changes(&card) {
            return Ok(None);
        }
        Ok(Some(Self {
            card_id,
            previous: updates.inverse(&card),
            updates,
        }))
    }
}

#[async_trait]
impl Command for UpdateCard {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        repos.cards.update(self.card_id, self.updates.clone()).await?;
        Ok(())
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        repos.cards.update(self.card_id, self.previous.clone()).await?;
        Ok(())
    }

    fn description(&self) -> String {
        match &self.updates.title {
            Some(title) => format!("Update card: '{}'", title),
            None => "Update card".to_string(),
        }
    }
}

/// Put a card on a tab.
///
/// Idempotent: `apply` does nothing when the placement row already exists,
/// so the action can create the rows eagerly and record this afterwards.
/// `card` is set when the card was created together with the placement; in
/// that case a redo recreates the card if it has since been deleted.
/// Undo only removes the placement, the card stays in the library.
pub struct PlaceCard {
    pub placement: Placement,
    pub card: Option<Card>,
}

#[async_trait]
impl Command for PlaceCard {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        if repos.placements.exists(self.placement.id).await? {
            return Ok(());
        }
        if !repos.tabs.exists(self.placement.tab_id).await? {
            tracing::warn!(tab_id = %self.placement.tab_id, "tab gone, not placing card");
            return Ok(());
        }
        if !repos.cards.exists(self.placement.card_id).await? {
            match &self.card {
                Some(card) => repos.cards.put(card).await?,
                None => {
                    tracing::warn!(card_id = %self.placement.card_id, "card gone, not placing it");
                    return Ok(());
                }
            }
        }
        let mut placement = self.placement.clone();
        if let Some(group_id) = placement.group_id {
            if !repos.groups.exists(group_id).await? {
                placement.group_id = None;
            }
        }
        repos.placements.put(&placement).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        for conn in repos
            .connections
            .attached_to(Endpoint::card(self.placement.id))
            .await?
        {
            repos.connections.delete(conn.id).await?;
        }
        repos.placements.delete(self.placement.id).await
    }

    fn description(&self) -> String {
        match &self.card {
            Some(card) => format!("Create card: '{}'", card.title),
            None => "Place card".to_string(),
        }
    }
}
