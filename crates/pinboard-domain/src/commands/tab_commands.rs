use async_trait::async_trait;
use pinboard_core::{PinboardError, PinboardResult};

use super::Command;
use crate::{repository::Repositories, snapshot::TabSnapshot, TabId};

/// Delete a tab and everything scoped to it. Undo restores the whole
/// captured graph and puts the tab back at its old position.
pub struct DeleteTab {
    pub snapshot: TabSnapshot,
}

impl DeleteTab {
    /// Fails when `tab_id` is the last tab of its board.
    pub async fn capture(repos: &Repositories, tab_id: TabId) -> PinboardResult<Option<Self>> {
        let Some(snapshot) = TabSnapshot::capture(repos, tab_id).await? else {
            return Ok(None);
        };
        let siblings = repos.tabs.by_board(snapshot.tab.board_id).await?;
        if siblings.len() <= 1 {
            return Err(PinboardError::Validation(
                "cannot delete the last tab of a board".to_string(),
            ));
        }
        Ok(Some(Self { snapshot }))
    }
}

#[async_trait]
impl Command for DeleteTab {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        let tab = &self.snapshot.tab;
        if !repos.tabs.exists(tab.id).await? {
            return Ok(());
        }
        // Re-capture: rows may have been added since the command was built.
        let current = TabSnapshot::capture(repos, tab.id).await?;
        if let Some(current) = current {
            current.remove(repos).await?;
        }
        repos.tabs.compact(tab.board_id).await?;
        Ok(())
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        let tab = &self.snapshot.tab;
        if !repos.boards.exists(tab.board_id).await? {
            tracing::warn!(tab_id = %tab.id, "board gone, not restoring tab");
            return Ok(());
        }
        let mut ordered: Vec<TabId> = repos
            .tabs
            .by_board(tab.board_id)
            .await?
            .iter()
            .map(|t| t.id)
            .filter(|id| *id != tab.id)
            .collect();
        self.snapshot.restore(repos).await?;
        let index = (tab.order as usize).min(ordered.len());
        ordered.insert(index, tab.id);
        repos.tabs.reorder(tab.board_id, &ordered).await?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete tab: '{}'", self.snapshot.tab.name)
    }
}
