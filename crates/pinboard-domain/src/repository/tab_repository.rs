use pinboard_core::PinboardResult;

use super::Repository;
use crate::{BoardId, Tab, TabId, TabUpdate};

impl Repository<Tab> {
    /// Append a tab after the board's existing ones.
    pub async fn create(&self, board_id: BoardId, name: impl Into<String>) -> PinboardResult<Tab> {
        let order = self.by_board(board_id).await?.len() as u32;
        let tab = Tab::new(board_id, name.into(), order);
        self.put(&tab).await?;
        Ok(tab)
    }

    /// Tabs of a board in display order.
    pub async fn by_board(&self, board_id: BoardId) -> PinboardResult<Vec<Tab>> {
        let mut tabs = self.by_index("board_id", board_id).await?;
        tabs.sort_by_key(|t| t.order);
        Ok(tabs)
    }

    pub async fn update(&self, id: TabId, updates: TabUpdate) -> PinboardResult<Option<Tab>> {
        let Some(mut tab) = self.get(id).await? else {
            return Ok(None);
        };
        tab.update(updates);
        self.put(&tab).await?;
        Ok(Some(tab))
    }

    /// Rewrite `order` so that the board's tabs follow `ordered` densely from 0.
    /// Tabs missing from `ordered` keep their relative order after the listed ones.
    pub async fn reorder(&self, board_id: BoardId, ordered: &[TabId]) -> PinboardResult<Vec<Tab>> {
        let mut tabs = self.by_board(board_id).await?;
        tabs.sort_by_key(|t| {
            ordered
                .iter()
                .position(|id| *id == t.id)
                .unwrap_or(ordered.len())
        });
        for (index, tab) in tabs.iter_mut().enumerate() {
            let order = index as u32;
            if tab.order != order {
                tab.order = order;
                self.put(tab).await?;
            }
        }
        Ok(tabs)
    }

    /// Close gaps left by a deleted tab.
    pub async fn compact(&self, board_id: BoardId) -> PinboardResult<Vec<Tab>> {
        let ids: Vec<TabId> = self.by_board(board_id).await?.iter().map(|t| t.id).collect();
        self.reorder(board_id, &ids).await
    }
}
