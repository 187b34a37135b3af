//! Point-in-time captures of board and tab graphs.
//!
//! A [`TabSnapshot`] holds every row scoped to one tab and is what tab
//! deletion reverts to. A [`BoardSnapshot`] holds a whole board and feeds
//! duplication and export.
//!
//! Restoring is defensive about rows that disappeared in the meantime through
//! non-undoable operations: placements whose card is gone and connections
//! whose endpoints no longer resolve are skipped with a warning.

use pinboard_core::PinboardResult;

use crate::{
    repository::Repositories, Board, BoardId, Card, Connection, Group, Placement, Tab, TabId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TabSnapshot {
    pub tab: Tab,
    pub groups: Vec<Group>,
    pub placements: Vec<Placement>,
    pub connections: Vec<Connection>,
}

impl TabSnapshot {
    pub async fn capture(repos: &Repositories, tab_id: TabId) -> PinboardResult<Option<Self>> {
        let Some(tab) = repos.tabs.get(tab_id).await? else {
            return Ok(None);
        };
        Ok(Some(Self {
            groups: repos.groups.by_tab(tab_id).await?,
            placements: repos.placements.by_tab(tab_id).await?,
            connections: repos.connections.by_tab(tab_id).await?,
            tab,
        }))
    }

    /// Delete every captured row, connections first so no row ever dangles.
    pub async fn remove(&self, repos: &Repositories) -> PinboardResult<()> {
        for conn in &self.connections {
            repos.connections.delete(conn.id).await?;
        }
        for placement in &self.placements {
            repos.placements.delete(placement.id).await?;
        }
        for group in &self.groups {
            repos.groups.delete(group.id).await?;
        }
        repos.tabs.delete(self.tab.id).await
    }

    pub async fn restore(&self, repos: &Repositories) -> PinboardResult<()> {
        repos.tabs.put(&self.tab).await?;
        for group in &self.groups {
            repos.groups.put(group).await?;
        }
        restore_placements(repos, &self.placements).await?;
        restore_connections(repos, &self.connections).await
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.placements.is_empty() && self.connections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub board: Board,
    pub cards: Vec<Card>,
    /// In display order.
    pub tabs: Vec<TabSnapshot>,
}

impl BoardSnapshot {
    pub async fn capture(repos: &Repositories, board_id: BoardId) -> PinboardResult<Option<Self>> {
        let Some(board) = repos.boards.get(board_id).await? else {
            return Ok(None);
        };
        let cards = repos.cards.by_board(board_id).await?;
        let mut tabs = Vec::new();
        for tab in repos.tabs.by_board(board_id).await? {
            if let Some(snapshot) = TabSnapshot::capture(repos, tab.id).await? {
                tabs.push(snapshot);
            }
        }
        Ok(Some(Self { board, cards, tabs }))
    }
}

/// Put back `placements` whose tab and card still exist.
pub(crate) async fn restore_placements(
    repos: &Repositories,
    placements: &[Placement],
) -> PinboardResult<()> {
    for placement in placements {
        if !repos.cards.exists(placement.card_id).await?
            || !repos.tabs.exists(placement.tab_id).await?
        {
            tracing::warn!(
                placement_id = %placement.id,
                card_id = %placement.card_id,
                "skipping restore of placement whose card or tab is gone"
            );
            continue;
        }
        let mut placement = placement.clone();
        if let Some(group_id) = placement.group_id {
            if !repos.groups.exists(group_id).await? {
                placement.group_id = None;
            }
        }
        repos.placements.put(&placement).await?;
    }
    Ok(())
}

/// Put back `connections` whose endpoints both resolve on their tab.
pub(crate) async fn restore_connections(
    repos: &Repositories,
    connections: &[Connection],
) -> PinboardResult<()> {
    for conn in connections {
        if !repos.connection_resolves(conn).await? {
            tracing::warn!(
                connection_id = %conn.id,
                "skipping restore of connection with a missing endpoint"
            );
            continue;
        }
        repos.connections.put(conn).await?;
    }
    Ok(())
}
