//! Board-level business rules.
//!
//! These operations touch many rows at once and are not undoable: callers
//! confirm with the user first and clear the history afterwards where needed.

use std::collections::HashMap;

use pinboard_core::{PinboardError, PinboardResult};

use crate::{
    repository::Repositories,
    snapshot::{BoardSnapshot, TabSnapshot},
    Board, BoardId, Card, CardId, Connection, Endpoint, EndpointKind, Group, GroupId, Placement,
    PlacementId, Tab,
};

/// Create a board with its first tab, "Tab 1".
pub async fn create_board(repos: &Repositories, name: &str) -> PinboardResult<(Board, Tab)> {
    let board = repos.boards.create(name).await?;
    let tab = repos.tabs.create(board.id, Tab::default_name(0)).await?;
    Ok((board, tab))
}

/// First-run bootstrap. Returns the first stored board, creating a default
/// one when the store holds none. A board left without tabs gets "Tab 1".
pub async fn ensure_board(repos: &Repositories, default_name: &str) -> PinboardResult<Board> {
    let mut boards = repos.boards.all().await?;
    boards.sort_by(|a, b| a.name.cmp(&b.name));
    let Some(board) = boards.into_iter().next() else {
        let (board, _) = create_board(repos, default_name).await?;
        return Ok(board);
    };
    if repos.tabs.by_board(board.id).await?.is_empty() {
        tracing::warn!(board_id = %board.id, "board has no tabs, adding one");
        repos.tabs.create(board.id, Tab::default_name(0)).await?;
    }
    Ok(board)
}

/// Remove a card from every tab and then from the library.
///
/// Each placement goes with its anchored connections. Returns `false` when
/// the card did not exist.
pub async fn delete_card_everywhere(repos: &Repositories, card_id: CardId) -> PinboardResult<bool> {
    if !repos.cards.exists(card_id).await? {
        return Ok(false);
    }
    for placement in repos.placements.by_card(card_id).await? {
        for conn in repos
            .connections
            .attached_to(Endpoint::card(placement.id))
            .await?
        {
            repos.connections.delete(conn.id).await?;
        }
        repos.placements.delete(placement.id).await?;
    }
    repos.cards.delete(card_id).await?;
    tracing::info!(%card_id, "deleted card everywhere");
    Ok(true)
}

/// Deep copy of a board under "`<name>` (copy)".
///
/// Cards share image hashes with the original. A connection whose endpoint
/// cannot be remapped into the copy is dropped with a warning.
pub async fn duplicate_board(repos: &Repositories, board_id: BoardId) -> PinboardResult<Option<Board>> {
    let Some(source) = BoardSnapshot::capture(repos, board_id).await? else {
        return Ok(None);
    };
    let name = format!("{} (copy)", source.board.name);
    let copy = remap_board(&source, Board::new(name));
    if let Err(err) = write_board(repos, &copy).await {
        discard_board(repos, &copy).await;
        return Err(err);
    }
    tracing::info!(source = %board_id, copy = %copy.board.id, "duplicated board");
    Ok(Some(copy.board))
}

/// Delete a board with all of its tabs, cards and tab-scoped rows.
/// The last remaining board cannot be deleted.
pub async fn delete_board(repos: &Repositories, board_id: BoardId) -> PinboardResult<bool> {
    let Some(snapshot) = BoardSnapshot::capture(repos, board_id).await? else {
        return Ok(false);
    };
    if repos.boards.all().await?.len() <= 1 {
        return Err(PinboardError::Validation(
            "cannot delete the last board".to_string(),
        ));
    }
    for tab in &snapshot.tabs {
        tab.remove(repos).await?;
    }
    for card in &snapshot.cards {
        repos.cards.delete(card.id).await?;
    }
    repos.boards.delete(board_id).await?;
    tracing::info!(%board_id, name = %snapshot.board.name, "deleted board");
    Ok(true)
}

/// Persist every row of `snapshot`, parents before children.
pub async fn write_board(repos: &Repositories, snapshot: &BoardSnapshot) -> PinboardResult<()> {
    repos.boards.put(&snapshot.board).await?;
    for card in &snapshot.cards {
        repos.cards.put(card).await?;
    }
    for tab in &snapshot.tabs {
        repos.tabs.put(&tab.tab).await?;
        for group in &tab.groups {
            repos.groups.put(group).await?;
        }
        for placement in &tab.placements {
            repos.placements.put(placement).await?;
        }
        for conn in &tab.connections {
            repos.connections.put(conn).await?;
        }
    }
    Ok(())
}

/// Best-effort removal of a board that was only partly written, children
/// first. Rows that never made it to the store are skipped.
pub async fn discard_board(repos: &Repositories, snapshot: &BoardSnapshot) {
    for tab in &snapshot.tabs {
        if let Err(err) = tab.remove(repos).await {
            tracing::warn!(tab_id = %tab.tab.id, error = %err, "failed to discard tab");
        }
    }
    for card in &snapshot.cards {
        if let Err(err) = repos.cards.delete(card.id).await {
            tracing::warn!(card_id = %card.id, error = %err, "failed to discard card");
        }
    }
    if let Err(err) = repos.boards.delete(snapshot.board.id).await {
        tracing::warn!(board_id = %snapshot.board.id, error = %err, "failed to discard board");
    }
}

/// Copy `source` under `board` with fresh ids everywhere.
fn remap_board(source: &BoardSnapshot, board: Board) -> BoardSnapshot {
    let card_ids: HashMap<CardId, CardId> = source
        .cards
        .iter()
        .map(|c| (c.id, uuid::Uuid::new_v4()))
        .collect();

    let cards = source
        .cards
        .iter()
        .map(|c| Card {
            id: card_ids[&c.id],
            board_id: board.id,
            ..c.clone()
        })
        .collect();

    let tabs = source
        .tabs
        .iter()
        .map(|tab| remap_tab(tab, board.id, &card_ids))
        .collect();

    BoardSnapshot { board, cards, tabs }
}

fn remap_tab(source: &TabSnapshot, board_id: BoardId, card_ids: &HashMap<CardId, CardId>) -> TabSnapshot {
    let tab = Tab {
        id: uuid::Uuid::new_v4(),
        board_id,
        ..source.tab.clone()
    };

    let mut group_ids: HashMap<GroupId, GroupId> = HashMap::new();
    let groups = source
        .groups
        .iter()
        .map(|g| {
            let id = uuid::Uuid::new_v4();
            group_ids.insert(g.id, id);
            Group {
                id,
                tab_id: tab.id,
                ..g.clone()
            }
        })
        .collect();

    let mut placement_ids: HashMap<PlacementId, PlacementId> = HashMap::new();
    let mut placements = Vec::new();
    for p in &source.placements {
        let Some(card_id) = card_ids.get(&p.card_id) else {
            tracing::warn!(placement_id = %p.id, "placement refers to a card outside the board, skipping");
            continue;
        };
        let id = uuid::Uuid::new_v4();
        placement_ids.insert(p.id, id);
        placements.push(Placement {
            id,
            tab_id: tab.id,
            card_id: *card_id,
            group_id: p.group_id.and_then(|g| group_ids.get(&g).copied()),
            ..p.clone()
        });
    }

    let remap = |endpoint: Endpoint| -> Option<Endpoint> {
        let ids = match endpoint.kind {
            EndpointKind::Card => &placement_ids,
            EndpointKind::Group => &group_ids,
        };
        ids.get(&endpoint.id).map(|id| Endpoint {
            kind: endpoint.kind,
            id: *id,
        })
    };

    let mut connections = Vec::new();
    for c in &source.connections {
        match (remap(c.from()), remap(c.to())) {
            (Some(from), Some(to)) => connections.push(Connection {
                id: uuid::Uuid::new_v4(),
                tab_id: tab.id,
                from_type: from.kind,
                from_id: from.id,
                to_type: to.kind,
                to_id: to.id,
                ..c.clone()
            }),
            _ => tracing::warn!(
                connection_id = %c.id,
                "dropping connection whose endpoint cannot be remapped"
            ),
        }
    }

    TabSnapshot {
        tab,
        groups,
        placements,
        connections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TabId;
    use pinboard_core::Point;
    use pinboard_persistence::MemoryStore;
    use std::sync::Arc;

    fn repos() -> Repositories {
        Repositories::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_board_has_first_tab() {
        let repos = repos();
        let (board, tab) = create_board(&repos, "Trip").await.unwrap();
        assert_eq!(tab.name, "Tab 1");
        assert_eq!(tab.order, 0);
        assert_eq!(repos.tabs.by_board(board.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_board_bootstraps_once() {
        let repos = repos();
        let first = ensure_board(&repos, "My Board").await.unwrap();
        let second = ensure_board(&repos, "My Board").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(repos.boards.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_last_board_refused() {
        let repos = repos();
        let (board, _) = create_board(&repos, "Only").await.unwrap();
        let result = delete_board(&repos, board.id).await;
        assert!(matches!(result, Err(PinboardError::Validation(_))));
        assert!(repos.boards.exists(board.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_board_removes_everything() {
        let repos = repos();
        let (keep, _) = create_board(&repos, "Keep").await.unwrap();
        let (board, tab) = create_board(&repos, "Drop").await.unwrap();
        let card = repos.cards.create(board.id, "Card").await.unwrap();
        let placement = repos
            .placements
            .create(tab.id, card.id, Point::new(0.0, 0.0))
            .await
            .unwrap();

        assert!(delete_board(&repos, board.id).await.unwrap());
        assert!(!repos.placements.exists(placement.id).await.unwrap());
        assert!(!repos.cards.exists(card.id).await.unwrap());
        assert!(repos.tabs.by_board(board.id).await.unwrap().is_empty());
        assert!(repos.boards.exists(keep.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_remaps_every_reference() {
        let repos = repos();
        let (board, tab) = create_board(&repos, "Source").await.unwrap();
        let mut card = repos.cards.create(board.id, "Photo").await.unwrap();
        card.image_filename = Some("abc123".to_string());
        repos.cards.put(&card).await.unwrap();

        let group = Group::new(tab.id, "Group".into(), pinboard_core::Rect::new(0.0, 0.0, 300.0, 200.0));
        repos.groups.put(&group).await.unwrap();
        let mut placement = Placement::new(tab.id, card.id, 50.0, 50.0);
        placement.group_id = Some(group.id);
        repos.placements.put(&placement).await.unwrap();
        let conn = Connection::new(tab.id, Endpoint::card(placement.id), Endpoint::group(group.id)).unwrap();
        repos.connections.put(&conn).await.unwrap();

        let copy = duplicate_board(&repos, board.id).await.unwrap().unwrap();
        assert_eq!(copy.name, "Source (copy)");

        let snapshot = BoardSnapshot::capture(&repos, copy.id).await.unwrap().unwrap();
        assert_eq!(snapshot.cards.len(), 1);
        assert_ne!(snapshot.cards[0].id, card.id);
        assert_eq!(snapshot.cards[0].image_filename.as_deref(), Some("abc123"));

        let new_tab = &snapshot.tabs[0];
        assert_ne!(new_tab.tab.id, tab.id);
        let new_placement = &new_tab.placements[0];
        assert_eq!(new_placement.card_id, snapshot.cards[0].id);
        assert_eq!(new_placement.group_id, Some(new_tab.groups[0].id));

        let new_conn = &new_tab.connections[0];
        assert_eq!(new_conn.from_id, new_placement.id);
        assert_eq!(new_conn.to_id, new_tab.groups[0].id);
        assert!(repos.connection_resolves(new_conn).await.unwrap());
        let tab_ids: Vec<TabId> = snapshot.tabs.iter().map(|t| t.tab.id).collect();
        assert!(!tab_ids.contains(&tab.id));
    }

    async fn seed_board(repos: &Repositories) -> BoardId {
        let (board, tab) = create_board(repos, "Source").await.unwrap();
        for i in 0..8 {
            let card = repos.cards.create(board.id, &format!("Card {}", i)).await.unwrap();
            repos
                .placements
                .create(tab.id, card.id, Point::new(i as f64 * 250.0, 0.0))
                .await
                .unwrap();
        }
        board.id
    }

    #[tokio::test]
    async fn test_duplicate_that_runs_out_of_space_leaves_nothing_behind() {
        let unlimited = Arc::new(MemoryStore::new());
        seed_board(&Repositories::new(unlimited.clone())).await;
        let source_bytes = unlimited.used_bytes().await;

        // Room for the board, not for a second copy of it.
        let store = Arc::new(MemoryStore::with_quota(source_bytes + source_bytes / 2));
        let repos = Repositories::new(store.clone());
        let board_id = seed_board(&repos).await;
        let before = store.used_bytes().await;

        let result = duplicate_board(&repos, board_id).await;
        assert!(matches!(result, Err(PinboardError::StorageFull(_))));

        let boards = repos.boards.all().await.unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].id, board_id);
        assert_eq!(store.used_bytes().await, before);
        assert_eq!(repos.tabs.all().await.unwrap().len(), 1);
        assert_eq!(repos.cards.all().await.unwrap().len(), 8);
    }

    #[test]
    fn test_remap_drops_unmappable_connection() {
        let board = Board::new("B".into());
        let tab = Tab::new(board.id, "Tab 1".into(), 0);
        let card = Card::new(board.id, "C".into());
        let placement = Placement::new(tab.id, card.id, 0.0, 0.0);
        // Points at a group that is not part of the snapshot.
        let dangling = Connection::new(
            tab.id,
            Endpoint::card(placement.id),
            Endpoint::group(uuid::Uuid::new_v4()),
        )
        .unwrap();
        let source = BoardSnapshot {
            board: board.clone(),
            cards: vec![card],
            tabs: vec![TabSnapshot {
                tab,
                groups: vec![],
                placements: vec![placement],
                connections: vec![dangling],
            }],
        };

        let copy = remap_board(&source, Board::new("B (copy)".into()));
        assert_eq!(copy.tabs[0].placements.len(), 1);
        assert!(copy.tabs[0].connections.is_empty());
    }
}
