use std::sync::Arc;

use pinboard_core::{Point, Rect, Size};
use pinboard_domain::board_lifecycle::create_board;
use pinboard_domain::canvas::{viewport, Viewport};
use pinboard_domain::commands::*;
use pinboard_domain::*;
use pinboard_persistence::MemoryStore;

async fn setup() -> (Repositories, Board, Tab) {
    let repos = Repositories::new(Arc::new(MemoryStore::new()));
    let (board, tab) = create_board(&repos, "Board").await.unwrap();
    (repos, board, tab)
}

/// Executing and undoing each command leaves every touched row as it was.
#[tokio::test]
async fn test_apply_then_revert_restores_prior_state() {
    let (repos, board, tab) = setup().await;
    let card = repos.cards.create(board.id, "Before").await.unwrap();
    let placement = repos
        .placements
        .create(tab.id, card.id, Point::new(10.0, 10.0))
        .await
        .unwrap();
    let group = Group::new(tab.id, "Label".into(), Rect::new(0.0, 0.0, 300.0, 200.0));
    repos.groups.put(&group).await.unwrap();
    let mut history = HistoryManager::new();

    let update = CardUpdate {
        title: Some("After".into()),
        description: FieldUpdate::Set("notes".into()),
        image_filename: FieldUpdate::NoChange,
    };
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(UpdateCard::capture(&repos, card.id, update).await.unwrap().unwrap()),
        Box::new(MovePlacement {
            placement_id: placement.id,
            from: placement.slot(),
            to: PlacementSlot {
                position: Point::new(60.0, 60.0),
                group_id: Some(group.id),
            },
        }),
        Box::new(ResizeGroup {
            group_id: group.id,
            from: group.bounds(),
            to: Rect::new(0.0, 0.0, 420.0, 260.0),
        }),
        Box::new(RenameGroup {
            group_id: group.id,
            old_label: group.label.clone(),
            new_label: "Renamed".into(),
        }),
        Box::new(RenameBoard {
            board_id: board.id,
            old_name: board.name.clone(),
            new_name: "Other".into(),
        }),
    ];

    for command in commands {
        let description = command.description();
        history.execute(command, &repos).await.unwrap();
        history.undo(&repos).await.unwrap();

        assert_eq!(repos.cards.get(card.id).await.unwrap().unwrap(), card, "{}", description);
        assert_eq!(
            repos.placements.get(placement.id).await.unwrap().unwrap(),
            placement,
            "{}",
            description
        );
        assert_eq!(repos.groups.get(group.id).await.unwrap().unwrap(), group, "{}", description);
        assert_eq!(repos.boards.get(board.id).await.unwrap().unwrap(), board, "{}", description);
    }
}

#[tokio::test]
async fn test_redo_reapplies_the_same_change() {
    let (repos, board, _tab) = setup().await;
    let card = repos.cards.create(board.id, "Title").await.unwrap();
    let mut history = HistoryManager::new();

    let cmd = UpdateCard::capture(&repos, card.id, CardUpdate::title("Changed"))
        .await
        .unwrap()
        .unwrap();
    history.execute(Box::new(cmd), &repos).await.unwrap();
    history.undo(&repos).await.unwrap();
    history.redo(&repos).await.unwrap();

    assert_eq!(repos.cards.get(card.id).await.unwrap().unwrap().title, "Changed");
}

#[tokio::test]
async fn test_unchanged_update_is_not_a_command() {
    let (repos, board, _tab) = setup().await;
    let card = repos.cards.create(board.id, "Same").await.unwrap();
    let cmd = UpdateCard::capture(&repos, card.id, CardUpdate::title("Same")).await.unwrap();
    assert!(cmd.is_none());
}

#[tokio::test]
async fn test_execute_after_undo_clears_redo() {
    let (repos, board, _tab) = setup().await;
    let card = repos.cards.create(board.id, "A").await.unwrap();
    let mut history = HistoryManager::new();

    for title in ["B", "C"] {
        let cmd = UpdateCard::capture(&repos, card.id, CardUpdate::title(title))
            .await
            .unwrap()
            .unwrap();
        history.execute(Box::new(cmd), &repos).await.unwrap();
    }
    history.undo(&repos).await.unwrap();
    assert_eq!(history.redo_depth(), 1);

    let cmd = UpdateCard::capture(&repos, card.id, CardUpdate::title("D"))
        .await
        .unwrap()
        .unwrap();
    history.execute(Box::new(cmd), &repos).await.unwrap();
    assert_eq!(history.redo_depth(), 0);
    assert!(!history.redo(&repos).await.unwrap());
}

#[tokio::test]
async fn test_history_is_bounded() {
    let (repos, board, _tab) = setup().await;
    let card = repos.cards.create(board.id, "0").await.unwrap();
    let mut history = HistoryManager::with_capacity(5);

    for n in 1..=12 {
        let cmd = UpdateCard::capture(&repos, card.id, CardUpdate::title(n.to_string()))
            .await
            .unwrap()
            .unwrap();
        history.execute(Box::new(cmd), &repos).await.unwrap();
        assert!(history.undo_depth() <= 5);
    }
    while history.undo(&repos).await.unwrap() {}
    // Titles 1..=7 are out of reach.
    assert_eq!(repos.cards.get(card.id).await.unwrap().unwrap().title, "7");
}

#[tokio::test]
async fn test_create_commands_are_idempotent() {
    let (repos, board, tab) = setup().await;
    let card = Card::new(board.id, "Eager".into());
    let placement = Placement::new(tab.id, card.id, 100.0, 100.0);
    repos.cards.put(&card).await.unwrap();
    repos.placements.put(&placement).await.unwrap();

    let mut history = HistoryManager::new();
    let cmd = PlaceCard {
        placement: placement.clone(),
        card: Some(card.clone()),
    };
    // Rows already exist: recording the command writes nothing new.
    history.execute(Box::new(cmd), &repos).await.unwrap();
    assert_eq!(repos.placements.by_tab(tab.id).await.unwrap().len(), 1);

    history.undo(&repos).await.unwrap();
    assert!(!repos.placements.exists(placement.id).await.unwrap());
    assert!(repos.cards.exists(card.id).await.unwrap());

    history.redo(&repos).await.unwrap();
    assert!(repos.placements.exists(placement.id).await.unwrap());
}

#[test]
fn test_fit_all_with_nothing_resets_viewport() {
    let fitted = Viewport::fit_all(&[], Size::new(800.0, 600.0));
    assert_eq!(fitted, Viewport { x: 0.0, y: 0.0, zoom: 1.0 });
}

#[test]
fn test_zoom_never_leaves_range() {
    let container = Size::new(800.0, 600.0);
    let mut vp = Viewport::default();
    for _ in 0..100 {
        vp.zoom_in(container);
        assert!(vp.zoom <= viewport::MAX_ZOOM);
    }
    for _ in 0..200 {
        vp.zoom_out(container);
        assert!(vp.zoom >= viewport::MIN_ZOOM);
    }
}
