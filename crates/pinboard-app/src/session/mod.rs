//! The session orchestrator.
//!
//! A [`Session`] owns everything one open board needs: the current board and
//! tab, the undo history, viewport, selection, scene and the running
//! gesture. User actions are methods on it; every change is reported on the
//! session's [`EventBus`]. Nothing here is global, so several sessions can
//! share one store.

mod arrange;
mod boards;
mod cards;
mod exchange;
mod groups;
mod pointer;
mod tabs;

use std::collections::HashMap;

use pinboard_core::{AppConfig, PinboardError, PinboardResult, Point, Size};
use pinboard_domain::board_lifecycle::ensure_board;
use pinboard_domain::canvas::{ElementRef, GestureController, Scene, Selection, Viewport};
use pinboard_domain::{
    Board, Command, HistoryManager, HistoryStatus, PlacementId, Repositories, Tab, TabUpdate,
};
use tokio::sync::broadcast;

use crate::events::{EventBus, SessionEvent};

/// Canvas container size assumed until the host reports the real one.
pub const DEFAULT_CONTAINER: Size = Size::new(1280.0, 800.0);

pub struct Session {
    repos: Repositories,
    board: Board,
    tab: Tab,
    history: HistoryManager,
    viewport: Viewport,
    container: Size,
    selection: Selection,
    scene: Scene,
    gestures: GestureController,
    /// Rendered card heights reported by the host, keyed by placement.
    card_heights: HashMap<PlacementId, f64>,
    events: EventBus,
}

impl Session {
    /// Open the first board in the store, creating the default board on
    /// first run.
    pub async fn open(repos: Repositories, config: &AppConfig) -> PinboardResult<Self> {
        let board = ensure_board(&repos, config.effective_default_board_name()).await?;
        let tab = first_tab(&repos, &board).await?;

        let events = EventBus::new();
        let mut history = HistoryManager::with_capacity(config.effective_history_capacity());
        let bus = events.clone();
        history.subscribe(Box::new(move |status| {
            bus.emit(SessionEvent::HistoryChanged(status))
        }));

        let scene = Scene::load(&repos, tab.id, &HashMap::new()).await?;
        tracing::info!(board_id = %board.id, tab_id = %tab.id, "session opened");
        Ok(Self {
            viewport: tab.viewport(),
            repos,
            board,
            tab,
            history,
            container: DEFAULT_CONTAINER,
            selection: Selection::None,
            scene,
            gestures: GestureController::new(),
            card_heights: HashMap::new(),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn history_status(&self) -> HistoryStatus {
        self.history.status()
    }

    pub fn next_undo(&self) -> Option<String> {
        self.history.next_undo()
    }

    pub fn next_redo(&self) -> Option<String> {
        self.history.next_redo()
    }

    // ---- history ----

    /// Execute `command` through the history and redraw.
    async fn run(&mut self, command: Box<dyn Command>) -> PinboardResult<()> {
        let result = self.history.execute(command, &self.repos).await;
        self.report(result)?;
        self.refresh().await
    }

    pub async fn undo(&mut self) -> PinboardResult<bool> {
        let description = self.history.next_undo();
        let result = self.history.undo(&self.repos).await;
        let undone = self.report(result)?;
        if undone {
            self.refresh().await?;
            if let Some(description) = description {
                self.announce(format!("Undone: {}", description));
            }
        }
        Ok(undone)
    }

    pub async fn redo(&mut self) -> PinboardResult<bool> {
        let description = self.history.next_redo();
        let result = self.history.redo(&self.repos).await;
        let redone = self.report(result)?;
        if redone {
            self.refresh().await?;
            if let Some(description) = description {
                self.announce(format!("Redone: {}", description));
            }
        }
        Ok(redone)
    }

    /// Forward a storage-full failure to subscribers before returning it.
    fn report<T>(&self, result: PinboardResult<T>) -> PinboardResult<T> {
        if let Err(PinboardError::StorageFull(message)) = &result {
            tracing::warn!(%message, "write refused, storage full");
            self.events.emit(SessionEvent::StorageFull(message.clone()));
        }
        result
    }

    fn announce(&self, message: impl Into<String>) {
        self.events.emit(SessionEvent::Announce(message.into()));
    }

    // ---- scene ----

    /// Reload board, tab and scene from the store. Falls back to the
    /// board's first tab when the current one disappeared.
    pub async fn refresh(&mut self) -> PinboardResult<()> {
        if let Some(board) = self.repos.boards.get(self.board.id).await? {
            self.board = board;
        }
        match self.repos.tabs.get(self.tab.id).await? {
            Some(tab) => self.tab = tab,
            None => {
                tracing::debug!(tab_id = %self.tab.id, "current tab vanished, switching");
                self.tab = first_tab(&self.repos, &self.board).await?;
                self.viewport = self.tab.viewport();
                self.events.emit(SessionEvent::TabsChanged);
                self.events.emit(SessionEvent::ViewportChanged(self.viewport));
            }
        }
        self.scene = Scene::load(&self.repos, self.tab.id, &self.card_heights).await?;
        self.prune_selection();
        self.events.emit(SessionEvent::SceneChanged);
        Ok(())
    }

    /// Record the rendered height of a card so paths attach to its real edge.
    pub fn set_card_height(&mut self, placement_id: PlacementId, height: f64) {
        self.card_heights.insert(placement_id, height);
        self.scene.set_card_height(placement_id, height);
        self.events.emit(SessionEvent::SceneChanged);
    }

    /// Element under a screen point.
    pub fn element_at(&self, screen: Point) -> Option<ElementRef> {
        self.scene.hit_test(self.viewport.screen_to_canvas(screen))
    }

    // ---- selection ----

    pub fn select(&mut self, element: ElementRef) {
        self.selection = match element {
            ElementRef::Card(id) => Selection::card(id),
            ElementRef::Group(id) => Selection::Group(id),
            ElementRef::Connection(id) => Selection::Connection(id),
        };
        self.selection_changed();
    }

    /// Additive toggle, only meaningful for cards.
    pub fn toggle_card(&mut self, placement_id: PlacementId) {
        self.selection.toggle_card(placement_id);
        self.selection_changed();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection = Selection::None;
        self.selection_changed();
    }

    fn selection_changed(&self) {
        self.events
            .emit(SessionEvent::SelectionChanged(self.selection.clone()));
        let message = match &self.selection {
            Selection::None => "Selection cleared".to_string(),
            Selection::Cards { primary, ids } if ids.len() == 1 => match self.scene.card(*primary) {
                Some(card) => format!("Selected: {}", card.title),
                None => "Selected card".to_string(),
            },
            Selection::Cards { ids, .. } => format!("{} cards selected", ids.len()),
            Selection::Group(id) => match self.scene.group(*id) {
                Some(group) => format!("Selected group: {}", group.label),
                None => "Selected group".to_string(),
            },
            Selection::Connection(_) => "Selected connection".to_string(),
        };
        self.announce(message);
    }

    /// Drop selected elements that are no longer in the scene.
    fn prune_selection(&mut self) {
        let stale: Vec<uuid::Uuid> = match &self.selection {
            Selection::None => Vec::new(),
            Selection::Cards { ids, .. } => ids
                .iter()
                .filter(|id| self.scene.card(**id).is_none())
                .copied()
                .collect(),
            Selection::Group(id) if self.scene.group(*id).is_none() => vec![*id],
            Selection::Connection(id) if self.scene.connection(*id).is_none() => vec![*id],
            Selection::Group(_) | Selection::Connection(_) => Vec::new(),
        };
        if stale.is_empty() {
            return;
        }
        for id in stale {
            self.selection.forget(id);
        }
        self.events
            .emit(SessionEvent::SelectionChanged(self.selection.clone()));
    }

    // ---- viewport ----

    /// The host's canvas size changed.
    pub fn set_container(&mut self, container: Size) {
        self.container = container;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport::new(viewport.x, viewport.y, viewport.zoom);
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in(self.container);
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out(self.container);
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
    }

    pub fn zoom_reset(&mut self) {
        self.viewport.zoom_reset(self.container);
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
    }

    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        self.viewport.wheel(cursor, delta_y);
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
    }

    pub fn pinch(&mut self, midpoint: Point, previous_distance: f64, distance: f64) {
        self.viewport.pinch(midpoint, previous_distance, distance);
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
    }

    /// Frame every card and group of the current tab.
    pub fn fit_all(&mut self) {
        self.viewport = Viewport::fit_all(&self.scene.content_rects(), self.container);
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
    }

    /// Store the current viewport on the current tab.
    pub async fn save_viewport(&mut self) -> PinboardResult<()> {
        let result = self
            .repos
            .tabs
            .update(self.tab.id, TabUpdate::viewport(self.viewport))
            .await;
        if let Some(tab) = self.report(result)? {
            self.tab = tab;
        }
        Ok(())
    }
}

/// First tab of `board`, adding "Tab 1" when it has none.
async fn first_tab(repos: &Repositories, board: &Board) -> PinboardResult<Tab> {
    match repos.tabs.by_board(board.id).await?.into_iter().next() {
        Some(tab) => Ok(tab),
        None => {
            tracing::warn!(board_id = %board.id, "board has no tabs, adding one");
            repos.tabs.create(board.id, Tab::default_name(0)).await
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("board", &self.board.id)
            .field("tab", &self.tab.id)
            .field("history", &self.history)
            .field("viewport", &self.viewport)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}
