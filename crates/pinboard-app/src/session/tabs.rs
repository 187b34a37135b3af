use pinboard_core::{PinboardError, PinboardResult};
use pinboard_domain::canvas::Selection;
use pinboard_domain::commands::DeleteTab;
use pinboard_domain::{Tab, TabId, TabUpdate};

use super::Session;
use crate::events::SessionEvent;

impl Session {
    /// Tabs of the current board in display order.
    pub async fn tabs(&self) -> PinboardResult<Vec<Tab>> {
        self.repos.tabs.by_board(self.board.id).await
    }

    /// Append a tab ("Tab N" unless named) and switch to it.
    pub async fn add_tab(&mut self, name: Option<&str>) -> PinboardResult<Tab> {
        let count = self.tabs().await?.len() as u32;
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Tab::default_name(count));
        let result = self.repos.tabs.create(self.board.id, name).await;
        let tab = self.report(result)?;
        self.events.emit(SessionEvent::TabsChanged);
        self.switch_tab(tab.id).await?;
        self.announce(format!("Tab added: {}", tab.name));
        Ok(tab)
    }

    pub async fn rename_tab(&mut self, tab_id: TabId, name: &str) -> PinboardResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PinboardError::Validation("tab name cannot be empty".to_string()));
        }
        let result = self.repos.tabs.update(tab_id, TabUpdate::name(name)).await;
        let Some(tab) = self.report(result)? else {
            return Ok(false);
        };
        if tab.id == self.tab.id {
            self.tab = tab;
        }
        self.events.emit(SessionEvent::TabsChanged);
        Ok(true)
    }

    /// Rewrite tab order to follow `ordered`.
    pub async fn reorder_tabs(&mut self, ordered: &[TabId]) -> PinboardResult<Vec<Tab>> {
        let result = self.repos.tabs.reorder(self.board.id, ordered).await;
        let tabs = self.report(result)?;
        if let Some(current) = tabs.iter().find(|t| t.id == self.tab.id) {
            self.tab = current.clone();
        }
        self.events.emit(SessionEvent::TabsChanged);
        Ok(tabs)
    }

    /// Make `tab_id` the current tab. The outgoing tab keeps its viewport,
    /// the incoming one restores its own.
    pub async fn switch_tab(&mut self, tab_id: TabId) -> PinboardResult<()> {
        if tab_id == self.tab.id {
            return Ok(());
        }
        let tab = self
            .repos
            .tabs
            .get(tab_id)
            .await?
            .filter(|t| t.board_id == self.board.id)
            .ok_or_else(|| PinboardError::NotFound(format!("tab {}", tab_id)))?;

        self.save_viewport().await?;
        self.gestures.cancel();
        self.selection = Selection::None;
        self.viewport = tab.viewport();
        self.tab = tab;
        self.refresh().await?;

        self.events
            .emit(SessionEvent::SelectionChanged(self.selection.clone()));
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
        self.events.emit(SessionEvent::TabsChanged);
        tracing::debug!(%tab_id, "switched tab");
        Ok(())
    }

    /// Delete a tab and everything on it; undoable. Deleting the current tab
    /// switches to its neighbour first. The last tab cannot be deleted.
    pub async fn delete_tab(&mut self, tab_id: TabId) -> PinboardResult<bool> {
        let Some(command) = DeleteTab::capture(&self.repos, tab_id).await? else {
            return Ok(false);
        };
        let left_current = tab_id == self.tab.id;
        if left_current {
            let tabs = self.tabs().await?;
            let index = tabs.iter().position(|t| t.id == tab_id).unwrap_or_default();
            let neighbour = tabs
                .get(index + 1)
                .or_else(|| index.checked_sub(1).and_then(|i| tabs.get(i)));
            if let Some(neighbour) = neighbour {
                self.switch_tab(neighbour.id).await?;
            }
        }
        let name = command.snapshot.tab.name.clone();
        if let Err(err) = self.run(Box::new(command)).await {
            // The tab survived, so the user stays on it.
            if left_current && self.tab.id != tab_id {
                if let Err(back) = self.switch_tab(tab_id).await {
                    tracing::warn!(%tab_id, error = %back, "could not return to tab after failed delete");
                }
            }
            return Err(err);
        }
        self.events.emit(SessionEvent::TabsChanged);
        self.announce(format!("Tab deleted: {}", name));
        Ok(true)
    }
}
