use pinboard_core::{PinboardError, PinboardResult};
use pinboard_domain::board_lifecycle;
use pinboard_domain::canvas::Selection;
use pinboard_domain::commands::RenameBoard;
use pinboard_domain::{Board, BoardId};

use super::{first_tab, Session};
use crate::events::SessionEvent;

impl Session {
    /// Every board, sorted by name.
    pub async fn boards(&self) -> PinboardResult<Vec<Board>> {
        let mut boards = self.repos.boards.all().await?;
        boards.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(boards)
    }

    /// Create a board with its first tab and switch to it.
    pub async fn create_board(&mut self, name: &str) -> PinboardResult<Board> {
        let name = validate_name(name)?;
        let result = board_lifecycle::create_board(&self.repos, name).await;
        let (board, _) = self.report(result)?;
        self.switch_board(board.id).await?;
        self.announce(format!("Board created: {}", board.name));
        Ok(board)
    }

    /// Rename the current board; undoable.
    pub async fn rename_board(&mut self, name: &str) -> PinboardResult<bool> {
        let name = validate_name(name)?;
        if name == self.board.name {
            return Ok(false);
        }
        self.run(Box::new(RenameBoard {
            board_id: self.board.id,
            old_name: self.board.name.clone(),
            new_name: name.to_string(),
        }))
        .await?;
        self.events.emit(SessionEvent::BoardChanged(self.board.id));
        Ok(true)
    }

    /// Open another board on its first tab. History does not carry over.
    pub async fn switch_board(&mut self, board_id: BoardId) -> PinboardResult<()> {
        let board = self
            .repos
            .boards
            .get(board_id)
            .await?
            .ok_or_else(|| PinboardError::NotFound(format!("board {}", board_id)))?;
        if self.repos.boards.exists(self.board.id).await? {
            self.save_viewport().await?;
        }

        let tab = first_tab(&self.repos, &board).await?;
        self.gestures.cancel();
        self.history.clear();
        self.card_heights.clear();
        self.selection = Selection::None;
        self.viewport = tab.viewport();
        self.board = board;
        self.tab = tab;
        self.refresh().await?;

        self.events.emit(SessionEvent::BoardChanged(board_id));
        self.events
            .emit(SessionEvent::SelectionChanged(self.selection.clone()));
        self.events.emit(SessionEvent::ViewportChanged(self.viewport));
        self.events.emit(SessionEvent::TabsChanged);
        tracing::info!(%board_id, "switched board");
        Ok(())
    }

    /// Copy the current board under "`<name>` (copy)" and switch to the copy.
    pub async fn duplicate_board(&mut self) -> PinboardResult<Board> {
        self.save_viewport().await?;
        let result = board_lifecycle::duplicate_board(&self.repos, self.board.id).await;
        let copy = self
            .report(result)?
            .ok_or_else(|| PinboardError::NotFound(format!("board {}", self.board.id)))?;
        self.switch_board(copy.id).await?;
        self.announce(format!("Board duplicated: {}", copy.name));
        Ok(copy)
    }

    /// Delete a board and everything in it. Not undoable. Deleting the
    /// current board switches to another one first.
    pub async fn delete_board(&mut self, board_id: BoardId) -> PinboardResult<bool> {
        if !self.repos.boards.exists(board_id).await? {
            return Ok(false);
        }
        if board_id == self.board.id {
            let next = self
                .boards()
                .await?
                .into_iter()
                .find(|b| b.id != board_id)
                .ok_or_else(|| PinboardError::Validation("cannot delete the last board".to_string()))?;
            self.switch_board(next.id).await?;
        }
        let result = board_lifecycle::delete_board(&self.repos, board_id).await;
        let deleted = self.report(result)?;
        if deleted {
            self.announce("Board deleted");
        }
        Ok(deleted)
    }
}

fn validate_name(name: &str) -> PinboardResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PinboardError::Validation("board name cannot be empty".to_string()));
    }
    Ok(name)
}
