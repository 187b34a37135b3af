use pinboard_core::PinboardResult;

use super::Repository;
use crate::{Board, BoardId};

impl Repository<Board> {
    pub async fn create(&self, name: impl Into<String>) -> PinboardResult<Board> {
        let board = Board::new(name.into());
        self.put(&board).await?;
        tracing::info!(board_id = %board.id, name = %board.name, "created board");
        Ok(board)
    }

    /// Returns the renamed board, or `None` when it no longer exists.
    pub async fn rename(&self, id: BoardId, name: impl Into<String>) -> PinboardResult<Option<Board>> {
        let Some(mut board) = self.get(id).await? else {
            return Ok(None);
        };
        board.update_name(name.into());
        self.put(&board).await?;
        Ok(Some(board))
    }
}
