use async_trait::async_trait;
use pinboard_core::PinboardResult;

use super::Command;
use crate::{repository::Repositories, BoardId};

/// Rename a board
pub struct RenameBoard {
    pub board_id: BoardId,
    pub old_name: String,
    pub new_name: String,
}

#[async_trait]
impl Command for RenameBoard {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        repos.boards.rename(self.board_id, self.new_name.clone()).await?;
        Ok(())
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        repos.boards.rename(self.board_id, self.old_name.clone()).await?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Rename board to '{}'", self.new_name)
    }
}
