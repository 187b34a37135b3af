use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pinboard_core::{PinboardError, PinboardResult};
use pinboard_domain::exchange::{BoardExporter, BoardImporter};
use pinboard_domain::Board;

use super::Session;
use crate::exchange::{read_import, write_export};

impl Session {
    /// Export the current board into a dated directory under `parent`.
    pub async fn export_board(&mut self, parent: &Path, today: NaiveDate) -> PinboardResult<PathBuf> {
        self.save_viewport().await?;
        let bundle = BoardExporter::export_board(&self.repos, self.board.id, today)
            .await?
            .ok_or_else(|| PinboardError::NotFound(format!("board {}", self.board.id)))?;
        let dir = write_export(parent, &bundle).await?;
        self.announce(format!("Board exported: {}", bundle.name));
        Ok(dir)
    }

    /// Import the board exported under `dir` and switch to it. Nothing is
    /// written when validation fails.
    pub async fn import_board(&mut self, dir: &Path, today: NaiveDate) -> PinboardResult<Board> {
        let bundle = read_import(dir).await?;
        let result = BoardImporter::import(&self.repos, &bundle, today).await;
        let board = self.report(result)?;
        self.switch_board(board.id).await?;
        self.announce(format!("Board imported: {}", board.name));
        Ok(board)
    }
}
