use std::path::PathBuf;

use anyhow::Context as _;
use pinboard_app::{open_store, Session};
use pinboard_core::AppConfig;
use pinboard_domain::Repositories;
use uuid::Uuid;

/// One CLI invocation's view of the data file: a session positioned on the
/// requested board and tab.
pub struct CliContext {
    pub session: Session,
}

impl CliContext {
    /// Open `file`, or the configured data file when none is given.
    pub async fn load(file: Option<PathBuf>, board: Option<Uuid>, tab: Option<Uuid>) -> anyhow::Result<Self> {
        let config = AppConfig::load();
        let data_file = file
            .or_else(|| config.effective_data_file())
            .context("no data file given and no default data directory available")?;
        tracing::debug!(data_file = %data_file.display(), "opening data file");

        let store = open_store(Some(&data_file), config.storage_quota_bytes)
            .await
            .with_context(|| format!("failed to open {}", data_file.display()))?;
        let mut session = Session::open(Repositories::new(store), &config).await?;

        if let Some(board_id) = board {
            session.switch_board(board_id).await?;
        }
        if let Some(tab_id) = tab {
            session.switch_tab(tab_id).await?;
        }
        Ok(Self { session })
    }
}
