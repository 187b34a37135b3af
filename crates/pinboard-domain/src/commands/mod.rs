use async_trait::async_trait;
use pinboard_core::PinboardResult;

use crate::repository::Repositories;

pub mod board_commands;
pub mod card_commands;
pub mod connection_commands;
pub mod group_commands;
pub mod placement_commands;
pub mod tab_commands;

pub use board_commands::*;
pub use card_commands::*;
pub use connection_commands::*;
pub use group_commands::*;
pub use placement_commands::*;
pub use tab_commands::*;

/// A reversible unit of mutation, the thing undo and redo operate on.
///
/// Commands capture every old and new value they need when they are built,
/// never at undo time, because the rows may have changed since. Both actions
/// must be safe to replay: running `apply` on a state where it already
/// happened converges to the same state. A command whose target vanished
/// becomes a silent no-op.
#[async_trait]
pub trait Command: Send + Sync {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()>;

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}
