use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    let session = &mut ctx.session;
    match action {
        BoardAction::Create { name } => {
            let board = session.create_board(&name).await?;
            output::output_success(&board)
        }
        BoardAction::List => output::output_list(session.boards().await?),
        BoardAction::Rename { name } => {
            session.rename_board(&name).await?;
            output::output_success(session.board())
        }
        BoardAction::Duplicate => {
            let copy = session.duplicate_board().await?;
            output::output_success(&copy)
        }
        BoardAction::Delete { id } => {
            if !session.delete_board(id).await? {
                anyhow::bail!("Board not found: {}", id);
            }
            output::output_removed("deleted", id)
        }
    }
}
