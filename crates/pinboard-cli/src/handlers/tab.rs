use crate::cli::TabAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: TabAction) -> anyhow::Result<()> {
    let session = &mut ctx.session;
    match action {
        TabAction::List => output::output_list(session.tabs().await?),
        TabAction::Add { name } => {
            let tab = session.add_tab(name.as_deref()).await?;
            output::output_success(&tab)
        }
        TabAction::Rename { id, name } => {
            if !session.rename_tab(id, &name).await? {
                anyhow::bail!("Tab not found: {}", id);
            }
            let tab = session.tabs().await?.into_iter().find(|t| t.id == id);
            output::output_success(&tab)
        }
        TabAction::Delete { id } => {
            if !session.delete_tab(id).await? {
                anyhow::bail!("Tab not found: {}", id);
            }
            output::output_removed("deleted", id)
        }
        TabAction::Reorder { ids } => output::output_list(session.reorder_tabs(&ids).await?),
    }
}
