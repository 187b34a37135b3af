use crate::cli::ImageAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: ImageAction) -> anyhow::Result<()> {
    match action {
        ImageAction::List => output::output_list(ctx.session.image_hashes().await?),
        ImageAction::Delete { hash } => {
            if !ctx.session.delete_image(&hash).await? {
                anyhow::bail!("Image not found: {}", hash);
            }
            output::output_removed("deleted", hash)
        }
    }
}
