use chrono::Local;

use crate::cli::{ExportArgs, ImportArgs};
use crate::context::CliContext;
use crate::output;

pub async fn handle_export(ctx: &mut CliContext, args: ExportArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let dir = ctx.session.export_board(&args.dir, today).await?;
    output::output_success(serde_json::json!({
        "board_id": ctx.session.board().id.to_string(),
        "dir": dir.display().to_string(),
    }))
}

pub async fn handle_import(ctx: &mut CliContext, args: ImportArgs) -> anyhow::Result<()> {
    if !args.dir.is_dir() {
        anyhow::bail!("Not a directory: {}", args.dir.display());
    }
    let today = Local::now().date_naive();
    let board = ctx.session.import_board(&args.dir, today).await?;
    output::output_success(&board)
}
