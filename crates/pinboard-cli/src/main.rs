mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("PINBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "pinboard", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(err) = run(cli).await {
        tracing::debug!(error = ?err, "command failed");
        output::output_error(&format!("{:#}", err));
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = CliContext::load(cli.file, cli.board, cli.tab).await?;

    match cli.command {
        Commands::Board(board_cmd) => handlers::board::handle(&mut ctx, board_cmd.action).await,
        Commands::Tab(tab_cmd) => handlers::tab::handle(&mut ctx, tab_cmd.action).await,
        Commands::Card(card_cmd) => handlers::card::handle(&mut ctx, card_cmd.action).await,
        Commands::Group(group_cmd) => handlers::group::handle(&mut ctx, group_cmd.action).await,
        Commands::Connection(connection_cmd) => {
            handlers::connection::handle(&mut ctx, connection_cmd.action).await
        }
        Commands::Image(image_cmd) => handlers::image::handle(&mut ctx, image_cmd.action).await,
        Commands::Scene => handlers::scene::handle(&ctx),
        Commands::Export(args) => handlers::exchange::handle_export(&mut ctx, args).await,
        Commands::Import(args) => handlers::exchange::handle_import(&mut ctx, args).await,
        Commands::Completions { .. } => Ok(()),
    }
}
