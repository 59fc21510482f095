mod cli;
mod context;
mod handlers;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::CliContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
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
    if let Err(err) = run(cli).await {
        output::output_error(&err.to_string());
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = CliContext::load(&cli.file, cli.role).await?;

    match cli.command {
        Commands::Project(project_cmd) => {
            handlers::project::handle(&mut ctx, project_cmd.action).await?;
        }
        Commands::Column(column_cmd) => {
            handlers::column::handle(&mut ctx, column_cmd.action).await?;
        }
        Commands::Task(task_cmd) => {
            handlers::task::handle(&mut ctx, task_cmd.action).await?;
        }
        Commands::Board(board_cmd) => {
            handlers::board::handle(&mut ctx, board_cmd.action).await?;
        }
        Commands::Reconcile { project_id, watch } => {
            handlers::reconcile::handle(&mut ctx, project_id, watch).await?;
        }
    }

    Ok(())
}
