use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::dispatch::{DispatchContext, ProcessEnv, interactive_shell};
use crate::runner::ProcessRunner;

mod app;
mod cli;
mod commands;
mod config;
mod dispatch;
mod error;
mod items;
mod message;
mod process;
mod runner;
mod search;
mod task;
mod theme;
mod tui;
mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazyrev");

    let args = cli::Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    if let Some(program) = args.program {
        config.program = program;
    }
    let location = match args.repository {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let runner = ProcessRunner::new(&config.program, location, interactive_shell(&ProcessEnv));
    info!(
        "Running {} in {} with {} custom commands",
        config.program,
        runner.location().display(),
        config.custom_commands.len()
    );
    let location = runner.location().to_path_buf();
    let dispatch = DispatchContext::new(Arc::new(runner), location);

    let mut app = App::new(Arc::new(config), dispatch);
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("lazyrev").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazyrev.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
