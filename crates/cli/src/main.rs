use anyhow::Context;
use clap::{Parser, Subcommand};

/// Bookly service control
#[derive(Debug, Parser)]
#[command(name = "bookly-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve the HTTP API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = bookly_kernel::settings::Settings::load()
        .with_context(|| "failed to load Bookly settings")?;
    bookly_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, command = ?cli.command, "bookly-cli starting");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => bookly::app::serve(&settings).await,
        Command::Migrate => {
            let applied = bookly::app::migrate(&settings).await?;
            tracing::info!(applied, "migrations complete");
            Ok(())
        }
    }
}
