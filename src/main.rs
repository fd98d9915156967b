//! emulauncher - Lightweight launcher for locally installed emulators
//!
//! Entry point for the command-line front-end.

mod cli;

use clap::Parser;
use cli::{Args, Commands, Session};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_directive = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .init();

    let session = Session::open(&args)?;

    // Handle subcommands first
    if let Some(command) = args.command {
        return handle_command(&session, command).await;
    }

    // No command: show the library, then look for emulator updates
    cli::list_games(&session)?;
    if session.check_updates() {
        println!();
        cli::check_versions(&session).await?;
    }

    Ok(())
}

async fn handle_command(session: &Session, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => cli::list_games(session),
        Commands::Run { name, emulator } => cli::run_game(session, &name, emulator.as_deref()),
        Commands::Open { emulator } => cli::open_emulator(session, &emulator),
        Commands::Add {
            file,
            name,
            icon_url,
        } => cli::add_game(session, &file, &name, icon_url).await,
        Commands::Incoming => cli::list_incoming(session),
        Commands::Emulators => cli::list_emulators(session).await,
        Commands::Check => cli::check_versions(session).await,
    }
}
