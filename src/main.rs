//! Deckflow - human-in-the-loop board deck workflow
//!
//! Main entry point for the Deckflow CLI and server.

mod bootstrap;
mod cli;
mod cmd_session;
mod interactive;
mod server;

use clap::Parser;
use tracing::warn;

use crate::bootstrap::load_config;
use crate::cli::{Cli, Commands};
use crate::cmd_session::{export_session, resume_session, run_session, show_history, show_status};
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, warnings) = load_config(&cli.config)?;
    init_tracing(&config.logging)?;
    for warning in warnings {
        warn!("Config: {}", warning);
    }

    match cli.command {
        Commands::Run {
            request,
            files,
            notes,
            session_id,
            output,
        } => run_session(&config, request, files, notes, session_id, output).await,
        Commands::Resume { session_id, output } => {
            resume_session(&config, &session_id, output).await
        }
        Commands::Serve { host, port } => run_server(&config, host, port).await,
        Commands::Status { session_id, json } => show_status(&config, &session_id, json).await,
        Commands::History { session_id } => show_history(&config, &session_id).await,
        Commands::Export { session_id, output } => {
            export_session(&config, &session_id, output).await
        }
    }
}
