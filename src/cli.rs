//! CLI definitions for Deckflow.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deckflow CLI.
#[derive(Parser)]
#[command(name = "deckflow")]
#[command(about = "Human-in-the-loop board deck workflow")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/deckflow.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start a session and review it interactively
    Run {
        /// What the deck should achieve
        #[arg(short, long)]
        request: String,

        /// Source file (.txt, .md, .csv); repeatable
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Free-form notes added to the source material
        #[arg(short, long)]
        notes: Option<String>,

        /// Session ID (generated when omitted)
        #[arg(long)]
        session_id: Option<String>,

        /// Deck output path (default: <export.output_dir>/<session>.md)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Continue reviewing an existing session
    Resume {
        session_id: String,

        /// Deck output path (default: <export.output_dir>/<session>.md)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the HTTP API
    Serve {
        /// Server host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show a session's pending state and record
    Status {
        session_id: String,

        /// Print the raw JSON snapshot
        #[arg(long)]
        json: bool,
    },

    /// List a session's checkpoints
    History { session_id: String },

    /// Render a finished session's deck
    Export {
        session_id: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
