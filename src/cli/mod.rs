//! Command-line interface.

mod analyze;
mod formats;
mod ingest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use docingest::Config;

#[derive(Parser)]
#[command(name = "docingest")]
#[command(about = "Document ingestion and content analysis")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest documents (local paths or gs:// locators) into one session
    Ingest {
        /// Documents to ingest, in order
        #[arg(required = true)]
        locators: Vec<String>,
        /// Print only the cumulative extracted text
        #[arg(long)]
        text_only: bool,
    },

    /// Run the text analyzers on a local UTF-8 text file
    Analyze {
        /// Text file to analyze
        file: PathBuf,
    },

    /// List supported formats and how each is processed
    Formats,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };
    if let Some(path) = &config.source_path {
        tracing::info!("Using config {}", path.display());
    }

    match cli.command {
        Commands::Ingest {
            locators,
            text_only,
        } => ingest::cmd_ingest(&config, &locators, text_only).await,
        Commands::Analyze { file } => analyze::cmd_analyze(&config, &file).await,
        Commands::Formats => formats::cmd_formats(&config),
    }
}
