//! textsim: text similarity comparison service
//!
//! Ranks corpus documents against an input text using lexical, dense
//! semantic, and hybrid strategies.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use textsim::config::{Config, LogFormat};
use textsim::types::CompareMode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "textsim")]
#[command(about = "Text similarity comparison service")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "textsim.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the comparison HTTP service
    Serve,

    /// Compare a text against the corpus and print the result as JSON
    Compare {
        /// Text to compare
        text: String,

        /// Number of matches per strategy
        #[arg(short, long, default_value = "5")]
        top_k: usize,

        /// Strategy: lexical, semantic, hybrid, or all
        #[arg(short, long, default_value = "all")]
        mode: String,
    },

    /// Provision collections and ingest the corpus into the vector store
    Index,

    /// Write a starter configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show vector store collection statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Init does not need an existing configuration file
        Commands::Init { path } => {
            init_logging(Level::INFO, LogFormat::Text);
            commands::init_config(path).await
        }
        command => {
            let config = Config::load(&cli.config)?;
            let level = match cli.verbose {
                0 => config.logging.level.to_tracing(),
                1 => Level::DEBUG,
                _ => Level::TRACE,
            };
            init_logging(level, config.logging.format);

            match command {
                Commands::Serve => commands::run_server(config).await,
                Commands::Compare { text, top_k, mode } => {
                    let mode = parse_mode(&mode)?;
                    commands::compare_text(config, text, top_k, mode).await
                }
                Commands::Index => commands::index_corpus(config).await,
                Commands::Stats => commands::show_stats(config).await,
                Commands::Init { .. } => unreachable!("handled above"),
            }
        }
    }
}

fn init_logging(level: Level, format: LogFormat) {
    let builder = FmtSubscriber::builder().with_max_level(level);
    let _ = match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
    };
}

fn parse_mode(mode: &str) -> Result<CompareMode> {
    match mode {
        "lexical" => Ok(CompareMode::Lexical),
        "semantic" => Ok(CompareMode::Semantic),
        "hybrid" => Ok(CompareMode::Hybrid),
        "all" => Ok(CompareMode::All),
        other => anyhow::bail!("Unknown mode '{}'; expected lexical, semantic, hybrid, or all", other),
    }
}
