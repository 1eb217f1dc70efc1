//! # Notes Harness CLI (`nh`)
//!
//! Searches a notes directory or a user's uploaded documents and prints the
//! ranked context block that a language model would receive.
//!
//! ## Usage
//!
//! ```bash
//! nh --config ./config/nh.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `nh init` | Create the SQLite database and tables |
//! | `nh search "<query>"` | Search the notes directory |
//! | `nh search "<query>" --user <id>` | Search a user's uploaded documents |
//! | `nh upload <path>` | Load, chunk and store a document |
//! | `nh docs list\|delete\|clear` | Manage stored documents |
//! | `nh sources` | Show which note files would be searched |
//! | `nh keywords "<query>"` | Show the expanded keyword set |
//! | `nh chunk <path>` | Show how a file is chunked |
//!
//! Logs go to stderr; set `RUST_LOG=info` to see search and ingest summaries.

use clap::{Parser, Subcommand};
use notes_harness::{config, docs, ingest, inspect, search, sources};
use std::path::PathBuf;

const DEFAULT_USER: &str = "default";

/// Notes Harness CLI: lexical retrieval over notes and uploaded documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file.
#[derive(Parser)]
#[command(
    name = "nh",
    about = "Notes Harness: lexical retrieval over notes and uploaded documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/nh.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite file and the documents and chunks tables.
    /// Running it again is safe.
    Init,

    /// Search notes or uploaded documents.
    Search {
        /// The question or search terms.
        query: String,

        /// Search this user's uploaded documents instead of the notes directory.
        #[arg(long)]
        user: Option<String>,

        /// Maximum number of results (defaults to `retrieval.final_limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON instead of the rendered context block.
        #[arg(long)]
        json: bool,
    },

    /// Load, chunk and store a document for a user.
    Upload {
        /// File to upload (.pdf, .docx, .txt, .md, .json).
        path: PathBuf,

        #[arg(long, default_value = DEFAULT_USER)]
        user: String,
    },

    /// Manage stored documents.
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },

    /// Show the notes root and the files a search would read.
    Sources,

    /// Print the expanded keyword set for a query.
    Keywords {
        query: String,
    },

    /// Print the chunks produced for a file.
    Chunk {
        path: PathBuf,

        /// Override `chunking.chunk_size`.
        #[arg(long)]
        size: Option<usize>,
    },
}

#[derive(Subcommand)]
enum DocsAction {
    /// List a user's documents.
    List {
        #[arg(long, default_value = DEFAULT_USER)]
        user: String,

        #[arg(long)]
        json: bool,
    },
    /// Delete one document and its chunks.
    Delete {
        /// Document id (see `nh docs list`).
        id: i64,

        #[arg(long, default_value = DEFAULT_USER)]
        user: String,
    },
    /// Delete every document of a user.
    Clear {
        #[arg(long, default_value = DEFAULT_USER)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't require a config file
    match &cli.command {
        Commands::Keywords { query } => {
            let cfg = config::load_config_or_minimal(&cli.config)?;
            inspect::run_keywords(&cfg, query)?;
            return Ok(());
        }
        Commands::Chunk { path, size } => {
            let cfg = config::load_config_or_minimal(&cli.config)?;
            inspect::run_chunk(&cfg, path, *size)?;
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            docs::run_init(&cfg).await?;
        }
        Commands::Search {
            query,
            user,
            limit,
            json,
        } => {
            search::run_search(&cfg, &query, user, limit, json).await?;
        }
        Commands::Upload { path, user } => {
            ingest::run_upload(&cfg, &path, &user).await?;
        }
        Commands::Docs { action } => match action {
            DocsAction::List { user, json } => docs::run_list(&cfg, &user, json).await?,
            DocsAction::Delete { id, user } => docs::run_delete(&cfg, &user, id).await?,
            DocsAction::Clear { user } => docs::run_clear(&cfg, &user).await?,
        },
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Keywords { .. } | Commands::Chunk { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
