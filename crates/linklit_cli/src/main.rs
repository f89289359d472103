//! Linklit command-line front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the on-disk store.
//! - Seed the starter pack, then dispatch one subcommand.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linklit_core::db::open_db;
use linklit_core::{init_logging, CoreConfig, DefaultSeeder, RecordStore, SqliteKeyValueStore};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "linklit")]
#[command(about = "Save links, group them into collections and set reminders", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the database and logs (overrides LINKLIT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (overrides LINKLIT_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a new link
    Add {
        url: String,

        /// Title (derived from the URL's domain when omitted)
        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        /// Collection id to file the link under
        #[arg(long, short)]
        collection: Option<String>,

        /// Reminder time: RFC 3339 or local `YYYY-MM-DD HH:MM`
        #[arg(long, conflicts_with = "remind")]
        remind_at: Option<String>,

        /// Quick reminder: hour, tomorrow or week
        #[arg(long)]
        remind: Option<String>,
    },

    /// Edit a saved link (creates it again if it was deleted meanwhile)
    Edit {
        id: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long, short, conflicts_with = "no_collection")]
        collection: Option<String>,

        /// Move the link out of its collection
        #[arg(long)]
        no_collection: bool,

        #[arg(long, conflicts_with_all = ["remind", "clear_reminder"])]
        remind_at: Option<String>,

        #[arg(long, conflicts_with = "clear_reminder")]
        remind: Option<String>,

        /// Remove the reminder
        #[arg(long)]
        clear_reminder: bool,
    },

    /// List links, reminders first
    List {
        /// Filter: active, completed or all
        #[arg(long, short, default_value = "active")]
        filter: String,
    },

    /// Show one link
    Show { id: String },

    /// Mark a link done, or active again
    Toggle { id: String },

    /// Delete a link
    Remove { id: String },

    /// List collections with their link counts
    Collections {
        /// Filter: active, completed or all
        #[arg(long, short, default_value = "active")]
        filter: String,
    },

    /// Manage one collection
    #[command(subcommand)]
    Collection(CollectionCommand),

    /// Write a JSON backup of all links and collections
    Export {
        /// Output file (prints to stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace all data with a JSON backup
    Import {
        file: PathBuf,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every link and collection
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show whether the welcome card is visible, or dismiss it
    Welcome {
        #[arg(long)]
        dismiss: bool,
    },
}

#[derive(Subcommand)]
pub enum CollectionCommand {
    /// Create a collection
    Add {
        name: String,

        #[arg(long, short)]
        description: Option<String>,

        /// Palette color name or hex value
        #[arg(long, short = 'C', default_value = "blue")]
        color: String,
    },

    /// Rename or recolor a collection
    Edit {
        id: String,

        #[arg(long, short)]
        name: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long, short = 'C')]
        color: Option<String>,
    },

    /// Mark a collection done, or active again
    Toggle { id: String },

    /// Delete a collection; its links become uncategorized
    Remove { id: String },

    /// Show a collection and its links
    Show { id: String },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env();
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level.as_str());
    }

    // Logging is best-effort; the CLI still works without a writable log dir.
    if let Err(err) = init_logging(&config.log_level, config.log_dir()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("Failed to open store at {}", db_path.display()))?;
    let store = RecordStore::new(SqliteKeyValueStore::new(&conn));
    DefaultSeeder::new(&store).seed_defaults();

    commands::dispatch(cli.command, &store)
}
