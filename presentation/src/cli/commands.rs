//! CLI command definitions

use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run summaries and search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// How runs are triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// A single run, then exit
    Once,
    /// Run immediately, then on a fixed interval
    Schedule,
    /// Poll the source tree and run when new files appear
    Watch,
}

/// How run progress is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Nothing (`-q`)
    Hidden,
    /// A progress bar, for single runs at a terminal
    Bar,
    /// One line per event, for long-running modes
    Lines,
}

/// CLI arguments for chatlog-ingest
#[derive(Parser, Debug)]
#[command(name = "chatlog-ingest")]
#[command(author, version, about = "Ingest proxy chat-session logs into a search index")]
#[command(long_about = r#"
chatlog-ingest collects the per-user chat-session logs written by the proxy,
normalizes each one into a conversation document and bulk-loads the documents
into Elasticsearch. Every ingested file is recorded in a ledger so it is never
picked up twice.

Run modes:
  --watch      Poll for new files and ingest them (default)
  --schedule   Ingest immediately, then every ingest.interval_secs
  --once       Ingest one batch and exit

Configuration files are loaded from (in priority order):
1. CHATLOG_<SECTION>__<KEY>   Environment variables
2. --config <path>            Explicit config file
3. ./chatlog-ingest.toml      Project-level config
4. ~/.config/chatlog-ingest/config.toml   Global config

Example:
  chatlog-ingest --once --max-files 500
  chatlog-ingest --schedule -v
  chatlog-ingest --dry-run --output json
  chatlog-ingest --search-user alice --size 5
"#)]
#[command(group(ArgGroup::new("mode").args(["once", "schedule", "watch"])))]
pub struct Cli {
    /// Ingest one batch and exit
    #[arg(long)]
    pub once: bool,

    /// Ingest now and then on the configured interval
    #[arg(long)]
    pub schedule: bool,

    /// Poll for new files (default)
    #[arg(long)]
    pub watch: bool,

    /// Override ingest.max_files_per_batch (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Process one batch without writing to the index or the ledger
    #[arg(long, conflicts_with_all = ["schedule", "watch", "search_user"])]
    pub dry_run: bool,

    /// Print the most recent indexed documents of a user and exit
    #[arg(long, value_name = "USER_ID", conflicts_with = "mode")]
    pub search_user: Option<String>,

    /// Number of documents returned by --search-user
    #[arg(long, value_name = "N", default_value_t = 10, requires = "search_user")]
    pub size: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    pub fn mode(&self) -> RunMode {
        if self.once || self.dry_run {
            RunMode::Once
        } else if self.schedule {
            RunMode::Schedule
        } else {
            RunMode::Watch
        }
    }

    pub fn progress_mode(&self) -> ProgressMode {
        match (self.quiet, self.mode()) {
            (true, _) => ProgressMode::Hidden,
            (false, RunMode::Once) => ProgressMode::Bar,
            (false, RunMode::Schedule | RunMode::Watch) => ProgressMode::Lines,
        }
    }
}
