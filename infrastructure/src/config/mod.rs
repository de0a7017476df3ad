//! Configuration file loading for chatlog-ingest
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `CHATLOG_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./chatlog-ingest.toml` or `./.chatlog-ingest.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chatlog-ingest/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    FileConfig, FileIngestConfig, FileLoggingConfig, FileSinkConfig, FileSourceConfig, LOG_LEVELS,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigError, ConfigIssue, ConfigIssueCode, Severity};
