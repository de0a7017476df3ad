//! Source configuration from TOML (`[source]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where log files are discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourceConfig {
    /// Directory holding one subdirectory per user
    pub base_dir: PathBuf,
    /// Log folder name inside each user directory
    pub log_subdir: String,
    /// File extension to ingest, without the dot
    pub extension: String,
    /// Additional roots scanned as-is; their parent directory names the user
    pub extra_roots: Vec<PathBuf>,
}

impl Default for FileSourceConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("data/logs"),
            log_subdir: "chat-panel".to_string(),
            extension: "json".to_string(),
            extra_roots: Vec::new(),
        }
    }
}
