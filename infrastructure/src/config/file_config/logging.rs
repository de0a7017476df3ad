//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Console and rolling-file log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Default level when neither `-v` nor `RUST_LOG` is given
    pub level: String,
    pub dir: PathBuf,
    pub file_prefix: String,
    /// Rotated files kept on disk
    pub max_files: usize,
    pub file_enabled: bool,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            file_prefix: "application.log".to_string(),
            max_files: 5,
            file_enabled: true,
        }
    }
}

impl FileLoggingConfig {
    pub fn level_is_valid(&self) -> bool {
        LOG_LEVELS.contains(&self.level.to_lowercase().as_str())
    }
}
