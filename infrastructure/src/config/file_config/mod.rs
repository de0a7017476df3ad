//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section lives in its own module; they are deserialized directly
//! and converted into application types where needed.

mod ingest;
mod logging;
mod sink;
mod source;

pub use ingest::FileIngestConfig;
pub use logging::{FileLoggingConfig, LOG_LEVELS};
pub use sink::FileSinkConfig;
pub use source::FileSourceConfig;

use super::validation::{ConfigError, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub source: FileSourceConfig,
    pub ingest: FileIngestConfig,
    pub sink: FileSinkConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check the loaded values for combinations that cannot work.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.source.base_dir.as_os_str().is_empty() && self.source.extra_roots.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoSourceRoots,
                "source.base_dir is empty and no source.extra_roots are configured",
            ));
        }

        if self.source.extension.trim_start_matches('.').is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyExtension,
                "source.extension cannot be empty",
            ));
        }

        for (field, value) in [
            ("ingest.interval_secs", self.ingest.interval_secs),
            ("ingest.poll_secs", self.ingest.poll_secs),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroInterval {
                        field: field.to_string(),
                    },
                    format!("{field} cannot be 0"),
                ));
            }
        }

        if self.sink.index_name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyIndexName,
                "sink.index_name cannot be empty",
            ));
        }

        if !self.logging.level_is_valid() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidLogLevel {
                    value: self.logging.level.clone(),
                },
                format!(
                    "logging.level: unknown value '{}', falling back to 'info'",
                    self.logging.level
                ),
            ));
        }

        issues
    }

    /// Validate, returning warnings or failing on the first error-severity
    /// issues.
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigError::Invalid(
                errors.into_iter().map(|issue| issue.message).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_full_config_deserialize() {
        let toml_str = r#"
[source]
base_dir = "/var/log/proxy"

[ingest]
interval_secs = 600

[sink]
index_name = "chat-archive"

[logging]
level = "debug"
file_enabled = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source.base_dir, PathBuf::from("/var/log/proxy"));
        assert_eq!(config.ingest.interval_secs, 600);
        assert_eq!(config.ingest.poll_secs, 5);
        assert_eq!(config.sink.index_name, "chat-archive");
        assert!(!config.logging.file_enabled);
    }

    #[test]
    fn test_validate_reports_errors() {
        let mut config = FileConfig::default();
        config.source.base_dir = PathBuf::new();
        config.ingest.interval_secs = 0;
        config.sink.index_name = " ".to_string();

        let codes: Vec<ConfigIssueCode> = config.validate().into_iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::NoSourceRoots));
        assert!(codes.contains(&ConfigIssueCode::ZeroInterval {
            field: "ingest.interval_secs".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::EmptyIndexName));
        assert!(config.ensure_valid().is_err());
    }

    #[test]
    fn test_extra_roots_satisfy_source() {
        let mut config = FileConfig::default();
        config.source.base_dir = PathBuf::new();
        config.source.extra_roots = vec![PathBuf::from("/mnt/alice/chat-panel")];
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_bad_log_level_is_warning_only() {
        let mut config = FileConfig::default();
        config.logging.level = "chatty".to_string();

        let warnings = config.ensure_valid().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(!warnings[0].is_error());
    }
}
