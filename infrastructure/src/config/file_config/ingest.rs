//! Ingestion configuration from TOML (`[ingest]` section)

use chatlog_application::{DEFAULT_MAX_FILES_PER_BATCH, IngestParams};
use chatlog_domain::CommitPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Run control and cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIngestConfig {
    /// Files per run, 0 = unlimited
    pub max_files_per_batch: usize,
    /// Dedup ledger location
    pub ledger_path: PathBuf,
    /// Seconds between scheduled runs
    pub interval_secs: u64,
    /// Seconds between pending-file checks in watch mode
    pub poll_secs: u64,
    pub commit_policy: CommitPolicy,
}

impl Default for FileIngestConfig {
    fn default() -> Self {
        Self {
            max_files_per_batch: DEFAULT_MAX_FILES_PER_BATCH,
            ledger_path: PathBuf::from("processed_files.log"),
            interval_secs: 3000,
            poll_secs: 5,
            commit_policy: CommitPolicy::default(),
        }
    }
}

impl FileIngestConfig {
    pub fn to_ingest_params(&self) -> IngestParams {
        IngestParams::default()
            .with_max_files_per_batch(self.max_files_per_batch)
            .with_commit_policy(self.commit_policy)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }
}
