//! Source scanner port
//!
//! Defines how the pipeline finds log files that still need ingesting.

use super::ledger::DedupLedger;
use chatlog_domain::FileTask;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop discovery altogether.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Source base directory does not exist: {0}")]
    BaseDirMissing(PathBuf),

    #[error("Invalid source pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Result of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Unprocessed files, oldest first, capped at the batch size.
    pub tasks: Vec<FileTask>,
    pub roots_scanned: usize,
    /// Configured roots that do not exist. Skipped, not fatal.
    pub missing_roots: Vec<PathBuf>,
}

/// Finds files not yet present in the ledger.
pub trait SourceScanner: Send + Sync {
    /// Select up to `max_batch` unprocessed files (zero means unlimited).
    fn discover(
        &self,
        ledger: &dyn DedupLedger,
        max_batch: usize,
    ) -> Result<DiscoveryReport, DiscoveryError>;
}
