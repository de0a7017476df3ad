//! Record reader port
//!
//! Loads one log file into a [`RawRecord`].

use chatlog_domain::{DomainError, RawRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-file load failures. The file is skipped and retried next run.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record in {path}: {source}")]
    Record {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

pub trait RecordReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<RawRecord, ReadError>;
}
