//! Dedup ledger port
//!
//! Defines the durable record of files that have already been ingested.

use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by ledger storage. Always fatal for a run.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to read ledger {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to append to ledger {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ledger keys cannot contain line breaks: {0:?}")]
    InvalidKey(String),
}

/// Append-only set of ingested file identifiers.
///
/// Lookups are answered from memory. `record` must be durable before it
/// returns, and recording a key twice writes nothing the second time.
pub trait DedupLedger: Send {
    fn contains(&self, key: &str) -> bool;

    /// Record one key. Returns `false` when it was already present.
    fn record(&mut self, key: &str) -> Result<bool, LedgerError>;

    /// Record several keys, returning how many were new.
    fn record_batch(&mut self, keys: &[String]) -> Result<usize, LedgerError> {
        let mut added = 0;
        for key in keys {
            if self.record(key)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Volatile ledger that never touches storage.
///
/// Used for dry runs, seeded from the real ledger so discovery behaves the
/// same.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedger {
    keys: HashSet<String>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl DedupLedger for InMemoryLedger {
    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn record(&mut self, key: &str) -> Result<bool, LedgerError> {
        if key.contains(['\n', '\r']) {
            return Err(LedgerError::InvalidKey(key.to_string()));
        }
        Ok(self.keys.insert(key.to_string()))
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_record_is_idempotent() {
        let mut ledger = InMemoryLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.record("/a.json").unwrap());
        assert!(!ledger.record("/a.json").unwrap());
        assert!(ledger.contains("/a.json"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_record_batch_counts_new_keys() {
        let mut ledger = InMemoryLedger::from_keys(["/a.json"]);
        let added = ledger
            .record_batch(&["/a.json".to_string(), "/b.json".to_string(), "/b.json".to_string()])
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_rejects_multiline_keys() {
        let mut ledger = InMemoryLedger::new();
        assert!(matches!(
            ledger.record("/a\n.json"),
            Err(LedgerError::InvalidKey(_))
        ));
    }
}
