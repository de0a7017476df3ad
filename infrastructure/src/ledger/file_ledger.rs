//! Newline-delimited ledger file.
//!
//! One ingested file path per line, append-only. The whole file is loaded
//! into a set when opened; lookups never touch the disk again.

use chatlog_application::{DedupLedger, LedgerError};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed [`DedupLedger`].
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    entries: HashSet<String>,
}

impl FileLedger {
    /// Load the ledger at `path`. A missing file is an empty ledger.
    ///
    /// Lines are keys verbatim apart from the line ending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(source) => return Err(LedgerError::Read { path, source }),
        };

        info!("Loaded {} ledger entries from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded keys, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn append(&self, keys: &[&str]) -> Result<(), LedgerError> {
        let write_error = |source| LedgerError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        for key in keys {
            writeln!(writer, "{key}").map_err(write_error)?;
        }
        writer.flush().map_err(write_error)?;
        writer.get_ref().sync_data().map_err(write_error)?;

        debug!("Appended {} entries to {}", keys.len(), self.path.display());
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), LedgerError> {
    if key.trim().is_empty() || key.contains(['\n', '\r']) {
        return Err(LedgerError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl DedupLedger for FileLedger {
    fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    fn record(&mut self, key: &str) -> Result<bool, LedgerError> {
        validate_key(key)?;
        if self.entries.contains(key) {
            return Ok(false);
        }
        self.append(&[key])?;
        self.entries.insert(key.to_string());
        Ok(true)
    }

    fn record_batch(&mut self, keys: &[String]) -> Result<usize, LedgerError> {
        let mut fresh: Vec<&str> = Vec::new();
        let mut seen = HashSet::new();
        for key in keys {
            validate_key(key)?;
            if !self.entries.contains(key.as_str()) && seen.insert(key.as_str()) {
                fresh.push(key);
            }
        }
        if fresh.is_empty() {
            return Ok(0);
        }

        self.append(&fresh)?;
        let added = fresh.len();
        self.entries.extend(fresh.into_iter().map(str::to_string));
        Ok(added)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let ledger = FileLedger::open(dir.path().join("processed_files.log")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_record_persists_across_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("processed_files.log");

        let mut ledger = FileLedger::open(&path).unwrap();
        assert!(ledger.record("/logs/alice/chat-panel/a.json").unwrap());
        assert!(path.exists());

        let reloaded = FileLedger::open(&path).unwrap();
        assert!(reloaded.contains("/logs/alice/chat-panel/a.json"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_duplicate_record_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed_files.log");

        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.record("/a.json").unwrap();
        assert!(!ledger.record("/a.json").unwrap());
        assert_eq!(ledger.record_batch(&["/a.json".to_string()]).unwrap(), 0);

        assert_eq!(fs::read_to_string(&path).unwrap(), "/a.json\n");
    }

    #[test]
    fn test_record_batch_appends_unique_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed_files.log");

        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.record("/a.json").unwrap();
        let added = ledger
            .record_batch(&[
                "/a.json".to_string(),
                "/b.json".to_string(),
                "/c.json".to_string(),
                "/b.json".to_string(),
            ])
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "/a.json\n/b.json\n/c.json\n"
        );
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed_files.log");
        fs::write(&path, "/a.json\n\n   \n/b.json\r\n").unwrap();

        let ledger = FileLedger::open(&path).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("/b.json"));
        let mut entries: Vec<&str> = ledger.entries().collect();
        entries.sort();
        assert_eq!(entries, vec!["/a.json", "/b.json"]);
    }

    #[test]
    fn test_whitespace_in_key_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed_files.log");
        let padded = "/logs/alice/chat-panel/a.json ";
        let leading = " /logs/alice/chat-panel/b.json";

        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.record(padded).unwrap();
        ledger.record(leading).unwrap();

        let reloaded = FileLedger::open(&path).unwrap();
        assert!(reloaded.contains(padded));
        assert!(reloaded.contains(leading));
        assert!(!reloaded.contains("/logs/alice/chat-panel/a.json"));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let mut ledger = FileLedger::open(dir.path().join("processed_files.log")).unwrap();

        assert!(matches!(ledger.record("a\nb"), Err(LedgerError::InvalidKey(_))));
        assert!(matches!(
            ledger.record_batch(&["ok".to_string(), "  ".to_string()]),
            Err(LedgerError::InvalidKey(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unwritable_location_is_write_error() {
        let dir = TempDir::new().unwrap();
        let state_dir = dir.path().join("state");
        let mut ledger = FileLedger::open(state_dir.join("processed_files.log")).unwrap();
        // The parent directory cannot be created once a file takes its name
        fs::write(&state_dir, "").unwrap();

        assert!(matches!(ledger.record("/a.json"), Err(LedgerError::Write { .. })));
    }

    #[test]
    fn test_unreadable_location_is_read_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a ledger file
        assert!(matches!(
            FileLedger::open(dir.path()),
            Err(LedgerError::Read { .. })
        ));
    }
}
