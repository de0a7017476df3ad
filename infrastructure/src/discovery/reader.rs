//! JSON log file reader.

use chatlog_application::{ReadError, RecordReader};
use chatlog_domain::RawRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reads one log file as a single JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileReader;

impl RecordReader for JsonFileReader {
    fn read(&self, path: &Path) -> Result<RawRecord, ReadError> {
        let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let value: Value = serde_json::from_str(content).map_err(|source| ReadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        RawRecord::from_value(value).map_err(|source| ReadError::Record {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        fs::write(&path, r#"{"timestamp": "t", "response": {"content": "hi"}}"#).unwrap();

        let record = JsonFileReader.read(&path).unwrap();
        assert_eq!(record.timestamp().as_deref(), Some("t"));
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom.json");
        fs::write(&path, "\u{feff}{\"timestamp\": \"t\"}").unwrap();

        assert!(JsonFileReader.read(&path).is_ok());
    }

    #[test]
    fn test_error_kinds() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let malformed = dir.path().join("malformed.json");
        let array = dir.path().join("array.json");
        fs::write(&malformed, "{\"timestamp\": ").unwrap();
        fs::write(&array, "[]").unwrap();

        assert!(matches!(JsonFileReader.read(&missing), Err(ReadError::Io { .. })));
        assert!(matches!(JsonFileReader.read(&malformed), Err(ReadError::Json { .. })));
        assert!(matches!(JsonFileReader.read(&array), Err(ReadError::Record { .. })));
    }
}
