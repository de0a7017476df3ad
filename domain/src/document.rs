//! Sink-ready documents and the units of work that produce them.

use crate::core::record::RawRecord;
use crate::extraction::{ConversationTurn, Metadata, extract_conversation, extract_metadata};
use crate::filename::UNKNOWN;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One log file selected for processing.
///
/// `user_id` is fixed when the file is discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    pub user_id: String,
    pub modified: SystemTime,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>, user_id: impl Into<String>, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            user_id: user_id.into(),
            modified,
        }
    }

    /// Identity of this file in the dedup ledger.
    pub fn ledger_key(&self) -> String {
        ledger_key(&self.path)
    }

    /// Base name of the file.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Ledger identity of a path.
pub fn ledger_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// The unit written to the sink, one per processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestDocument {
    pub timestamp: String,
    pub file_name: String,
    pub user_id: String,
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Compose the document for one file.
///
/// The document timestamp is the record's own, else `now`.
pub fn assemble(task: &FileTask, record: &RawRecord, now: DateTime<Utc>) -> IngestDocument {
    let file_name = task.file_name();
    let timestamp = record.timestamp().unwrap_or_else(|| now.to_rfc3339());

    IngestDocument {
        timestamp,
        conversation: extract_conversation(record),
        metadata: extract_metadata(record, &file_name),
        user_id: task.user_id.clone(),
        file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn task(name: &str) -> FileTask {
        FileTask::new(
            PathBuf::from("/logs/alice/chat-panel").join(name),
            "alice",
            SystemTime::UNIX_EPOCH,
        )
    }

    #[test]
    fn test_assemble_uses_record_timestamp() {
        let record = RawRecord::from_value(json!({
            "timestamp": "2025-03-26T06:16:09.008386",
            "response": {"content": "ok"}
        }))
        .unwrap();
        let document = assemble(&task("x_m_1.2.3.4_vscode_chat-panel.json"), &record, now());

        assert_eq!(document.timestamp, "2025-03-26T06:16:09.008386");
        assert_eq!(document.file_name, "x_m_1.2.3.4_vscode_chat-panel.json");
        assert_eq!(document.user_id, "alice");
        assert_eq!(document.conversation.len(), 1);
        assert_eq!(document.metadata.ip_address, "1.2.3.4");
    }

    #[test]
    fn test_assemble_ignores_timestamp_in_file_name() {
        let record = RawRecord::from_value(json!({})).unwrap();
        let document = assemble(
            &task("2025-03-26T06-16-09.008386_m_10.0.0.1_vscode_chat-panel.json"),
            &record,
            now(),
        );
        assert_eq!(document.timestamp, "2026-01-02T03:04:05+00:00");
        assert_eq!(document.metadata.machine_id, "m");
    }

    #[test]
    fn test_assemble_falls_back_to_clock() {
        let record = RawRecord::from_value(json!({"timestamp": null})).unwrap();
        let document = assemble(&task("session.json"), &record, now());
        assert_eq!(document.timestamp, "2026-01-02T03:04:05+00:00");
        assert!(document.conversation.is_empty());
    }

    #[test]
    fn test_document_field_names() {
        let record = RawRecord::from_value(json!({"timestamp": "t"})).unwrap();
        let value = serde_json::to_value(assemble(&task("a_b_c_d_e.json"), &record, now())).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["conversation", "file_name", "metadata", "timestamp", "user_id"]
        );
    }

    #[test]
    fn test_ledger_key_is_full_path() {
        let task = task("a.json");
        assert_eq!(task.ledger_key(), "/logs/alice/chat-panel/a.json");
    }
}
