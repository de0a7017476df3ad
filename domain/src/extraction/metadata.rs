//! Per-record metadata.

use super::shape::classify_request;
use crate::core::record::{RawRecord, value_text};
use crate::filename::{UNKNOWN, decode_filename};
use serde::{Deserialize, Serialize};

/// Descriptive fields attached to every document.
///
/// The filename-derived fields always carry a value, falling back to
/// `"unknown"`. Optional fields are left out of the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_time_consumed: Option<String>,
    pub ip_address: String,
    pub machine_id: String,
    pub editor_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            proxy_time_consumed: None,
            ip_address: UNKNOWN.to_string(),
            machine_id: UNKNOWN.to_string(),
            editor_version: UNKNOWN.to_string(),
            model: None,
        }
    }
}

/// Collect metadata from the record and its file's base name.
///
/// Each field is read independently; a missing or odd value only affects
/// that field.
pub fn extract_metadata(record: &RawRecord, file_name: &str) -> Metadata {
    let decoded = decode_filename(file_name);
    let model = record
        .request_content()
        .map(classify_request)
        .and_then(|request| request.model().and_then(value_text));

    Metadata {
        proxy_time_consumed: record.proxy_time_consumed(),
        ip_address: decoded.ip_address().to_string(),
        machine_id: decoded.machine_id().to_string(),
        editor_version: decoded.editor_version().to_string(),
        model,
    }
}
