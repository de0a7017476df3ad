//! Log filename decoding.
//!
//! The proxy names every log file
//! `<timestamp>_<machine_id>_<ip_address>_<editor_version>_<suffix>.json`,
//! for example `2025-03-26T06-16-09.008386_f8f9e3fd25_10.8.170.31_vscode-1.87.0_chat-panel.json`.
//! Decoding is best effort: missing tokens resolve to [`UNKNOWN`] and never
//! surface as errors.

/// Sentinel for fields that cannot be recovered from a filename.
pub const UNKNOWN: &str = "unknown";

/// Fields recovered from a log filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFilename {
    pub machine_id: Option<String>,
    pub ip_address: Option<String>,
    pub editor_version: Option<String>,
}

impl DecodedFilename {
    pub fn machine_id(&self) -> &str {
        self.machine_id.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn ip_address(&self) -> &str {
        self.ip_address.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn editor_version(&self) -> &str {
        self.editor_version.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Split a file's base name on `_` and pick the positional fields.
///
/// Tokens are taken as written; only absent positions become [`UNKNOWN`].
pub fn decode_filename(file_name: &str) -> DecodedFilename {
    let tokens: Vec<&str> = file_name.split('_').collect();
    let token = |index: usize| tokens.get(index).map(|t| t.to_string());

    DecodedFilename {
        machine_id: token(1),
        ip_address: token(2),
        editor_version: token(3),
    }
}
