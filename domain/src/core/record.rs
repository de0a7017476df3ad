//! Raw log records.
//!
//! A [`RawRecord`] is the untouched JSON object of one proxy log file. Only a
//! handful of top-level keys are recognized; everything else is carried
//! along unread.

use super::error::DomainError;
use serde_json::{Map, Value};

/// Key of the record-level timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";
/// Key of the proxy latency field.
pub const PROXY_TIME_KEY: &str = "proxy-time-consumed";

/// One parsed log file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    /// Wrap a parsed JSON value. Only objects are valid records.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DomainError::RecordNotObject(json_type_name(&other))),
        }
    }

    /// Access a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The record's own timestamp as text.
    pub fn timestamp(&self) -> Option<String> {
        self.get(TIMESTAMP_KEY).and_then(value_text)
    }

    /// `proxy-time-consumed`, rendered verbatim.
    pub fn proxy_time_consumed(&self) -> Option<String> {
        self.get(PROXY_TIME_KEY).and_then(value_text)
    }

    /// `request.content`, if the request is an object carrying one.
    pub fn request_content(&self) -> Option<&Value> {
        self.get("request")?.get("content")
    }

    /// `response.content`, if the response is an object carrying one.
    pub fn response_content(&self) -> Option<&Value> {
        self.get("response")?.get("content")
    }
}

/// Render a JSON value as text: strings as-is, null as absent, anything
/// else as compact JSON.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert_eq!(
            RawRecord::from_value(json!([1, 2])),
            Err(DomainError::RecordNotObject("array"))
        );
        assert_eq!(
            RawRecord::from_value(json!("text")),
            Err(DomainError::RecordNotObject("string"))
        );
        assert!(RawRecord::from_value(json!({})).is_ok());
    }

    #[test]
    fn test_timestamp_and_proxy_time() {
        let record = RawRecord::from_value(json!({
            "timestamp": "2025-03-26T06:16:09",
            "proxy-time-consumed": 1.25
        }))
        .unwrap();

        assert_eq!(record.timestamp().as_deref(), Some("2025-03-26T06:16:09"));
        assert_eq!(record.proxy_time_consumed().as_deref(), Some("1.25"));
    }

    #[test]
    fn test_null_timestamp_is_absent() {
        let record = RawRecord::from_value(json!({"timestamp": null})).unwrap();
        assert_eq!(record.timestamp(), None);
    }

    #[test]
    fn test_content_accessors_require_objects() {
        let record = RawRecord::from_value(json!({
            "request": "not an object",
            "response": {"content": "hi"}
        }))
        .unwrap();

        assert!(record.request_content().is_none());
        assert_eq!(record.response_content(), Some(&json!("hi")));
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), None);
        assert_eq!(value_text(&json!("a")).as_deref(), Some("a"));
        assert_eq!(
            value_text(&json!([{"type": "text"}])).as_deref(),
            Some(r#"[{"type":"text"}]"#)
        );
    }
}
