//! Payload shape classification.

use serde_json::Value;

/// What a `request.content` payload turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestShape {
    /// An object (possibly decoded from a JSON string).
    Object(serde_json::Map<String, Value>),
    /// A string that is not valid JSON.
    Unparseable,
    /// Valid JSON, but not an object.
    Unrecognized,
}

impl RequestShape {
    /// The `messages` array, when present.
    pub fn messages(&self) -> Option<&[Value]> {
        match self {
            RequestShape::Object(map) => map.get("messages")?.as_array().map(Vec::as_slice),
            _ => None,
        }
    }

    /// The `model` field, when present.
    pub fn model(&self) -> Option<&Value> {
        match self {
            RequestShape::Object(map) => map.get("model"),
            _ => None,
        }
    }
}

/// What a `response.content` payload turned out to be, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// A string that is not JSON: the reply itself.
    PlainText(String),
    /// A list of streaming chunks carrying `choices[].delta.content`.
    StreamingChunks(Vec<Value>),
    /// A completion object with `choices[0].message.content`.
    DirectChoice(Value),
    Unrecognized,
}

pub fn classify_request(content: &Value) -> RequestShape {
    let decoded = match content {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(_) => return RequestShape::Unparseable,
        },
        other => other.clone(),
    };

    match decoded {
        Value::Object(map) => RequestShape::Object(map),
        _ => RequestShape::Unrecognized,
    }
}

pub fn classify_response(content: &Value) -> ResponseShape {
    let decoded = match content {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(_) => return ResponseShape::PlainText(raw.clone()),
        },
        other => other.clone(),
    };

    match decoded {
        Value::Array(chunks) => ResponseShape::StreamingChunks(chunks),
        Value::Object(map) if map.get("choices").is_some_and(Value::is_array) => {
            ResponseShape::DirectChoice(Value::Object(map))
        }
        _ => ResponseShape::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_string_is_decoded() {
        let shape = classify_request(&json!(r#"{"messages": [], "model": "gpt-4o"}"#));
        assert_eq!(shape.messages().map(<[Value]>::len), Some(0));
        assert_eq!(shape.model(), Some(&json!("gpt-4o")));
    }

    #[test]
    fn test_request_unparseable() {
        assert_eq!(classify_request(&json!("{oops")), RequestShape::Unparseable);
        assert_eq!(classify_request(&json!([1])), RequestShape::Unrecognized);
    }

    #[test]
    fn test_response_priority() {
        assert_eq!(
            classify_response(&json!("just text")),
            ResponseShape::PlainText("just text".to_string())
        );
        assert!(matches!(
            classify_response(&json!(r#"[{"choices": []}]"#)),
            ResponseShape::StreamingChunks(chunks) if chunks.len() == 1
        ));
        assert!(matches!(
            classify_response(&json!({"choices": [{"message": {"content": "x"}}]})),
            ResponseShape::DirectChoice(_)
        ));
    }

    #[test]
    fn test_response_unrecognized() {
        assert_eq!(classify_response(&json!({"id": "x"})), ResponseShape::Unrecognized);
        assert_eq!(classify_response(&json!(null)), ResponseShape::Unrecognized);
        // A JSON scalar encoded as a string is valid JSON, not a plain reply
        assert_eq!(classify_response(&json!("42")), ResponseShape::Unrecognized);
    }
}
