//! Conversation turns.

use super::shape::{ResponseShape, classify_request, classify_response};
use crate::core::record::{RawRecord, value_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role assigned to turns rebuilt from a response.
pub const ASSISTANT_ROLE: &str = "assistant";

/// One message of a normalized conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ConversationTurn {
    pub fn new(
        role: impl Into<String>,
        content: impl Into<String>,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: Option<String>) -> Self {
        Self::new(ASSISTANT_ROLE, content, timestamp)
    }
}

/// Build the ordered turn list of a record.
///
/// Request messages come first, followed by at most one assistant turn
/// rebuilt from the response.
pub fn extract_conversation(record: &RawRecord) -> Vec<ConversationTurn> {
    let timestamp = record.timestamp();
    let mut turns = Vec::new();

    if let Some(content) = record.request_content() {
        let request = classify_request(content);
        if let Some(messages) = request.messages() {
            turns.extend(
                messages
                    .iter()
                    .filter_map(|message| message_turn(message, &timestamp)),
            );
        }
    }

    if let Some(content) = record.response_content()
        && let Some(reply) = response_text(classify_response(content))
    {
        turns.push(ConversationTurn::assistant(reply, timestamp));
    }

    turns
}

fn message_turn(message: &Value, timestamp: &Option<String>) -> Option<ConversationTurn> {
    let role = value_text(message.get("role")?)?;
    let content = value_text(message.get("content")?)?;
    Some(ConversationTurn::new(role, content, timestamp.clone()))
}

fn response_text(shape: ResponseShape) -> Option<String> {
    match shape {
        ResponseShape::PlainText(text) => Some(text),
        ResponseShape::StreamingChunks(chunks) => {
            let text = concat_deltas(&chunks);
            (!text.is_empty()).then_some(text)
        }
        ResponseShape::DirectChoice(completion) => completion
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")
            .and_then(value_text),
        ResponseShape::Unrecognized => None,
    }
}

fn concat_deltas(chunks: &[Value]) -> String {
    chunks
        .iter()
        .filter_map(|chunk| chunk.get("choices")?.as_array())
        .flatten()
        .filter_map(|choice| choice.get("delta")?.get("content")?.as_str())
        .collect()
}
