//! Conversation and metadata extraction.
//!
//! Proxy logs come from several client and server versions, in streaming and
//! non-streaming modes. Extraction therefore classifies each payload into a
//! known shape first and builds turns per shape; anything it does not
//! recognize yields no turns rather than an error.

pub mod conversation;
pub mod metadata;
pub mod shape;

pub use conversation::{ASSISTANT_ROLE, ConversationTurn, extract_conversation};
pub use metadata::{Metadata, extract_metadata};
pub use shape::{RequestShape, ResponseShape, classify_request, classify_response};
