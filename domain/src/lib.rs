//! Domain layer for chatlog-ingest
//!
//! This crate contains the pure parts of the ingestion pipeline: decoding
//! log filenames, turning raw proxy records into normalized conversations,
//! and assembling the documents that get indexed. It performs no I/O.
//!
//! # Core Concepts
//!
//! - **RawRecord**: one parsed log file, read-only
//! - **ConversationTurn**: one message (role, content, timestamp)
//! - **IngestDocument**: the sink-ready unit, one per processed file
//! - **RunPhase / RunSummary**: state and outcome of one pipeline run

pub mod core;
pub mod document;
pub mod extraction;
pub mod filename;
pub mod run;

// Re-export commonly used types
pub use core::{error::DomainError, record::RawRecord};
pub use document::{FileTask, IngestDocument, assemble, ledger_key};
pub use extraction::{
    ASSISTANT_ROLE, ConversationTurn, Metadata, RequestShape, ResponseShape, extract_conversation,
    extract_metadata,
};
pub use filename::{DecodedFilename, UNKNOWN, decode_filename};
pub use run::{CommitPolicy, RunPhase, RunSummary};
